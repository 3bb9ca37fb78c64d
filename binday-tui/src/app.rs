use binday_core::{
    events::UpcomingEvent,
    materials::MaterialsGuide,
    model::Material,
    service::Session,
    setup::{Choice, SetupWizard},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Setup,
    Materials,
}

pub(crate) struct App {
    pub session: Session,

    pub screen: Screen,

    pub wizard: SetupWizard,
    pub setup_query: String,
    pub setup_index: usize,

    pub guide: Option<MaterialsGuide>,
    pub materials_query: String,
    pub materials_index: usize,

    pub upcoming_event: Option<UpcomingEvent>,

    pub is_loading: bool,
    pub notice: Option<String>,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            session,
            screen: Screen::Dashboard,
            wizard: SetupWizard::new(),
            setup_query: String::new(),
            setup_index: 0,
            guide: None,
            materials_query: String::new(),
            materials_index: 0,
            upcoming_event: None,
            is_loading: false,
            notice: None,
            error_message: None,
        }
    }

    /// Options of the current setup step matching the typed filter.
    pub(crate) fn setup_choices(&self) -> Vec<Choice> {
        self.wizard.choices(&self.setup_query)
    }

    pub(crate) fn current_choice(&self) -> Option<Choice> {
        self.setup_choices().into_iter().nth(self.setup_index)
    }

    pub(crate) fn material_results(&self) -> Vec<&Material> {
        self.guide
            .as_ref()
            .map(|guide| guide.search(&self.materials_query))
            .unwrap_or_default()
    }

    pub(crate) fn current_material(&self) -> Option<&Material> {
        self.material_results().into_iter().nth(self.materials_index)
    }

    /// Clear the filter and cursor after the setup list changed.
    pub(crate) fn reset_setup_cursor(&mut self) {
        self.setup_query.clear();
        self.setup_index = 0;
    }

    pub(crate) fn clear_messages(&mut self) {
        self.notice = None;
        self.error_message = None;
    }
}
