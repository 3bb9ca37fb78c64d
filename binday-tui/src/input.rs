use binday_core::setup::SetupStep;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `session.refresh()` and reload the events banner
    Refresh,
    /// Restart address selection from the suburb list
    ChangeAddress,
    /// Pick the highlighted option of the current setup step
    Choose,
    /// Fetch the materials list and open the guide
    LoadMaterials,
    /// Write the resolved dates to an .ics file
    ExportCalendar,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Up};

    // Global quit shortcut; plain `q` is text input on the filtered screens
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    let typing = !key.modifiers.contains(KeyModifiers::CONTROL)
        && !key.modifiers.contains(KeyModifiers::ALT);

    let mut action = Action::None;

    match app.screen {
        Screen::Dashboard => match key.code {
            Char('q') | Esc => action = Action::Quit,
            Char('r') => action = Action::Refresh,
            Char('a') => action = Action::ChangeAddress,
            Char('m') => action = Action::LoadMaterials,
            Char('e') => action = Action::ExportCalendar,
            _ => {}
        },

        Screen::Setup => match key.code {
            Up => {
                app.setup_index = app.setup_index.saturating_sub(1);
            }
            Down => {
                if app.setup_index + 1 < app.setup_choices().len() {
                    app.setup_index += 1;
                }
            }
            Enter => {
                action = Action::Choose;
            }
            Backspace => {
                app.setup_query.pop();
                app.setup_index = 0;
            }
            Esc => {
                if app.setup_query.is_empty() {
                    leave_setup_step(app);
                } else {
                    app.reset_setup_cursor();
                }
            }
            Char(character) if typing => {
                app.setup_query.push(character);
                app.setup_index = 0;
            }
            _ => {}
        },

        Screen::Materials => match key.code {
            Up => {
                app.materials_index = app.materials_index.saturating_sub(1);
            }
            Down => {
                if app.materials_index + 1 < app.material_results().len() {
                    app.materials_index += 1;
                }
            }
            Backspace => {
                app.materials_query.pop();
                app.materials_index = 0;
            }
            Esc => {
                app.materials_query.clear();
                app.materials_index = 0;
                app.screen = Screen::Dashboard;
            }
            Char(character) if typing => {
                app.materials_query.push(character);
                app.materials_index = 0;
            }
            _ => {}
        },
    }
    action
}

/// Step back in the wizard; from the first step return to the dashboard when a property is
/// already configured.
fn leave_setup_step(app: &mut App) {
    if app.wizard.step() == SetupStep::Locality {
        if app.session.property_id().is_some() {
            app.screen = Screen::Dashboard;
        }
    } else {
        app.wizard.back();
    }
    app.reset_setup_cursor();
}
