//! Suburb → street → property selection used before the first schedule refresh.

use tracing::debug;

use crate::model::{
    AddressSelection, Locality, LocalityId, Property, PropertyId, Street, StreetId,
};
use crate::ports::{PortError, WastePort};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which list the wizard is currently offering.
pub enum SetupStep {
    /// Choose a suburb.
    Locality,
    /// Choose a street in the chosen suburb.
    Street,
    /// Choose a property on the chosen street.
    Property,
    /// A property is chosen; setup can be completed.
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One selectable option of the current step.
pub struct Choice {
    /// Raw identifier of the locality, street, or property.
    pub id: u64,
    /// Display name.
    pub name: String,
}

/// Transient selection state; only the final property id outlives it.
#[derive(Debug, Clone)]
pub struct SetupWizard {
    localities: Vec<Locality>,
    streets: Vec<Street>,
    properties: Vec<Property>,
    selection: AddressSelection,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupWizard {
    /// Empty wizard; call [`SetupWizard::load_localities`] next.
    #[must_use]
    pub fn new() -> Self {
        Self {
            localities: Vec::new(),
            streets: Vec::new(),
            properties: Vec::new(),
            selection: AddressSelection::default(),
        }
    }

    /// Fetch the suburb list and restart the selection.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the lookup fails or returns no suburbs.
    pub async fn load_localities(&mut self, port: &dyn WastePort) -> Result<(), PortError> {
        let mut localities = port.localities().await?;
        if localities.is_empty() {
            return Err(PortError::NoResults("localities"));
        }
        localities.sort_by(|left, right| left.name.cmp(&right.name));
        debug!(count = localities.len(), "loaded localities");

        self.localities = localities;
        self.streets.clear();
        self.properties.clear();
        self.selection = AddressSelection::default();
        Ok(())
    }

    /// Choose a suburb and load its streets. Any street or property choice is reset.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the street lookup fails or finds nothing.
    pub async fn choose_locality(
        &mut self,
        port: &dyn WastePort,
        locality: LocalityId,
    ) -> Result<(), PortError> {
        self.selection = AddressSelection {
            locality: Some(locality),
            street: None,
            property: None,
        };
        self.streets.clear();
        self.properties.clear();

        let mut streets = port.streets(locality).await?;
        if streets.is_empty() {
            return Err(PortError::NoResults("streets"));
        }
        streets.sort_by(|left, right| left.name.cmp(&right.name));
        self.streets = streets;
        Ok(())
    }

    /// Choose a street and load its properties. Any property choice is reset.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the property lookup fails or finds nothing.
    pub async fn choose_street(
        &mut self,
        port: &dyn WastePort,
        street: StreetId,
    ) -> Result<(), PortError> {
        self.selection.street = Some(street);
        self.selection.property = None;
        self.properties.clear();

        let mut properties = port.properties(street).await?;
        if properties.is_empty() {
            return Err(PortError::NoResults("properties"));
        }
        properties.sort_by(|left, right| left.name.cmp(&right.name));
        self.properties = properties;
        Ok(())
    }

    /// Choose a property from the loaded list; returns `false` for an unknown id.
    pub fn choose_property(&mut self, property: PropertyId) -> bool {
        let known = self.properties.iter().any(|candidate| candidate.id == property);
        if known {
            self.selection.property = Some(property);
        }
        known
    }

    /// Choose the option with `id` in the current step.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when loading the next step's list fails.
    pub async fn choose(&mut self, port: &dyn WastePort, id: u64) -> Result<(), PortError> {
        match self.step() {
            SetupStep::Locality => self.choose_locality(port, LocalityId(id)).await,
            SetupStep::Street => self.choose_street(port, StreetId(id)).await,
            SetupStep::Property | SetupStep::Ready => {
                self.choose_property(PropertyId(id));
                Ok(())
            }
        }
    }

    /// Step to go back to from the current one.
    pub fn back(&mut self) {
        match self.step() {
            SetupStep::Ready => self.selection.property = None,
            SetupStep::Property => {
                self.selection.street = None;
                self.properties.clear();
            }
            SetupStep::Street => {
                self.selection.locality = None;
                self.streets.clear();
            }
            SetupStep::Locality => {}
        }
    }

    /// Current step, derived from what has been chosen so far.
    #[must_use]
    pub fn step(&self) -> SetupStep {
        match self.selection {
            AddressSelection {
                property: Some(_), ..
            } => SetupStep::Ready,
            AddressSelection {
                street: Some(_), ..
            } => SetupStep::Property,
            AddressSelection {
                locality: Some(_),
                ..
            } => SetupStep::Street,
            AddressSelection { .. } => SetupStep::Locality,
        }
    }

    /// Options of the current step whose name contains `query`, ignoring case.
    #[must_use]
    pub fn choices(&self, query: &str) -> Vec<Choice> {
        let needle = query.trim().to_lowercase();
        let options: Vec<Choice> = match self.step() {
            SetupStep::Locality => self
                .localities
                .iter()
                .map(|locality| choice(locality.id.0, &locality.name))
                .collect(),
            SetupStep::Street => self
                .streets
                .iter()
                .map(|street| choice(street.id.0, &street.name))
                .collect(),
            SetupStep::Property | SetupStep::Ready => self
                .properties
                .iter()
                .map(|property| choice(property.id.0, &property.name))
                .collect(),
        };
        options
            .into_iter()
            .filter(|option| needle.is_empty() || option.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// What has been chosen so far.
    #[must_use]
    pub fn selection(&self) -> AddressSelection {
        self.selection
    }

    /// The chosen property, once the wizard is ready.
    #[must_use]
    pub fn selected_property(&self) -> Option<PropertyId> {
        self.selection.property
    }
}

fn choice(id: u64, name: &str) -> Choice {
    Choice {
        id,
        name: name.to_owned(),
    }
}
