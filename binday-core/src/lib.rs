//! Core types and session wiring for the Bin Day waste collection reminder.

/// Weather advisories for the next collection day.
pub mod advisory;
/// iCalendar export of upcoming collections.
pub mod calendar;
/// Injectable source of the current date and time.
pub mod clock;
/// Council waste events shown on the dashboard.
pub mod events;
/// "Which Bin?" materials guide.
pub mod materials;
/// Domain models and identifiers shared by the adapters.
pub mod model;
/// Per-user config, cache, and log locations.
pub mod paths;
/// Traits describing the external services and local storage.
pub mod ports;
/// Turns a property's waste data into next-collection dates.
pub mod resolver;
/// Session state machine used by clients.
pub mod service;
/// Optional TOML settings.
pub mod settings;
/// Address selection flow.
pub mod setup;
/// JSON persistence of the config record and schedule snapshot.
pub mod store;

#[cfg(test)]
mod test_support;

pub use advisory::*;
pub use clock::*;
pub use events::*;
pub use materials::*;
pub use model::*;
pub use ports::*;
pub use resolver::*;
pub use service::*;
pub use settings::*;
pub use setup::*;
pub use store::*;
