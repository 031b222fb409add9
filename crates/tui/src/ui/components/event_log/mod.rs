//! Panel listing dispatched editor notifications and command messages.

mod event_log_component;
pub(crate) mod state;

pub use event_log_component::EventLogComponent;
pub use state::EventLogState;
