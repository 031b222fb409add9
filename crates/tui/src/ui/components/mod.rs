//! UI components: file payload editor, file picker, event log.

pub mod common;
pub mod component;
pub mod event_log;
pub mod payload_editor;

pub(crate) use component::Component;
pub use event_log::EventLogComponent;
pub use payload_editor::FilePayloadEditorComponent;
