//! The file payload editor: state, view and notification listeners.

mod events;
mod payload_editor_component;
mod state;

pub use events::{DispatchResult, ListenerResponse, ListenerScope, PayloadListener, PayloadListeners, TracingListener};
pub use payload_editor_component::FilePayloadEditorComponent;
pub use state::{EditorSummary, FilePayloadEditorState, LastSelection};
