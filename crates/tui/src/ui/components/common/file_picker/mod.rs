//! Modal for choosing the file that becomes the request body.

mod file_picker_component;
mod state;

pub use file_picker_component::FilePickerModal;
pub use state::FilePickerState;
