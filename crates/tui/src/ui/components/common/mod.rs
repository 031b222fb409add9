mod file_picker;
mod validation;

pub mod text_input;

pub use file_picker::{FilePickerModal, FilePickerState};
pub use text_input::TextInputState;
pub use validation::Validatable;
