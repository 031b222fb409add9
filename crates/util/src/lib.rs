//! Utility functions shared by the filebody CLI and TUI: payload codecs,
//! asynchronous file access and preference persistence.

pub mod file_io;
pub mod path_processing;
pub mod payload_codec;
pub mod preferences;

pub use file_io::{FileReadError, encode_file_base64, list_directory, read_file_bytes, read_preview, resolve_file_handle};
pub use path_processing::expand_tilde;
pub use payload_codec::{DataUri, DecodedPayload, PayloadCodecError, decode_base64, decode_payload, encode_base64, split_data_uri};
pub use preferences::{PreferencesError, PreferencesPayload, UserPreferences};
