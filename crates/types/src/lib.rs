//! Shared type definitions for the filebody workspace.
//!
//! Besides the payload value types, this crate defines the message, effect and
//! outcome enums that flow between the TUI components and the command layer.

use std::path::PathBuf;

pub mod payload;

pub use payload::{
    ConversionOutcome, DEFAULT_CONTENT_TYPE, DispatchOptions, FALLBACK_FILE_NAME, FileHandle, FileSize, FileSource,
    INVALID_FILE_MARKER, PayloadEvent, PayloadValue,
};

/// A single row in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub is_directory: bool,
}

/// Messages that can be sent to update the application state.
///
/// This enum defines the user actions and system events that can trigger
/// state changes in the application.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// The picker produced a file, or `None` when the chosen path could not be opened
    FileChosen(Option<FileHandle>),
    /// A background base64 read finished
    Base64Encoded { generation: u64, result: Result<String, String> },
    /// Background execution completed with outcome
    ExecCompleted(Box<ExecOutcome>),
}

/// Side effects requested by components.
///
/// Components never perform I/O themselves; they describe it with an effect
/// and the command layer executes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Display a modal view
    ShowModal(Modal),
    /// Hide any open modal
    CloseModal,
    /// List the entries of a directory for the file picker
    ListDirectoryContents(PathBuf),
    /// Load a text preview of a file for the file picker
    ReadFilePreview(PathBuf),
    /// Resolve metadata for a path the user confirmed in the picker
    ResolveChosenFile(PathBuf),
    /// Read a file and encode it as base64
    EncodeFileBase64 { generation: u64, file: FileHandle },
    /// Deliver an editor notification to the registered listeners
    EmitPayloadEvent(PayloadEvent),
    /// Leave the application
    Quit,
}

/// Modal overlays the application can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    FilePicker,
}

/// Result of an executed effect.
#[derive(Debug, Clone)]
pub enum ExecOutcome {
    /// Entries of a listed directory
    DirectoryContents { root_path: PathBuf, entries: Vec<DirectoryEntry> },
    /// Preview text for a file
    FilePreview { path: PathBuf, contents: String },
    /// A message to route back through the components
    Message(Msg),
    /// A line for the event log
    Log(String),
}
