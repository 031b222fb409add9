//! Value types describing the file payload of a request body.
//!
//! A payload is either empty, a handle to a raw file the user picked, or a
//! base64 encoded string (optionally wrapped in a data URI). Keeping the three
//! shapes in one tagged enum lets every consumer match on them exhaustively.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;

/// Content type reported when a file carries no type information.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Display name used when a file handle has no name or the payload was decoded from text.
pub const FALLBACK_FILE_NAME: &str = "blob";

/// Value stored in place of the encoded text when reading a file fails.
pub const INVALID_FILE_MARKER: &str = "Invalid file";

/// Where the bytes behind a [`FileHandle`] live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// A file on the local filesystem, read lazily.
    Path(PathBuf),
    /// Bytes already held in memory (pasted content, tests).
    Memory(Arc<[u8]>),
}

/// A selected binary file.
///
/// Mirrors the metadata a platform file object exposes: an optional name, an
/// optional MIME type and the byte length. The handle is cheap to clone; the
/// content itself is only read when the payload has to be encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    name: Option<String>,
    content_type: Option<String>,
    size: u64,
    source: FileSource,
}

impl FileHandle {
    /// Builds a handle for a file on disk whose metadata was already resolved.
    pub fn on_disk(path: PathBuf, name: Option<String>, content_type: Option<String>, size: u64) -> Self {
        Self {
            name,
            content_type,
            size,
            source: FileSource::Path(path),
        }
    }

    /// Builds a handle around bytes held in memory.
    pub fn from_bytes(name: Option<&str>, content_type: Option<&str>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.map(str::to_string),
            content_type: content_type.map(str::to_string),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    /// Name reported by the source, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Name shown to the user; falls back to [`FALLBACK_FILE_NAME`].
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(FALLBACK_FILE_NAME)
    }

    /// MIME type reported by the source, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref().filter(|content_type| !content_type.is_empty())
    }

    /// MIME type to announce for this file; falls back to [`DEFAULT_CONTENT_TYPE`].
    pub fn resolved_content_type(&self) -> &str {
        self.content_type().unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Byte length of the file.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Filesystem path when the handle points at a file on disk.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Path(path) => Some(path.as_path()),
            FileSource::Memory(_) => None,
        }
    }
}

/// The bindable value of the file payload editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PayloadValue {
    /// Nothing selected.
    #[default]
    Empty,
    /// A raw file handle (binary mode).
    RawFile(FileHandle),
    /// Base64 text, optionally a `data:` URI.
    EncodedText(String),
}

impl PayloadValue {
    /// Wraps text as a payload value. Empty text is treated as no value.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            Self::Empty
        } else {
            Self::EncodedText(text)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_file(&self) -> Option<&FileHandle> {
        match self {
            Self::RawFile(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::EncodedText(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Option<FileHandle>> for PayloadValue {
    fn from(file: Option<FileHandle>) -> Self {
        file.map_or(Self::Empty, Self::RawFile)
    }
}

/// Byte length of the current selection.
///
/// `Unknown` is used when a decoded payload produced no usable length; it is
/// reported as `-1` wherever a number is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i64")]
pub enum FileSize {
    Bytes(u64),
    Unknown,
}

impl FileSize {
    /// Size for a decoded payload; an empty decode has no usable length.
    pub fn from_decoded_len(len: usize) -> Self {
        if len == 0 { Self::Unknown } else { Self::Bytes(len as u64) }
    }

    pub fn as_i64(self) -> i64 {
        match self {
            Self::Bytes(bytes) => i64::try_from(bytes).unwrap_or(i64::MAX),
            Self::Unknown => -1,
        }
    }
}

impl From<FileSize> for i64 {
    fn from(size: FileSize) -> Self {
        size.as_i64()
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

/// Dispatch flags carried by a [`PayloadEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Whether the event also reaches listeners registered on the host, not just the editor.
    pub bubbles: bool,
    /// Whether listeners may prevent the default handling.
    pub cancelable: bool,
    /// Whether the event crosses the component boundary into the host.
    pub composed: bool,
}

/// How a base64 read finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// The file was read and its encoding became the value.
    Encoded,
    /// The read failed and the value became [`INVALID_FILE_MARKER`].
    Failed,
    /// A newer read started before this one finished; the value was left alone.
    Superseded,
}

/// Notifications emitted by the file payload editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadEvent {
    /// The bindable value changed.
    ValueChanged { has_value: bool },
    /// A content type was resolved for the current value.
    ContentTypeChanged { content_type: String },
    /// An asynchronous base64 read finished.
    Base64ConversionComplete { generation: u64, outcome: ConversionOutcome },
}

impl PayloadEvent {
    /// Event name as exposed to listeners.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ValueChanged { .. } => "value-changed",
            Self::ContentTypeChanged { .. } => "content-type-changed",
            Self::Base64ConversionComplete { .. } => "base64-conversion-complete",
        }
    }

    pub const fn dispatch_options(&self) -> DispatchOptions {
        match self {
            Self::ValueChanged { .. } => DispatchOptions {
                bubbles: false,
                cancelable: false,
                composed: false,
            },
            Self::ContentTypeChanged { .. } => DispatchOptions {
                bubbles: true,
                cancelable: true,
                composed: true,
            },
            Self::Base64ConversionComplete { .. } => DispatchOptions {
                bubbles: false,
                cancelable: true,
                composed: false,
            },
        }
    }
}

impl fmt::Display for PayloadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueChanged { has_value } => write!(f, "{}: has_value={has_value}", self.name()),
            Self::ContentTypeChanged { content_type } => write!(f, "{}: {content_type}", self.name()),
            Self::Base64ConversionComplete { generation, outcome } => {
                write!(f, "{}: #{generation} {outcome:?}", self.name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_without_name_or_type_uses_fallbacks() {
        let handle = FileHandle::from_bytes(None, Some(""), vec![1u8, 2, 3]);
        assert_eq!(handle.display_name(), FALLBACK_FILE_NAME);
        assert_eq!(handle.resolved_content_type(), DEFAULT_CONTENT_TYPE);
        assert_eq!(handle.size(), 3);
        assert!(handle.path().is_none());
    }

    #[test]
    fn empty_text_is_not_a_value() {
        assert_eq!(PayloadValue::text(""), PayloadValue::Empty);
        assert_eq!(PayloadValue::text("QQ=="), PayloadValue::EncodedText("QQ==".into()));
    }

    #[test]
    fn unknown_size_reports_sentinel() {
        assert_eq!(FileSize::from_decoded_len(0), FileSize::Unknown);
        assert_eq!(FileSize::Unknown.to_string(), "-1");
        assert_eq!(serde_json::to_value(FileSize::Bytes(10)).unwrap(), serde_json::json!(10));
    }

    #[test]
    fn event_dispatch_flags_match_event_kind() {
        let content_type = PayloadEvent::ContentTypeChanged {
            content_type: "text/plain".into(),
        };
        let complete = PayloadEvent::Base64ConversionComplete {
            generation: 1,
            outcome: ConversionOutcome::Encoded,
        };
        assert!(content_type.dispatch_options().bubbles);
        assert!(content_type.dispatch_options().cancelable);
        assert!(!complete.dispatch_options().bubbles);
        assert!(complete.dispatch_options().cancelable);
        assert_eq!(complete.name(), "base64-conversion-complete");
    }
}
