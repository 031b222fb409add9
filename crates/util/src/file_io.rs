//! Asynchronous file access used by the payload editor and the file picker.
//!
//! Every function here runs on the Tokio runtime and is called from the
//! command layer, never from component state.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use filebody_types::{DirectoryEntry, FileHandle, FileSource};
use thiserror::Error;
use tokio::{fs, io::AsyncReadExt};
use tracing::debug;

use crate::payload_codec::encode_base64;

/// Upper bound for the text loaded into the picker preview pane.
pub const PREVIEW_BYTE_LIMIT: u64 = 64 * 1024;

/// Error surfaced when a file cannot be read.
#[derive(Debug, Error)]
pub enum FileReadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a regular file")]
    NotAFile { path: PathBuf },
}

impl FileReadError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Builds a [`FileHandle`] for a path, resolving name, size and content type.
///
/// The content type is guessed from the file extension.
pub async fn resolve_file_handle(path: &Path) -> Result<FileHandle, FileReadError> {
    let metadata = fs::metadata(path).await.map_err(|error| FileReadError::io(path, error))?;
    if !metadata.is_file() {
        return Err(FileReadError::NotAFile { path: path.to_path_buf() });
    }
    let name = path.file_name().map(|name| name.to_string_lossy().into_owned());
    let content_type = mime_guess::from_path(path).first_raw().map(str::to_string);
    Ok(FileHandle::on_disk(path.to_path_buf(), name, content_type, metadata.len()))
}

/// Reads the full content behind a handle.
pub async fn read_file_bytes(handle: &FileHandle) -> Result<Arc<[u8]>, FileReadError> {
    match handle.source() {
        FileSource::Memory(bytes) => Ok(Arc::clone(bytes)),
        FileSource::Path(path) => {
            let bytes = fs::read(path).await.map_err(|error| FileReadError::io(path, error))?;
            Ok(bytes.into())
        }
    }
}

/// Reads the full content behind a handle and encodes it as base64.
pub async fn encode_file_base64(handle: &FileHandle) -> Result<String, FileReadError> {
    let bytes = read_file_bytes(handle).await?;
    debug!(file = handle.display_name(), bytes = bytes.len(), "encoding file as base64");
    Ok(encode_base64(&bytes))
}

/// Lists a directory for the picker.
///
/// The parent directory, when there is one, comes first so it renders as the
/// `..` row. Directories are listed before files; both are sorted by name.
pub async fn list_directory(path: &Path) -> Result<Vec<DirectoryEntry>, FileReadError> {
    let mut read_dir = fs::read_dir(path).await.map_err(|error| FileReadError::io(path, error))?;
    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await.map_err(|error| FileReadError::io(path, error))? {
        let is_directory = entry.file_type().await.map(|kind| kind.is_dir()).unwrap_or(false);
        entries.push(DirectoryEntry {
            path: entry.path(),
            is_directory,
        });
    }
    entries.sort_by(|a, b| b.is_directory.cmp(&a.is_directory).then_with(|| a.path.cmp(&b.path)));

    if let Some(parent) = path.parent() {
        entries.insert(
            0,
            DirectoryEntry {
                path: parent.to_path_buf(),
                is_directory: true,
            },
        );
    }
    Ok(entries)
}

/// Loads at most [`PREVIEW_BYTE_LIMIT`] bytes of a file as lossy UTF-8.
pub async fn read_preview(path: &Path) -> Result<String, FileReadError> {
    let file = fs::File::open(path).await.map_err(|error| FileReadError::io(path, error))?;
    let mut buffer = Vec::new();
    file.take(PREVIEW_BYTE_LIMIT)
        .read_to_end(&mut buffer)
        .await
        .map_err(|error| FileReadError::io(path, error))?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
