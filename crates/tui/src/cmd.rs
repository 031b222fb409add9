//! # Command Execution Layer
//!
//! Translates the [`Effect`]s returned by components into side effects. This
//! is the boundary where the pure state of the editor meets the filesystem:
//! - Resolving and base64 encoding chosen files
//! - Listing directories and loading previews for the file picker
//! - Delivering editor notifications to the registered listeners
//!
//! Listener dispatch happens inline. Filesystem work is spawned on the Tokio
//! runtime and returned as join handles in [`CommandBatch::pending`]. Every
//! spawned task resolves to an outcome, failures included, so the runtime only
//! has to handle a task error when the task panicked.

use filebody_types::{ExecOutcome, FileHandle, Msg};
use filebody_util::{encode_file_base64, list_directory, read_preview, resolve_file_handle};
use std::path::PathBuf;
use tokio::task::{JoinHandle, spawn};
use tracing::{debug, warn};

use crate::app::{App, Effect};

/// Outcomes of a batch of executed effects.
#[derive(Debug, Default)]
pub struct CommandBatch {
    /// Background tasks still running
    pub pending: Vec<JoinHandle<ExecOutcome>>,
}

/// Executes effects that need I/O or listener dispatch.
///
/// Navigation effects (`ShowModal`, `CloseModal`, `Quit`) are handled by the
/// runtime before this is called and are ignored here.
pub async fn run_from_effects(app: &mut App, effects: Vec<Effect>) -> CommandBatch {
    let mut batch = CommandBatch::default();

    for effect in effects {
        match effect {
            Effect::EncodeFileBase64 { generation, file } => batch.pending.push(spawn(encode_file(generation, file))),
            Effect::ResolveChosenFile(path) => batch.pending.push(spawn(resolve_chosen_file(path))),
            Effect::ListDirectoryContents(path) => batch.pending.push(spawn(list_directory_contents(path))),
            Effect::ReadFilePreview(path) => batch.pending.push(spawn(read_file_preview(path))),
            Effect::EmitPayloadEvent(event) => app.dispatch_payload_event(event),
            Effect::ShowModal(_) | Effect::CloseModal | Effect::Quit => {}
        }
    }

    batch
}

async fn encode_file(generation: u64, file: FileHandle) -> ExecOutcome {
    debug!(generation, "starting base64 read");
    let result = encode_file_base64(&file).await.map_err(|error| error.to_string());
    ExecOutcome::Message(Msg::Base64Encoded { generation, result })
}

async fn resolve_chosen_file(path: PathBuf) -> ExecOutcome {
    match resolve_file_handle(&path).await {
        Ok(file) => ExecOutcome::Message(Msg::FileChosen(Some(file))),
        Err(error) => {
            warn!(path = %path.display(), %error, "could not open the chosen file");
            ExecOutcome::Message(Msg::FileChosen(None))
        }
    }
}

async fn list_directory_contents(root_path: PathBuf) -> ExecOutcome {
    match list_directory(&root_path).await {
        Ok(entries) => ExecOutcome::DirectoryContents { root_path, entries },
        Err(error) => ExecOutcome::Log(format!("Could not list {}: {error}", root_path.display())),
    }
}

async fn read_file_preview(path: PathBuf) -> ExecOutcome {
    match read_preview(&path).await {
        Ok(contents) => ExecOutcome::FilePreview { path, contents },
        Err(error) => ExecOutcome::Log(format!("Could not preview {}: {error}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use filebody_types::PayloadEvent;

    use super::*;
    use crate::{RunOptions, ui::components::payload_editor::PayloadListeners};

    async fn join_all(batch: CommandBatch) -> Vec<ExecOutcome> {
        let mut outcomes = Vec::new();
        for handle in batch.pending {
            outcomes.push(handle.await.unwrap());
        }
        outcomes
    }

    #[tokio::test]
    async fn encodes_files_in_the_background() {
        let mut app = App::new(RunOptions::default(), PayloadListeners::new());
        let file = FileHandle::from_bytes(Some("a.txt"), None, b"hello".to_vec());

        let batch = run_from_effects(&mut app, vec![Effect::EncodeFileBase64 { generation: 3, file }]).await;
        let outcomes = join_all(batch).await;

        assert!(matches!(
            outcomes.as_slice(),
            [ExecOutcome::Message(Msg::Base64Encoded { generation: 3, result: Ok(text) })] if text == "aGVsbG8="
        ));
    }

    #[tokio::test]
    async fn unresolvable_paths_clear_the_choice() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(RunOptions::default(), PayloadListeners::new());

        let batch = run_from_effects(&mut app, vec![Effect::ResolveChosenFile(dir.path().join("missing.bin"))]).await;
        let outcomes = join_all(batch).await;

        assert!(matches!(outcomes.as_slice(), [ExecOutcome::Message(Msg::FileChosen(None))]));
    }

    #[tokio::test]
    async fn lists_directories_and_previews_files() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("notes.txt");
        fs::write(&file_path, "first line\nsecond line").unwrap();
        let mut app = App::new(RunOptions::default(), PayloadListeners::new());

        let batch = run_from_effects(
            &mut app,
            vec![
                Effect::ListDirectoryContents(dir.path().to_path_buf()),
                Effect::ReadFilePreview(file_path.clone()),
            ],
        )
        .await;
        let outcomes = join_all(batch).await;

        assert!(matches!(&outcomes[0], ExecOutcome::DirectoryContents { entries, .. } if entries.iter().any(|entry| entry.path == file_path)));
        assert!(matches!(&outcomes[1], ExecOutcome::FilePreview { contents, .. } if contents.starts_with("first line")));
    }

    #[tokio::test]
    async fn payload_events_are_dispatched_synchronously() {
        let mut app = App::new(RunOptions::default(), PayloadListeners::new());

        let batch = run_from_effects(
            &mut app,
            vec![Effect::EmitPayloadEvent(PayloadEvent::ContentTypeChanged {
                content_type: "image/png".into(),
            })],
        )
        .await;

        assert!(batch.pending.is_empty());
        assert_eq!(app.request_content_type.as_deref(), Some("image/png"));
        assert_eq!(app.event_log.entries().len(), 1);
    }
}
