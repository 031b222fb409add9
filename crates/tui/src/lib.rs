//! # Filebody TUI Library
//!
//! A terminal editor for the file payload of an HTTP request body. The user
//! picks a file, which becomes either a raw file handle or, in base64 mode, the
//! base64 encoding of its content. The editor also accepts base64 text and
//! data URIs from the host, recovering file metadata from them.
//!
//! ## Key Features
//!
//! - File picker modal with preview, typed paths and extension filtering
//! - Asynchronous base64 encoding where only the newest read can win
//! - `value-changed`, `content-type-changed` and `base64-conversion-complete`
//!   notifications delivered to registered [`PayloadListener`]s
//! - Event log listing every notification and whether it was prevented
//! - Required-field validation
//!
//! ## Architecture
//!
//! Components handle input and return [`filebody_types::Effect`]s; the command
//! layer executes them on the Tokio runtime and routes the outcomes back as
//! messages.

mod app;
mod cmd;
mod ui;

use std::path::PathBuf;

use anyhow::Result;

pub use filebody_types::{ConversionOutcome, Effect, FileHandle, FileSize, PayloadEvent, PayloadValue};
pub use ui::components::{
    common::Validatable,
    payload_editor::{
        DispatchResult, EditorSummary, FilePayloadEditorState, LastSelection, ListenerResponse, ListenerScope, PayloadListener,
        PayloadListeners, TracingListener,
    },
};

/// Settings for a TUI session.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Encode chosen files as base64 text instead of keeping the raw file
    pub base64_encode: bool,
    /// Base64 text or data URI applied as the initial value
    pub initial_value: Option<String>,
    /// Directory the file picker opens in
    pub start_directory: Option<PathBuf>,
    /// Extensions the file picker offers; empty offers every file
    pub allowed_extensions: Vec<String>,
    /// Theme id or alias
    pub preferred_theme: Option<String>,
    /// Include the value in the returned summary
    pub print_value: bool,
}

/// Runs the file payload editor until the user quits.
///
/// Returns a summary of the final editor state.
///
/// # Errors
///
/// Fails when the terminal cannot be put into raw mode or drawn to.
///
/// # Example
///
/// ```no_run
/// use filebody_tui::{ListenerScope, PayloadListeners, RunOptions, TracingListener, run};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let mut listeners = PayloadListeners::new();
///     listeners.add(ListenerScope::Host, TracingListener);
///     let summary = run(RunOptions::default(), listeners).await?;
///     println!("{}", summary.has_file);
///     Ok(())
/// }
/// ```
pub async fn run(options: RunOptions, listeners: PayloadListeners) -> Result<EditorSummary> {
    ui::runtime::run_app(options, listeners).await
}
