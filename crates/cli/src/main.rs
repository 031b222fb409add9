use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};

use anyhow::{Context, Result};
use clap::Parser;
use filebody_tui::{ListenerScope, PayloadListeners, RunOptions, TracingListener};
use filebody_util::{UserPreferences, expand_tilde};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "filebody.log";

/// Pick a file for an HTTP request body, optionally as base64 text.
#[derive(Debug, Parser)]
#[command(name = "filebody", version, about)]
struct Args {
    /// Encode the chosen file as base64 text
    #[arg(long, conflicts_with = "no_base64")]
    base64: bool,
    /// Keep the chosen file as a raw file handle
    #[arg(long)]
    no_base64: bool,
    /// Directory the file picker opens in
    #[arg(long, value_name = "DIR")]
    start_dir: Option<String>,
    /// Comma separated extensions the picker offers
    #[arg(long, value_name = "EXT", value_delimiter = ',')]
    extensions: Vec<String>,
    /// Initial value: base64 text or a data URI
    #[arg(long, value_name = "TEXT")]
    value: Option<String>,
    /// Theme id or alias
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,
    /// Include the value in the printed summary
    #[arg(long)]
    print_value: bool,
    /// Store the encoding mode and theme as preferences
    #[arg(long)]
    remember: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let args = Args::parse();

    let preferences = UserPreferences::new().unwrap_or_else(|error| {
        warn!(%error, "preferences unavailable; using defaults");
        UserPreferences::ephemeral()
    });
    if args.remember {
        remember(&args, &preferences)?;
    }
    let options = resolve_options(args, &preferences);
    info!(base64 = options.base64_encode, "starting file payload editor");

    let mut listeners = PayloadListeners::new();
    listeners.add(ListenerScope::Host, TracingListener);
    let summary = filebody_tui::run(options, listeners).await?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Sends logs to `<data_dir>/filebody/filebody.log`; the terminal belongs to the TUI.
fn init_tracing() -> Result<()> {
    let Some(log_path) = log_file_path() else {
        return Ok(());
    };
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn log_file_path() -> Option<PathBuf> {
    dirs_next::data_dir().map(|dir| dir.join("filebody").join(LOG_FILE_NAME))
}

/// Merges flags over stored preferences; flags win.
fn resolve_options(args: Args, preferences: &UserPreferences) -> RunOptions {
    let base64_encode = match (args.base64, args.no_base64) {
        (true, _) => true,
        (_, true) => false,
        _ => preferences.base64_encode(),
    };
    let allowed_extensions = if args.extensions.is_empty() {
        preferences.allowed_extensions()
    } else {
        args.extensions
    };

    RunOptions {
        base64_encode,
        initial_value: args.value,
        start_directory: args.start_dir.as_deref().map(expand_tilde).or_else(|| preferences.start_directory()),
        allowed_extensions,
        preferred_theme: args.theme.or_else(|| preferences.preferred_theme()),
        print_value: args.print_value,
    }
}

fn remember(args: &Args, preferences: &UserPreferences) -> Result<()> {
    if args.base64 || args.no_base64 {
        preferences
            .set_base64_encode(args.base64)
            .with_context(|| format!("saving {}", preferences.path().display()))?;
    }
    if let Some(theme) = args.theme.as_ref() {
        preferences
            .set_preferred_theme(Some(theme.clone()))
            .with_context(|| format!("saving {}", preferences.path().display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_preferences(json: &str) -> (tempfile::TempDir, UserPreferences) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, json).unwrap();
        let preferences = UserPreferences::at_path(path).unwrap();
        (dir, preferences)
    }

    #[test]
    fn flags_override_preferences() {
        let (_dir, preferences) = stored_preferences(r#"{"base64_encode": true, "allowed_extensions": ["png"], "preferred_theme": "nord"}"#);
        let args = Args::try_parse_from(["filebody", "--no-base64", "--extensions", "pdf,.TXT", "--theme", "dracula"]).unwrap();

        let options = resolve_options(args, &preferences);

        assert!(!options.base64_encode);
        assert_eq!(options.allowed_extensions, vec!["pdf".to_string(), ".TXT".to_string()]);
        assert_eq!(options.preferred_theme.as_deref(), Some("dracula"));
    }

    #[test]
    fn preferences_fill_missing_flags() {
        let (_dir, preferences) = stored_preferences(r#"{"base64_encode": true, "preferred_theme": "nord"}"#);
        let args = Args::try_parse_from(["filebody", "--value", "data:text/plain;base64,aGk="]).unwrap();

        let options = resolve_options(args, &preferences);

        assert!(options.base64_encode);
        assert_eq!(options.preferred_theme.as_deref(), Some("nord"));
        assert_eq!(options.initial_value.as_deref(), Some("data:text/plain;base64,aGk="));
    }

    #[test]
    fn encoding_flags_conflict() {
        assert!(Args::try_parse_from(["filebody", "--base64", "--no-base64"]).is_err());
    }

    #[test]
    fn remember_persists_mode_and_theme() {
        let (dir, preferences) = stored_preferences("{}");
        let args = Args::try_parse_from(["filebody", "--base64", "--theme", "nord", "--remember"]).unwrap();

        remember(&args, &preferences).unwrap();

        let reloaded = UserPreferences::at_path(dir.path().join("preferences.json")).unwrap();
        assert!(reloaded.base64_encode());
        assert_eq!(reloaded.preferred_theme().as_deref(), Some("nord"));
    }
}
