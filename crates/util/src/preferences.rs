//! Editor defaults stored as JSON under the config directory
//! (`~/.config/filebody/preferences.json` on Linux).
//!
//! Holds the encoding mode, the picker's start directory and extension
//! allow-list, and the theme. CLI flags take precedence over every value here.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Points the store at a different file, e.g. for tests or portable setups.
pub const PREFERENCES_PATH_ENV: &str = "FILEBODY_PREFERENCES_PATH";

pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("could not access preferences file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode preferences: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// On-disk shape of the preferences file. Missing fields take their defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesPayload {
    /// Encode selected files as base64 text instead of binding the raw file.
    pub base64_encode: Option<bool>,
    /// Directory the file picker opens in.
    pub start_directory: Option<String>,
    /// File extensions offered by the picker; empty offers every file.
    pub allowed_extensions: Vec<String>,
    /// Theme id or alias, resolved by the TUI at startup.
    pub preferred_theme: Option<String>,
}

/// Preferences loaded once at startup; setters write through to disk.
#[derive(Debug, Default)]
pub struct UserPreferences {
    path: PathBuf,
    payload: Mutex<PreferencesPayload>,
    persist_to_disk: bool,
}

impl UserPreferences {
    /// Loads from [`PREFERENCES_PATH_ENV`] or the config directory.
    ///
    /// A missing file yields defaults, as does a file that fails to parse.
    pub fn new() -> Result<Self, PreferencesError> {
        Self::at_path(default_preferences_path())
    }

    pub fn at_path(path: PathBuf) -> Result<Self, PreferencesError> {
        let payload = load_payload(&path)?;
        Ok(Self {
            path,
            payload: Mutex::new(payload),
            persist_to_disk: true,
        })
    }

    /// Store that never touches disk.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: Mutex::new(PreferencesPayload::default()),
            persist_to_disk: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current values.
    pub fn snapshot(&self) -> PreferencesPayload {
        self.payload.lock().expect("preferences lock poisoned").clone()
    }

    /// Whether payloads should be base64 encoded. Defaults to `false`.
    pub fn base64_encode(&self) -> bool {
        self.payload.lock().expect("preferences lock poisoned").base64_encode.unwrap_or(false)
    }

    /// Directory the picker should open in, with `~` expanded.
    pub fn start_directory(&self) -> Option<PathBuf> {
        self.payload
            .lock()
            .expect("preferences lock poisoned")
            .start_directory
            .as_deref()
            .map(expand_tilde)
    }

    /// Extensions offered by the picker, normalized to lowercase without a leading dot.
    pub fn allowed_extensions(&self) -> Vec<String> {
        self.payload
            .lock()
            .expect("preferences lock poisoned")
            .allowed_extensions
            .iter()
            .map(|extension| extension.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|extension| !extension.is_empty())
            .collect()
    }

    pub fn preferred_theme(&self) -> Option<String> {
        self.payload.lock().expect("preferences lock poisoned").preferred_theme.clone()
    }

    pub fn set_preferred_theme(&self, theme_id: Option<String>) -> Result<(), PreferencesError> {
        self.update(|payload| payload.preferred_theme = theme_id)
    }

    pub fn set_base64_encode(&self, enabled: bool) -> Result<(), PreferencesError> {
        self.update(|payload| payload.base64_encode = Some(enabled))
    }

    fn update(&self, apply: impl FnOnce(&mut PreferencesPayload)) -> Result<(), PreferencesError> {
        let mut payload = self.payload.lock().expect("preferences lock poisoned");
        apply(&mut payload);
        if self.persist_to_disk {
            self.write(&payload)?;
        }
        Ok(())
    }

    fn write(&self, payload: &PreferencesPayload) -> Result<(), PreferencesError> {
        let json = serde_json::to_string_pretty(payload)?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, json)?;
        Ok(())
    }
}

fn default_preferences_path() -> PathBuf {
    let overridden = env::var(PREFERENCES_PATH_ENV).ok();
    if let Some(path) = overridden.as_deref().map(str::trim).filter(|path| !path.is_empty()) {
        return expand_tilde(path);
    }
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("filebody")
        .join(PREFERENCES_FILE_NAME)
}

fn load_payload(path: &Path) -> Result<PreferencesPayload, PreferencesError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(PreferencesPayload::default()),
        Err(error) => return Err(error.into()),
    };
    Ok(serde_json::from_str(&json).unwrap_or_else(|error| {
        warn!(path = %path.display(), %error, "ignoring malformed preferences file");
        PreferencesPayload::default()
    }))
}
