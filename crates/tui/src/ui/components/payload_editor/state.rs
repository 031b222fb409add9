//! Selection state of the file payload editor.
//!
//! The state owns the bindable [`PayloadValue`] and everything derived from
//! it: display name, byte size, whether a file is present and the resolved
//! content type. All transitions are synchronous; reading a file for base64
//! encoding is requested with an [`Effect`] and completed later through
//! [`FilePayloadEditorState::complete_base64_conversion`].
//!
//! Notifications are returned as [`Effect::EmitPayloadEvent`]. The
//! content type of a raw file is announced one loop iteration later; those
//! events wait in a queue drained by [`FilePayloadEditorState::take_deferred_events`].

use std::path::{Path, PathBuf};

use filebody_types::{
    ConversionOutcome, DEFAULT_CONTENT_TYPE, Effect, FALLBACK_FILE_NAME, FileHandle, FileSize, INVALID_FILE_MARKER, Modal,
    PayloadEvent, PayloadValue,
};
use filebody_util::decode_payload;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use serde::Serialize;
use tracing::{debug, warn};

use crate::ui::components::common::Validatable;

/// Slot holding the most recently selected raw file.
///
/// Survives value resets and [`FilePayloadEditorState::remove_file`]; only
/// [`FilePayloadEditorState::clear_cache`] empties it.
#[derive(Debug, Clone, Default)]
pub struct LastSelection(Option<FileHandle>);

impl LastSelection {
    fn remember(&mut self, file: FileHandle) {
        self.0 = Some(file);
    }

    pub fn get(&self) -> Option<&FileHandle> {
        self.0.as_ref()
    }

    fn clear(&mut self) {
        self.0 = None;
    }
}

/// Serializable snapshot of the editor, printed by the CLI on exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorSummary {
    pub has_file: bool,
    pub file_name: Option<String>,
    pub file_size: Option<FileSize>,
    pub content_type: Option<String>,
    pub base64_encode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FilePayloadEditorState {
    base64_encode: bool,
    value: PayloadValue,
    file_name: Option<String>,
    file_size: Option<FileSize>,
    has_file: bool,
    content_type: Option<String>,
    invalid: bool,

    last_selection: LastSelection,
    /// Path the picker last reported; choosing it again is not a change.
    input_selection: Option<PathBuf>,
    read_generation: u64,
    pending_read: Option<u64>,
    deferred_events: Vec<PayloadEvent>,

    container_focus: FocusFlag,
    pub f_choose: FocusFlag,
    pub f_remove: FocusFlag,
}

impl FilePayloadEditorState {
    /// Creates an empty editor. `base64_encode` is fixed for the lifetime of the editor.
    pub fn new(base64_encode: bool) -> Self {
        Self {
            base64_encode,
            value: PayloadValue::Empty,
            file_name: None,
            file_size: None,
            has_file: false,
            content_type: None,
            invalid: false,
            last_selection: LastSelection::default(),
            input_selection: None,
            read_generation: 0,
            pending_read: None,
            deferred_events: Vec::new(),
            container_focus: FocusFlag::new().with_name("payload_editor.container"),
            f_choose: FocusFlag::new().with_name("payload_editor.choose"),
            f_remove: FocusFlag::new().with_name("payload_editor.remove"),
        }
    }

    // ----- Accessors -----

    pub fn value(&self) -> &PayloadValue {
        &self.value
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn file_size(&self) -> Option<FileSize> {
        self.file_size
    }

    pub fn has_file(&self) -> bool {
        self.has_file
    }

    pub fn base64_encode(&self) -> bool {
        self.base64_encode
    }

    /// Content type resolved for the current value.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn cached_file(&self) -> Option<&FileHandle> {
        self.last_selection.get()
    }

    pub fn input_selection(&self) -> Option<&Path> {
        self.input_selection.as_deref()
    }

    pub fn read_generation(&self) -> u64 {
        self.read_generation
    }

    /// Whether a base64 read for the newest selection is still running.
    pub fn is_encoding(&self) -> bool {
        self.pending_read.is_some()
    }

    /// Returns `false` when the picker would report a path that is already selected.
    pub fn accepts_picker_selection(&self, path: &Path) -> bool {
        self.input_selection.as_deref() != Some(path)
    }

    pub fn summary(&self, include_value: bool) -> EditorSummary {
        let value = include_value
            .then(|| match &self.value {
                PayloadValue::Empty => None,
                PayloadValue::RawFile(file) => Some(
                    file.path()
                        .map(|path| path.display().to_string())
                        .unwrap_or_else(|| file.display_name().to_string()),
                ),
                PayloadValue::EncodedText(text) => Some(text.clone()),
            })
            .flatten();
        EditorSummary {
            has_file: self.has_file,
            file_name: self.file_name.clone(),
            file_size: self.file_size,
            content_type: self.content_type.clone(),
            base64_encode: self.base64_encode,
            value,
        }
    }

    // ----- Operations -----

    /// Opens the file picker.
    pub fn select_file(&self) -> Vec<Effect> {
        vec![Effect::ShowModal(Modal::FilePicker)]
    }

    /// Applies the result of the picker. `None` means the chosen path could not be opened.
    pub fn on_file_chosen(&mut self, file: Option<FileHandle>) -> Vec<Effect> {
        self.input_selection = file.as_ref().and_then(FileHandle::path).map(Path::to_path_buf);
        self.set_file_value(file)
    }

    /// Binds a file to the editor.
    ///
    /// In base64 mode the file is not bound directly; an
    /// [`Effect::EncodeFileBase64`] is returned and the value is set when the
    /// read completes. Every call starts a new read generation, so a read
    /// started earlier can no longer overwrite the value.
    pub fn set_file_value(&mut self, file: Option<FileHandle>) -> Vec<Effect> {
        self.read_generation += 1;
        self.pending_read = None;
        match file {
            None => self.set_value(PayloadValue::Empty),
            Some(file) if !self.base64_encode => self.set_value(PayloadValue::RawFile(file)),
            Some(file) => {
                let generation = self.read_generation;
                debug!(generation, file = file.display_name(), "starting base64 read");
                self.pending_read = Some(generation);
                vec![Effect::EncodeFileBase64 { generation, file }]
            }
        }
    }

    /// Applies a finished base64 read.
    ///
    /// A completion event is returned for every read, including reads that
    /// were superseded by a newer selection; only the newest read changes the value.
    pub fn complete_base64_conversion(&mut self, generation: u64, result: Result<String, String>) -> Vec<Effect> {
        if self.pending_read != Some(generation) {
            debug!(generation, current = self.read_generation, "ignoring superseded base64 read");
            return vec![completion_event(generation, ConversionOutcome::Superseded)];
        }
        self.pending_read = None;

        let (value, outcome) = match result {
            Ok(text) => (PayloadValue::text(text), ConversionOutcome::Encoded),
            Err(error) => {
                warn!(generation, %error, "failed to read file for base64 encoding");
                (PayloadValue::text(INVALID_FILE_MARKER), ConversionOutcome::Failed)
            }
        };
        let mut effects = self.set_value(value);
        effects.push(completion_event(generation, outcome));
        effects
    }

    /// Clears the value and the picker selection so the same file can be chosen again.
    pub fn remove_file(&mut self) -> Vec<Effect> {
        self.read_generation += 1;
        self.pending_read = None;
        self.input_selection = None;
        let effects = self.set_value(PayloadValue::Empty);
        self.reset_metadata();
        effects
    }

    /// Forgets the last selected raw file.
    pub fn clear_cache(&mut self) {
        debug!("clearing last selected file");
        self.last_selection.clear();
    }

    /// Bindable setter. Runs value-changed handling when the value differs.
    pub fn set_value(&mut self, value: PayloadValue) -> Vec<Effect> {
        let value = match value {
            PayloadValue::EncodedText(text) => PayloadValue::text(text),
            other => other,
        };
        if value == self.value {
            return Vec::new();
        }
        self.value = value;
        self.on_value_changed()
    }

    /// Returns the events queued for the next loop iteration.
    pub fn take_deferred_events(&mut self) -> Vec<Effect> {
        self.deferred_events.drain(..).map(Effect::EmitPayloadEvent).collect()
    }

    fn on_value_changed(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::EmitPayloadEvent(PayloadEvent::ValueChanged {
            has_value: !self.value.is_empty(),
        })];

        match self.value.clone() {
            PayloadValue::RawFile(file) => {
                self.file_name = Some(file.display_name().to_string());
                self.file_size = Some(FileSize::Bytes(file.size()));
                self.has_file = true;
                let content_type = file.resolved_content_type().to_string();
                self.content_type = Some(content_type.clone());
                self.last_selection.remember(file);
                self.deferred_events.push(PayloadEvent::ContentTypeChanged { content_type });
            }
            PayloadValue::Empty => self.reset_metadata(),
            PayloadValue::EncodedText(text) => {
                self.reset_metadata();
                effects.extend(self.recover_metadata(&text));
            }
        }

        if self.has_file {
            self.invalid = false;
        }
        effects
    }

    /// Derives metadata from base64 text or a `data:` URI.
    ///
    /// Text that does not decode falls back to the last selected raw file.
    fn recover_metadata(&mut self, text: &str) -> Vec<Effect> {
        if text == INVALID_FILE_MARKER {
            return Vec::new();
        }

        match decode_payload(text) {
            Ok(decoded) => {
                // Binary mode only counts raw files as a selection.
                self.has_file = self.base64_encode;
                self.file_name = Some(FALLBACK_FILE_NAME.to_string());
                self.file_size = Some(FileSize::from_decoded_len(decoded.bytes.len()));
                let content_type = decoded.content_type.unwrap_or(DEFAULT_CONTENT_TYPE).to_string();
                self.content_type = Some(content_type.clone());
                vec![Effect::EmitPayloadEvent(PayloadEvent::ContentTypeChanged { content_type })]
            }
            Err(error) => match self.last_selection.get().cloned() {
                Some(cached) => {
                    debug!(%error, file = cached.display_name(), "value is not base64; restoring last selected file");
                    self.set_value(PayloadValue::RawFile(cached))
                }
                None => {
                    debug!(%error, "value is not base64 and no file was selected before");
                    Vec::new()
                }
            },
        }
    }

    fn reset_metadata(&mut self) {
        self.has_file = false;
        self.file_name = None;
        self.file_size = None;
        self.content_type = None;
    }
}

impl Default for FilePayloadEditorState {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Validatable for FilePayloadEditorState {
    fn is_valid(&self) -> bool {
        self.has_file
    }

    fn validate(&mut self) -> bool {
        self.invalid = !self.is_valid();
        !self.invalid
    }

    fn is_invalid(&self) -> bool {
        self.invalid
    }
}

impl HasFocus for FilePayloadEditorState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_choose);
        if self.has_file {
            builder.leaf_widget(&self.f_remove);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

fn completion_event(generation: u64, outcome: ConversionOutcome) -> Effect {
    Effect::EmitPayloadEvent(PayloadEvent::Base64ConversionComplete { generation, outcome })
}

#[cfg(test)]
mod tests {
    use super::*;
    use filebody_util::encode_base64;

    fn events(effects: &[Effect]) -> Vec<&PayloadEvent> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::EmitPayloadEvent(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    fn content_types(effects: &[Effect]) -> Vec<String> {
        events(effects)
            .into_iter()
            .filter_map(|event| match event {
                PayloadEvent::ContentTypeChanged { content_type } => Some(content_type.clone()),
                _ => None,
            })
            .collect()
    }

    fn encode_request(effects: &[Effect]) -> (u64, FileHandle) {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::EncodeFileBase64 { generation, file } => Some((*generation, file.clone())),
                _ => None,
            })
            .expect("expected an encode effect")
    }

    fn text_file() -> FileHandle {
        FileHandle::from_bytes(Some("a.txt"), Some("text/plain"), b"0123456789".to_vec())
    }

    #[test]
    fn binary_selection_sets_metadata_and_defers_content_type() {
        let mut state = FilePayloadEditorState::new(false);
        let effects = state.set_file_value(Some(text_file()));

        assert!(state.has_file());
        assert_eq!(state.file_name(), Some("a.txt"));
        assert_eq!(state.file_size(), Some(FileSize::Bytes(10)));
        assert!(matches!(state.value(), PayloadValue::RawFile(_)));
        assert!(content_types(&effects).is_empty());

        let deferred = state.take_deferred_events();
        assert_eq!(content_types(&deferred), vec!["text/plain".to_string()]);
        assert!(state.take_deferred_events().is_empty());
    }

    #[test]
    fn nameless_untyped_file_uses_fallbacks() {
        let mut state = FilePayloadEditorState::new(false);
        state.set_file_value(Some(FileHandle::from_bytes(None, None, vec![1u8, 2, 3])));

        assert_eq!(state.file_name(), Some(FALLBACK_FILE_NAME));
        assert_eq!(content_types(&state.take_deferred_events()), vec![DEFAULT_CONTENT_TYPE.to_string()]);
    }

    #[test]
    fn base64_selection_completes_with_encoded_text() {
        let mut state = FilePayloadEditorState::new(true);
        let (generation, file) = encode_request(&state.set_file_value(Some(text_file())));
        assert!(state.is_encoding());
        assert!(state.value().is_empty());

        let encoded = encode_base64(b"0123456789");
        let effects = state.complete_base64_conversion(generation, Ok(encoded.clone()));

        assert_eq!(file.display_name(), "a.txt");
        assert_eq!(state.value().as_text(), Some(encoded.as_str()));
        assert!(state.has_file());
        assert_eq!(state.file_name(), Some(FALLBACK_FILE_NAME));
        assert_eq!(state.file_size(), Some(FileSize::Bytes(10)));
        assert!(!state.is_encoding());
        let completions: Vec<_> = events(&effects)
            .into_iter()
            .filter(|event| matches!(event, PayloadEvent::Base64ConversionComplete { .. }))
            .collect();
        assert_eq!(
            completions,
            vec![&PayloadEvent::Base64ConversionComplete {
                generation,
                outcome: ConversionOutcome::Encoded
            }]
        );
    }

    #[test]
    fn read_failure_sets_marker_and_still_completes() {
        let mut state = FilePayloadEditorState::new(true);
        let (generation, _) = encode_request(&state.set_file_value(Some(text_file())));

        let effects = state.complete_base64_conversion(generation, Err("permission denied".into()));

        assert_eq!(state.value().as_text(), Some(INVALID_FILE_MARKER));
        assert!(!state.has_file());
        assert!(!state.is_valid());
        assert!(events(&effects).contains(&&PayloadEvent::Base64ConversionComplete {
            generation,
            outcome: ConversionOutcome::Failed
        }));
    }

    #[test]
    fn stale_read_never_overwrites_newer_selection() {
        let mut state = FilePayloadEditorState::new(true);
        let (first, _) = encode_request(&state.set_file_value(Some(text_file())));
        let (second, _) = encode_request(&state.set_file_value(Some(FileHandle::from_bytes(Some("b.bin"), None, vec![7u8]))));

        let newer = state.complete_base64_conversion(second, Ok("Bw==".into()));
        let stale = state.complete_base64_conversion(first, Ok(encode_base64(b"0123456789")));

        assert_eq!(state.value().as_text(), Some("Bw=="));
        assert_eq!(state.file_size(), Some(FileSize::Bytes(1)));
        assert!(events(&newer).contains(&&PayloadEvent::Base64ConversionComplete {
            generation: second,
            outcome: ConversionOutcome::Encoded
        }));
        assert_eq!(
            events(&stale),
            vec![&PayloadEvent::Base64ConversionComplete {
                generation: first,
                outcome: ConversionOutcome::Superseded
            }]
        );
    }

    #[test]
    fn round_trip_through_metadata_recovery() {
        let bytes: Vec<u8> = (0u8..=200).collect();
        let mut state = FilePayloadEditorState::new(true);
        let effects = state.set_value(PayloadValue::text(encode_base64(&bytes)));

        assert!(state.has_file());
        assert_eq!(state.file_size(), Some(FileSize::Bytes(bytes.len() as u64)));
        assert_eq!(content_types(&effects), vec![DEFAULT_CONTENT_TYPE.to_string()]);
    }

    #[test]
    fn data_uri_resolves_declared_type() {
        let mut state = FilePayloadEditorState::new(true);
        let effects = state.set_value(PayloadValue::text("data:image/png;base64,iVBORw0KGgo="));

        assert_eq!(content_types(&effects), vec!["image/png".to_string()]);
        assert_eq!(state.content_type(), Some("image/png"));
        assert_eq!(state.file_size(), Some(FileSize::Bytes(8)));
        assert_eq!(state.file_name(), Some(FALLBACK_FILE_NAME));
    }

    #[test]
    fn empty_decode_reports_unknown_size() {
        let mut state = FilePayloadEditorState::new(true);
        state.set_value(PayloadValue::text("data:text/plain;base64,"));
        assert_eq!(state.file_size(), Some(FileSize::Unknown));
        assert_eq!(state.file_size().map(FileSize::as_i64), Some(-1));
    }

    #[test]
    fn empty_value_clears_everything() {
        let mut state = FilePayloadEditorState::new(false);
        state.set_file_value(Some(text_file()));
        let effects = state.set_value(PayloadValue::Empty);

        assert!(!state.has_file());
        assert_eq!(state.file_name(), None);
        assert_eq!(state.file_size(), None);
        assert_eq!(events(&effects), vec![&PayloadEvent::ValueChanged { has_value: false }]);
    }

    #[test]
    fn choosing_nothing_clears_the_value() {
        let mut state = FilePayloadEditorState::new(true);
        state.set_value(PayloadValue::text("QUJD"));
        state.on_file_chosen(None);
        assert!(state.value().is_empty());
        assert!(!state.has_file());
    }

    #[test]
    fn invalid_text_without_cache_has_no_file() {
        let mut state = FilePayloadEditorState::new(true);
        let effects = state.set_value(PayloadValue::text("not-base64!!"));

        assert!(!state.has_file());
        assert_eq!(state.file_name(), None);
        assert!(content_types(&effects).is_empty());
        assert_eq!(state.value().as_text(), Some("not-base64!!"));
    }

    #[test]
    fn invalid_text_restores_cached_file() {
        let mut state = FilePayloadEditorState::new(false);
        state.set_file_value(Some(text_file()));
        state.take_deferred_events();
        state.set_value(PayloadValue::Empty);

        state.set_value(PayloadValue::text("not-base64!!"));

        assert_eq!(state.value().as_file().map(FileHandle::display_name), Some("a.txt"));
        assert!(state.has_file());
        assert_eq!(content_types(&state.take_deferred_events()), vec!["text/plain".to_string()]);
    }

    #[test]
    fn partially_padded_text_restores_cached_file() {
        let mut state = FilePayloadEditorState::new(false);
        state.set_file_value(Some(text_file()));
        state.take_deferred_events();

        state.set_value(PayloadValue::text("QQ="));

        assert_eq!(state.value().as_file().map(FileHandle::display_name), Some("a.txt"));
        assert_eq!(state.file_size(), Some(FileSize::Bytes(10)));
    }

    #[test]
    fn cleared_cache_disables_restoration() {
        let mut state = FilePayloadEditorState::new(false);
        state.set_file_value(Some(text_file()));
        state.clear_cache();

        state.set_value(PayloadValue::text("not-base64!!"));

        assert!(state.cached_file().is_none());
        assert!(!state.has_file());
        assert!(state.value().as_text().is_some());
    }

    #[test]
    fn remove_file_allows_choosing_the_same_file_again() {
        let path = PathBuf::from("/tmp/a.txt");
        let file = FileHandle::on_disk(path.clone(), Some("a.txt".into()), None, 10);
        let mut state = FilePayloadEditorState::new(false);
        state.on_file_chosen(Some(file));
        assert!(!state.accepts_picker_selection(&path));

        state.remove_file();

        assert!(!state.has_file());
        assert_eq!(state.file_name(), None);
        assert_eq!(state.file_size(), None);
        assert!(state.accepts_picker_selection(&path));
        assert!(state.cached_file().is_some());
    }

    #[test]
    fn remove_file_supersedes_pending_read() {
        let mut state = FilePayloadEditorState::new(true);
        let (generation, _) = encode_request(&state.set_file_value(Some(text_file())));
        state.remove_file();

        state.complete_base64_conversion(generation, Ok("QUJD".into()));

        assert!(state.value().is_empty());
        assert!(!state.has_file());
    }

    #[test]
    fn read_failure_marker_never_restores_cached_file() {
        let mut state = FilePayloadEditorState::new(false);
        state.set_file_value(Some(text_file()));
        state.take_deferred_events();

        let effects = state.set_value(PayloadValue::text(INVALID_FILE_MARKER));

        assert_eq!(state.value().as_text(), Some(INVALID_FILE_MARKER));
        assert!(!state.has_file());
        assert_eq!(state.file_name(), None);
        assert!(content_types(&effects).is_empty());
        assert!(state.cached_file().is_some());
    }

    #[test]
    fn text_in_binary_mode_is_not_a_selection() {
        let mut state = FilePayloadEditorState::new(false);
        let effects = state.set_value(PayloadValue::text("SGVsbG8="));

        assert!(!state.has_file());
        assert_eq!(state.file_size(), Some(FileSize::Bytes(5)));
        assert_eq!(content_types(&effects), vec![DEFAULT_CONTENT_TYPE.to_string()]);
    }

    #[test]
    fn equal_values_are_not_a_change() {
        let mut state = FilePayloadEditorState::new(true);
        assert!(!state.set_value(PayloadValue::text("QUJD")).is_empty());
        assert!(state.set_value(PayloadValue::text("QUJD")).is_empty());
        assert!(state.set_value(PayloadValue::text("")).len() == 1);
    }

    #[test]
    fn validation_follows_selection() {
        let mut state = FilePayloadEditorState::new(false);
        assert!(state.supports_validation());
        assert!(!state.validate());
        assert!(state.is_invalid());

        state.set_file_value(Some(text_file()));
        assert!(!state.is_invalid());
        assert!(state.validate());
    }

    #[test]
    fn summary_includes_value_on_request() {
        let mut state = FilePayloadEditorState::new(true);
        state.set_value(PayloadValue::text("data:text/plain;base64,SGk="));

        let summary = state.summary(false);
        assert_eq!(summary.value, None);
        assert_eq!(summary.file_size, Some(FileSize::Bytes(2)));

        let json = serde_json::to_value(state.summary(true)).unwrap();
        assert_eq!(json["value"], "data:text/plain;base64,SGk=");
        assert_eq!(json["file_size"], 2);
        assert_eq!(json["content_type"], "text/plain");
    }
}
