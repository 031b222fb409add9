//! Drives the editor through the crate's public API, the way a host embedding it would.

use filebody_tui::{Effect, FileHandle, FilePayloadEditorState, FileSize, PayloadEvent, PayloadValue, Validatable};

fn text_file() -> FileHandle {
    FileHandle::from_bytes(Some("body.json"), Some("application/json"), br#"{"ok":true}"#.to_vec())
}

#[test]
fn host_can_bind_validate_and_clear_the_cache() {
    let mut editor = FilePayloadEditorState::new(false);
    assert!(editor.supports_validation());
    assert!(!editor.validate());
    assert!(editor.is_invalid());

    editor.set_file_value(Some(text_file()));
    assert!(editor.validate());
    assert_eq!(editor.file_size(), Some(FileSize::Bytes(11)));
    assert_eq!(editor.content_type(), Some("application/json"));
    assert_eq!(editor.cached_file().map(FileHandle::display_name), Some("body.json"));

    editor.clear_cache();
    assert!(editor.cached_file().is_none());
    editor.set_value(PayloadValue::text("not-base64!!"));
    assert!(!editor.has_file());
}

#[test]
fn host_injected_data_uri_reports_its_type() {
    let mut editor = FilePayloadEditorState::new(true);
    let effects = editor.set_value(PayloadValue::text("data:text/plain;base64,SGVsbG8="));

    assert!(editor.has_file());
    assert_eq!(editor.file_size(), Some(FileSize::Bytes(5)));
    assert!(effects.contains(&Effect::EmitPayloadEvent(PayloadEvent::ContentTypeChanged {
        content_type: "text/plain".into()
    })));
    assert_eq!(editor.read_generation(), 0);
    assert!(editor.input_selection().is_none());
}
