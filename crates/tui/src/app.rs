//! Application state for the filebody TUI.
//!
//! [`App`] owns every piece of state the components read and mutate: the
//! file payload editor, the file picker while it is open, the event log and
//! the registered listeners. Components receive `&mut App` and report side
//! effects back as [`Effect`]s.

use std::path::PathBuf;

use filebody_types::{ExecOutcome, Modal, Msg, PayloadEvent, PayloadValue};
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::debug;

use crate::{
    RunOptions,
    ui::{
        components::{
            common::FilePickerState,
            event_log::EventLogState,
            payload_editor::{FilePayloadEditorState, PayloadListeners},
        },
        theme::{self, Theme, ThemeDefinition},
    },
};

pub use filebody_types::Effect;

/// Cross-cutting context shared by all components.
pub struct SharedCtx {
    /// Active theme used for all styling
    pub theme: Box<dyn Theme>,
    /// Definition the active theme was built from
    pub theme_definition: &'static ThemeDefinition,
    /// Directory the picker opens in
    pub start_directory: Option<PathBuf>,
    /// Extensions the picker offers; empty offers every file
    pub allowed_extensions: Vec<String>,
}

pub struct App {
    /// Shared, cross-cutting context (theme, picker configuration)
    pub ctx: SharedCtx,
    /// The file payload editor
    pub editor: FilePayloadEditorState,
    /// File picker state while the picker modal is open
    pub file_picker: Option<FilePickerState>,
    /// Dispatched notifications and command messages
    pub event_log: EventLogState,
    /// Listeners receiving editor notifications
    pub listeners: PayloadListeners,
    /// Content type applied to the request by the last non-prevented notification
    pub request_content_type: Option<String>,
    /// Currently open modal, if any
    pub open_modal_kind: Option<Modal>,
    /// Whether background commands are running
    pub executing: bool,
    pub focus: Focus,
    container_focus: FocusFlag,
}

impl App {
    pub fn new(options: RunOptions, listeners: PayloadListeners) -> Self {
        let loaded = theme::load(options.preferred_theme.as_deref());
        let mut app = Self {
            ctx: SharedCtx {
                theme: loaded.theme,
                theme_definition: loaded.definition,
                start_directory: options.start_directory,
                allowed_extensions: options.allowed_extensions,
            },
            editor: FilePayloadEditorState::new(options.base64_encode),
            file_picker: None,
            event_log: EventLogState::default(),
            listeners,
            request_content_type: None,
            open_modal_kind: None,
            executing: false,
            focus: Focus::default(),
            container_focus: FocusFlag::new().with_name("root"),
        };
        app.focus = FocusBuilder::build_for(&app);
        app.focus.focus(&app.editor.f_choose);
        app
    }

    /// Applies an initial value through the bindable setter.
    pub fn inject_value(&mut self, text: &str) -> Vec<Effect> {
        debug!(len = text.len(), "injecting initial value");
        self.editor.set_value(PayloadValue::text(text))
    }

    /// Updates state that does not belong to a single component.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::FileChosen(file) => self.editor.on_file_chosen(file.clone()),
            Msg::Base64Encoded { generation, result } => self.editor.complete_base64_conversion(*generation, result.clone()),
            Msg::ExecCompleted(outcome) => {
                if let ExecOutcome::Log(line) = outcome.as_ref() {
                    self.event_log.push_message(line.clone());
                }
                Vec::new()
            }
            Msg::Tick | Msg::Resize(..) => Vec::new(),
        }
    }

    /// Prepares state for a modal that is about to open.
    pub fn open_modal(&mut self, modal: Modal) {
        match modal {
            Modal::FilePicker => {
                let picker = FilePickerState::new(self.ctx.start_directory.clone(), self.ctx.allowed_extensions.clone());
                self.file_picker = Some(picker);
            }
        }
        self.open_modal_kind = Some(modal);
    }

    pub fn close_modal(&mut self) {
        self.open_modal_kind = None;
        self.file_picker = None;
    }

    /// Delivers a notification to the listeners and applies the default handling
    /// unless a listener prevented it.
    pub fn dispatch_payload_event(&mut self, event: PayloadEvent) {
        let result = self.listeners.dispatch(&event);
        debug!(
            event = event.name(),
            delivered = result.delivered,
            default_prevented = result.default_prevented,
            "dispatched payload event"
        );
        match &event {
            PayloadEvent::ContentTypeChanged { content_type } if !result.default_prevented => {
                self.request_content_type = Some(content_type.clone());
            }
            // an emptied value no longer describes a body
            PayloadEvent::ValueChanged { has_value: false } => self.request_content_type = None,
            _ => {}
        }
        self.event_log.record_event(event, result);
    }
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        if self.open_modal_kind.is_some()
            && let Some(file_picker) = self.file_picker.as_ref()
        {
            builder.widget(file_picker);
            return;
        }
        builder.widget(&self.editor);
        builder.widget(&self.event_log);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::Path,
        sync::{Arc, Mutex},
    };

    use filebody_types::{ConversionOutcome, FileHandle};

    use super::*;
    use crate::ui::components::{
        event_log::state::EventLogEntry,
        payload_editor::{ListenerResponse, ListenerScope},
    };

    #[test]
    fn content_type_is_applied_unless_prevented() {
        let mut listeners = PayloadListeners::new();
        let block_next = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&block_next);
        listeners.add(ListenerScope::Host, move |_: &PayloadEvent| {
            if *flag.lock().unwrap() {
                ListenerResponse::PreventDefault
            } else {
                ListenerResponse::Continue
            }
        });
        let mut app = App::new(RunOptions::default(), listeners);

        app.dispatch_payload_event(PayloadEvent::ContentTypeChanged {
            content_type: "text/plain".into(),
        });
        *block_next.lock().unwrap() = true;
        app.dispatch_payload_event(PayloadEvent::ContentTypeChanged {
            content_type: "image/png".into(),
        });

        assert_eq!(app.request_content_type.as_deref(), Some("text/plain"));
        assert_eq!(app.event_log.entries().len(), 2);
    }

    #[test]
    fn removing_the_file_clears_the_content_type() {
        let mut app = App::new(RunOptions::default(), PayloadListeners::new());
        let file = FileHandle::from_bytes(Some("a.png"), Some("image/png"), b"png".to_vec());
        let mut effects = app.update(&Msg::FileChosen(Some(file)));
        effects.extend(app.editor.take_deferred_events());
        effects.extend(app.editor.remove_file());
        for effect in effects {
            if let Effect::EmitPayloadEvent(event) = effect {
                app.dispatch_payload_event(event);
            }
        }

        assert!(!app.editor.has_file());
        assert_eq!(app.request_content_type, None);
    }

    #[test]
    fn messages_drive_the_editor() {
        let mut app = App::new(
            RunOptions {
                base64_encode: true,
                ..RunOptions::default()
            },
            PayloadListeners::new(),
        );
        let file = FileHandle::from_bytes(Some("a.txt"), None, b"abc".to_vec());
        let effects = app.update(&Msg::FileChosen(Some(file)));
        let generation = match effects.as_slice() {
            [Effect::EncodeFileBase64 { generation, .. }] => *generation,
            other => panic!("unexpected effects: {other:?}"),
        };

        let effects = app.update(&Msg::Base64Encoded {
            generation,
            result: Ok("YWJj".into()),
        });

        assert!(app.editor.has_file());
        assert!(effects.contains(&Effect::EmitPayloadEvent(PayloadEvent::Base64ConversionComplete {
            generation,
            outcome: ConversionOutcome::Encoded
        })));
    }

    #[test]
    fn log_outcomes_land_in_the_event_log() {
        let mut app = App::new(RunOptions::default(), PayloadListeners::new());
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::Log("read failed".into()))));
        assert!(matches!(&app.event_log.entries()[0], EventLogEntry::Text { message, .. } if message == "read failed"));
    }

    #[test]
    fn picker_lifecycle_follows_modal() {
        let mut app = App::new(
            RunOptions {
                start_directory: Some(PathBuf::from("/srv")),
                ..RunOptions::default()
            },
            PayloadListeners::new(),
        );
        app.open_modal(Modal::FilePicker);
        assert_eq!(app.file_picker.as_ref().map(|p| p.cur_dir()), Some(Path::new("/srv")));

        app.close_modal();
        assert!(app.file_picker.is_none());
        assert!(app.open_modal_kind.is_none());
    }
}
