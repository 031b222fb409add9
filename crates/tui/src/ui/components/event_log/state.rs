use chrono::{DateTime, Local};
use filebody_types::PayloadEvent;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::{layout::Rect, widgets::ListState};

use crate::ui::components::payload_editor::DispatchResult;

/// Oldest entries are dropped beyond this many.
const MAX_ENTRIES: usize = 500;

/// A single row in the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventLogEntry {
    /// A notification delivered to the listeners.
    Event {
        at: DateTime<Local>,
        event: PayloadEvent,
        delivered: usize,
        default_prevented: bool,
    },
    /// Plain text from the command layer.
    Text { at: DateTime<Local>, message: String },
}

impl EventLogEntry {
    pub fn timestamp(&self) -> DateTime<Local> {
        match self {
            Self::Event { at, .. } | Self::Text { at, .. } => *at,
        }
    }
}

#[derive(Debug)]
pub struct EventLogState {
    entries: Vec<EventLogEntry>,
    pub list_state: ListState,
    /// Focus flag for rat-focus integration
    pub focus: FocusFlag,
}

impl Default for EventLogState {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            list_state: ListState::default(),
            focus: FocusFlag::new().with_name("root.event_log"),
        }
    }
}

impl EventLogState {
    pub fn entries(&self) -> &[EventLogEntry] {
        &self.entries
    }

    pub fn record_event(&mut self, event: PayloadEvent, result: DispatchResult) {
        self.push(EventLogEntry::Event {
            at: Local::now(),
            event,
            delivered: result.delivered,
            default_prevented: result.default_prevented,
        });
    }

    pub fn push_message(&mut self, message: impl Into<String>) {
        self.push(EventLogEntry::Text {
            at: Local::now(),
            message: message.into(),
        });
    }

    fn push(&mut self, entry: EventLogEntry) {
        self.entries.push(entry);
        if self.entries.len() > MAX_ENTRIES {
            let overflow = self.entries.len() - MAX_ENTRIES;
            self.entries.drain(..overflow);
        }
        // Follow the tail unless the user scrolled away from it.
        let last = self.entries.len().saturating_sub(1);
        if self.list_state.selected().is_none_or(|selected| selected + 1 >= last) {
            self.list_state.select(Some(last));
        }
    }

    pub fn select_previous(&mut self) {
        self.list_state.select_previous();
    }

    pub fn select_next(&mut self) {
        let last = self.entries.len().saturating_sub(1);
        let next = self.list_state.selected().map_or(0, |selected| (selected + 1).min(last));
        self.list_state.select(Some(next));
    }
}

impl HasFocus for EventLogState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_bounded_and_follows_the_tail() {
        let mut log = EventLogState::default();
        for idx in 0..MAX_ENTRIES + 10 {
            log.push_message(format!("line {idx}"));
        }

        assert_eq!(log.entries().len(), MAX_ENTRIES);
        assert_eq!(log.list_state.selected(), Some(MAX_ENTRIES - 1));
        assert!(matches!(&log.entries()[0], EventLogEntry::Text { message, .. } if message == "line 10"));
    }

    #[test]
    fn scrolled_log_keeps_its_position() {
        let mut log = EventLogState::default();
        for idx in 0..5 {
            log.push_message(format!("line {idx}"));
        }
        log.list_state.select(Some(1));
        log.push_message("late");

        assert_eq!(log.list_state.selected(), Some(1));
    }

    #[test]
    fn events_keep_dispatch_details() {
        let mut log = EventLogState::default();
        log.record_event(
            PayloadEvent::ContentTypeChanged {
                content_type: "text/plain".into(),
            },
            DispatchResult {
                delivered: 2,
                default_prevented: true,
            },
        );

        assert!(matches!(
            &log.entries()[0],
            EventLogEntry::Event {
                delivered: 2,
                default_prevented: true,
                ..
            }
        ));
    }
}
