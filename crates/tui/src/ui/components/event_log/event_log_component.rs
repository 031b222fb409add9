//! Event log panel.
//!
//! Lists every notification the editor dispatched, with its timestamp, how
//! many listeners received it and whether one of them prevented the default
//! handling. Messages from the command layer (read failures, directory
//! errors) are interleaved as plain text.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use filebody_types::Effect;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use super::state::EventLogEntry;
use crate::{
    app::App,
    ui::{
        components::Component,
        theme::{
            Theme,
            theme_helpers::{block, build_hint_spans},
        },
    },
};

#[derive(Debug, Default)]
pub struct EventLogComponent {
    area: Rect,
}

fn entry_line<'a>(entry: &EventLogEntry, theme: &dyn Theme) -> Line<'a> {
    let timestamp = Span::styled(format!("{} ", entry.timestamp().format("%H:%M:%S%.3f")), theme.text_muted_style());
    match entry {
        EventLogEntry::Event {
            event,
            delivered,
            default_prevented,
            ..
        } => {
            let mut spans = vec![
                timestamp,
                Span::styled(event.to_string(), theme.accent_primary_style()),
                Span::styled(format!("  ({delivered} listeners)"), theme.text_muted_style()),
            ];
            if *default_prevented {
                spans.push(Span::styled(" prevented", theme.status_warning()));
            }
            Line::from(spans)
        }
        EventLogEntry::Text { message, .. } => Line::from(vec![timestamp, Span::styled(message.clone(), theme.text_primary_style())]),
    }
}

impl Component for EventLogComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Up => app.event_log.select_previous(),
            KeyCode::Down => app.event_log.select_next(),
            KeyCode::Tab => {
                app.focus.next();
            }
            KeyCode::BackTab => {
                app.focus.prev();
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if !self.area.contains(Position::new(mouse.column, mouse.row)) {
            return Vec::new();
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => app.event_log.select_previous(),
            MouseEventKind::ScrollDown => app.event_log.select_next(),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let is_focused = app.event_log.focus.get();
        let items: Vec<ListItem> = app
            .event_log
            .entries()
            .iter()
            .map(|entry| ListItem::new(entry_line(entry, theme)))
            .collect();
        let list = List::new(items)
            .block(block(theme, Some("Events"), is_focused))
            .highlight_style(theme.selection_style());
        frame.render_stateful_widget(list, rect, &mut app.event_log.list_state);
        self.area = rect;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        build_hint_spans(&*app.ctx.theme, &[(" ↑/↓", " Scroll"), (" Tab", " Focus"), (" q", " Quit")])
    }
}
