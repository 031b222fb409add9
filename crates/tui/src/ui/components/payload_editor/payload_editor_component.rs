//! Renders the file payload editor and maps keys and clicks to state operations.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use filebody_types::{Effect, FileSize};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::App,
    ui::{
        components::{Component, common::Validatable},
        theme::theme_helpers::{ButtonRenderOptions, block, build_hint_spans, render_button},
    },
};

const TITLE: &str = "Request body (file)";

#[derive(Debug, Clone, Copy, Default)]
struct EditorLayout {
    choose_button_area: Rect,
    summary_area: Rect,
    file_card_area: Rect,
    details_area: Rect,
    error_area: Rect,
    remove_button_area: Rect,
}

impl From<&[Rect]> for EditorLayout {
    fn from(layout: &[Rect]) -> Self {
        EditorLayout {
            choose_button_area: layout[0],
            summary_area: layout[1],
            file_card_area: layout[2],
            details_area: layout[3],
            error_area: layout[4],
            remove_button_area: Rect::default(),
        }
    }
}

/// View for [`FilePayloadEditorState`](super::FilePayloadEditorState).
#[derive(Debug, Default)]
pub struct FilePayloadEditorComponent {
    layout: EditorLayout,
}

impl FilePayloadEditorComponent {
    fn remove(&self, app: &mut App) -> Vec<Effect> {
        let effects = app.editor.remove_file();
        app.focus.focus(&app.editor.f_choose);
        effects
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let editor = &app.editor;
        let line = if editor.is_encoding() {
            Line::from(Span::styled("Encoding file…", theme.status_info()))
        } else if editor.has_file() {
            let size = match editor.file_size() {
                Some(FileSize::Bytes(bytes)) => format!("{bytes} bytes"),
                Some(FileSize::Unknown) | None => "size unknown".to_string(),
            };
            Line::from(Span::styled(format!("1 file selected, {size}"), theme.status_success()))
        } else {
            Line::from(Span::styled("No file selected", theme.text_muted_style()))
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_file_card(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        self.layout.remove_button_area = Rect::default();
        let editor = &app.editor;
        if !editor.has_file() {
            return;
        }
        let theme = &*app.ctx.theme;
        let card = Block::bordered().border_style(theme.border_style(false));
        let inner = card.inner(area);
        frame.render_widget(card, area);

        let [name_area, button_area] = Layout::horizontal([Constraint::Min(1), Constraint::Length(5)]).areas(inner);
        let name = editor.file_name().unwrap_or_default();
        frame.render_widget(
            Paragraph::new(Span::styled(name.to_string(), theme.text_primary_style().add_modifier(Modifier::BOLD))),
            name_area,
        );
        let remove_area = Rect { y: area.y, height: area.height, ..button_area };
        let options = ButtonRenderOptions::new(true, editor.f_remove.get(), false, Borders::NONE, true);
        render_button(frame, remove_area, "✕", theme, options);
        self.layout.remove_button_area = remove_area;
    }

    fn render_details(&self, frame: &mut Frame, area: Rect, app: &App) {
        let theme = &*app.ctx.theme;
        let mode = if app.editor.base64_encode() { "base64" } else { "binary" };
        let content_type = app.request_content_type.as_deref().unwrap_or("-");
        let lines = vec![
            Line::from(vec![
                Span::styled("Encoding: ", theme.text_secondary_style()),
                Span::styled(mode, theme.text_primary_style()),
            ]),
            Line::from(vec![
                Span::styled("Content-Type: ", theme.text_secondary_style()),
                Span::styled(content_type.to_string(), theme.text_primary_style()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }
}

impl Component for FilePayloadEditorComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') if app.editor.f_remove.get() => self.remove(app),
            KeyCode::Enter | KeyCode::Char(' ') if app.editor.f_choose.get() => app.editor.select_file(),
            KeyCode::Delete | KeyCode::Char('x') if !app.editor.value().is_empty() => self.remove(app),
            KeyCode::Char('v') => {
                app.editor.validate();
                Vec::new()
            }
            KeyCode::Char('c') => {
                app.editor.clear_cache();
                app.event_log.push_message("Forgot the last selected file");
                Vec::new()
            }
            KeyCode::Tab => {
                app.focus.next();
                Vec::new()
            }
            KeyCode::BackTab => {
                app.focus.prev();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let pos = Position::new(mouse.column, mouse.row);
        if self.layout.choose_button_area.contains(pos) {
            app.focus.focus(&app.editor.f_choose);
            return app.editor.select_file();
        }
        if self.layout.remove_button_area.contains(pos) {
            return self.remove(app);
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let is_focused = app.editor.f_choose.get() || app.editor.f_remove.get();
        let mut outer = block(theme, Some(TITLE), is_focused);
        if app.editor.is_invalid() {
            outer = outer.border_style(theme.status_error());
        }
        let inner = outer.inner(rect);
        frame.render_widget(outer, rect);

        let layout = EditorLayout::from(self.get_preferred_layout(app, inner).as_slice());
        let options = ButtonRenderOptions::new(true, app.editor.f_choose.get(), false, Borders::ALL, false);
        render_button(frame, layout.choose_button_area, "Choose a file", theme, options);

        self.render_summary(frame, layout.summary_area, app);
        self.render_details(frame, layout.details_area, app);
        if app.editor.is_invalid() {
            frame.render_widget(
                Paragraph::new(Span::styled("Select a file to continue", theme.status_error())),
                layout.error_area,
            );
        }

        self.layout = layout;
        self.render_file_card(frame, layout.file_card_area, app);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hints = vec![(" Enter", " Choose file")];
        if app.editor.has_file() {
            hints.push((" Del", " Remove"));
        }
        hints.extend([(" v", " Validate"), (" c", " Clear cache"), (" Tab", " Focus"), (" q", " Quit")]);
        build_hint_spans(&*app.ctx.theme, &hints)
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        let rows = Layout::vertical([
            Constraint::Length(3), // Choose button
            Constraint::Length(1), // Summary
            Constraint::Length(3), // File card
            Constraint::Length(2), // Details
            Constraint::Length(1), // Error message
            Constraint::Min(0),
        ])
        .split(area);
        let button_row = Layout::horizontal([Constraint::Length(19), Constraint::Min(0)]).split(rows[0]);

        vec![button_row[0], rows[1], rows[2], rows[3], rows[4]]
    }
}
