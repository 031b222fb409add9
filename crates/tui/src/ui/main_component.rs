use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use filebody_types::{Effect, Modal, Msg};
use ratatui::{
    prelude::*,
    style::Style,
    widgets::{Block, Clear, Paragraph},
};

use super::{
    components::{Component, EventLogComponent, FilePayloadEditorComponent, common::FilePickerModal},
    utils::centered_min_max,
};
use crate::app::App;

pub struct ModalLayout(Box<dyn Fn(Rect) -> Rect>);

type ModalView = (Box<dyn Component>, ModalLayout);

/// Root view: the editor above the event log, a hints bar and an optional modal.
#[derive(Default)]
pub struct MainView {
    pub editor_view: FilePayloadEditorComponent,
    pub event_log_view: EventLogComponent,
    /// Currently open modal component
    pub modal_view: Option<ModalView>,

    /// the widget_id of the focus just before a modal is opened
    transient_focus_id: Option<usize>,
}

impl MainView {
    /// Opens or closes (`None`) the modal. Not called directly; use
    /// `Effect::ShowModal` and `Effect::CloseModal`.
    pub fn set_open_modal_kind(&mut self, app: &mut App, modal: Option<Modal>) {
        let Some(modal_kind) = modal else {
            self.modal_view = None;
            app.close_modal();
            return;
        };
        let modal_view: ModalView = match modal_kind {
            Modal::FilePicker => (
                Box::new(FilePickerModal::default()),
                ModalLayout(Box::new(|rect| {
                    centered_min_max(75, 95, Rect::new(0, 0, 80, 15), Rect::new(0, 0, 160, 150), rect)
                })),
            ),
        };
        app.open_modal(modal_kind);
        self.modal_view = Some(modal_view);
        // save the current focus to restore when the modal is closed
        self.transient_focus_id = app.focus.focused().map(|focus| focus.widget_id());
    }

    pub fn restore_focus(&mut self, app: &mut App) {
        if let Some(id) = self.transient_focus_id
            && app.open_modal_kind.is_none()
        {
            app.focus.by_widget_id(id);
            self.transient_focus_id = None;
        } else if let Some(picker) = app.file_picker.as_ref() {
            app.focus.focus(&picker.f_list);
        } else {
            app.focus.first();
        }
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let mut effects = app.update(&msg);
        if let Some((modal, _)) = self.modal_view.as_mut() {
            effects.extend(modal.handle_message(app, msg));
        }
        effects
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if let Some(target) = self.modal_view.as_mut() {
            return target.0.handle_key_events(app, key);
        }

        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            return vec![Effect::Quit];
        }

        if app.event_log.focus.get() {
            return self.event_log_view.handle_key_events(app, key);
        }
        self.editor_view.handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if let Some(target) = self.modal_view.as_mut() {
            return target.0.handle_mouse_events(app, mouse);
        }

        let mut effects = self.editor_view.handle_mouse_events(app, mouse);
        effects.extend(self.event_log_view.handle_mouse_events(app, mouse));
        effects
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        // Fill the entire background with the theme's background color for consistency
        let bg_fill = Paragraph::new("").style(Style::default().bg(app.ctx.theme.roles().background));
        frame.render_widget(bg_fill, area);

        let layout = self.get_preferred_layout(app, area);
        self.editor_view.render(frame, layout[0], app);
        self.event_log_view.render(frame, layout[1], app);

        let hint_spans: Vec<Span> = self.get_hint_spans(app);
        let hints_widget = Paragraph::new(Line::from(hint_spans)).style(app.ctx.theme.text_muted_style());
        frame.render_widget(hints_widget, layout[2]);

        if let Some((modal, position)) = self.modal_view.as_mut() {
            render_overlay(frame, app);
            let modal_area = position.0(area);
            frame.render_widget(Clear, modal_area);

            let modal_hints = modal.get_hint_spans(app);
            if !modal_hints.is_empty() {
                let splits = Layout::vertical([
                    Constraint::Percentage(100), // Modal width
                    Constraint::Length(1),       // Modal hints bar
                ])
                .split(modal_area);
                let hints_widget = Paragraph::new(Line::from(modal_hints))
                    .style(app.ctx.theme.text_muted_style())
                    .bg(app.ctx.theme.roles().background);
                frame.render_widget(hints_widget, splits[1]);
                modal.render(frame, splits[0], app);
            } else {
                modal.render(frame, modal_area, app);
            }
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut hint_spans: Vec<Span> = vec![Span::styled("Hints: ", app.ctx.theme.text_muted_style())];
        if app.event_log.focus.get() {
            hint_spans.extend(self.event_log_view.get_hint_spans(app));
        } else {
            hint_spans.extend(self.editor_view.get_hint_spans(app));
        }
        hint_spans.push(Span::styled(
            format!("  theme: {}", app.ctx.theme_definition.label),
            app.ctx.theme.text_muted_style(),
        ));
        hint_spans
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        let rows = Layout::vertical([
            Constraint::Length(14), // Editor
            Constraint::Min(3),     // Event log
            Constraint::Length(1),  // Hints bar
        ])
        .split(area);

        vec![rows[0], rows[1], rows[2]]
    }
}

/// Dims everything behind an open modal.
fn render_overlay(frame: &mut Frame, app: &mut App) {
    frame.render_widget(Block::default().style(app.ctx.theme.modal_background_style()).dim(), frame.area());
}
