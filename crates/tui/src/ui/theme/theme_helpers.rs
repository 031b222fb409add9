use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::Span,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use super::roles::Theme;

/// Bordered panel with an optional bold title.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(theme.panel_style());
    match title {
        Some(title) => block.title(Span::styled(title, theme.text_secondary_style().add_modifier(Modifier::BOLD))),
        None => block,
    }
}

/// Options controlling how [`render_button`] draws a button.
#[derive(Debug, Clone, Copy)]
pub struct ButtonRenderOptions {
    pub is_enabled: bool,
    pub is_focused: bool,
    pub is_selected: bool,
    pub borders: Borders,
    pub is_destructive: bool,
}

impl ButtonRenderOptions {
    pub fn new(is_enabled: bool, is_focused: bool, is_selected: bool, borders: Borders, is_destructive: bool) -> Self {
        Self {
            is_enabled,
            is_focused,
            is_selected,
            borders,
            is_destructive,
        }
    }
}

pub fn render_button<T: Theme + ?Sized>(frame: &mut Frame, area: Rect, label: &str, theme: &T, options: ButtonRenderOptions) {
    let (border_style, label_style) = match (options.is_enabled, options.is_destructive) {
        (false, _) => (theme.text_muted_style(), theme.text_muted_style()),
        (true, true) => (theme.border_style(options.is_focused), theme.destructive_style()),
        (true, false) => (theme.border_style(options.is_focused), theme.button_style(options.is_selected)),
    };
    // Borderless buttons keep the footprint of bordered ones.
    let padding = if options.borders.is_empty() { Padding::uniform(1) } else { Padding::ZERO };

    frame.render_widget(
        Paragraph::new(label)
            .centered()
            .block(Block::bordered().borders(options.borders).border_style(border_style).padding(padding))
            .style(label_style),
        area,
    );
}

/// Footer hint spans: an emphasized key followed by a muted description.
pub fn build_hint_spans<T: Theme + ?Sized>(theme: &T, hints: &[(&'static str, &'static str)]) -> Vec<Span<'static>> {
    hints
        .iter()
        .flat_map(|(key, description)| {
            [
                Span::styled(*key, theme.accent_emphasis_style()),
                Span::styled(*description, theme.text_muted_style()),
            ]
        })
        .collect()
}
