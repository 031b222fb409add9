//! UI utilities and helper functions for the TUI application.
//!
//! Layout helpers shared by the components.

use ratatui::prelude::*;

/// Creates a centered rectangular area within a given rectangle.
///
/// The width and height are percentages (0-100) of the parent rectangle.
/// Used to place modal dialogs.
///
/// # Examples
///
/// ```rust,ignore
/// let parent = Rect::new(0, 0, 100, 50);
/// let centered = centered_rect(80, 70, parent);
/// // 80% wide and 70% tall, centered in parent
/// ```
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);
    area[1]
}

/// Like [`centered_rect`], but clamps the result between a minimum and a
/// maximum size. The result never exceeds the parent rectangle.
pub fn centered_min_max(percent_x: u16, percent_y: u16, min: Rect, max: Rect, r: Rect) -> Rect {
    let proposed = centered_rect(percent_x, percent_y, r);
    let width = proposed.width.clamp(min.width, max.width).min(r.width);
    let height = proposed.height.clamp(min.height, max.height).min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}
