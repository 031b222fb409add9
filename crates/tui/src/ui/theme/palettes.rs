//! Built-in palettes, each a constant role table.

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

/// Dracula (https://draculatheme.com/contribute). Pink marks interactive
/// elements, purple marks focus.
pub const DRACULA: ThemeRoles = ThemeRoles {
    background: Color::Rgb(0x28, 0x2A, 0x36),
    surface: Color::Rgb(0x28, 0x2A, 0x36),
    border: Color::Rgb(0x44, 0x47, 0x5A),
    text: Color::Rgb(0xF8, 0xF8, 0xF2),
    text_secondary: Color::Rgb(0x62, 0x72, 0xA4),
    text_muted: Color::Rgb(0x62, 0x72, 0xA4),
    accent_primary: Color::Rgb(0xFF, 0x79, 0xC6),
    button: Color::Rgb(0x8B, 0xE9, 0xFD),
    info: Color::Rgb(0x8B, 0xE9, 0xFD),
    success: Color::Rgb(0x50, 0xFA, 0x7B),
    warning: Color::Rgb(0xFF, 0xB8, 0x6C),
    error: Color::Rgb(0xFF, 0x55, 0x55),
    selection_bg: Color::Rgb(0x44, 0x47, 0x5A),
    selection_fg: Color::Rgb(0xF8, 0xF8, 0xF2),
    focus: Color::Rgb(0xBD, 0x93, 0xF9),
    modal_bg: Color::Rgb(0x1D, 0x1F, 0x27),
};

/// Nord: Polar Night surfaces, Snow Storm text, Frost accents and Aurora statuses.
pub const NORD: ThemeRoles = ThemeRoles {
    background: Color::Rgb(0x2E, 0x34, 0x40),
    surface: Color::Rgb(0x3B, 0x42, 0x52),
    border: Color::Rgb(0x4C, 0x56, 0x6A),
    text: Color::Rgb(0xD8, 0xDE, 0xE9),
    text_secondary: Color::Rgb(0xE5, 0xE9, 0xF0),
    text_muted: Color::Rgb(0x61, 0x6E, 0x88),
    accent_primary: Color::Rgb(0x88, 0xC0, 0xD0),
    button: Color::Rgb(0x81, 0xA1, 0xC1),
    info: Color::Rgb(0x81, 0xA1, 0xC1),
    success: Color::Rgb(0xA3, 0xBE, 0x8C),
    warning: Color::Rgb(0xD0, 0x87, 0x70),
    error: Color::Rgb(0xBF, 0x61, 0x6A),
    selection_bg: Color::Rgb(0x5E, 0x81, 0xAC),
    selection_fg: Color::Rgb(0xEC, 0xEF, 0xF4),
    focus: Color::Rgb(0x88, 0xC0, 0xD0),
    modal_bg: Color::Rgb(0x1A, 0x1E, 0x28),
};

/// Indexed approximation of [`DRACULA`] for terminals without truecolor.
pub const ANSI256: ThemeRoles = ThemeRoles {
    background: Color::Indexed(236),
    surface: Color::Indexed(236),
    border: Color::Indexed(239),
    text: Color::Indexed(255),
    text_secondary: Color::Indexed(250),
    text_muted: Color::Indexed(247),
    accent_primary: Color::Indexed(212),
    button: Color::Indexed(117),
    info: Color::Indexed(117),
    success: Color::Indexed(84),
    warning: Color::Indexed(215),
    error: Color::Indexed(203),
    selection_bg: Color::Indexed(239),
    selection_fg: Color::Indexed(255),
    focus: Color::Indexed(117),
    modal_bg: Color::Indexed(232),
};

/// A [`Theme`] backed by one of the constant role tables.
#[derive(Debug, Clone, Copy)]
pub struct PaletteTheme {
    roles: &'static ThemeRoles,
}

impl PaletteTheme {
    pub const fn new(roles: &'static ThemeRoles) -> Self {
        Self { roles }
    }
}

impl Theme for PaletteTheme {
    fn roles(&self) -> &ThemeRoles {
        self.roles
    }
}
