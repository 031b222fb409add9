use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Semantic color roles the editor, picker and event log draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeRoles {
    pub background: Color,
    pub surface: Color,
    pub border: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    /// Event names, directories and other highlighted content
    pub accent_primary: Color,
    /// Label color of non-destructive buttons
    pub button: Color,

    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,
    pub focus: Color,

    /// Darkened background behind an open modal
    pub modal_bg: Color,
}

/// Exposes the roles of a palette and the styles built from them.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.roles().focus } else { self.roles().border };
        Style::default().fg(color)
    }

    fn selection_style(&self) -> Style {
        Style::default().fg(self.roles().selection_fg).bg(self.roles().selection_bg)
    }

    fn modal_background_style(&self) -> Style {
        Style::default().bg(self.roles().modal_bg)
    }

    /// Container background for panels and blocks.
    fn panel_style(&self) -> Style {
        Style::default().bg(self.roles().surface).fg(self.roles().text)
    }

    fn button_style(&self, selected: bool) -> Style {
        let style = Style::default().fg(self.roles().button);
        if selected { style.bg(self.roles().selection_bg) } else { style }
    }

    /// Actions that discard the selection, such as removing the chosen file.
    fn destructive_style(&self) -> Style {
        Style::default().fg(self.roles().error).add_modifier(Modifier::BOLD)
    }

    fn status_info(&self) -> Style {
        Style::default().fg(self.roles().info)
    }
    fn status_success(&self) -> Style {
        Style::default().fg(self.roles().success)
    }
    fn status_warning(&self) -> Style {
        Style::default().fg(self.roles().warning)
    }
    fn status_error(&self) -> Style {
        Style::default().fg(self.roles().error)
    }

    fn accent_primary_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary)
    }
    fn accent_emphasis_style(&self) -> Style {
        self.accent_primary_style().add_modifier(Modifier::BOLD)
    }
}
