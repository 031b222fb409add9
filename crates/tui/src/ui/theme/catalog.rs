use super::{
    Theme,
    palettes::{ANSI256, DRACULA, NORD, PaletteTheme},
    roles::ThemeRoles,
};

/// A selectable palette and the names that select it.
#[derive(Clone, Copy, Debug)]
pub struct ThemeDefinition {
    /// Canonical identifier stored in preferences
    pub id: &'static str,
    /// Name shown in the hints bar
    pub label: &'static str,
    /// Additional names accepted by `--theme` and `TUI_THEME`
    pub aliases: &'static [&'static str],
    /// Whether the palette only uses indexed colors
    pub is_ansi_fallback: bool,
    roles: &'static ThemeRoles,
}

impl ThemeDefinition {
    pub fn build(&self) -> Box<dyn Theme> {
        Box::new(PaletteTheme::new(self.roles))
    }

    fn matches(&self, name: &str) -> bool {
        self.id.eq_ignore_ascii_case(name) || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

pub const THEME_DEFINITIONS: &[ThemeDefinition] = &[
    ThemeDefinition {
        id: "dracula",
        label: "Dracula",
        aliases: &[],
        is_ansi_fallback: false,
        roles: &DRACULA,
    },
    ThemeDefinition {
        id: "nord",
        label: "Nord",
        aliases: &[],
        is_ansi_fallback: false,
        roles: &NORD,
    },
    ThemeDefinition {
        id: "ansi256",
        label: "ANSI 256",
        aliases: &["ansi", "256"],
        is_ansi_fallback: true,
        roles: &ANSI256,
    },
];

/// Case-insensitive lookup by id or alias.
pub fn resolve(name: &str) -> Option<&'static ThemeDefinition> {
    THEME_DEFINITIONS.iter().find(|definition| definition.matches(name))
}

pub fn default_truecolor() -> &'static ThemeDefinition {
    &THEME_DEFINITIONS[0]
}

/// First palette usable without truecolor.
pub fn default_ansi() -> &'static ThemeDefinition {
    THEME_DEFINITIONS
        .iter()
        .find(|definition| definition.is_ansi_fallback)
        .unwrap_or(&THEME_DEFINITIONS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_ids_and_aliases_case_insensitively() {
        assert_eq!(resolve("NORD").map(|definition| definition.id), Some("nord"));
        assert_eq!(resolve("256").map(|definition| definition.id), Some("ansi256"));
        assert!(resolve("solarized").is_none());
    }

    #[test]
    fn built_themes_use_their_role_table() {
        assert_eq!(resolve("nord").map(|definition| definition.build().roles().background), Some(NORD.background));
        assert_eq!(default_truecolor().id, "dracula");
        assert!(default_ansi().is_ansi_fallback);
    }
}
