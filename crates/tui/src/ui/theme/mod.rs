//! Palettes, semantic roles and the widget helpers built on them.
//!
//! The active palette is chosen once at startup by [`load`]: terminals without
//! truecolor always get the indexed fallback, otherwise `TUI_THEME` wins over
//! the `--theme` flag or stored preference.

use std::env;

use tracing::debug;

pub mod catalog;
pub mod palettes;
pub mod roles;
pub mod theme_helpers;

pub use catalog::ThemeDefinition;
pub use roles::Theme;

/// The active theme and the definition it was built from.
pub struct LoadedTheme {
    pub definition: &'static ThemeDefinition,
    pub theme: Box<dyn Theme>,
}

impl LoadedTheme {
    fn from_definition(definition: &'static ThemeDefinition) -> Self {
        Self {
            definition,
            theme: definition.build(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorCapability {
    Truecolor,
    Ansi256,
}

/// Picks the palette for this session.
pub fn load(preferred_theme: Option<&str>) -> LoadedTheme {
    if detect_color_capability() == ColorCapability::Ansi256 {
        debug!("no truecolor support detected; using the indexed palette");
        return LoadedTheme::from_definition(catalog::default_ansi());
    }

    let env_theme = env::var("TUI_THEME").ok();
    let definition = [env_theme.as_deref(), preferred_theme]
        .into_iter()
        .flatten()
        .find_map(|name| {
            let resolved = catalog::resolve(name.trim());
            if resolved.is_none() {
                debug!(theme = name, "unknown theme name");
            }
            resolved
        })
        .unwrap_or_else(catalog::default_truecolor);
    LoadedTheme::from_definition(definition)
}

fn detect_color_capability() -> ColorCapability {
    if let Some(mode) = env::var("TUI_COLOR_MODE").ok().and_then(|value| parse_color_mode(value.trim())) {
        return mode;
    }

    let color_term = env::var("COLORTERM").unwrap_or_default().to_ascii_lowercase();
    if color_term.contains("truecolor") || color_term.contains("24bit") {
        return ColorCapability::Truecolor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term.contains("truecolor") {
        return ColorCapability::Truecolor;
    }

    ColorCapability::Ansi256
}

fn parse_color_mode(value: &str) -> Option<ColorCapability> {
    match value.to_ascii_lowercase().as_str() {
        "truecolor" | "24bit" => Some(ColorCapability::Truecolor),
        "ansi256" | "256" | "8bit" => Some(ColorCapability::Ansi256),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_terminals_get_the_fallback_palette() {
        temp_env::with_vars(
            [("TUI_COLOR_MODE", Some("ansi256")), ("TUI_THEME", Some("nord"))],
            || {
                assert_eq!(load(Some("nord")).definition.id, "ansi256");
            },
        );
    }

    #[test]
    fn env_theme_wins_over_preference() {
        temp_env::with_vars(
            [("TUI_COLOR_MODE", Some("truecolor")), ("TUI_THEME", Some("nord"))],
            || {
                assert_eq!(load(Some("dracula")).definition.id, "nord");
            },
        );
    }

    #[test]
    fn preference_applies_without_env_override() {
        temp_env::with_vars(
            [("TUI_COLOR_MODE", Some("24bit")), ("TUI_THEME", None)],
            || {
                assert_eq!(load(Some("nord")).definition.id, "nord");
                assert_eq!(load(None).definition.id, "dracula");
            },
        );
    }

    #[test]
    fn unknown_env_theme_falls_through_to_preference() {
        temp_env::with_vars(
            [("TUI_COLOR_MODE", Some("truecolor")), ("TUI_THEME", Some("solarized"))],
            || {
                assert_eq!(load(Some("nord")).definition.id, "nord");
            },
        );
    }
}
