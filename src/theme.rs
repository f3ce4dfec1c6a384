//! Colour themes
//!
//! Each theme carries the palette circles (and the focus colour) are drawn from.

use crate::Color;

/// A named colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Lookup key
    pub key: &'static str,
    /// Display name
    pub name: &'static str,
    pub background: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub accent: Color,
    /// Selectable circle colours
    pub palette: &'static [Color],
}

/// Theme used when a lookup misses
pub const DEFAULT_THEME: &str = "midnight";

const fn c(hex: u32) -> Color {
    Color::rgb(hex)
}

pub const THEMES: [Theme; 5] = [
    Theme {
        key: "midnight",
        name: "Midnight",
        background: c(0x0A0A0A),
        text: c(0xFFFFFF),
        text_secondary: c(0x888888),
        accent: c(0x4ECDC4),
        palette: &[
            c(0x4ECDC4),
            c(0xFF6B6B),
            c(0xFFE66D),
            c(0xA8E6CF),
            c(0x95E1D3),
            c(0xF38181),
            c(0xAA96DA),
            c(0xFCBAD3),
        ],
    },
    Theme {
        key: "ocean",
        name: "Ocean",
        background: c(0x0A1929),
        text: c(0xE3F2FD),
        text_secondary: c(0x90CAF9),
        accent: c(0x00B4D8),
        palette: &[
            c(0x00B4D8),
            c(0x0077B6),
            c(0x90E0EF),
            c(0x48CAE4),
            c(0xADE8F4),
            c(0xCAF0F8),
            c(0x023E8A),
            c(0x03045E),
        ],
    },
    Theme {
        key: "forest",
        name: "Forest",
        background: c(0x1A2F1A),
        text: c(0xE8F5E9),
        text_secondary: c(0x81C784),
        accent: c(0x66BB6A),
        palette: &[
            c(0x66BB6A),
            c(0x4CAF50),
            c(0x81C784),
            c(0xA5D6A7),
            c(0xC8E6C9),
            c(0x388E3C),
            c(0x2E7D32),
            c(0x1B5E20),
        ],
    },
    Theme {
        key: "sunset",
        name: "Sunset",
        background: c(0x2D1B2E),
        text: c(0xFFF3E0),
        text_secondary: c(0xFFB74D),
        accent: c(0xFF7043),
        palette: &[
            c(0xFF7043),
            c(0xFFA726),
            c(0xFFB74D),
            c(0xFFCC80),
            c(0xFFE0B2),
            c(0xFF6F00),
            c(0xF57C00),
            c(0xE65100),
        ],
    },
    Theme {
        key: "lavender",
        name: "Lavender",
        background: c(0x1A1625),
        text: c(0xF3E5F5),
        text_secondary: c(0xCE93D8),
        accent: c(0xBA68C8),
        palette: &[
            c(0xBA68C8),
            c(0xAB47BC),
            c(0xCE93D8),
            c(0xE1BEE7),
            c(0xF3E5F5),
            c(0x8E24AA),
            c(0x7B1FA2),
            c(0x6A1B9A),
        ],
    },
];

impl Theme {
    /// Look up a theme by key (case-insensitive)
    pub fn find(key: &str) -> Option<&'static Theme> {
        THEMES.iter().find(|t| t.key.eq_ignore_ascii_case(key))
    }

    /// Look up a theme, falling back to midnight on unknown keys
    pub fn by_name(key: &str) -> &'static Theme {
        match Self::find(key) {
            Some(theme) => theme,
            None => {
                log::warn!("Unknown theme '{}', using {}", key, DEFAULT_THEME);
                &THEMES[0]
            }
        }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        THEMES.iter().map(|t| t.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Theme::by_name("Ocean").key, "ocean");
        assert_eq!(Theme::by_name("SUNSET").name, "Sunset");
    }

    #[test]
    fn unknown_theme_falls_back_to_midnight() {
        assert!(Theme::find("neon").is_none());
        assert_eq!(Theme::by_name("neon").key, DEFAULT_THEME);
    }

    #[test]
    fn names_list_every_theme_default_first() {
        let names: Vec<_> = Theme::names().collect();
        assert_eq!(names, ["midnight", "ocean", "forest", "sunset", "lavender"]);
        assert_eq!(names[0], DEFAULT_THEME);
    }

    #[test]
    fn every_palette_has_distinct_colors() {
        for theme in &THEMES {
            assert_eq!(theme.palette.len(), 8, "{}", theme.key);
            for (i, a) in theme.palette.iter().enumerate() {
                assert!(!theme.palette[i + 1..].contains(a), "{} repeats {}", theme.key, a);
            }
        }
    }
}
