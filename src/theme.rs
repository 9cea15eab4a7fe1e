//! Badge theme table.
//!
//! Badges are short overlay texts rendered on a session, optionally colored
//! via a named theme. The table is an immutable value injected into the
//! renderer at construction time so tests can swap it out.

/// An RGB color triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Hex form without a leading `#`, as used by iTerm2 `SetColors`.
    pub fn to_hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Named badge themes mapping to a foreground color.
///
/// Background colors are intentionally unset in the built-in table.
#[derive(Debug, Clone)]
pub struct BadgeThemes {
    entries: Vec<(&'static str, Rgb)>,
}

impl BadgeThemes {
    /// The built-in theme table.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                ("default", Rgb(213, 194, 194)),
                ("success", Rgb(76, 175, 80)),
                ("error", Rgb(244, 67, 54)),
                ("warning", Rgb(255, 193, 7)),
                ("info", Rgb(33, 150, 243)),
                ("primary", Rgb(156, 39, 176)),
                ("secondary", Rgb(96, 125, 139)),
                ("dark", Rgb(33, 33, 33)),
                ("light", Rgb(227, 227, 227)),
            ],
        }
    }

    /// Foreground color for a theme name, or `None` for unknown themes.
    pub fn color(&self, theme: &str) -> Option<Rgb> {
        self.entries
            .iter()
            .find(|(name, _)| *name == theme)
            .map(|(_, color)| *color)
    }

    /// Theme names in table order, for listings and the wizard.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }
}

impl Default for BadgeThemes {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_themes_resolve() {
        let themes = BadgeThemes::builtin();
        assert_eq!(themes.color("success"), Some(Rgb(76, 175, 80)));
        assert_eq!(themes.color("default"), Some(Rgb(213, 194, 194)));
    }

    #[test]
    fn unknown_theme_is_none() {
        assert_eq!(BadgeThemes::builtin().color("bogus"), None);
    }

    #[test]
    fn hex_format() {
        assert_eq!(Rgb(76, 175, 80).to_hex(), "4caf50");
        assert_eq!(Rgb(0, 0, 0).to_hex(), "000000");
    }
}
