//! Light and dark palettes, and the saved theme preference

use ratatui::style::Color;

use crate::store::{KeyValueStore, StoreError};

/// Store key holding "dark" or "light"
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Any saved value wins, and only "dark" means dark. With nothing saved,
    /// fall back to the configured preference.
    pub fn resolve(saved: Option<&str>, prefers_dark: bool) -> Self {
        match saved.map(str::trim) {
            Some("dark") => ThemeMode::Dark,
            Some(s) if !s.is_empty() => ThemeMode::Light,
            _ if prefers_dark => ThemeMode::Dark,
            _ => ThemeMode::Light,
        }
    }

    /// Read the saved mode from `store`
    pub fn load(store: &dyn KeyValueStore, prefers_dark: bool) -> Self {
        let saved = store.read(THEME_KEY);
        let mode = Self::resolve(saved.as_deref(), prefers_dark);
        tracing::debug!(saved = ?saved, mode = mode.as_str(), "theme resolved");
        mode
    }

    pub fn save(self, store: &mut dyn KeyValueStore) -> Result<(), StoreError> {
        store.write(THEME_KEY, self.as_str())
    }

    pub fn palette(self) -> Palette {
        match self {
            ThemeMode::Light => Palette::light(),
            ThemeMode::Dark => Palette::dark(),
        }
    }
}

/// Colors for one theme
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub bg: Color,           // Page background
    pub card_bg: Color,      // Pricing card
    pub text: Color,         // Headline, price
    pub text_dim: Color,     // Labels, features
    pub track: Color,        // Empty slider track, divider
    pub fill: Color,         // Filled part of the track
    pub accent: Color,       // Thumb, active toggle, focus border
    pub toggle_off: Color,   // Billing toggle in monthly position
    pub badge_bg: Color,     // Discount badge
    pub badge_text: Color,
    pub button_bg: Color,    // Call to action
    pub button_text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::light()
    }
}

impl Palette {
    pub fn light() -> Self {
        Self {
            bg: hex("#fafbff"),
            card_bg: hex("#ffffff"),
            text: hex("#293356"),
            text_dim: hex("#858fad"),
            track: hex("#eaeefb"),
            fill: hex("#a5f3eb"),
            accent: hex("#10d5c2"),
            toggle_off: hex("#cdd7ee"),
            badge_bg: hex("#feede8"),
            badge_text: hex("#ff8d68"),
            button_bg: hex("#293356"),
            button_text: hex("#bdccff"),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: hex("#0f172a"),
            card_bg: hex("#1e293b"),
            text: hex("#f1f5f9"),
            text_dim: hex("#94a3b8"),
            track: hex("#334155"),
            fill: hex("#047857"),
            accent: hex("#10b981"),
            toggle_off: hex("#475569"),
            badge_bg: hex("#431407"),
            badge_text: hex("#fb923c"),
            button_bg: hex("#10b981"),
            button_text: hex("#0f172a"),
        }
    }
}

fn hex(s: &str) -> Color {
    parse_hex_color(s).unwrap_or(Color::Reset)
}

/// Parse a hex color string (#RRGGBB or #RGB)
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim().trim_start_matches('#');

    if s.len() == 6 {
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    } else if s.len() == 3 {
        let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
        let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
        let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
        Some(Color::Rgb(r, g, b))
    } else {
        None
    }
}
