use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

pub const THEME_KEY: &str = "ui.theme";
pub const DARK: &str = "dark";
pub const LIGHT: &str = "light";

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_correct: String,
    pub text_incorrect: String,
    pub text_pending: String,
    pub key_flash: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub locked: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // User overrides first
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("ditdah")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(e) => tracing::warn!("ignoring {}: {e}", user_theme_path.display()),
                }
            }
        }

        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    /// Load `name`, falling back to the built-in dark palette.
    pub fn load_or_default(name: &str) -> Self {
        Self::load(name).unwrap_or_else(|| {
            tracing::warn!("unknown theme {name:?}, using {DARK}");
            Self::default()
        })
    }

    pub fn is_dark(&self) -> bool {
        self.name != LIGHT
    }

    /// Name of the opposite palette.
    pub fn toggled_name(&self) -> &'static str {
        if self.is_dark() { LIGHT } else { DARK }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DARK).unwrap_or_else(|| Self {
            name: DARK.to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#0f172a".to_string(),
            fg: "#e2e8f0".to_string(),
            text_correct: "#4ade80".to_string(),
            text_incorrect: "#f87171".to_string(),
            text_pending: "#64748b".to_string(),
            key_flash: "#facc15".to_string(),
            accent: "#facc15".to_string(),
            accent_dim: "#334155".to_string(),
            border: "#334155".to_string(),
            border_focused: "#facc15".to_string(),
            header_bg: "#1e293b".to_string(),
            header_fg: "#e2e8f0".to_string(),
            bar_filled: "#facc15".to_string(),
            bar_empty: "#1e293b".to_string(),
            locked: "#475569".to_string(),
            error: "#f87171".to_string(),
            warning: "#fbbf24".to_string(),
            success: "#4ade80".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_correct(&self) -> Color { Self::parse_color(&self.text_correct) }
    pub fn text_incorrect(&self) -> Color { Self::parse_color(&self.text_incorrect) }
    pub fn text_pending(&self) -> Color { Self::parse_color(&self.text_pending) }
    pub fn key_flash(&self) -> Color { Self::parse_color(&self.key_flash) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn locked(&self) -> Color { Self::parse_color(&self.locked) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}
