use std::fs;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Built-in palettes, selectable by name without a theme file.
const BUILTIN: &[&str] = &["warehouse", "daylight"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub colors: ThemeColors,
}

/// Hex colors. Missing keys in a theme file fall back to the warehouse
/// palette.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub accent: String,
    pub border: String,
    pub card_border: String,
    pub header_bg: String,
    pub header_fg: String,
    pub timer: String,
    pub timer_low: String,
    pub timer_track: String,
    pub accept: String,
    pub reject: String,
    pub xray: String,
}

impl Theme {
    /// Built-in names first, then `<config_dir>/returnsleuth/themes/<name>.toml`.
    pub fn load(name: &str) -> Option<Self> {
        match name {
            "warehouse" | "default" => return Some(Self::default()),
            "daylight" => return Some(Self::daylight()),
            _ => {}
        }
        let path = dirs::config_dir()?
            .join("returnsleuth")
            .join("themes")
            .join(format!("{name}.toml"));
        let content = fs::read_to_string(&path).ok()?;
        match toml::from_str::<Theme>(&content) {
            Ok(theme) => Some(theme),
            Err(err) => {
                tracing::warn!(path = %path.display(), "invalid theme file: {err}");
                None
            }
        }
    }

    pub fn builtin_names() -> &'static [&'static str] {
        BUILTIN
    }

    fn daylight() -> Self {
        let hex = |s: &str| s.to_string();
        Self {
            name: "daylight".to_string(),
            colors: ThemeColors {
                bg: hex("#f8fafc"),
                fg: hex("#0f172a"),
                muted: hex("#64748b"),
                accent: hex("#2563eb"),
                border: hex("#cbd5e1"),
                card_border: hex("#1e293b"),
                header_bg: hex("#e2e8f0"),
                header_fg: hex("#0f172a"),
                timer: hex("#0ea5e9"),
                timer_low: hex("#dc2626"),
                timer_track: hex("#e2e8f0"),
                accept: hex("#16a34a"),
                reject: hex("#dc2626"),
                xray: hex("#9333ea"),
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "warehouse".to_string(),
            colors: ThemeColors::default(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        let hex = |s: &str| s.to_string();
        Self {
            bg: hex("#111827"),
            fg: hex("#e5e7eb"),
            muted: hex("#6b7280"),
            accent: hex("#f59e0b"),
            border: hex("#374151"),
            card_border: hex("#fbbf24"),
            header_bg: hex("#1f2937"),
            header_fg: hex("#fde68a"),
            timer: hex("#38bdf8"),
            timer_low: hex("#ef4444"),
            timer_track: hex("#1f2937"),
            accept: hex("#22c55e"),
            reject: hex("#ef4444"),
            xray: hex("#a855f7"),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 {
            return Color::White;
        }
        match u32::from_str_radix(digits, 16) {
            Ok(rgb) => Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8),
            Err(_) => Color::White,
        }
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn card_border(&self) -> Color { Self::parse_color(&self.card_border) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn timer(&self) -> Color { Self::parse_color(&self.timer) }
    pub fn timer_low(&self) -> Color { Self::parse_color(&self.timer_low) }
    pub fn timer_track(&self) -> Color { Self::parse_color(&self.timer_track) }
    pub fn accept(&self) -> Color { Self::parse_color(&self.accept) }
    pub fn reject(&self) -> Color { Self::parse_color(&self.reject) }
    pub fn xray(&self) -> Color { Self::parse_color(&self.xray) }
}
