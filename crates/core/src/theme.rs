//! Theme registry: the fixed catalog of named color palettes.
//!
//! Every rendering decision draws its colors from a [`Theme`]. Built-in themes
//! live in a process-wide constant table; the `custom` theme is assembled at
//! render time from five user-supplied colors.

use crate::error::{Error, Result};
use crate::types::{CustomColors, StyleConfig};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 24-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color([u8; 3]);

impl Color {
    pub const WHITE: Color = Color::from_u32(0xFFFFFF);
    pub const BLACK: Color = Color::from_u32(0x000000);

    /// Build a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Build a color from a packed `0xRRGGBB` value.
    pub const fn from_u32(value: u32) -> Self {
        Self([
            ((value >> 16) & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
        ])
    }

    /// Parse a hex triplet such as `"E85A9C"` or `"#e85a9c"`.
    pub fn parse_hex(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::from_u32)
    }

    /// Uppercase hex triplet without a leading `#`, as PresentationML expects.
    pub fn hex(&self) -> String {
        let [r, g, b] = self.0;
        format!("{:02X}{:02X}{:02X}", r, g, b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Keys of the closed theme set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeKey {
    Doings,
    Corporate,
    Bold,
    DoingsPro,
    Custom,
}

impl ThemeKey {
    /// Theme used when a request names a key outside the registry.
    pub const DEFAULT: ThemeKey = ThemeKey::Doings;

    /// Parse a theme key. Case and `_`/`-` separators are not significant.
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "doings" => Some(Self::Doings),
            "corporate" => Some(Self::Corporate),
            "bold" => Some(Self::Bold),
            "doings-pro" | "doingspro" => Some(Self::DoingsPro),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doings => "doings",
            Self::Corporate => "corporate",
            Self::Bold => "bold",
            Self::DoingsPro => "doings-pro",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ThemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named set of semantic colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub key: ThemeKey,
    pub name: &'static str,
    /// Primary background tone.
    pub background_dark: Color,
    /// Alternate background tone.
    pub background_alt: Color,
    /// Fill for boxes and containers drawn on the background.
    pub surface: Color,
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub contrast: Color,
    /// Soft accent for quote frames and callout borders.
    pub soft_accent: Color,
    pub text_light: Color,
    pub text_muted: Color,
    pub text_subtle: Color,
    pub border: Color,
}

impl Theme {
    /// Build the `custom` theme from five user colors.
    ///
    /// Slot mapping is fixed: color1 → primary, color2 → secondary,
    /// color3 → background dark, color4 → background alt, color5 → text.
    pub fn from_custom(colors: &CustomColors) -> Result<Self> {
        let [primary, secondary, background_dark, background_alt, text] = colors.parse()?;
        Ok(Self {
            key: ThemeKey::Custom,
            name: "Custom",
            background_dark,
            background_alt,
            surface: background_alt,
            primary,
            secondary,
            accent: primary,
            contrast: secondary,
            soft_accent: secondary,
            text_light: text,
            text_muted: text,
            text_subtle: text,
            border: secondary,
        })
    }
}

static THEMES: [Theme; 4] = [
    Theme {
        key: ThemeKey::Doings,
        name: "Doings",
        background_dark: Color::from_u32(0x0D0D14),
        background_alt: Color::from_u32(0x1A1A2E),
        surface: Color::from_u32(0x24243A),
        primary: Color::from_u32(0xE85A9C),
        secondary: Color::from_u32(0xF5A68C),
        accent: Color::from_u32(0xC9A227),
        contrast: Color::from_u32(0x4A7C7C),
        soft_accent: Color::from_u32(0xF5B8C8),
        text_light: Color::from_u32(0xFFFFFF),
        text_muted: Color::from_u32(0xA0A0B0),
        text_subtle: Color::from_u32(0xD4D4E0),
        border: Color::from_u32(0x3D3D55),
    },
    Theme {
        key: ThemeKey::Corporate,
        name: "Corporate",
        background_dark: Color::from_u32(0x1A1A2E),
        background_alt: Color::from_u32(0x2D3748),
        surface: Color::from_u32(0x4A5568),
        primary: Color::from_u32(0x3182CE),
        secondary: Color::from_u32(0x63B3ED),
        accent: Color::from_u32(0xF6AD55),
        contrast: Color::from_u32(0x48BB78),
        soft_accent: Color::from_u32(0x90CDF4),
        text_light: Color::from_u32(0xFFFFFF),
        text_muted: Color::from_u32(0xA0AEC0),
        text_subtle: Color::from_u32(0xE2E8F0),
        border: Color::from_u32(0x4A5568),
    },
    Theme {
        key: ThemeKey::Bold,
        name: "Bold",
        background_dark: Color::from_u32(0x000000),
        background_alt: Color::from_u32(0x1A1A1A),
        surface: Color::from_u32(0x262626),
        primary: Color::from_u32(0xFF6B6B),
        secondary: Color::from_u32(0xFECA57),
        accent: Color::from_u32(0x48DBFB),
        contrast: Color::from_u32(0x1DD1A1),
        soft_accent: Color::from_u32(0xFF9F9F),
        text_light: Color::from_u32(0xFFFFFF),
        text_muted: Color::from_u32(0x888888),
        text_subtle: Color::from_u32(0xDDDDDD),
        border: Color::from_u32(0x333333),
    },
    Theme {
        key: ThemeKey::DoingsPro,
        name: "Doings Pro",
        background_dark: Color::from_u32(0x0A0A14),
        background_alt: Color::from_u32(0x0D1B2A),
        surface: Color::from_u32(0x1B2838),
        primary: Color::from_u32(0xE85A9C),
        secondary: Color::from_u32(0xC9A227),
        accent: Color::from_u32(0xF5A68C),
        contrast: Color::from_u32(0x4A7C7C),
        soft_accent: Color::from_u32(0xF5B8C8),
        text_light: Color::from_u32(0xFFFFFF),
        text_muted: Color::from_u32(0x9FAFBF),
        text_subtle: Color::from_u32(0xD4E0EC),
        border: Color::from_u32(0x3D4F5F),
    },
];

/// All built-in themes, in catalog order.
pub fn builtin_themes() -> &'static [Theme] {
    &THEMES
}

/// Look up a built-in theme. `custom` has no registry entry.
pub fn builtin(key: ThemeKey) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.key == key)
}

/// Look up a built-in theme by its wire key.
pub fn lookup(key: &str) -> Option<&'static Theme> {
    ThemeKey::parse(key).and_then(builtin)
}

/// Resolve the theme a style actually renders with.
///
/// `custom` is assembled from the style's custom colors; registry keys return
/// the catalog entry unchanged. An unrecognised key resolves to `fallback`
/// when one is configured, otherwise it is an [`Error::UnknownTheme`].
pub fn resolve_effective_theme(style: &StyleConfig, fallback: Option<ThemeKey>) -> Result<Theme> {
    match ThemeKey::parse(&style.theme_key) {
        Some(ThemeKey::Custom) => {
            let colors = style.custom_colors.as_ref().ok_or_else(|| {
                Error::InvalidInput("theme 'custom' requires customColors".to_string())
            })?;
            Theme::from_custom(colors)
        }
        Some(key) => builtin(key)
            .cloned()
            .ok_or_else(|| Error::UnknownTheme(key.to_string())),
        None => match fallback.and_then(builtin) {
            Some(theme) => {
                log::warn!(
                    "Unknown theme '{}', falling back to '{}'",
                    style.theme_key,
                    theme.key
                );
                Ok(theme.clone())
            }
            None => Err(Error::UnknownTheme(style.theme_key.clone())),
        },
    }
}
