//! Style presets for rendered cards
//!
//! A fixed set of [`StyleProfile`]s keyed by identifier. Lookups never fail:
//! an unknown identifier resolves to the `simple` profile.

use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha scaled to `opacity` (0.0..=1.0)
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Two-stop vertical gradient, `top` at y = 0 and `bottom` at the last row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub top: Color,
    pub bottom: Color,
}

/// Extra ornament painted after the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decoration {
    #[default]
    None,
    /// Two large faint quotation marks in opposite corners
    QuoteMarks,
    /// A thin horizontal rule above the bottom margin
    UnderlineRule,
}

/// Immutable description of one card style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleProfile {
    pub id: &'static str,
    pub background: Color,
    pub text_color: Color,
    /// CSS-like family list. Informational: the built-in rasterizer has a single face.
    pub font_family: &'static str,
    pub padding: u32,
    pub gradient: Option<Gradient>,
    pub decoration: Decoration,
}

pub const DEFAULT_STYLE: &str = "simple";

static PROFILES: [StyleProfile; 4] = [
    StyleProfile {
        id: "simple",
        background: Color::rgb(0xf8, 0xf9, 0xfa),
        text_color: Color::rgb(0x33, 0x33, 0x33),
        font_family: "PingFang SC, Microsoft YaHei, sans-serif",
        padding: 30,
        gradient: None,
        decoration: Decoration::None,
    },
    StyleProfile {
        id: "literary",
        background: Color::rgb(0xf5, 0xef, 0xe0),
        text_color: Color::rgb(0x5d, 0x40, 0x37),
        font_family: "KaiTi, STKaiti, serif",
        padding: 40,
        gradient: None,
        decoration: Decoration::QuoteMarks,
    },
    StyleProfile {
        id: "business",
        background: Color::rgb(0x26, 0x32, 0x38),
        text_color: Color::WHITE,
        font_family: "Helvetica, Arial, sans-serif",
        padding: 30,
        gradient: None,
        decoration: Decoration::UnderlineRule,
    },
    StyleProfile {
        id: "colorful",
        background: Color::rgb(0xff, 0x9a, 0x9e),
        text_color: Color::WHITE,
        font_family: "PingFang SC, Microsoft YaHei, sans-serif",
        padding: 35,
        gradient: Some(Gradient {
            top: Color::rgb(0xff, 0x9a, 0x9e),
            bottom: Color::rgb(0xfa, 0xd0, 0xc4),
        }),
        decoration: Decoration::None,
    },
];

impl StyleProfile {
    /// Look up a profile by identifier, falling back to `simple`
    pub fn resolve(id: &str) -> &'static StyleProfile {
        match Self::find(id) {
            Some(p) => p,
            None => {
                log::debug!("unknown style '{}', using '{}'", id, DEFAULT_STYLE);
                Self::default_profile()
            }
        }
    }

    /// Exact lookup without fallback
    pub fn find(id: &str) -> Option<&'static StyleProfile> {
        PROFILES.iter().find(|p| p.id.eq_ignore_ascii_case(id.trim()))
    }

    pub fn default_profile() -> &'static StyleProfile {
        &PROFILES[0]
    }

    pub fn all() -> &'static [StyleProfile] {
        &PROFILES
    }
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self::default_profile().clone()
    }
}
