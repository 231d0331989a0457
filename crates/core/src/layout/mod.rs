//! Per-slide-type layout.
//!
//! Two complete layout families share one document model. The family is a
//! pure function of the resolved theme key: `doings-pro` selects the premium
//! family, every other theme the standard one.

mod premium;
mod standard;

pub use premium::PremiumLayout;
pub use standard::StandardLayout;

use crate::locale::{Labels, Language};
use crate::render::{Background, RenderOps};
use crate::theme::{Color, Theme, ThemeKey};
use crate::types::{FontPair, Slide, StyleConfig};

/// Everything a layout may consult besides the slide itself.
#[derive(Debug, Clone, Copy)]
pub struct SlideContext<'a> {
    pub theme: &'a Theme,
    pub style: &'a StyleConfig,
    /// Rotation index of the slide (see `RotationMode`).
    pub index: usize,
    pub language: Language,
}

impl<'a> SlideContext<'a> {
    pub fn new(theme: &'a Theme, style: &'a StyleConfig, index: usize, language: Language) -> Self {
        Self {
            theme,
            style,
            index,
            language,
        }
    }

    pub fn fonts(&self) -> FontPair {
        self.style.font_family.fonts()
    }

    pub fn labels(&self) -> &'static Labels {
        self.language.labels()
    }
}

/// The two layout families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutFamily {
    Standard,
    Premium,
}

static STANDARD: StandardLayout = StandardLayout;
static PREMIUM: PremiumLayout = PremiumLayout;

impl LayoutFamily {
    pub fn for_theme(key: ThemeKey) -> Self {
        match key {
            ThemeKey::DoingsPro => Self::Premium,
            ThemeKey::Doings | ThemeKey::Corporate | ThemeKey::Bold | ThemeKey::Custom => {
                Self::Standard
            }
        }
    }

    pub fn strategy(&self) -> &'static dyn LayoutStrategy {
        match self {
            Self::Standard => &STANDARD,
            Self::Premium => &PREMIUM,
        }
    }
}

/// A complete set of per-type layout rules.
pub trait LayoutStrategy: Send + Sync {
    fn family(&self) -> LayoutFamily;

    /// Ordered accent palette cycled across consecutive slides.
    fn accent_rotation(&self, theme: &Theme) -> Vec<Color>;

    /// Background for the slide at `ctx.index`.
    fn background(&self, ctx: &SlideContext<'_>) -> Background;

    /// Lay out one slide. The result depends only on the slide and `ctx`.
    fn layout(&self, slide: &Slide, ctx: &SlideContext<'_>) -> RenderOps;

    /// Deck-level title and body typefaces, as recorded in the theme part.
    fn fonts(&self, style: &StyleConfig) -> FontPair {
        style.font_family.fonts()
    }

    /// Accent for the slide: `index mod K` into the rotation.
    fn accent(&self, ctx: &SlideContext<'_>) -> Color {
        rotate(&self.accent_rotation(ctx.theme), ctx.index)
    }

    /// Accent for dual-tone elements: `(index + 1) mod K`.
    fn secondary_accent(&self, ctx: &SlideContext<'_>) -> Color {
        rotate(&self.accent_rotation(ctx.theme), ctx.index + 1)
    }
}

fn rotate(palette: &[Color], index: usize) -> Color {
    if palette.is_empty() {
        return Color::WHITE;
    }
    palette[index % palette.len()]
}

/// Two background tones alternated by index parity.
fn alternate(index: usize, even: Color, odd: Color) -> Color {
    if index % 2 == 0 {
        even
    } else {
        odd
    }
}
