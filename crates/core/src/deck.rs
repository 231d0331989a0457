//! Rendering a whole document into positioned primitives.

use crate::cancel::CancellationToken;
use crate::composite::composite;
use crate::decoration::decoration_ops;
use crate::error::Result;
use crate::layout::{LayoutFamily, SlideContext};
use crate::locale::Language;
use crate::render::RenderOps;
use crate::theme::Theme;
use crate::types::{Document, FontPair, Slide, SlideKind, StyleConfig};

/// One slide after layout and compositing.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSlide {
    pub id: String,
    pub kind: SlideKind,
    pub ops: RenderOps,
    /// Speaker notes, unchanged from the input.
    pub notes: String,
}

/// A fully laid out deck, ready for packaging.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDeck {
    pub title: String,
    pub theme: Theme,
    pub family: LayoutFamily,
    /// Typefaces for the theme's font scheme.
    pub fonts: FontPair,
    pub slides: Vec<RenderedSlide>,
}

/// Render a single slide at the given rotation index.
pub fn render_slide(slide: &Slide, ctx: &SlideContext<'_>) -> RenderedSlide {
    let strategy = LayoutFamily::for_theme(ctx.theme.key).strategy();
    let mut ops = strategy.layout(slide, ctx);

    if let Some(decoration) = ctx.style.background_decoration {
        ops.underlay(decoration_ops(decoration, strategy.accent(ctx)));
    }

    let ops = composite(ops, slide.image.as_ref(), &slide.id);

    RenderedSlide {
        id: slide.id.clone(),
        kind: slide.kind(),
        ops,
        notes: slide.speaker_notes.clone(),
    }
}

/// Render every slide of `document` with `theme`.
///
/// Slide `i` uses rotation index `index_offset + i`. The token is checked
/// before each slide.
pub fn render_deck(
    document: &Document,
    theme: &Theme,
    style: &StyleConfig,
    language: Language,
    index_offset: usize,
    cancel: Option<&CancellationToken>,
) -> Result<RenderedDeck> {
    document.validate()?;

    let family = LayoutFamily::for_theme(theme.key);
    log::debug!(
        "Rendering '{}' ({} slides, theme {}, {:?} layout)",
        document.title,
        document.slides.len(),
        theme.key,
        family
    );

    let mut slides = Vec::with_capacity(document.slides.len());
    for (idx, slide) in document.slides.iter().enumerate() {
        if let Some(token) = cancel {
            token.check()?;
        }
        let ctx = SlideContext::new(theme, style, index_offset + idx, language);
        slides.push(render_slide(slide, &ctx));
    }

    Ok(RenderedDeck {
        title: document.title.clone(),
        theme: theme.clone(),
        family,
        fonts: family.strategy().fonts(style),
        slides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::tests::PIXEL_PNG;
    use crate::error::Error;
    use crate::render::{Background, RenderOp};
    use crate::theme::{builtin, ThemeKey};
    use crate::types::{BackgroundDecoration, SlideBody, SlideImage};

    fn deck(len: usize) -> Document {
        let slides = (0..len)
            .map(|i| Slide::new(format!("s{}", i), SlideBody::Statement, format!("Point {}", i)))
            .collect();
        Document::new("Deck", slides)
    }

    fn render(doc: &Document, key: ThemeKey, offset: usize) -> RenderedDeck {
        let style = StyleConfig::themed(key.as_str());
        render_deck(doc, builtin(key).unwrap(), &style, Language::En, offset, None).unwrap()
    }

    fn sidebar_color(slide: &RenderedSlide) -> crate::theme::Color {
        slide.ops.shapes().next().unwrap().fill.unwrap().color
    }

    #[test]
    fn test_premium_rotation_period_in_deck() {
        let rendered = render(&deck(9), ThemeKey::DoingsPro, 0);
        for i in 0..5 {
            assert_eq!(
                sidebar_color(&rendered.slides[i]),
                sidebar_color(&rendered.slides[i + 4])
            );
            assert_ne!(
                sidebar_color(&rendered.slides[i]),
                sidebar_color(&rendered.slides[i + 1])
            );
        }
    }

    #[test]
    fn test_background_alternation_in_deck() {
        for key in [ThemeKey::Doings, ThemeKey::DoingsPro] {
            let rendered = render(&deck(6), key, 0);
            let bgs: Vec<Background> = rendered.slides.iter().map(|s| s.ops.background).collect();
            for i in 0..4 {
                assert_ne!(bgs[i], bgs[i + 1]);
                assert_eq!(bgs[i], bgs[i + 2]);
            }
        }
    }

    #[test]
    fn test_index_offset_shifts_rotation() {
        let doc = deck(8);
        let whole = render(&doc, ThemeKey::DoingsPro, 0);
        let tail = render(&Document::new("Tail", doc.slides[4..].to_vec()), ThemeKey::DoingsPro, 4);
        assert_eq!(whole.slides[4..], tail.slides[..]);
    }

    #[test]
    fn test_notes_are_verbatim() {
        let notes = "Line one\n  indented <tag> & \"quotes\"\n\nÅ last";
        let doc = Document::new(
            "Deck",
            vec![Slide::new("s", SlideBody::Statement, "T").with_notes(notes)],
        );
        let rendered = render(&doc, ThemeKey::DoingsPro, 0);
        assert_eq!(rendered.slides[0].notes, notes);
    }

    #[test]
    fn test_decoration_sits_between_scrim_and_layout() {
        let style = StyleConfig {
            background_decoration: Some(BackgroundDecoration::Stripe),
            ..StyleConfig::themed("bold")
        };
        let slide = Slide::new("s", SlideBody::Cta, "Go")
            .with_image(SlideImage::new(PIXEL_PNG, Some("image/png")));
        let theme = builtin(ThemeKey::Bold).unwrap();
        let rendered = render_slide(&slide, &SlideContext::new(theme, &style, 0, Language::En));

        assert!(matches!(rendered.ops.ops[0], RenderOp::Picture(_)));
        assert!(matches!(rendered.ops.ops[1], RenderOp::Shape(ref s) if s.fill.unwrap().opacity == 50));
        assert!(matches!(rendered.ops.ops[2], RenderOp::Shape(ref s) if s.fill.unwrap().color == theme.accent));
        assert!(matches!(rendered.ops.ops[3], RenderOp::Text(_)));
    }

    #[test]
    fn test_deck_fonts_follow_family() {
        let standard = render(&deck(1), ThemeKey::Corporate, 0);
        assert_eq!(standard.fonts.title, "Arial");
        let premium = render(&deck(1), ThemeKey::DoingsPro, 0);
        assert_eq!(premium.fonts.title, "Arial Black");
        assert_eq!(premium.fonts.body, "Arial");
    }

    #[test]
    fn test_cancelled_render_fails() {
        let token = CancellationToken::new();
        token.cancel();
        let style = StyleConfig::default();
        let theme = builtin(ThemeKey::Doings).unwrap();
        let err = render_deck(&deck(3), theme, &style, Language::En, 0, Some(&token)).unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }
}
