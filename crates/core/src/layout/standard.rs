//! Standard layout family: `doings`, `corporate`, `bold` and `custom`.

use super::{alternate, LayoutFamily, LayoutStrategy, SlideContext};
use crate::render::{
    Align, Background, Frame, RenderOps, Shape, TextBox, VAlign, CANVAS_HEIGHT_IN,
};
use crate::theme::{Color, Theme};
use crate::types::{BackgroundMode, Column, Slide, SlideBody, TimelineStep};

const LIGHT_BACKGROUND: Color = Color::WHITE;
const LIGHT_BACKGROUND_ALT: Color = Color::from_u32(0xF4F5F7);
const LIGHT_TEXT: Color = Color::from_u32(0x1A1A2E);
const LIGHT_TEXT_MUTED: Color = Color::from_u32(0x666666);

const MAX_TIMELINE_STEPS: usize = 5;

/// Layout rules shared by every non-premium theme.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardLayout;

/// Text tones for the active background mode.
struct Tones {
    text: Color,
    muted: Color,
}

impl Tones {
    fn for_mode(theme: &Theme, mode: BackgroundMode) -> Self {
        match mode {
            BackgroundMode::Light => Self {
                text: LIGHT_TEXT,
                muted: LIGHT_TEXT_MUTED,
            },
            BackgroundMode::Dark | BackgroundMode::Gradient => Self {
                text: theme.text_light,
                muted: theme.text_muted,
            },
        }
    }
}

/// Per-slide drawing state.
struct Canvas<'c, 'a> {
    ctx: &'c SlideContext<'a>,
    ops: RenderOps,
    tones: Tones,
    accent: Color,
    secondary_accent: Color,
}

impl LayoutStrategy for StandardLayout {
    fn family(&self) -> LayoutFamily {
        LayoutFamily::Standard
    }

    fn accent_rotation(&self, theme: &Theme) -> Vec<Color> {
        vec![theme.accent, theme.secondary, theme.contrast]
    }

    fn background(&self, ctx: &SlideContext<'_>) -> Background {
        let theme = ctx.theme;
        match ctx.style.background_mode {
            BackgroundMode::Dark => Background::Solid(alternate(
                ctx.index,
                theme.background_dark,
                theme.background_alt,
            )),
            BackgroundMode::Light => Background::Solid(alternate(
                ctx.index,
                LIGHT_BACKGROUND,
                LIGHT_BACKGROUND_ALT,
            )),
            BackgroundMode::Gradient => {
                if ctx.index % 2 == 0 {
                    Background::Gradient {
                        from: theme.background_dark,
                        to: theme.background_alt,
                    }
                } else {
                    Background::Gradient {
                        from: theme.background_alt,
                        to: theme.background_dark,
                    }
                }
            }
        }
    }

    fn layout(&self, slide: &Slide, ctx: &SlideContext<'_>) -> RenderOps {
        let mut canvas = Canvas {
            ctx,
            ops: RenderOps::new(self.background(ctx)),
            tones: Tones::for_mode(ctx.theme, ctx.style.background_mode),
            accent: self.accent(ctx),
            secondary_accent: self.secondary_accent(ctx),
        };

        canvas.kind_tag(slide);

        match &slide.body {
            SlideBody::Statement => canvas.statement(slide),
            SlideBody::Story { quote, attribution } => {
                canvas.story(slide, quote.as_deref(), attribution.as_deref())
            }
            SlideBody::List { items } => canvas.list(slide, items),
            SlideBody::Comparison { left, right } => {
                canvas.comparison(slide, left.as_ref(), right.as_ref())
            }
            SlideBody::Timeline { steps } => canvas.timeline(slide, steps),
            SlideBody::Cta => canvas.cta(slide),
        }

        canvas.ops
    }
}

impl Canvas<'_, '_> {
    fn theme(&self) -> &Theme {
        self.ctx.theme
    }

    fn title_font(&self) -> &'static str {
        self.ctx.fonts().title
    }

    fn body_font(&self) -> &'static str {
        self.ctx.fonts().body
    }

    fn kind_tag(&mut self, slide: &Slide) {
        let tag = TextBox::new(
            Frame::inches(0.5, 0.3, 2.0, 0.3),
            slide.kind().as_str().to_uppercase(),
        )
        .size(10.0)
        .color(self.accent)
        .font(self.body_font())
        .bold();
        self.ops.push(tag);
    }

    /// Top-of-slide headline used by list, comparison and timeline.
    fn heading(&mut self, title: &str, align: Align) {
        let heading = TextBox::new(Frame::inches(0.5, 0.8, 9.0, 0.8), title)
            .size(36.0)
            .color(self.theme().primary)
            .font(self.title_font())
            .bold()
            .align(align);
        self.ops.push(heading);
    }

    fn statement(&mut self, slide: &Slide) {
        let title = TextBox::new(Frame::inches(0.5, 2.0, 9.0, 1.5), slide.title.as_str())
            .size(48.0)
            .color(self.theme().primary)
            .font(self.title_font())
            .bold()
            .align(Align::Center)
            .valign(VAlign::Middle);
        self.ops.push(title);

        if let Some(subtitle) = &slide.subtitle {
            let border = Frame::inches(1.5, 3.5, 7.0, 0.8);
            self.ops.push(Shape::rect(border).outline(self.theme().soft_accent, 1.5));

            let text = TextBox::new(border, subtitle.as_str())
                .size(24.0)
                .color(self.tones.muted)
                .font(self.body_font())
                .align(Align::Center)
                .valign(VAlign::Middle);
            self.ops.push(text);
        }
    }

    fn story(&mut self, slide: &Slide, quote: Option<&str>, attribution: Option<&str>) {
        let glyph = TextBox::new(Frame::inches(0.5, 1.2, 1.0, 1.0), "\u{201C}")
            .size(72.0)
            .color(self.accent)
            .font(self.title_font())
            .bold();
        self.ops.push(glyph);

        let quote = TextBox::new(
            Frame::inches(1.0, 1.8, 8.0, 2.0),
            quote.unwrap_or(slide.title.as_str()),
        )
        .size(28.0)
        .color(self.tones.text)
        .font(self.body_font())
        .italic()
        .align(Align::Center)
        .valign(VAlign::Middle);
        self.ops.push(quote);

        if let Some(attribution) = attribution {
            let line = TextBox::new(Frame::inches(1.0, 4.0, 8.0, 0.5), attribution)
                .size(18.0)
                .color(self.theme().secondary)
                .font(self.body_font())
                .align(Align::Center);
            self.ops.push(line);
        }
    }

    fn list(&mut self, slide: &Slide, items: &[String]) {
        self.heading(&slide.title, Align::Left);

        if items.is_empty() {
            return;
        }

        let bullets = TextBox::bullets(Frame::inches(0.8, 1.8, 8.4, 3.5), items, self.accent)
            .size(20.0)
            .color(self.tones.text)
            .font(self.body_font())
            .space_after(12.0);
        self.ops.push(bullets);
    }

    fn comparison(&mut self, slide: &Slide, left: Option<&Column>, right: Option<&Column>) {
        self.heading(&slide.title, Align::Center);

        let labels = self.ctx.labels();
        let secondary = self.theme().secondary;
        let contrast = self.theme().contrast;
        self.column(0.5, left, labels.before, secondary);
        self.column(5.25, right, labels.after, contrast);

        let divider = Shape::rect(Frame::inches(4.875, 1.8, 0.02, 3.0)).fill(self.tones.muted);
        self.ops.push(divider);
    }

    fn column(&mut self, x: f64, column: Option<&Column>, placeholder: &str, color: Color) {
        let title = column
            .map(|c| c.title.trim())
            .filter(|t| !t.is_empty())
            .unwrap_or(placeholder);

        let heading = TextBox::new(Frame::inches(x, 1.8, 4.25, 0.5), title)
            .size(24.0)
            .color(color)
            .font(self.title_font())
            .bold();
        self.ops.push(heading);

        let items = column.map(|c| c.items.as_slice()).unwrap_or_default();
        if items.is_empty() {
            return;
        }

        let bullets = TextBox::bullets(Frame::inches(x, 2.4, 4.25, 2.5), items, color)
            .size(16.0)
            .color(self.tones.text)
            .font(self.body_font())
            .space_after(8.0);
        self.ops.push(bullets);
    }

    fn timeline(&mut self, slide: &Slide, steps: &[TimelineStep]) {
        self.heading(&slide.title, Align::Center);

        let steps = &steps[..steps.len().min(MAX_TIMELINE_STEPS)];
        if steps.is_empty() {
            return;
        }

        let count = steps.len() as f64;
        let step_width = 8.5 / count;
        let start_x = 0.75;

        if steps.len() > 1 {
            let connector = Shape::rect(Frame::inches(
                start_x + step_width / 2.0,
                2.425,
                step_width * (count - 1.0),
                0.05,
            ))
            .fill(self.accent);
            self.ops.push(connector);
        }

        for (i, step) in steps.iter().enumerate() {
            let x = start_x + i as f64 * step_width;
            let marker = Frame::inches(x + step_width / 2.0 - 0.35, 2.1, 0.7, 0.7);

            self.ops.push(Shape::ellipse(marker).fill(self.accent));
            self.ops.push(
                TextBox::new(marker, (i + 1).to_string())
                    .size(20.0)
                    .color(Color::WHITE)
                    .font(self.title_font())
                    .bold()
                    .align(Align::Center)
                    .valign(VAlign::Middle),
            );

            self.ops.push(
                TextBox::new(Frame::inches(x, 3.0, step_width, 0.6), step.title.as_str())
                    .size(14.0)
                    .color(self.tones.text)
                    .font(self.title_font())
                    .bold()
                    .align(Align::Center),
            );

            if !step.description.trim().is_empty() {
                self.ops.push(
                    TextBox::new(
                        Frame::inches(x, 3.6, step_width, 1.0),
                        step.description.as_str(),
                    )
                    .size(11.0)
                    .color(self.tones.muted)
                    .font(self.body_font())
                    .align(Align::Center),
                );
            }
        }
    }

    fn cta(&mut self, slide: &Slide) {
        let sidebar = Shape::rect(Frame::inches(9.92, 0.0, 0.08, CANVAS_HEIGHT_IN))
            .fill(self.secondary_accent);
        self.ops.push(sidebar);

        let title = TextBox::new(Frame::inches(0.5, 1.5, 9.0, 1.2), slide.title.as_str())
            .size(48.0)
            .color(self.theme().primary)
            .font(self.title_font())
            .bold()
            .align(Align::Center)
            .valign(VAlign::Middle);
        self.ops.push(title);

        if let Some(subtitle) = &slide.subtitle {
            let text = TextBox::new(Frame::inches(0.5, 2.8, 9.0, 0.8), subtitle.as_str())
                .size(24.0)
                .color(self.tones.text)
                .font(self.body_font())
                .align(Align::Center);
            self.ops.push(text);
        }

        let badge = Frame::inches(3.5, 3.8, 3.0, 0.7);
        self.ops.push(Shape::round_rect(badge).fill(self.accent));
        self.ops.push(
            TextBox::new(badge, self.ctx.labels().take_action)
                .size(18.0)
                .color(Color::WHITE)
                .font(self.title_font())
                .bold()
                .align(Align::Center)
                .valign(VAlign::Middle),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Language;
    use crate::render::{emu, RenderOp};
    use crate::theme::{builtin, ThemeKey};
    use crate::types::StyleConfig;

    fn render(slide: &Slide, style: &StyleConfig, index: usize) -> RenderOps {
        let theme = builtin(ThemeKey::Doings).unwrap();
        let ctx = SlideContext::new(theme, style, index, Language::En);
        StandardLayout.layout(slide, &ctx)
    }

    fn texts(ops: &RenderOps) -> Vec<String> {
        ops.texts().map(TextBox::text).collect()
    }

    #[test]
    fn test_background_alternates_in_every_mode() {
        let theme = builtin(ThemeKey::Corporate).unwrap();
        for mode in [BackgroundMode::Dark, BackgroundMode::Light, BackgroundMode::Gradient] {
            let style = StyleConfig {
                background_mode: mode,
                ..StyleConfig::themed("corporate")
            };
            let bg = |i| StandardLayout.background(&SlideContext::new(theme, &style, i, Language::En));
            for i in 0..6 {
                assert_ne!(bg(i), bg(i + 1), "{:?} at {}", mode, i);
                assert_eq!(bg(i), bg(i + 2), "{:?} at {}", mode, i);
            }
        }
    }

    #[test]
    fn test_light_mode_uses_dark_text() {
        let style = StyleConfig {
            background_mode: BackgroundMode::Light,
            ..StyleConfig::default()
        };
        let slide = Slide::new("s", SlideBody::List { items: vec!["One".into()] }, "Points");
        let ops = render(&slide, &style, 0);
        let bullets = ops.texts().find(|t| t.text() == "One").unwrap();
        assert_eq!(bullets.color, LIGHT_TEXT);
        assert_eq!(ops.background, Background::Solid(Color::WHITE));
    }

    #[test]
    fn test_list_has_no_item_cap() {
        let items: Vec<String> = (1..=7).map(|i| format!("Item {}", i)).collect();
        let slide = Slide::new("s", SlideBody::List { items: items.clone() }, "Seven");
        let ops = render(&slide, &StyleConfig::default(), 0);
        let bullets = ops.texts().find(|t| t.paragraphs.len() == 7).unwrap();
        assert_eq!(bullets.text(), items.join("\n"));
    }

    #[test]
    fn test_comparison_defaults_column_titles() {
        let slide = Slide::new(
            "s",
            SlideBody::Comparison {
                left: None,
                right: Some(Column {
                    title: String::new(),
                    items: vec!["Fast".into()],
                }),
            },
            "Then and now",
        );
        let ops = render(&slide, &StyleConfig::default(), 0);
        let texts = texts(&ops);
        assert!(texts.contains(&"Before".to_string()));
        assert!(texts.contains(&"After".to_string()));
        assert!(texts.contains(&"Fast".to_string()));
    }

    #[test]
    fn test_timeline_caps_steps() {
        let steps: Vec<TimelineStep> = (1..=7)
            .map(|i| TimelineStep {
                title: format!("Step {}", i),
                description: String::new(),
            })
            .collect();
        let slide = Slide::new("s", SlideBody::Timeline { steps }, "Roadmap");
        let ops = render(&slide, &StyleConfig::default(), 0);

        let markers = ops
            .shapes()
            .filter(|s| s.kind == crate::render::ShapeKind::Ellipse)
            .count();
        assert_eq!(markers, MAX_TIMELINE_STEPS);
        assert!(!texts(&ops).contains(&"Step 6".to_string()));
    }

    fn timeline_slide(len: usize) -> Slide {
        let steps = (1..=len)
            .map(|i| TimelineStep {
                title: format!("Step {}", i),
                description: String::new(),
            })
            .collect();
        Slide::new("s", SlideBody::Timeline { steps }, "Roadmap")
    }

    #[test]
    fn test_timeline_connector_joins_end_markers() {
        let ops = render(&timeline_slide(3), &StyleConfig::default(), 0);
        let connector = ops
            .shapes()
            .find(|s| s.kind == crate::render::ShapeKind::Rect && s.frame.height == emu(0.05))
            .unwrap()
            .frame;
        let centers: Vec<i64> = ops
            .shapes()
            .filter(|s| s.kind == crate::render::ShapeKind::Ellipse)
            .map(|s| s.frame.x + s.frame.width / 2)
            .collect();

        assert_eq!(centers.len(), 3);
        assert!((connector.x - centers[0]).abs() <= 2);
        assert!((connector.x + connector.width - centers[2]).abs() <= 2);
    }

    #[test]
    fn test_single_step_timeline_has_no_connector() {
        let ops = render(&timeline_slide(1), &StyleConfig::default(), 0);
        assert!(!ops
            .shapes()
            .any(|s| s.kind == crate::render::ShapeKind::Rect && s.frame.height == emu(0.05)));
    }

    #[test]
    fn test_subtitle_text_stays_inside_border() {
        let slide = Slide::new("s", SlideBody::Statement, "Title").with_subtitle("A long subtitle line");
        let ops = render(&slide, &StyleConfig::default(), 0);
        let border = ops.shapes().find(|s| s.outline.is_some()).unwrap().frame;
        let text = ops.texts().find(|t| t.text() == "A long subtitle line").unwrap();
        assert_eq!(text.frame, border);
    }

    #[test]
    fn test_story_renders_attribution_verbatim() {
        let slide = Slide::new(
            "s",
            SlideBody::Story {
                quote: Some("Less is more.".into()),
                attribution: Some("A colleague".into()),
            },
            "A story",
        );
        let texts = texts(&render(&slide, &StyleConfig::default(), 1));
        assert!(texts.contains(&"Less is more.".to_string()));
        assert!(texts.contains(&"A colleague".to_string()));
    }

    #[test]
    fn test_cta_has_sidebar_and_badge() {
        let slide = Slide::new("s", SlideBody::Cta, "Start today").with_subtitle("Now");
        let ops = render(&slide, &StyleConfig::default(), 0);
        assert!(ops
            .shapes()
            .any(|s| s.kind == crate::render::ShapeKind::RoundRect));
        assert!(texts(&ops).contains(&"Take Action →".to_string()));
        assert!(matches!(ops.ops[0], RenderOp::Text(ref t) if t.text() == "CTA"));
    }
}
