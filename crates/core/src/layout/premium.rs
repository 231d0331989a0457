//! Premium layout family, used by the `doings-pro` theme.
//!
//! Every slide gets a thin accent sidebar on its left edge, uppercase
//! "Arial Black" headlines and a category caption. Backgrounds always
//! alternate between the theme's two dark tones regardless of the style's
//! background mode.

use super::{alternate, LayoutFamily, LayoutStrategy, SlideContext};
use crate::normalize::{split_two_tone, step_number, truncate_with_ellipsis};
use crate::render::{
    Align, Background, Frame, RenderOps, Shape, Span, TextBox, VAlign, CANVAS_HEIGHT_IN,
    CANVAS_WIDTH_IN,
};
use crate::theme::{Color, Theme};
use crate::types::{Column, FontPair, Slide, SlideBody, StyleConfig, TimelineStep};

const HEADLINE_FONT: &str = "Arial Black";

const MAX_LIST_STEPS: usize = 4;
const MAX_TIMELINE_STEPS: usize = 5;

const INSIGHT_BUDGET: usize = 100;
const TAKEAWAY_BUDGET: usize = 150;

const SIDEBAR_WIDTH: f64 = 0.08;

/// Layout rules for the premium theme.
#[derive(Debug, Clone, Copy, Default)]
pub struct PremiumLayout;

impl PremiumLayout {
    /// Fixed colors of the list step boxes, in order.
    fn step_colors(theme: &Theme) -> [Color; 4] {
        [theme.primary, theme.secondary, theme.accent, theme.contrast]
    }
}

struct Canvas<'c, 'a> {
    ctx: &'c SlideContext<'a>,
    ops: RenderOps,
    background: Color,
    accent: Color,
    secondary_accent: Color,
}

impl LayoutStrategy for PremiumLayout {
    fn family(&self) -> LayoutFamily {
        LayoutFamily::Premium
    }

    fn accent_rotation(&self, theme: &Theme) -> Vec<Color> {
        vec![theme.primary, theme.secondary, theme.contrast, theme.accent]
    }

    fn fonts(&self, style: &StyleConfig) -> FontPair {
        FontPair {
            title: HEADLINE_FONT,
            ..style.font_family.fonts()
        }
    }

    fn background(&self, ctx: &SlideContext<'_>) -> Background {
        Background::Solid(alternate(
            ctx.index,
            ctx.theme.background_dark,
            ctx.theme.background_alt,
        ))
    }

    fn layout(&self, slide: &Slide, ctx: &SlideContext<'_>) -> RenderOps {
        let background = self.background(ctx);
        let mut canvas = Canvas {
            ctx,
            ops: RenderOps::new(background),
            background: background.base_color(),
            accent: self.accent(ctx),
            secondary_accent: self.secondary_accent(ctx),
        };

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

    fn body_font(&self) -> &'static str {
        self.ctx.fonts().body
    }

    fn sidebar(&mut self) {
        let bar = Shape::rect(Frame::inches(0.0, 0.0, SIDEBAR_WIDTH, CANVAS_HEIGHT_IN))
            .fill(self.accent);
        self.ops.push(bar);
    }

    fn caption(&mut self, frame: Frame, text: &str, color: Color) {
        let caption = TextBox::new(frame, text)
            .size(11.0)
            .color(color)
            .font(self.body_font());
        self.ops.push(caption);
    }

    /// Uppercase headline in two color spans.
    fn two_tone(&self, frame: Frame, title: &str, first: Color, second: Color, stacked: bool) -> TextBox {
        let (head, tail) = split_two_tone(title);
        let separator = if stacked { "\n" } else { " " };
        let mut spans = vec![Span::colored(head.to_uppercase(), first)];
        if !tail.is_empty() {
            spans[0].text.push_str(separator);
            spans.push(Span::colored(tail.to_uppercase(), second));
        }
        TextBox::spans(frame, spans)
            .font(HEADLINE_FONT)
            .bold()
            .color(first)
    }

    fn notes_excerpt(&self, slide: &Slide, budget: usize, fallback: &str) -> String {
        let notes = slide.speaker_notes.trim();
        if notes.is_empty() {
            fallback.to_string()
        } else {
            truncate_with_ellipsis(notes, budget)
        }
    }

    fn statement(&mut self, slide: &Slide) {
        self.sidebar();

        let theme = self.theme().clone();
        let labels = self.ctx.labels();

        self.caption(
            Frame::inches(0.8, 0.5, 8.0, 0.3),
            &slide.kind().as_str().to_uppercase(),
            self.accent,
        );

        let headline = self
            .two_tone(
                Frame::inches(0.8, 0.85, 8.0, 1.2),
                &slide.title,
                theme.text_light,
                self.accent,
                true,
            )
            .size(38.0)
            .line_spacing(40.0);
        self.ops.push(headline);

        if let Some(subtitle) = &slide.subtitle {
            self.ops.push(
                Shape::rect(Frame::inches(0.8, 2.2, 5.0, 2.3))
                    .fill(theme.surface)
                    .outline(theme.soft_accent, 2.0),
            );
            self.ops.push(
                TextBox::new(Frame::inches(1.0, 2.4, 4.6, 1.8), format!("\"{}\"", subtitle))
                    .size(16.0)
                    .color(theme.text_light)
                    .font(self.body_font())
                    .italic(),
            );
        }

        self.caption(
            Frame::inches(6.2, 2.2, 3.0, 0.3),
            labels.insight,
            self.secondary_accent,
        );
        let insight = self.notes_excerpt(slide, INSIGHT_BUDGET, labels.insight_fallback);
        self.ops.push(
            TextBox::new(Frame::inches(6.2, 2.6, 3.0, 1.0), insight)
                .size(14.0)
                .color(theme.text_subtle)
                .font(self.body_font()),
        );

        self.ops.push(
            Shape::rect(Frame::inches(6.2, 3.8, 3.0, 0.9))
                .fill(theme.background_dark)
                .outline(theme.border, 1.0),
        );
        self.ops.push(
            TextBox::new(Frame::inches(6.4, 3.9, 2.6, 0.3), labels.aha_moment)
                .size(11.0)
                .color(theme.secondary)
                .font(self.body_font())
                .bold(),
        );
        self.ops.push(
            TextBox::new(Frame::inches(6.4, 4.2, 2.6, 0.4), labels.aha_prompt)
                .size(12.0)
                .color(theme.text_muted)
                .font(self.body_font()),
        );

        self.ops
            .push(Shape::rect(Frame::inches(8.5, 4.5, 1.0, 0.08)).fill(theme.secondary));
        self.ops
            .push(Shape::rect(Frame::inches(8.7, 4.65, 0.8, 0.08)).fill(theme.accent));
    }

    fn story(&mut self, slide: &Slide, quote: Option<&str>, attribution: Option<&str>) {
        self.sidebar();

        let theme = self.theme().clone();
        let labels = self.ctx.labels();

        self.caption(Frame::inches(0.8, 0.4, 8.0, 0.3), labels.story, self.accent);
        self.ops.push(
            TextBox::new(Frame::inches(0.8, 0.75, 9.0, 0.6), slide.title.to_uppercase())
                .size(34.0)
                .color(theme.secondary)
                .font(HEADLINE_FONT)
                .bold(),
        );

        self.ops
            .push(Shape::rect(Frame::inches(0.4, 1.5, 5.8, 3.8)).fill(theme.surface));

        let quote = quote
            .or(slide.subtitle.as_deref())
            .unwrap_or(slide.title.as_str());
        self.ops.push(
            TextBox::spans(
                Frame::inches(0.6, 1.65, 5.4, 2.5),
                vec![
                    Span::colored("\u{201C}", self.accent).bold(),
                    Span::new(format!("{}\u{201D}", quote)),
                ],
            )
            .size(16.0)
            .color(theme.text_light)
            .font(self.body_font())
            .italic(),
        );

        if let Some(attribution) = attribution {
            self.ops.push(
                TextBox::new(Frame::inches(0.6, 4.8, 5.4, 0.3), format!("— {}", attribution))
                    .size(11.0)
                    .color(theme.text_muted)
                    .font(self.body_font()),
            );
        }

        self.ops.push(
            Shape::rect(Frame::inches(6.5, 1.5, 3.2, 2.5))
                .fill(theme.background_dark)
                .outline(self.accent, 2.0),
        );
        self.caption(Frame::inches(6.7, 1.65, 2.8, 0.3), labels.takeaway, self.accent);
        let takeaway = self.notes_excerpt(slide, TAKEAWAY_BUDGET, labels.takeaway_fallback);
        self.ops.push(
            TextBox::new(Frame::inches(6.7, 2.05, 2.8, 1.8), takeaway)
                .size(13.0)
                .color(theme.text_subtle)
                .font(self.body_font()),
        );

        self.ops.push(
            Shape::rect(Frame::inches(6.5, 4.2, 3.2, 0.8))
                .fill(theme.background_dark)
                .outline(theme.soft_accent, 2.0)
                .dashed(),
        );
        self.ops.push(
            TextBox::new(Frame::inches(6.5, 4.35, 3.2, 0.5), labels.resonate)
                .size(12.0)
                .color(theme.soft_accent)
                .font(self.body_font())
                .align(Align::Center),
        );
    }

    fn list(&mut self, slide: &Slide, items: &[String]) {
        self.sidebar();

        let theme = self.theme().clone();
        let labels = self.ctx.labels();

        self.caption(Frame::inches(0.8, 0.35, 8.0, 0.25), labels.key_points, self.accent);
        let headline = self
            .two_tone(
                Frame::inches(0.8, 0.65, 9.0, 0.55),
                &slide.title,
                theme.text_light,
                theme.primary,
                false,
            )
            .size(36.0);
        self.ops.push(headline);

        let colors = PremiumLayout::step_colors(&theme);
        let (width, gap, height, top) = (2.15, 0.2, 3.5, 1.4);

        for (i, item) in items.iter().take(MAX_LIST_STEPS).enumerate() {
            let x = 0.5 + i as f64 * (width + gap);
            let color = colors[i];

            self.ops
                .push(Shape::rect(Frame::inches(x, top, width, height)).fill(theme.surface));
            self.ops
                .push(Shape::rect(Frame::inches(x, top, width, 0.04)).fill(color));
            self.ops.push(
                TextBox::new(Frame::inches(x + 0.15, top + 0.2, 1.8, 0.6), step_number(i))
                    .size(38.0)
                    .color(color)
                    .font(HEADLINE_FONT),
            );
            self.ops.push(
                TextBox::new(
                    Frame::inches(x + 0.15, top + 0.85, 1.85, 0.4),
                    format!("{} {}", labels.step, i + 1).to_uppercase(),
                )
                .size(13.0)
                .color(theme.text_light)
                .font(self.body_font())
                .bold(),
            );
            self.ops.push(
                TextBox::new(Frame::inches(x + 0.15, top + 1.3, 1.85, 2.0), item.as_str())
                    .size(11.0)
                    .color(theme.text_muted)
                    .font(self.body_font()),
            );
        }

        if items.len() > MAX_LIST_STEPS {
            log::debug!(
                "Slide '{}': dropping {} list items beyond the first {}",
                slide.id,
                items.len() - MAX_LIST_STEPS,
                MAX_LIST_STEPS
            );
        }
    }

    fn comparison(&mut self, slide: &Slide, left: Option<&Column>, right: Option<&Column>) {
        let theme = self.theme().clone();
        let labels = self.ctx.labels();

        self.ops
            .push(Shape::rect(Frame::inches(0.0, 0.0, CANVAS_WIDTH_IN, 0.06)).fill(theme.accent));
        self.ops.push(
            Shape::rect(Frame::inches(0.0, CANVAS_HEIGHT_IN - 0.06, CANVAS_WIDTH_IN, 0.06))
                .fill(theme.accent),
        );

        self.ops.push(
            TextBox::new(Frame::inches(0.0, 0.2, CANVAS_WIDTH_IN, 0.3), labels.comparison)
                .size(11.0)
                .color(self.accent)
                .font(self.body_font())
                .align(Align::Center),
        );
        self.ops.push(
            TextBox::new(Frame::inches(0.0, 0.55, CANVAS_WIDTH_IN, 0.6), slide.title.to_uppercase())
                .size(36.0)
                .color(theme.primary)
                .font(HEADLINE_FONT)
                .bold()
                .align(Align::Center),
        );

        let mut top = 1.35;
        if let Some(subtitle) = &slide.subtitle {
            self.ops.push(
                Shape::rect(Frame::inches(1.5, top, 7.0, 0.9))
                    .fill(theme.surface)
                    .outline(theme.soft_accent, 3.0),
            );
            self.ops.push(
                TextBox::new(Frame::inches(1.7, top + 0.05, 6.6, 0.8), format!("\"{}\"", subtitle))
                    .size(20.0)
                    .color(theme.text_light)
                    .font(self.body_font())
                    .bold()
                    .align(Align::Center)
                    .valign(VAlign::Middle),
            );
            top += 1.05;
        }

        let height = 5.2 - top;
        self.comparison_column(0.8, top, height, left, labels.before, "70%+", theme.primary);
        self.comparison_column(5.3, top, height, right, labels.after, "0%", theme.contrast);

        self.ops.push(
            Shape::rect(Frame::inches(4.99, top + 0.2, 0.02, height - 0.4)).fill(theme.border),
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn comparison_column(
        &mut self,
        x: f64,
        top: f64,
        height: f64,
        column: Option<&Column>,
        placeholder: &str,
        numeral: &str,
        color: Color,
    ) {
        let theme = self.theme().clone();
        let title = column
            .map(|c| c.title.trim())
            .filter(|t| !t.is_empty())
            .unwrap_or(placeholder);

        self.ops
            .push(Shape::rect(Frame::inches(x, top, 3.9, height)).fill(theme.surface));
        self.ops.push(
            TextBox::new(Frame::inches(x + 0.2, top + 0.1, 1.6, 0.7), numeral)
                .size(32.0)
                .color(color)
                .font(HEADLINE_FONT)
                .valign(VAlign::Middle),
        );
        self.ops.push(
            TextBox::new(Frame::inches(x + 1.9, top + 0.2, 1.8, 0.5), title.to_uppercase())
                .size(16.0)
                .color(theme.text_light)
                .font(self.body_font())
                .bold()
                .valign(VAlign::Middle),
        );

        let items = column.map(|c| c.items.as_slice()).unwrap_or_default();
        if !items.is_empty() {
            self.ops.push(
                TextBox::bullets(Frame::inches(x + 0.2, top + 0.9, 3.5, height - 1.0), items, color)
                    .size(12.0)
                    .color(theme.text_subtle)
                    .font(self.body_font())
                    .space_after(6.0),
            );
        }
    }

    fn timeline(&mut self, slide: &Slide, steps: &[TimelineStep]) {
        let theme = self.theme().clone();
        let labels = self.ctx.labels();

        self.ops
            .push(Shape::rect(Frame::inches(0.0, 0.0, CANVAS_WIDTH_IN, 0.08)).fill(theme.primary));
        self.ops.push(
            TextBox::new(Frame::inches(0.0, 0.2, CANVAS_WIDTH_IN, 0.3), labels.timeline)
                .size(11.0)
                .color(self.accent)
                .font(self.body_font())
                .align(Align::Center),
        );
        self.ops.push(
            TextBox::new(Frame::inches(0.0, 0.5, CANVAS_WIDTH_IN, 0.7), slide.title.to_uppercase())
                .size(40.0)
                .color(theme.primary)
                .font(HEADLINE_FONT)
                .bold()
                .align(Align::Center),
        );

        if let Some(subtitle) = &slide.subtitle {
            self.ops.push(
                TextBox::new(Frame::inches(0.0, 1.2, CANVAS_WIDTH_IN, 0.4), subtitle.as_str())
                    .size(18.0)
                    .color(theme.accent)
                    .font(self.body_font())
                    .align(Align::Center),
            );
        }

        let steps = &steps[..steps.len().min(MAX_TIMELINE_STEPS)];
        if steps.is_empty() {
            return;
        }

        let rotation = [theme.primary, theme.secondary, theme.contrast, theme.accent];
        let count = steps.len() as f64;
        let step_width = 8.5 / count;
        let start_x = 0.75;

        self.ops.push(
            Shape::rect(Frame::inches(
                start_x + step_width / 2.0,
                2.2,
                step_width * (count - 1.0),
                0.04,
            ))
            .fill(theme.border),
        );

        for (i, step) in steps.iter().enumerate() {
            let x = start_x + i as f64 * step_width;
            let color = rotation[i % rotation.len()];
            let marker = Frame::inches(x + step_width / 2.0 - 0.3, 1.92, 0.6, 0.6);

            self.ops.push(Shape::ellipse(marker).fill(color));
            self.ops.push(
                TextBox::new(marker, step_number(i))
                    .size(14.0)
                    .color(self.background)
                    .font(HEADLINE_FONT)
                    .align(Align::Center)
                    .valign(VAlign::Middle),
            );

            let card = Frame::inches(x + 0.05, 2.75, step_width - 0.1, 2.4);
            self.ops.push(Shape::rect(card).fill(theme.surface));
            self.ops.push(
                Shape::rect(Frame::inches(x + 0.05, 2.75, step_width - 0.1, 0.04)).fill(color),
            );
            self.ops.push(
                TextBox::new(
                    Frame::inches(x + 0.15, 2.9, step_width - 0.3, 0.5),
                    step.title.to_uppercase(),
                )
                .size(12.0)
                .color(theme.text_light)
                .font(self.body_font())
                .bold()
                .align(Align::Center),
            );
            if !step.description.trim().is_empty() {
                self.ops.push(
                    TextBox::new(
                        Frame::inches(x + 0.15, 3.45, step_width - 0.3, 1.6),
                        step.description.as_str(),
                    )
                    .size(11.0)
                    .color(theme.text_muted)
                    .font(self.body_font())
                    .align(Align::Center),
                );
            }
        }
    }

    fn cta(&mut self, slide: &Slide) {
        self.sidebar();

        let theme = self.theme().clone();
        let labels = self.ctx.labels();

        self.ops.push(
            Shape::rect(Frame::inches(
                CANVAS_WIDTH_IN - SIDEBAR_WIDTH,
                0.0,
                SIDEBAR_WIDTH,
                CANVAS_HEIGHT_IN,
            ))
            .fill(self.secondary_accent),
        );

        let headline = self
            .two_tone(
                Frame::inches(0.5, 0.4, 9.0, 1.2),
                &slide.title,
                self.accent,
                theme.text_light,
                true,
            )
            .size(38.0)
            .line_spacing(40.0);
        self.ops.push(headline);

        self.caption(
            Frame::inches(0.5, 1.75, 9.0, 0.3),
            labels.next_step,
            self.secondary_accent,
        );

        if let Some(subtitle) = &slide.subtitle {
            self.ops.push(
                Shape::rect(Frame::inches(0.5, 2.1, 9.0, 1.4))
                    .fill(theme.surface)
                    .outline(theme.soft_accent, 2.0),
            );
            self.ops.push(
                TextBox::new(Frame::inches(0.7, 2.2, 8.6, 1.2), subtitle.as_str())
                    .size(22.0)
                    .color(theme.text_light)
                    .font(self.body_font())
                    .bold()
                    .align(Align::Center)
                    .valign(VAlign::Middle),
            );
        }

        let badge = Frame::inches(3.5, 3.85, 3.0, 0.7);
        self.ops.push(Shape::round_rect(badge).fill(self.accent));
        self.ops.push(
            TextBox::new(badge, labels.take_action)
                .size(18.0)
                .color(self.background)
                .font(HEADLINE_FONT)
                .align(Align::Center)
                .valign(VAlign::Middle),
        );

        for (x, color) in [(1.0, theme.primary), (3.7, theme.secondary), (6.5, theme.contrast)] {
            self.ops
                .push(Shape::rect(Frame::inches(x, 5.0, 2.5, 0.03)).fill(color));
        }
    }
}
