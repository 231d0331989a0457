//! Render operations: the positioned draw primitives a layout produces.
//!
//! Positions and sizes are in EMUs (English Metric Units, 914400 per inch).
//! Layout code works in inches through [`Frame::inches`].

use crate::theme::Color;

pub const EMU_PER_INCH: i64 = 914_400;

/// Canvas width: 10 inches.
pub const CANVAS_WIDTH: i64 = 9_144_000;

/// Canvas height: 5.625 inches (16:9).
pub const CANVAS_HEIGHT: i64 = 5_143_500;

pub const CANVAS_WIDTH_IN: f64 = 10.0;
pub const CANVAS_HEIGHT_IN: f64 = 5.625;

/// Convert inches to EMUs.
pub fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH as f64).round() as i64
}

/// An axis-aligned box on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Frame {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn inches(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(emu(x), emu(y), emu(width), emu(height))
    }

    /// The full canvas.
    pub fn canvas() -> Self {
        Self::new(0, 0, CANVAS_WIDTH, CANVAS_HEIGHT)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// A run of text with optional overrides of the box defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub color: Option<Color>,
    pub bold: Option<bool>,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            bold: None,
        }
    }

    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            color: Some(color),
            ..Self::new(text)
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub spans: Vec<Span>,
    /// Bullet glyph color; `None` means no bullet.
    pub bullet: Option<Color>,
}

/// A positioned text box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub frame: Frame,
    pub paragraphs: Vec<Paragraph>,
    pub font_face: String,
    /// Points.
    pub font_size: f64,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub align: Align,
    pub valign: VAlign,
    /// Fixed line spacing in points.
    pub line_spacing: Option<f64>,
    /// Space after each paragraph in points.
    pub space_after: Option<f64>,
}

impl TextBox {
    /// A text box whose newlines start new paragraphs.
    pub fn new(frame: Frame, text: impl Into<String>) -> Self {
        Self::spans(frame, vec![Span::new(text)])
    }

    /// A text box from styled spans. A newline inside a span ends the
    /// current paragraph.
    pub fn spans(frame: Frame, spans: Vec<Span>) -> Self {
        let mut paragraphs = vec![Paragraph {
            spans: Vec::new(),
            bullet: None,
        }];

        for span in spans {
            for (i, piece) in span.text.split('\n').enumerate() {
                if i > 0 {
                    paragraphs.push(Paragraph {
                        spans: Vec::new(),
                        bullet: None,
                    });
                }
                if !piece.is_empty() {
                    if let Some(current) = paragraphs.last_mut() {
                        current.spans.push(Span {
                            text: piece.to_string(),
                            ..span.clone()
                        });
                    }
                }
            }
        }

        Self::from_paragraphs(frame, paragraphs)
    }

    /// One bulleted paragraph per item.
    pub fn bullets(frame: Frame, items: &[String], bullet: Color) -> Self {
        let paragraphs = items
            .iter()
            .map(|item| Paragraph {
                spans: vec![Span::new(item.as_str())],
                bullet: Some(bullet),
            })
            .collect();
        Self::from_paragraphs(frame, paragraphs)
    }

    fn from_paragraphs(frame: Frame, paragraphs: Vec<Paragraph>) -> Self {
        Self {
            frame,
            paragraphs,
            font_face: "Arial".to_string(),
            font_size: 18.0,
            color: Color::WHITE,
            bold: false,
            italic: false,
            align: Align::Left,
            valign: VAlign::Top,
            line_spacing: None,
            space_after: None,
        }
    }

    pub fn size(mut self, points: f64) -> Self {
        self.font_size = points;
        self
    }

    pub fn font(mut self, face: &str) -> Self {
        self.font_face = face.to_string();
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn valign(mut self, valign: VAlign) -> Self {
        self.valign = valign;
        self
    }

    pub fn line_spacing(mut self, points: f64) -> Self {
        self.line_spacing = Some(points);
        self
    }

    pub fn space_after(mut self, points: f64) -> Self {
        self.space_after = Some(points);
        self
    }

    /// Plain text content, paragraphs joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.spans.iter().map(|s| s.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rect,
    RoundRect,
    Ellipse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub color: Color,
    /// Opacity in percent, 100 is fully opaque.
    pub opacity: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dash {
    Solid,
    Dash,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub color: Color,
    /// Points.
    pub width: f64,
    pub dash: Dash,
}

/// A filled and/or outlined geometric shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub frame: Frame,
    pub fill: Option<Fill>,
    pub outline: Option<Outline>,
}

impl Shape {
    fn of(kind: ShapeKind, frame: Frame) -> Self {
        Self {
            kind,
            frame,
            fill: None,
            outline: None,
        }
    }

    pub fn rect(frame: Frame) -> Self {
        Self::of(ShapeKind::Rect, frame)
    }

    pub fn round_rect(frame: Frame) -> Self {
        Self::of(ShapeKind::RoundRect, frame)
    }

    pub fn ellipse(frame: Frame) -> Self {
        Self::of(ShapeKind::Ellipse, frame)
    }

    pub fn fill(self, color: Color) -> Self {
        self.translucent(color, 100)
    }

    pub fn translucent(mut self, color: Color, opacity: u8) -> Self {
        self.fill = Some(Fill {
            color,
            opacity: opacity.min(100),
        });
        self
    }

    pub fn outline(mut self, color: Color, width: f64) -> Self {
        self.outline = Some(Outline {
            color,
            width,
            dash: Dash::Solid,
        });
        self
    }

    pub fn dashed(mut self) -> Self {
        if let Some(outline) = self.outline.as_mut() {
            outline.dash = Dash::Dash;
        }
        self
    }
}

/// Raster formats the package can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }
}

/// Source cropping in thousandths of a percent (100000 = whole edge).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Crop {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// An embedded raster image.
#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    pub frame: Frame,
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub crop: Crop,
    pub description: String,
}

/// Slide background fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Solid(Color),
    /// Top-to-bottom linear gradient.
    Gradient { from: Color, to: Color },
}

impl Background {
    /// The dominant tone, used for overlays that must blend with it.
    pub fn base_color(&self) -> Color {
        match self {
            Self::Solid(color) => *color,
            Self::Gradient { from, .. } => *from,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    Text(TextBox),
    Shape(Shape),
    Picture(Picture),
}

impl From<TextBox> for RenderOp {
    fn from(text: TextBox) -> Self {
        Self::Text(text)
    }
}

impl From<Shape> for RenderOp {
    fn from(shape: Shape) -> Self {
        Self::Shape(shape)
    }
}

impl From<Picture> for RenderOp {
    fn from(picture: Picture) -> Self {
        Self::Picture(picture)
    }
}

/// The rendered form of one slide: a background and draw primitives in
/// painting order (first is bottom-most).
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOps {
    pub background: Background,
    pub ops: Vec<RenderOp>,
}

impl RenderOps {
    pub fn new(background: Background) -> Self {
        Self {
            background,
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: impl Into<RenderOp>) {
        self.ops.push(op.into());
    }

    /// Insert primitives beneath everything drawn so far.
    pub fn underlay(&mut self, ops: Vec<RenderOp>) {
        self.ops.splice(0..0, ops);
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextBox> {
        self.ops.iter().filter_map(|op| match op {
            RenderOp::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.ops.iter().filter_map(|op| match op {
            RenderOp::Shape(shape) => Some(shape),
            _ => None,
        })
    }

    pub fn pictures(&self) -> impl Iterator<Item = &Picture> {
        self.ops.iter().filter_map(|op| match op {
            RenderOp::Picture(picture) => Some(picture),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emu_conversion() {
        assert_eq!(emu(1.0), EMU_PER_INCH);
        assert_eq!(emu(CANVAS_WIDTH_IN), CANVAS_WIDTH);
        assert_eq!(emu(CANVAS_HEIGHT_IN), CANVAS_HEIGHT);
        assert_eq!(emu(0.08), 73_152);
    }

    #[test]
    fn test_spans_split_paragraphs_on_newline() {
        let text = TextBox::spans(
            Frame::inches(0.0, 0.0, 1.0, 1.0),
            vec![
                Span::colored("FIRST HALF\n", Color::WHITE),
                Span::colored("SECOND", Color::BLACK),
            ],
        );
        assert_eq!(text.paragraphs.len(), 2);
        assert_eq!(text.paragraphs[0].spans[0].text, "FIRST HALF");
        assert_eq!(text.paragraphs[1].spans[0].color, Some(Color::BLACK));
        assert_eq!(text.text(), "FIRST HALF\nSECOND");
    }

    #[test]
    fn test_bullets() {
        let items = vec!["One".to_string(), "Two".to_string()];
        let text = TextBox::bullets(Frame::canvas(), &items, Color::WHITE);
        assert_eq!(text.paragraphs.len(), 2);
        assert!(text.paragraphs.iter().all(|p| p.bullet == Some(Color::WHITE)));
    }

    #[test]
    fn test_underlay_goes_first() {
        let mut ops = RenderOps::new(Background::Solid(Color::BLACK));
        ops.push(TextBox::new(Frame::canvas(), "Top"));
        ops.underlay(vec![Shape::rect(Frame::canvas()).fill(Color::WHITE).into()]);
        assert!(matches!(ops.ops[0], RenderOp::Shape(_)));
        assert!(matches!(ops.ops[1], RenderOp::Text(_)));
    }
}
