//! Background decorations drawn beneath the layout.

use crate::render::{Frame, RenderOp, Shape, CANVAS_HEIGHT_IN, CANVAS_WIDTH_IN};
use crate::theme::Color;
use crate::types::BackgroundDecoration;

/// Shapes for a decoration in the slide's accent color, bottom-most first.
pub fn decoration_ops(decoration: BackgroundDecoration, accent: Color) -> Vec<RenderOp> {
    match decoration {
        BackgroundDecoration::Stripe => vec![Shape::rect(Frame::inches(
            0.0,
            CANVAS_HEIGHT_IN - 0.06,
            CANVAS_WIDTH_IN,
            0.06,
        ))
        .fill(accent)
        .into()],
        BackgroundDecoration::Dots => (0..5)
            .map(|i| {
                let x = CANVAS_WIDTH_IN - 1.5 + i as f64 * 0.22;
                Shape::ellipse(Frame::inches(x, 0.3, 0.1, 0.1))
                    .translucent(accent, 100 - i as u8 * 15)
                    .into()
            })
            .collect(),
        BackgroundDecoration::Rings => vec![
            Shape::ellipse(Frame::inches(8.2, 3.9, 1.6, 1.6))
                .outline(accent, 1.5)
                .into(),
            Shape::ellipse(Frame::inches(8.6, 4.3, 0.8, 0.8))
                .outline(accent, 1.0)
                .into(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ShapeKind;

    fn shapes(ops: &[RenderOp]) -> Vec<&Shape> {
        ops.iter()
            .filter_map(|op| match op {
                RenderOp::Shape(shape) => Some(shape),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_stripe_spans_canvas_width() {
        let ops = decoration_ops(BackgroundDecoration::Stripe, Color::WHITE);
        let shapes = shapes(&ops);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].frame.width, crate::render::CANVAS_WIDTH);
    }

    #[test]
    fn test_dots_fade_out() {
        let ops = decoration_ops(BackgroundDecoration::Dots, Color::WHITE);
        let opacities: Vec<u8> = shapes(&ops)
            .iter()
            .map(|s| s.fill.unwrap().opacity)
            .collect();
        assert_eq!(opacities, vec![100, 85, 70, 55, 40]);
    }

    #[test]
    fn test_rings_are_outlines() {
        let ops = decoration_ops(BackgroundDecoration::Rings, Color::BLACK);
        assert!(shapes(&ops)
            .iter()
            .all(|s| s.kind == ShapeKind::Ellipse && s.fill.is_none() && s.outline.is_some()));
    }
}
