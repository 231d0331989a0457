//! Image compositing: attached pictures and their legibility scrim.

use crate::error::{Error, Result};
use crate::render::{
    Crop, Frame, ImageFormat, Picture, RenderOp, RenderOps, Shape, CANVAS_HEIGHT, CANVAS_WIDTH,
};
use crate::types::SlideImage;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Opacity of the scrim over attached images, in percent.
pub const SCRIM_OPACITY: u8 = 50;

/// A decoded image ready for embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub data: Vec<u8>,
    pub format: ImageFormat,
    pub width: usize,
    pub height: usize,
}

/// Region covered by attached images: the right half, full height.
pub fn image_region() -> Frame {
    Frame::new(CANVAS_WIDTH / 2, 0, CANVAS_WIDTH / 2, CANVAS_HEIGHT)
}

/// Decode a base64 payload and sniff its format from the bytes.
///
/// The declared MIME type is advisory only; the header decides.
pub fn decode_image(image: &SlideImage) -> Result<DecodedImage> {
    let payload: String = image.data.chars().filter(|c| !c.is_whitespace()).collect();
    let data = BASE64
        .decode(payload.as_bytes())
        .map_err(|e| Error::Image(format!("Invalid base64 image data: {}", e)))?;

    let format = match imagesize::image_type(&data) {
        Ok(imagesize::ImageType::Png) => ImageFormat::Png,
        Ok(imagesize::ImageType::Jpeg) => ImageFormat::Jpeg,
        Ok(imagesize::ImageType::Gif) => ImageFormat::Gif,
        Ok(imagesize::ImageType::Bmp) => ImageFormat::Bmp,
        Ok(other) => {
            return Err(Error::Image(format!("Unsupported image type: {:?}", other)));
        }
        Err(e) => return Err(Error::Image(format!("Unrecognised image data: {:?}", e))),
    };

    let size = imagesize::blob_size(&data)
        .map_err(|e| Error::Image(format!("Failed to read image size: {:?}", e)))?;
    if size.width == 0 || size.height == 0 {
        return Err(Error::Image("Image has zero size".to_string()));
    }

    if let Some(declared) = &image.mime_type {
        if declared != format.content_type() {
            log::debug!(
                "Image declared as '{}' but looks like '{}'",
                declared,
                format.content_type()
            );
        }
    }

    Ok(DecodedImage {
        data,
        format,
        width: size.width,
        height: size.height,
    })
}

/// Source crop that fills `frame` with an image of the given size without
/// distortion, trimming equally from both overflowing edges.
pub fn cover_crop(width: usize, height: usize, frame: Frame) -> Crop {
    if width == 0 || height == 0 || frame.width <= 0 || frame.height <= 0 {
        return Crop::default();
    }

    let image_aspect = width as f64 / height as f64;
    let frame_aspect = frame.width as f64 / frame.height as f64;

    if image_aspect > frame_aspect {
        let trim = ((1.0 - frame_aspect / image_aspect) / 2.0 * 100_000.0).round() as u32;
        Crop {
            left: trim,
            right: trim,
            ..Crop::default()
        }
    } else {
        let trim = ((1.0 - image_aspect / frame_aspect) / 2.0 * 100_000.0).round() as u32;
        Crop {
            top: trim,
            bottom: trim,
            ..Crop::default()
        }
    }
}

/// Place a slide's image beneath everything already drawn, with a scrim in
/// the slide's background tone over it.
///
/// Paint order afterwards is image, scrim, then the original primitives. A
/// payload that fails to decode is logged and the slide is returned as is.
pub fn composite(mut ops: RenderOps, image: Option<&SlideImage>, description: &str) -> RenderOps {
    let Some(image) = image else {
        return ops;
    };

    let decoded = match decode_image(image) {
        Ok(decoded) => decoded,
        Err(e) => {
            log::warn!("Skipping image on slide '{}': {}", description, e);
            return ops;
        }
    };

    let region = image_region();
    let picture = Picture {
        frame: region,
        crop: cover_crop(decoded.width, decoded.height, region),
        data: decoded.data,
        format: decoded.format,
        description: description.to_string(),
    };
    let scrim = Shape::rect(region).translucent(ops.background.base_color(), SCRIM_OPACITY);

    ops.underlay(vec![RenderOp::Picture(picture), RenderOp::Shape(scrim)]);
    ops
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::render::{Background, TextBox};
    use crate::theme::Color;

    /// A 1x1 transparent PNG.
    pub(crate) const PIXEL_PNG: &str =
        "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn slide_ops() -> RenderOps {
        let mut ops = RenderOps::new(Background::Solid(Color::from_u32(0x0D0D14)));
        ops.push(TextBox::new(Frame::canvas(), "Headline"));
        ops
    }

    #[test]
    fn test_decode_png() {
        let decoded = decode_image(&SlideImage::new(PIXEL_PNG, Some("image/png"))).unwrap();
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!((decoded.width, decoded.height), (1, 1));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_image(&SlideImage::new("not base64!!", None)).unwrap_err();
        assert!(matches!(err, Error::Image(_)));

        let text = BASE64.encode(b"plain text, not an image");
        assert!(decode_image(&SlideImage::new(text, None)).is_err());
    }

    #[test]
    fn test_image_under_scrim_under_text() {
        let image = SlideImage::new(PIXEL_PNG, Some("image/png"));
        let ops = composite(slide_ops(), Some(&image), "slide-1");

        assert_eq!(ops.len(), 3);
        let RenderOp::Picture(picture) = &ops.ops[0] else {
            panic!("image must be painted first");
        };
        let RenderOp::Shape(scrim) = &ops.ops[1] else {
            panic!("scrim must follow the image");
        };
        assert!(matches!(ops.ops[2], RenderOp::Text(_)));

        assert_eq!(picture.frame, scrim.frame);
        assert_eq!(picture.frame, image_region());
        let fill = scrim.fill.unwrap();
        assert_eq!(fill.color, Color::from_u32(0x0D0D14));
        assert_eq!(fill.opacity, SCRIM_OPACITY);
    }

    #[test]
    fn test_corrupt_image_is_skipped() {
        let image = SlideImage::new("@@@@", None);
        let ops = composite(slide_ops(), Some(&image), "slide-1");
        assert_eq!(ops, slide_ops());
    }

    #[test]
    fn test_no_image_is_identity() {
        assert_eq!(composite(slide_ops(), None, "slide-1"), slide_ops());
    }

    #[test]
    fn test_cover_crop() {
        let region = image_region();

        let tall = cover_crop(100, 200, region);
        assert_eq!((tall.left, tall.right), (0, 0));
        assert!(tall.top > 0 && tall.top == tall.bottom);

        let wide = cover_crop(1600, 900, region);
        assert_eq!((wide.top, wide.bottom), (0, 0));
        assert!(wide.left > 20_000 && wide.left == wide.right);

        let exact = cover_crop(4572, 5144, region);
        assert!(exact.left < 100 && exact.top < 100);
    }
}
