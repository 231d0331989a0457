//! PresentationML for individual slides and their notes pages.

use crate::parts::{Relationship, REL_IMAGE, REL_NOTES_MASTER, REL_NOTES_SLIDE, REL_SLIDE, REL_SLIDE_LAYOUT};
use crate::xml::{XmlWriter, PML_NAMESPACES};
use deck_core::render::{
    Align, Background, Dash, Frame, Paragraph, Picture, Shape, ShapeKind, TextBox, VAlign,
};
use deck_core::{RenderOp, RenderedSlide, Result};

/// A picture waiting to be stored under `ppt/media/`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MediaEntry {
    /// Path inside the package, e.g. `ppt/media/image1.png`.
    pub path: String,
    pub data: Vec<u8>,
}

/// The XML and relationships of one slide.
pub(crate) struct SlidePart {
    pub xml: Vec<u8>,
    pub rels: Vec<Relationship>,
    pub media: Vec<MediaEntry>,
}

/// Serialize a rendered slide. `number` is the 1-based slide number and
/// `media_offset` the count of images already stored in the package.
pub(crate) fn slide_part(slide: &RenderedSlide, number: usize, media_offset: usize) -> Result<SlidePart> {
    let mut rels = vec![
        Relationship::new(1, REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
        Relationship::new(2, REL_NOTES_SLIDE, format!("../notesSlides/notesSlide{}.xml", number)),
    ];
    let mut media = Vec::new();

    let mut w = XmlWriter::new()?;
    w.start("p:sld", &PML_NAMESPACES)?;
    w.start("p:cSld", &[])?;
    write_background(&mut w, &slide.ops.background)?;
    w.start("p:spTree", &[])?;
    write_group_properties(&mut w)?;

    for (idx, op) in slide.ops.ops.iter().enumerate() {
        // id 1 belongs to the group shape
        let shape_id = idx + 2;
        match op {
            RenderOp::Text(text) => write_text_box(&mut w, text, shape_id)?,
            RenderOp::Shape(shape) => write_shape(&mut w, shape, shape_id)?,
            RenderOp::Picture(picture) => {
                let image_number = media_offset + media.len() + 1;
                let file = format!("image{}.{}", image_number, picture.format.extension());
                let rel_id = rels.len() + 1;
                rels.push(Relationship::new(rel_id, REL_IMAGE, format!("../media/{}", file)));
                media.push(MediaEntry {
                    path: format!("ppt/media/{}", file),
                    data: picture.data.clone(),
                });
                write_picture(&mut w, picture, shape_id, &format!("rId{}", rel_id))?;
            }
        }
    }

    w.end("p:spTree")?;
    w.end("p:cSld")?;
    write_color_map_override(&mut w)?;
    w.end("p:sld")?;

    Ok(SlidePart {
        xml: w.finish(),
        rels,
        media,
    })
}

/// Serialize the notes page of slide `number`. Each line of `notes` becomes
/// one paragraph; the text is otherwise stored unchanged.
pub(crate) fn notes_part(notes: &str, number: usize) -> Result<(Vec<u8>, Vec<Relationship>)> {
    let rels = vec![
        Relationship::new(1, REL_NOTES_MASTER, "../notesMasters/notesMaster1.xml"),
        Relationship::new(2, REL_SLIDE, format!("../slides/slide{}.xml", number)),
    ];

    let mut w = XmlWriter::new()?;
    w.start("p:notes", &PML_NAMESPACES)?;
    w.start("p:cSld", &[])?;
    w.start("p:spTree", &[])?;
    write_group_properties(&mut w)?;

    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "2"), ("name", "Slide Image Placeholder 1")])?;
    w.start("p:cNvSpPr", &[])?;
    w.empty("a:spLocks", &[("noGrp", "1"), ("noRot", "1"), ("noChangeAspect", "1")])?;
    w.end("p:cNvSpPr")?;
    w.start("p:nvPr", &[])?;
    w.empty("p:ph", &[("type", "sldImg")])?;
    w.end("p:nvPr")?;
    w.end("p:nvSpPr")?;
    w.empty("p:spPr", &[])?;
    w.end("p:sp")?;

    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "3"), ("name", "Notes Placeholder 2")])?;
    w.start("p:cNvSpPr", &[])?;
    w.empty("a:spLocks", &[("noGrp", "1")])?;
    w.end("p:cNvSpPr")?;
    w.start("p:nvPr", &[])?;
    w.empty("p:ph", &[("type", "body"), ("idx", "1")])?;
    w.end("p:nvPr")?;
    w.end("p:nvSpPr")?;
    w.empty("p:spPr", &[])?;
    w.start("p:txBody", &[])?;
    w.empty("a:bodyPr", &[])?;
    w.empty("a:lstStyle", &[])?;
    for line in notes.split('\n') {
        w.start("a:p", &[])?;
        if !line.is_empty() {
            w.start("a:r", &[])?;
            w.empty("a:rPr", &[("lang", "en-US"), ("dirty", "0")])?;
            w.leaf("a:t", &[], line)?;
            w.end("a:r")?;
        }
        w.end("a:p")?;
    }
    w.end("p:txBody")?;
    w.end("p:sp")?;

    w.end("p:spTree")?;
    w.end("p:cSld")?;
    write_color_map_override(&mut w)?;
    w.end("p:notes")?;

    Ok((w.finish(), rels))
}

fn write_background(w: &mut XmlWriter, background: &Background) -> Result<()> {
    w.start("p:bg", &[])?;
    w.start("p:bgPr", &[])?;
    match background {
        Background::Solid(color) => w.solid_fill(&color.hex(), 100)?,
        Background::Gradient { from, to } => {
            w.start("a:gradFill", &[("rotWithShape", "1")])?;
            w.start("a:gsLst", &[])?;
            w.start("a:gs", &[("pos", "0")])?;
            w.srgb(&from.hex(), 100)?;
            w.end("a:gs")?;
            w.start("a:gs", &[("pos", "100000")])?;
            w.srgb(&to.hex(), 100)?;
            w.end("a:gs")?;
            w.end("a:gsLst")?;
            // 90 degrees: top to bottom
            w.empty("a:lin", &[("ang", "5400000"), ("scaled", "0")])?;
            w.end("a:gradFill")?;
        }
    }
    w.empty("a:effectLst", &[])?;
    w.end("p:bgPr")?;
    w.end("p:bg")
}

fn write_group_properties(w: &mut XmlWriter) -> Result<()> {
    w.start("p:nvGrpSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    w.empty("p:cNvGrpSpPr", &[])?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvGrpSpPr")?;
    w.start("p:grpSpPr", &[])?;
    w.start("a:xfrm", &[])?;
    w.empty("a:off", &[("x", "0"), ("y", "0")])?;
    w.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    w.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    w.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    w.end("a:xfrm")?;
    w.end("p:grpSpPr")
}

fn write_color_map_override(w: &mut XmlWriter) -> Result<()> {
    w.start("p:clrMapOvr", &[])?;
    w.empty("a:masterClrMapping", &[])?;
    w.end("p:clrMapOvr")
}

fn write_transform(w: &mut XmlWriter, frame: &Frame) -> Result<()> {
    let (x, y) = (frame.x.to_string(), frame.y.to_string());
    let (cx, cy) = (frame.width.max(0).to_string(), frame.height.max(0).to_string());
    w.start("a:xfrm", &[])?;
    w.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    w.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    w.end("a:xfrm")
}

fn write_geometry(w: &mut XmlWriter, kind: ShapeKind) -> Result<()> {
    let preset = match kind {
        ShapeKind::Rect => "rect",
        ShapeKind::RoundRect => "roundRect",
        ShapeKind::Ellipse => "ellipse",
    };
    w.start("a:prstGeom", &[("prst", preset)])?;
    w.empty("a:avLst", &[])?;
    w.end("a:prstGeom")
}

fn write_shape(w: &mut XmlWriter, shape: &Shape, id: usize) -> Result<()> {
    let id = id.to_string();
    let name = format!("Shape {}", id);

    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", id.as_str()), ("name", name.as_str())])?;
    w.empty("p:cNvSpPr", &[])?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvSpPr")?;

    w.start("p:spPr", &[])?;
    write_transform(w, &shape.frame)?;
    write_geometry(w, shape.kind)?;
    match &shape.fill {
        Some(fill) => w.solid_fill(&fill.color.hex(), fill.opacity)?,
        None => w.empty("a:noFill", &[])?,
    }
    match &shape.outline {
        Some(outline) => {
            let width = ((outline.width * 12_700.0).round() as i64).to_string();
            w.start("a:ln", &[("w", width.as_str())])?;
            w.solid_fill(&outline.color.hex(), 100)?;
            if outline.dash == Dash::Dash {
                w.empty("a:prstDash", &[("val", "dash")])?;
            }
            w.end("a:ln")?;
        }
        None => {
            w.start("a:ln", &[])?;
            w.empty("a:noFill", &[])?;
            w.end("a:ln")?;
        }
    }
    w.end("p:spPr")?;
    w.end("p:sp")
}

/// Points to hundredths of a point.
fn centipoints(points: f64) -> String {
    ((points * 100.0).round() as i64).to_string()
}

fn write_text_box(w: &mut XmlWriter, text: &TextBox, id: usize) -> Result<()> {
    let id = id.to_string();
    let name = format!("TextBox {}", id);
    let anchor = match text.valign {
        VAlign::Top => "t",
        VAlign::Middle => "ctr",
        VAlign::Bottom => "b",
    };

    w.start("p:sp", &[])?;
    w.start("p:nvSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", id.as_str()), ("name", name.as_str())])?;
    w.empty("p:cNvSpPr", &[("txBox", "1")])?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvSpPr")?;

    w.start("p:spPr", &[])?;
    write_transform(w, &text.frame)?;
    write_geometry(w, ShapeKind::Rect)?;
    w.empty("a:noFill", &[])?;
    w.end("p:spPr")?;

    w.start("p:txBody", &[])?;
    w.start(
        "a:bodyPr",
        &[
            ("wrap", "square"),
            ("lIns", "91440"),
            ("tIns", "45720"),
            ("rIns", "91440"),
            ("bIns", "45720"),
            ("rtlCol", "0"),
            ("anchor", anchor),
        ],
    )?;
    w.empty("a:normAutofit", &[])?;
    w.end("a:bodyPr")?;
    w.empty("a:lstStyle", &[])?;
    for paragraph in &text.paragraphs {
        write_paragraph(w, text, paragraph)?;
    }
    w.end("p:txBody")?;
    w.end("p:sp")
}

fn write_paragraph(w: &mut XmlWriter, text: &TextBox, paragraph: &Paragraph) -> Result<()> {
    let align = match text.align {
        Align::Left => "l",
        Align::Center => "ctr",
        Align::Right => "r",
    };
    let size = centipoints(text.font_size);

    w.start("a:p", &[])?;
    if paragraph.bullet.is_some() {
        w.start("a:pPr", &[("marL", "285750"), ("indent", "-285750"), ("algn", align)])?;
    } else {
        w.start("a:pPr", &[("algn", align)])?;
    }
    if let Some(spacing) = text.line_spacing {
        w.start("a:lnSpc", &[])?;
        w.empty("a:spcPts", &[("val", centipoints(spacing).as_str())])?;
        w.end("a:lnSpc")?;
    }
    if let Some(after) = text.space_after {
        w.start("a:spcAft", &[])?;
        w.empty("a:spcPts", &[("val", centipoints(after).as_str())])?;
        w.end("a:spcAft")?;
    }
    match paragraph.bullet {
        Some(color) => {
            w.start("a:buClr", &[])?;
            w.srgb(&color.hex(), 100)?;
            w.end("a:buClr")?;
            w.empty("a:buFont", &[("typeface", "Arial")])?;
            w.empty("a:buChar", &[("char", "\u{2022}")])?;
        }
        None => w.empty("a:buNone", &[])?,
    }
    w.end("a:pPr")?;

    for span in &paragraph.spans {
        let bold = if span.bold.unwrap_or(text.bold) { "1" } else { "0" };
        let italic = if text.italic { "1" } else { "0" };
        let color = span.color.unwrap_or(text.color);

        w.start("a:r", &[])?;
        w.start(
            "a:rPr",
            &[("lang", "en-US"), ("sz", size.as_str()), ("b", bold), ("i", italic), ("dirty", "0")],
        )?;
        w.solid_fill(&color.hex(), 100)?;
        w.empty("a:latin", &[("typeface", text.font_face.as_str())])?;
        w.empty("a:cs", &[("typeface", text.font_face.as_str())])?;
        w.end("a:rPr")?;
        w.leaf("a:t", &[], &span.text)?;
        w.end("a:r")?;
    }

    w.empty("a:endParaRPr", &[("lang", "en-US"), ("sz", size.as_str()), ("dirty", "0")])?;
    w.end("a:p")
}

fn write_picture(w: &mut XmlWriter, picture: &Picture, id: usize, rel_id: &str) -> Result<()> {
    let id = id.to_string();
    let name = format!("Picture {}", id);

    w.start("p:pic", &[])?;
    w.start("p:nvPicPr", &[])?;
    w.empty("p:cNvPr", &[("id", id.as_str()), ("name", name.as_str()), ("descr", picture.description.as_str())])?;
    w.start("p:cNvPicPr", &[])?;
    w.empty("a:picLocks", &[("noChangeAspect", "1")])?;
    w.end("p:cNvPicPr")?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvPicPr")?;

    w.start("p:blipFill", &[])?;
    w.empty("a:blip", &[("r:embed", rel_id)])?;
    let crop = picture.crop;
    let edges = [("l", crop.left), ("t", crop.top), ("r", crop.right), ("b", crop.bottom)];
    let values: Vec<(&str, String)> = edges
        .iter()
        .filter(|(_, v)| *v > 0)
        .map(|(k, v)| (*k, v.to_string()))
        .collect();
    let attrs: Vec<(&str, &str)> = values.iter().map(|(k, v)| (*k, v.as_str())).collect();
    w.empty("a:srcRect", &attrs)?;
    w.start("a:stretch", &[])?;
    w.empty("a:fillRect", &[])?;
    w.end("a:stretch")?;
    w.end("p:blipFill")?;

    w.start("p:spPr", &[])?;
    write_transform(w, &picture.frame)?;
    write_geometry(w, ShapeKind::Rect)?;
    w.end("p:spPr")?;
    w.end("p:pic")
}
