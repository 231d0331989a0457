//! Package-level parts: content types, relationships, presentation,
//! master, layout, theme and document properties.

use crate::xml::{XmlWriter, NS_A, PML_NAMESPACES};
use deck_core::render::{ImageFormat, CANVAS_HEIGHT, CANVAS_WIDTH};
use deck_core::{Result, Theme};

pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
pub(crate) const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
pub(crate) const REL_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
pub(crate) const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub(crate) const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
pub(crate) const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub(crate) const REL_NOTES_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";
pub(crate) const REL_NOTES_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
pub(crate) const REL_THEME: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub(crate) const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
pub(crate) const REL_PRES_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
pub(crate) const REL_VIEW_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
pub(crate) const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE_MASTER: &str = "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_SLIDE_LAYOUT: &str = "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_NOTES_MASTER: &str = "application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml";
const CT_NOTES_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
const CT_PRES_PROPS: &str = "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
const CT_VIEW_PROPS: &str = "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
const CT_TABLE_STYLES: &str = "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_APP: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";

/// Notes page size: 7.5 x 10 inches, portrait.
const NOTES_WIDTH: i64 = 6_858_000;
const NOTES_HEIGHT: i64 = 9_144_000;

/// One entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: &'static str,
    pub target: String,
}

impl Relationship {
    pub fn new(id: usize, rel_type: &'static str, target: impl Into<String>) -> Self {
        Self {
            id: format!("rId{}", id),
            rel_type,
            target: target.into(),
        }
    }
}

pub(crate) fn relationships_xml(rels: &[Relationship]) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "Relationships",
        &[("xmlns", "http://schemas.openxmlformats.org/package/2006/relationships")],
    )?;
    for rel in rels {
        w.empty(
            "Relationship",
            &[("Id", rel.id.as_str()), ("Type", rel.rel_type), ("Target", rel.target.as_str())],
        )?;
    }
    w.end("Relationships")?;
    Ok(w.finish())
}

pub(crate) fn package_rels() -> Vec<Relationship> {
    vec![
        Relationship::new(1, REL_OFFICE_DOCUMENT, "ppt/presentation.xml"),
        Relationship::new(2, REL_CORE_PROPERTIES, "docProps/core.xml"),
        Relationship::new(3, REL_EXTENDED_PROPERTIES, "docProps/app.xml"),
    ]
}

pub(crate) fn content_types_xml(slide_count: usize, image_formats: &[ImageFormat]) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "Types",
        &[("xmlns", "http://schemas.openxmlformats.org/package/2006/content-types")],
    )?;
    w.empty(
        "Default",
        &[("Extension", "rels"), ("ContentType", "application/vnd.openxmlformats-package.relationships+xml")],
    )?;
    w.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
    for format in image_formats {
        w.empty(
            "Default",
            &[("Extension", format.extension()), ("ContentType", format.content_type())],
        )?;
    }

    let mut overrides: Vec<(String, &str)> = vec![
        ("/ppt/presentation.xml".to_string(), CT_PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml".to_string(), CT_SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml".to_string(), CT_SLIDE_LAYOUT),
        ("/ppt/notesMasters/notesMaster1.xml".to_string(), CT_NOTES_MASTER),
        ("/ppt/theme/theme1.xml".to_string(), CT_THEME),
        ("/ppt/theme/theme2.xml".to_string(), CT_THEME),
        ("/ppt/presProps.xml".to_string(), CT_PRES_PROPS),
        ("/ppt/viewProps.xml".to_string(), CT_VIEW_PROPS),
        ("/ppt/tableStyles.xml".to_string(), CT_TABLE_STYLES),
        ("/docProps/core.xml".to_string(), CT_CORE),
        ("/docProps/app.xml".to_string(), CT_APP),
    ];
    for n in 1..=slide_count {
        overrides.push((format!("/ppt/slides/slide{}.xml", n), CT_SLIDE));
        overrides.push((format!("/ppt/notesSlides/notesSlide{}.xml", n), CT_NOTES_SLIDE));
    }
    for (part, content_type) in &overrides {
        w.empty("Override", &[("PartName", part.as_str()), ("ContentType", *content_type)])?;
    }

    w.end("Types")?;
    Ok(w.finish())
}

/// `ppt/presentation.xml` and its relationships.
pub(crate) fn presentation_part(slide_count: usize) -> Result<(Vec<u8>, Vec<Relationship>)> {
    let mut rels = vec![
        Relationship::new(1, REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
        Relationship::new(2, REL_NOTES_MASTER, "notesMasters/notesMaster1.xml"),
    ];
    for n in 1..=slide_count {
        rels.push(Relationship::new(n + 2, REL_SLIDE, format!("slides/slide{}.xml", n)));
    }
    let next = slide_count + 3;
    rels.push(Relationship::new(next, REL_PRES_PROPS, "presProps.xml"));
    rels.push(Relationship::new(next + 1, REL_VIEW_PROPS, "viewProps.xml"));
    rels.push(Relationship::new(next + 2, REL_THEME, "theme/theme1.xml"));
    rels.push(Relationship::new(next + 3, REL_TABLE_STYLES, "tableStyles.xml"));

    let mut w = XmlWriter::new()?;
    let mut root = PML_NAMESPACES.to_vec();
    root.push(("saveSubsetFonts", "1"));
    w.start("p:presentation", &root)?;

    w.start("p:sldMasterIdLst", &[])?;
    w.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
    w.end("p:sldMasterIdLst")?;

    w.start("p:notesMasterIdLst", &[])?;
    w.empty("p:notesMasterId", &[("r:id", "rId2")])?;
    w.end("p:notesMasterIdLst")?;

    w.start("p:sldIdLst", &[])?;
    for n in 1..=slide_count {
        let id = (255 + n).to_string();
        let rel = format!("rId{}", n + 2);
        w.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel.as_str())])?;
    }
    w.end("p:sldIdLst")?;

    let (cx, cy) = (CANVAS_WIDTH.to_string(), CANVAS_HEIGHT.to_string());
    w.empty("p:sldSz", &[("cx", cx.as_str()), ("cy", cy.as_str()), ("type", "screen16x9")])?;
    let (ncx, ncy) = (NOTES_WIDTH.to_string(), NOTES_HEIGHT.to_string());
    w.empty("p:notesSz", &[("cx", ncx.as_str()), ("cy", ncy.as_str())])?;

    w.end("p:presentation")?;
    Ok((w.finish(), rels))
}

fn write_empty_tree(w: &mut XmlWriter) -> Result<()> {
    w.start("p:spTree", &[])?;
    w.start("p:nvGrpSpPr", &[])?;
    w.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    w.empty("p:cNvGrpSpPr", &[])?;
    w.empty("p:nvPr", &[])?;
    w.end("p:nvGrpSpPr")?;
    w.empty("p:grpSpPr", &[])?;
    w.end("p:spTree")
}

fn write_theme_background(w: &mut XmlWriter) -> Result<()> {
    w.start("p:bg", &[])?;
    w.start("p:bgRef", &[("idx", "1001")])?;
    w.empty("a:schemeClr", &[("val", "bg1")])?;
    w.end("p:bgRef")?;
    w.end("p:bg")
}

const COLOR_MAP: [(&str, &str); 12] = [
    ("bg1", "lt1"),
    ("tx1", "dk1"),
    ("bg2", "lt2"),
    ("tx2", "dk2"),
    ("accent1", "accent1"),
    ("accent2", "accent2"),
    ("accent3", "accent3"),
    ("accent4", "accent4"),
    ("accent5", "accent5"),
    ("accent6", "accent6"),
    ("hlink", "hlink"),
    ("folHlink", "folHlink"),
];

pub(crate) fn slide_master_xml() -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("p:sldMaster", &PML_NAMESPACES)?;
    w.start("p:cSld", &[])?;
    write_theme_background(&mut w)?;
    write_empty_tree(&mut w)?;
    w.end("p:cSld")?;
    w.empty("p:clrMap", &COLOR_MAP)?;
    w.start("p:sldLayoutIdLst", &[])?;
    w.empty("p:sldLayoutId", &[("id", "2147483649"), ("r:id", "rId1")])?;
    w.end("p:sldLayoutIdLst")?;

    w.start("p:txStyles", &[])?;
    for (style, size) in [("p:titleStyle", "4400"), ("p:bodyStyle", "2800"), ("p:otherStyle", "1800")] {
        w.start(style, &[])?;
        w.start("a:lvl1pPr", &[])?;
        w.start("a:defRPr", &[("sz", size)])?;
        w.start("a:solidFill", &[])?;
        w.empty("a:schemeClr", &[("val", "tx1")])?;
        w.end("a:solidFill")?;
        w.empty("a:latin", &[("typeface", "+mn-lt")])?;
        w.end("a:defRPr")?;
        w.end("a:lvl1pPr")?;
        w.end(style)?;
    }
    w.end("p:txStyles")?;

    w.end("p:sldMaster")?;
    Ok(w.finish())
}

pub(crate) fn slide_master_rels() -> Vec<Relationship> {
    vec![
        Relationship::new(1, REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
        Relationship::new(2, REL_THEME, "../theme/theme1.xml"),
    ]
}

pub(crate) fn slide_layout_xml() -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    let mut root = PML_NAMESPACES.to_vec();
    root.extend([("type", "blank"), ("preserve", "1")]);
    w.start("p:sldLayout", &root)?;
    w.start("p:cSld", &[("name", "Blank")])?;
    write_empty_tree(&mut w)?;
    w.end("p:cSld")?;
    w.start("p:clrMapOvr", &[])?;
    w.empty("a:masterClrMapping", &[])?;
    w.end("p:clrMapOvr")?;
    w.end("p:sldLayout")?;
    Ok(w.finish())
}

pub(crate) fn slide_layout_rels() -> Vec<Relationship> {
    vec![Relationship::new(1, REL_SLIDE_MASTER, "../slideMasters/slideMaster1.xml")]
}

pub(crate) fn notes_master_xml() -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("p:notesMaster", &PML_NAMESPACES)?;
    w.start("p:cSld", &[])?;
    write_theme_background(&mut w)?;
    write_empty_tree(&mut w)?;
    w.end("p:cSld")?;
    w.empty("p:clrMap", &COLOR_MAP)?;
    w.end("p:notesMaster")?;
    Ok(w.finish())
}

pub(crate) fn notes_master_rels() -> Vec<Relationship> {
    vec![Relationship::new(1, REL_THEME, "../theme/theme2.xml")]
}

/// Fonts recorded in the theme's font scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ThemeFonts<'a> {
    pub major: &'a str,
    pub minor: &'a str,
}

/// A DrawingML theme carrying the deck's palette as its color scheme.
pub(crate) fn theme_xml(theme: &Theme, fonts: ThemeFonts<'_>) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start("a:theme", &[("xmlns:a", NS_A), ("name", theme.name)])?;
    w.start("a:themeElements", &[])?;

    w.start("a:clrScheme", &[("name", theme.name)])?;
    let slots = [
        ("a:dk1", theme.background_dark),
        ("a:lt1", theme.text_light),
        ("a:dk2", theme.background_alt),
        ("a:lt2", theme.text_subtle),
        ("a:accent1", theme.primary),
        ("a:accent2", theme.secondary),
        ("a:accent3", theme.accent),
        ("a:accent4", theme.contrast),
        ("a:accent5", theme.soft_accent),
        ("a:accent6", theme.text_muted),
        ("a:hlink", theme.primary),
        ("a:folHlink", theme.secondary),
    ];
    for (slot, color) in slots {
        w.start(slot, &[])?;
        w.srgb(&color.hex(), 100)?;
        w.end(slot)?;
    }
    w.end("a:clrScheme")?;

    w.start("a:fontScheme", &[("name", theme.name)])?;
    for (scheme, face) in [("a:majorFont", fonts.major), ("a:minorFont", fonts.minor)] {
        w.start(scheme, &[])?;
        w.empty("a:latin", &[("typeface", face)])?;
        w.empty("a:ea", &[("typeface", "")])?;
        w.empty("a:cs", &[("typeface", "")])?;
        w.end(scheme)?;
    }
    w.end("a:fontScheme")?;

    w.start("a:fmtScheme", &[("name", theme.name)])?;
    w.start("a:fillStyleLst", &[])?;
    for _ in 0..3 {
        write_scheme_fill(&mut w)?;
    }
    w.end("a:fillStyleLst")?;
    w.start("a:lnStyleLst", &[])?;
    for width in ["6350", "12700", "19050"] {
        w.start("a:ln", &[("w", width)])?;
        write_scheme_fill(&mut w)?;
        w.end("a:ln")?;
    }
    w.end("a:lnStyleLst")?;
    w.start("a:effectStyleLst", &[])?;
    for _ in 0..3 {
        w.start("a:effectStyle", &[])?;
        w.empty("a:effectLst", &[])?;
        w.end("a:effectStyle")?;
    }
    w.end("a:effectStyleLst")?;
    w.start("a:bgFillStyleLst", &[])?;
    for _ in 0..3 {
        write_scheme_fill(&mut w)?;
    }
    w.end("a:bgFillStyleLst")?;
    w.end("a:fmtScheme")?;

    w.end("a:themeElements")?;
    w.end("a:theme")?;
    Ok(w.finish())
}

fn write_scheme_fill(w: &mut XmlWriter) -> Result<()> {
    w.start("a:solidFill", &[])?;
    w.empty("a:schemeClr", &[("val", "phClr")])?;
    w.end("a:solidFill")
}

pub(crate) fn pres_props_xml() -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.empty("p:presentationPr", &PML_NAMESPACES)?;
    Ok(w.finish())
}

pub(crate) fn view_props_xml() -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.empty("p:viewPr", &PML_NAMESPACES)?;
    Ok(w.finish())
}

pub(crate) fn table_styles_xml() -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.empty(
        "a:tblStyleLst",
        &[("xmlns:a", NS_A), ("def", "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}")],
    )?;
    Ok(w.finish())
}

/// Document metadata written to `docProps/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub company: String,
}

/// `docProps/core.xml`. Carries no timestamps so output stays reproducible.
pub(crate) fn core_props_xml(meta: &Metadata) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "cp:coreProperties",
        &[
            ("xmlns:cp", "http://schemas.openxmlformats.org/package/2006/metadata/core-properties"),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    w.leaf("dc:title", &[], &meta.title)?;
    w.leaf("dc:subject", &[], &meta.subject)?;
    w.leaf("dc:creator", &[], &meta.author)?;
    w.leaf("cp:lastModifiedBy", &[], &meta.author)?;
    w.leaf("cp:revision", &[], "1")?;
    w.end("cp:coreProperties")?;
    Ok(w.finish())
}

/// `docProps/app.xml`.
pub(crate) fn app_props_xml(meta: &Metadata, slide_count: usize) -> Result<Vec<u8>> {
    let mut w = XmlWriter::new()?;
    w.start(
        "Properties",
        &[
            ("xmlns", "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"),
            ("xmlns:vt", "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"),
        ],
    )?;
    w.leaf("Application", &[], &meta.author)?;
    w.leaf("PresentationFormat", &[], "On-screen Show (16:9)")?;
    w.leaf("Slides", &[], &slide_count.to_string())?;
    w.leaf("Notes", &[], &slide_count.to_string())?;
    w.leaf("Company", &[], &meta.company)?;
    w.leaf("AppVersion", &[], "16.0000")?;
    w.end("Properties")?;
    Ok(w.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::theme::builtin;
    use deck_core::ThemeKey;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_presentation_lists_slides_in_order() {
        let (xml, rels) = presentation_part(3).unwrap();
        let xml = text(xml);

        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<p:sldId id="258" r:id="rId5"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="5143500" type="screen16x9"/>"#));
        assert_eq!(rels[4].target, "slides/slide3.xml");
        assert_eq!(rels.len(), 2 + 3 + 4);
    }

    #[test]
    fn test_content_types_cover_parts() {
        let xml = text(content_types_xml(2, &[ImageFormat::Png]).unwrap());
        assert!(xml.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide2.xml""#));
        assert!(xml.contains(r#"PartName="/ppt/notesSlides/notesSlide2.xml""#));
        assert!(!xml.contains("slide3.xml"));
    }

    #[test]
    fn test_theme_uses_palette() {
        let theme = builtin(ThemeKey::Corporate).unwrap();
        let fonts = ThemeFonts {
            major: "Georgia",
            minor: "Georgia",
        };
        let xml = text(theme_xml(theme, fonts).unwrap());
        assert!(xml.contains(r#"<a:accent1><a:srgbClr val="3182CE"/></a:accent1>"#));
        assert!(xml.contains(r#"<a:latin typeface="Georgia"/>"#));
    }

    #[test]
    fn test_core_props_escape_and_skip_dates() {
        let meta = Metadata {
            title: "R&D <Review>".to_string(),
            author: "Keynote Builder".to_string(),
            subject: "Keynote Presentation".to_string(),
            company: "Generated with AI".to_string(),
        };
        let xml = text(core_props_xml(&meta).unwrap());
        assert!(xml.contains("<dc:title>R&amp;D &lt;Review&gt;</dc:title>"));
        assert!(!xml.contains("dcterms:created"));
    }

    #[test]
    fn test_relationships_xml() {
        let xml = text(relationships_xml(&package_rels()).unwrap());
        assert!(xml.contains(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>"#));
    }
}
