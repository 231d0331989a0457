//! Reading produced `.pptx` files back for inspection.

use deck_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// What a package contains, slide by slide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckSummary {
    /// `dc:title` from the core properties, when present.
    pub title: Option<String>,
    pub slides: Vec<SlideSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideSummary {
    /// 1-based position in the presentation.
    pub number: usize,
    /// Text of each shape in document order, paragraphs joined by `\n`.
    pub texts: Vec<String>,
    /// Speaker notes, paragraphs joined by `\n`.
    pub notes: String,
    pub pictures: usize,
}

/// Reader for PPTX (Office Open XML) packages.
pub struct PptxReader;

impl PptxReader {
    pub fn new() -> Self {
        Self
    }

    /// Read a package from in-memory bytes.
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<DeckSummary> {
        self.read(std::io::Cursor::new(bytes))
    }

    /// Read a package from any seekable source.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<DeckSummary> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let title = match read_entry(&mut archive, "docProps/core.xml") {
            Ok(core) => first_text_of(&core, b"title")?,
            Err(_) => None,
        };

        let mut summary = DeckSummary {
            title,
            slides: Vec::new(),
        };
        for (idx, slide_path) in slide_order(&mut archive)?.iter().enumerate() {
            summary.slides.push(read_slide(&mut archive, slide_path, idx + 1)?);
        }
        Ok(summary)
    }
}

impl Default for PptxReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Slide part paths in presentation order, following `p:sldIdLst`.
fn slide_order<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
    let rels = relationships(&read_entry(archive, "ppt/_rels/presentation.xml.rels")?)?;
    let presentation = read_entry(archive, "ppt/presentation.xml")?;

    let mut reader = Reader::from_str(&presentation);
    reader.trim_text(true);

    let mut paths = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"sldId" => {
                let id = attribute(e, b"r:id")
                    .ok_or_else(|| Error::XmlError("p:sldId without r:id".to_string()))?;
                let target = rels
                    .get(&id)
                    .ok_or_else(|| Error::XmlError(format!("Unresolved slide relationship '{}'", id)))?;
                paths.push(resolve_target("ppt", target));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error parsing presentation: {}", e))),
            _ => {}
        }
    }
    Ok(paths)
}

fn read_slide<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    slide_path: &str,
    number: usize,
) -> Result<SlideSummary> {
    let content = read_entry(archive, slide_path)?;
    let (texts, pictures) = shapes_of(&content)?;

    let (dir, file) = slide_path.rsplit_once('/').unwrap_or(("", slide_path));
    let rels_path = format!("{}/_rels/{}.rels", dir, file);
    let notes = match read_entry(archive, &rels_path) {
        Ok(rels) => match notes_target(&rels)? {
            Some(target) => {
                let notes_xml = read_entry(archive, &resolve_target(dir, &target))?;
                paragraphs_of(&notes_xml)?.join("\n")
            }
            None => String::new(),
        },
        Err(_) => String::new(),
    };

    Ok(SlideSummary {
        number,
        texts,
        notes,
        pictures,
    })
}

/// Per-shape text and the number of pictures on a slide.
fn shapes_of(xml: &str) -> Result<(Vec<String>, usize)> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut texts = Vec::new();
    let mut pictures = 0;
    let mut paragraphs: Vec<String> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => paragraphs.clear(),
                b"p" => paragraphs.push(String::new()),
                b"t" => in_text = true,
                b"pic" => pictures += 1,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if local_name(e.name().as_ref()) == b"p" => {
                paragraphs.push(String::new());
            }
            Ok(Event::Text(ref e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::XmlError(format!("Bad text in slide: {}", e)))?;
                if let Some(last) = paragraphs.last_mut() {
                    last.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text = false,
                b"sp" => {
                    let text = paragraphs.join("\n");
                    if !text.trim().is_empty() {
                        texts.push(text);
                    }
                    paragraphs.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error parsing slide: {}", e))),
            _ => {}
        }
    }
    Ok((texts, pictures))
}

/// Every `a:p` in document order, with whitespace kept as written.
fn paragraphs_of(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut paragraphs = Vec::new();
    let mut in_text = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"p" if e.name().as_ref().starts_with(b"a:") => paragraphs.push(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"a:p" => paragraphs.push(String::new()),
            Ok(Event::Text(ref e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::XmlError(format!("Bad text in notes: {}", e)))?;
                if let Some(last) = paragraphs.last_mut() {
                    last.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"t" => in_text = false,
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error parsing notes: {}", e))),
            _ => {}
        }
    }
    Ok(paragraphs)
}

/// Text of the first element named `name` (local part), if any.
fn first_text_of(xml: &str, name: &[u8]) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut inside = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == name => inside = true,
            Ok(Event::Text(ref e)) if inside => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::XmlError(format!("Bad text: {}", e)))?;
                return Ok(Some(text.into_owned()));
            }
            Ok(Event::End(ref e)) if inside && local_name(e.name().as_ref()) == name => {
                return Ok(Some(String::new()));
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(Error::XmlError(format!("Error parsing properties: {}", e))),
            _ => {}
        }
    }
}

/// `Id -> Target` for every relationship in a `.rels` part.
fn relationships(xml: &str) -> Result<HashMap<String, String>> {
    Ok(relationship_entries(xml)?
        .into_iter()
        .map(|(id, _, target)| (id, target))
        .collect())
}

fn notes_target(xml: &str) -> Result<Option<String>> {
    Ok(relationship_entries(xml)?
        .into_iter()
        .find(|(_, rel_type, _)| rel_type.ends_with("/notesSlide"))
        .map(|(_, _, target)| target))
}

fn relationship_entries(xml: &str) -> Result<Vec<(String, String, String)>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut entries = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if e.name().as_ref() == b"Relationship" => {
                entries.push((
                    attribute(e, b"Id").unwrap_or_default(),
                    attribute(e, b"Type").unwrap_or_default(),
                    attribute(e, b"Target").unwrap_or_default(),
                ));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error parsing relationships: {}", e))),
            _ => {}
        }
    }
    Ok(entries)
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;
    Ok(content)
}

/// Local part of a possibly prefixed element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("ppt", "slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(
            resolve_target("ppt/slides", "../notesSlides/notesSlide2.xml"),
            "ppt/notesSlides/notesSlide2.xml"
        );
        assert_eq!(resolve_target("ppt", "/ppt/slides/slide3.xml"), "ppt/slides/slide3.xml");
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_shapes_of_groups_paragraphs() {
        let xml = r#"<p:sld xmlns:p="p" xmlns:a="a"><p:cSld><p:spTree>
            <p:sp><p:txBody><a:p><a:r><a:t>One </a:t></a:r><a:r><a:t>&amp; two</a:t></a:r></a:p><a:p><a:r><a:t>Three</a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:spPr/></p:sp>
            <p:pic><p:blipFill/></p:pic>
        </p:spTree></p:cSld></p:sld>"#;
        let (texts, pictures) = shapes_of(xml).unwrap();
        assert_eq!(texts, vec!["One & two\nThree".to_string()]);
        assert_eq!(pictures, 1);
    }

    #[test]
    fn test_paragraphs_keep_whitespace() {
        let xml = "<p:notes xmlns:p=\"p\" xmlns:a=\"a\"><a:p><a:r><a:t>  spaced  </a:t></a:r></a:p><a:p></a:p></p:notes>";
        assert_eq!(paragraphs_of(xml).unwrap(), vec!["  spaced  ".to_string(), String::new()]);
    }

    #[test]
    fn test_notes_target() {
        let rels = r#"<Relationships><Relationship Id="rId1" Type="x/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="x/notesSlide" Target="../notesSlides/notesSlide1.xml"/></Relationships>"#;
        assert_eq!(
            notes_target(rels).unwrap().as_deref(),
            Some("../notesSlides/notesSlide1.xml")
        );
    }
}
