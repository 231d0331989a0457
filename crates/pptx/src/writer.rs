//! Packaging a rendered deck as a `.pptx` file.

use crate::archive::{write_archive, Entry};
use crate::parts::{self, Metadata, ThemeFonts};
use crate::slide_xml::{notes_part, slide_part};
use deck_core::render::ImageFormat;
use deck_core::{CompilerOptions, RenderedDeck, Result};

/// Writes rendered decks as Office Open XML presentations.
#[derive(Debug, Clone)]
pub struct PptxWriter {
    author: String,
    subject: String,
    company: String,
}

impl PptxWriter {
    /// Create a writer taking document properties from `options`.
    pub fn new(options: &CompilerOptions) -> Self {
        Self {
            author: options.author.clone(),
            subject: options.subject.clone(),
            company: options.company.clone(),
        }
    }

    /// Serialize `deck` into PPTX bytes. Output depends only on the deck and
    /// the writer's properties.
    pub fn write(&self, deck: &RenderedDeck) -> Result<Vec<u8>> {
        let count = deck.slides.len();
        log::debug!("Packaging '{}' ({} slides)", deck.title, count);

        let meta = Metadata {
            title: deck.title.clone(),
            author: self.author.clone(),
            subject: self.subject.clone(),
            company: self.company.clone(),
        };

        let mut slides = Vec::with_capacity(count * 4);
        let mut media = Vec::new();
        for (idx, slide) in deck.slides.iter().enumerate() {
            let number = idx + 1;
            let part = slide_part(slide, number, media.len())?;
            slides.push(Entry::new(format!("ppt/slides/slide{}.xml", number), part.xml));
            slides.push(Entry::new(
                format!("ppt/slides/_rels/slide{}.xml.rels", number),
                parts::relationships_xml(&part.rels)?,
            ));

            let (notes, notes_rels) = notes_part(&slide.notes, number)?;
            slides.push(Entry::new(format!("ppt/notesSlides/notesSlide{}.xml", number), notes));
            slides.push(Entry::new(
                format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", number),
                parts::relationships_xml(&notes_rels)?,
            ));

            media.extend(part.media);
        }

        let fonts = ThemeFonts {
            major: deck.fonts.title,
            minor: deck.fonts.body,
        };
        let (presentation, presentation_rels) = parts::presentation_part(count)?;

        let mut entries = vec![
            Entry::new("[Content_Types].xml", parts::content_types_xml(count, &image_formats(deck))?),
            Entry::new("_rels/.rels", parts::relationships_xml(&parts::package_rels())?),
            Entry::new("docProps/core.xml", parts::core_props_xml(&meta)?),
            Entry::new("docProps/app.xml", parts::app_props_xml(&meta, count)?),
            Entry::new("ppt/presentation.xml", presentation),
            Entry::new(
                "ppt/_rels/presentation.xml.rels",
                parts::relationships_xml(&presentation_rels)?,
            ),
            Entry::new("ppt/presProps.xml", parts::pres_props_xml()?),
            Entry::new("ppt/viewProps.xml", parts::view_props_xml()?),
            Entry::new("ppt/tableStyles.xml", parts::table_styles_xml()?),
            Entry::new("ppt/theme/theme1.xml", parts::theme_xml(&deck.theme, fonts)?),
            Entry::new("ppt/theme/theme2.xml", parts::theme_xml(&deck.theme, fonts)?),
            Entry::new("ppt/slideMasters/slideMaster1.xml", parts::slide_master_xml()?),
            Entry::new(
                "ppt/slideMasters/_rels/slideMaster1.xml.rels",
                parts::relationships_xml(&parts::slide_master_rels())?,
            ),
            Entry::new("ppt/slideLayouts/slideLayout1.xml", parts::slide_layout_xml()?),
            Entry::new(
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
                parts::relationships_xml(&parts::slide_layout_rels())?,
            ),
            Entry::new("ppt/notesMasters/notesMaster1.xml", parts::notes_master_xml()?),
            Entry::new(
                "ppt/notesMasters/_rels/notesMaster1.xml.rels",
                parts::relationships_xml(&parts::notes_master_rels())?,
            ),
        ];
        entries.extend(slides);
        entries.extend(media.into_iter().map(|m| Entry::new(m.path, m.data)));

        write_archive(&entries)
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new(&CompilerOptions::default())
    }
}

/// Distinct embedded formats, in order of first use.
fn image_formats(deck: &RenderedDeck) -> Vec<ImageFormat> {
    let mut formats = Vec::new();
    for picture in deck.slides.iter().flat_map(|s| s.ops.pictures()) {
        if !formats.contains(&picture.format) {
            formats.push(picture.format);
        }
    }
    formats
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::theme::builtin;
    use deck_core::{render_deck, Document, Language, Slide, SlideBody, StyleConfig, ThemeKey};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn rendered(len: usize) -> RenderedDeck {
        let slides = (0..len)
            .map(|i| {
                Slide::new(format!("s{}", i), SlideBody::Statement, format!("Point {}", i))
                    .with_notes(format!("Notes {}", i))
            })
            .collect();
        let doc = Document::new("Quarterly Review", slides);
        let theme = builtin(ThemeKey::Doings).unwrap();
        render_deck(&doc, theme, &StyleConfig::default(), Language::En, 0, None).unwrap()
    }

    fn read(bytes: &[u8], path: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut text = String::new();
        archive.by_name(path).unwrap().read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn test_package_layout() {
        let bytes = PptxWriter::default().write(&rendered(2)).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();

        for required in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/slides/slide2.xml",
            "ppt/notesSlides/notesSlide2.xml",
            "ppt/theme/theme1.xml",
            "docProps/core.xml",
        ] {
            assert!(names.contains(&required), "missing {}", required);
        }
        assert!(!names.iter().any(|n| n.starts_with("ppt/media/")));
    }

    #[test]
    fn test_metadata_from_options() {
        let options = CompilerOptions {
            author: "Studio".to_string(),
            ..CompilerOptions::default()
        };
        let bytes = PptxWriter::new(&options).write(&rendered(1)).unwrap();
        let core = read(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Quarterly Review</dc:title>"));
        assert!(core.contains("<dc:creator>Studio</dc:creator>"));
        assert!(read(&bytes, "docProps/app.xml").contains("<Slides>1</Slides>"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let deck = rendered(3);
        let writer = PptxWriter::default();
        assert_eq!(writer.write(&deck).unwrap(), writer.write(&deck).unwrap());
    }
}
