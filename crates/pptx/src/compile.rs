//! The compiler front door: render request in, file bytes out.

use crate::bundle::{write_bundle, PackedPart};
use crate::writer::PptxWriter;
use deck_core::{
    filename_stem, render_deck, resolve_effective_theme, split_document, CancellationToken,
    CompilerOptions, Document, DocumentPart, RenderRequest, Result, RotationMode, StyleConfig, Theme,
};

/// Content type of a single presentation.
pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Content type of a multi-part bundle.
pub const ZIP_CONTENT_TYPE: &str = "application/zip";

/// A finished compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledOutput {
    pub bytes: Vec<u8>,
    /// Suggested attachment name.
    pub filename: String,
    pub content_type: &'static str,
    /// Number of presentations produced.
    pub parts: usize,
}

/// Compiles render requests into `.pptx` files or part bundles.
#[derive(Debug, Clone)]
pub struct Compiler {
    options: CompilerOptions,
    writer: PptxWriter,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        let writer = PptxWriter::new(&options);
        Self { options, writer }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile a request. Invalid requests fail before any slide is
    /// rendered; a cancelled compile returns [`deck_core::Error::Cancelled`]
    /// and no bytes.
    pub fn compile(&self, request: &RenderRequest, cancel: Option<&CancellationToken>) -> Result<CompiledOutput> {
        request.validate()?;
        let parts = request.part_count()?;
        let theme = resolve_effective_theme(&request.style, self.options.fallback_theme)?;
        let document = request.document.clone().with_unique_ids();
        let stem = filename_stem(&document.title);

        log::info!(
            "Compiling '{}' ({} slides, theme {}, {} part(s))",
            document.title,
            document.slides.len(),
            theme.key,
            parts
        );

        if parts == 1 {
            let bytes = self.pack(&document, &theme, &request.style, 0, cancel)?;
            return Ok(CompiledOutput {
                bytes,
                filename: format!("{}_Keynote.pptx", stem),
                content_type: PPTX_CONTENT_TYPE,
                parts: 1,
            });
        }

        let chunks = split_document(&document, parts, self.options.language)?;
        let packed = self.pack_parts(&chunks, &theme, &request.style, cancel)?;
        if let Some(token) = cancel {
            token.check()?;
        }
        let bytes = write_bundle(&stem, &packed)?;

        Ok(CompiledOutput {
            bytes,
            filename: format!("{}_Keynote_{}_parts.zip", stem, packed.len()),
            content_type: ZIP_CONTENT_TYPE,
            parts: packed.len(),
        })
    }

    /// Render and package one document. Slide `i` takes rotation index
    /// `index_offset + i`.
    pub fn pack(
        &self,
        document: &Document,
        theme: &Theme,
        style: &StyleConfig,
        index_offset: usize,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<u8>> {
        let deck = render_deck(document, theme, style, self.options.language, index_offset, cancel)?;
        self.writer.write(&deck)
    }

    fn pack_parts(
        &self,
        chunks: &[DocumentPart],
        theme: &Theme,
        style: &StyleConfig,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<PackedPart>> {
        #[cfg(feature = "parallel")]
        {
            if self.options.parallel_parts {
                use rayon::prelude::*;
                return chunks
                    .par_iter()
                    .map(|chunk| self.pack_part(chunk, theme, style, cancel))
                    .collect();
            }
        }
        chunks
            .iter()
            .map(|chunk| self.pack_part(chunk, theme, style, cancel))
            .collect()
    }

    fn pack_part(
        &self,
        chunk: &DocumentPart,
        theme: &Theme,
        style: &StyleConfig,
        cancel: Option<&CancellationToken>,
    ) -> Result<PackedPart> {
        if let Some(token) = cancel {
            token.check()?;
        }
        let offset = match self.options.rotation {
            RotationMode::Global => chunk.offset,
            RotationMode::PerPart => 0,
        };
        Ok(PackedPart {
            number: chunk.number,
            total: chunk.total,
            bytes: self.pack(&chunk.document, theme, style, offset, cancel)?,
        })
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompilerOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::PptxReader;
    use deck_core::{Error, Language, Slide, SlideBody, SlideImage};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn statements(len: usize) -> Vec<Slide> {
        (1..=len)
            .map(|i| {
                Slide::new(format!("s{}", i), SlideBody::Statement, format!("Point {}", i))
                    .with_notes(format!("Say point {}", i))
            })
            .collect()
    }

    fn request(title: &str, slides: Vec<Slide>, theme: &str) -> RenderRequest {
        RenderRequest::new(Document::new(title, slides), StyleConfig::themed(theme))
    }

    fn slide_entries(bytes: &[u8]) -> usize {
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive
            .file_names()
            .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
            .count()
    }

    #[test]
    fn test_single_file_scenario() {
        let slides = vec![
            Slide::new("intro", SlideBody::Statement, "Welcome"),
            Slide::new(
                "points",
                SlideBody::List {
                    items: (1..=5).map(|i| format!("Item {}", i)).collect(),
                },
                "Five things",
            ),
            Slide::new("close", SlideBody::Cta, "Act now"),
        ];
        let output = Compiler::default()
            .compile(&request("Team Offsite", slides, "doings"), None)
            .unwrap();

        assert_eq!(output.filename, "TeamOffsite_Keynote.pptx");
        assert_eq!(output.content_type, PPTX_CONTENT_TYPE);
        assert_eq!(output.parts, 1);
        assert_eq!(slide_entries(&output.bytes), 3);
    }

    #[test]
    fn test_split_scenario() {
        let output = Compiler::default()
            .compile(&request("Roadmap", statements(10), "doings").with_parts(3), None)
            .unwrap();

        assert_eq!(output.filename, "Roadmap_Keynote_3_parts.zip");
        assert_eq!(output.content_type, ZIP_CONTENT_TYPE);

        let mut archive = ZipArchive::new(Cursor::new(output.bytes.as_slice())).unwrap();
        assert_eq!(archive.len(), 3);

        let mut sizes = Vec::new();
        for i in 1..=3 {
            let mut inner = Vec::new();
            archive
                .by_name(&format!("Roadmap_Part_{}_of_3.pptx", i))
                .unwrap()
                .read_to_end(&mut inner)
                .unwrap();
            let summary = PptxReader::new().read_bytes(&inner).unwrap();
            assert_eq!(
                summary.title.as_deref(),
                Some(format!("Roadmap (Part {} of 3)", i).as_str())
            );
            sizes.push(summary.slides.len());
        }
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn test_more_parts_than_slides() {
        let output = Compiler::default()
            .compile(&request("Tiny", statements(2), "bold").with_parts(5), None)
            .unwrap();
        assert_eq!(output.parts, 2);
        assert_eq!(output.filename, "Tiny_Keynote_2_parts.zip");
        assert_eq!(ZipArchive::new(Cursor::new(output.bytes)).unwrap().len(), 2);
    }

    #[test]
    fn test_output_is_deterministic() {
        let sequential = Compiler::new(CompilerOptions::default().with_parallel_parts(false));
        let parallel = Compiler::default();
        let req = request("Same", statements(7), "doings-pro").with_parts(3);

        let first = parallel.compile(&req, None).unwrap();
        let second = parallel.compile(&req, None).unwrap();
        let third = sequential.compile(&req, None).unwrap();
        assert_eq!(first.bytes, second.bytes);
        assert_eq!(first.bytes, third.bytes);
    }

    #[test]
    fn test_image_story_has_picture_and_scrim() {
        let slide = Slide::new(
            "quote",
            SlideBody::Story {
                quote: Some("We shipped it".to_string()),
                attribution: None,
            },
            "A story",
        )
        .with_image(SlideImage::new(PIXEL_PNG, Some("image/png")));
        let output = Compiler::default()
            .compile(&request("Story", vec![slide], "corporate"), None)
            .unwrap();

        let mut archive = ZipArchive::new(Cursor::new(output.bytes.as_slice())).unwrap();
        assert!(archive.by_name("ppt/media/image1.png").is_ok());

        let mut xml = String::new();
        archive
            .by_name("ppt/slides/slide1.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        let picture_at = xml.find("<p:pic>").unwrap();
        let scrim_at = xml.find(r#"<a:alpha val="50000"/>"#).unwrap();
        assert!(picture_at < scrim_at);
        assert_eq!(xml.matches(r#"<a:off x="4572000" y="0"/><a:ext cx="4572000" cy="5143500"/>"#).count(), 2);
    }

    #[test]
    fn test_unknown_slide_type_renders_as_statement() {
        let json = r#"{
            "document": {
                "title": "Odd",
                "slides": [{"id": "x", "type": "hologram", "title": "Still here"}]
            },
            "style": {"themeKey": "doings"}
        }"#;
        let req: RenderRequest = serde_json::from_str(json).unwrap();
        let output = Compiler::default().compile(&req, None).unwrap();

        let summary = PptxReader::new().read_bytes(&output.bytes).unwrap();
        assert_eq!(summary.slides.len(), 1);
        assert!(summary.slides[0].texts.iter().any(|t| t == "Still here"));
        assert!(summary.slides[0].texts.iter().any(|t| t == "STATEMENT"));
    }

    #[test]
    fn test_notes_survive_packaging() {
        let notes = "Open with the numbers.\n\n  Then pause & ask <why>.";
        let slides = vec![Slide::new("s", SlideBody::Statement, "Numbers").with_notes(notes)];
        let output = Compiler::default()
            .compile(&request("Notes", slides, "doings-pro"), None)
            .unwrap();

        let summary = PptxReader::new().read_bytes(&output.bytes).unwrap();
        assert_eq!(summary.slides[0].notes, notes);
    }

    #[test]
    fn test_unknown_theme() {
        let req = request("Deck", statements(2), "neon");
        assert!(Compiler::default().compile(&req, None).is_ok());

        let strict = Compiler::new(CompilerOptions::default().with_fallback_theme(None));
        assert!(matches!(
            strict.compile(&req, None),
            Err(Error::UnknownTheme(key)) if key == "neon"
        ));
    }

    #[test]
    fn test_invalid_requests_fail_fast() {
        let compiler = Compiler::default();
        let empty = request("Empty", Vec::new(), "doings");
        assert!(matches!(compiler.compile(&empty, None), Err(Error::InvalidInput(_))));

        let zero = request("Deck", statements(2), "doings").with_parts(0);
        assert!(matches!(compiler.compile(&zero, None), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_control_character_in_slide_id_is_rejected() {
        let slide = Slide::new("bad\u{1}id", SlideBody::Statement, "Title")
            .with_image(SlideImage::new(PIXEL_PNG, Some("image/png")));
        let req = request("Deck", vec![slide], "doings");
        assert!(matches!(
            Compiler::default().compile(&req, None),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_cancelled_compile_returns_no_bytes() {
        let token = CancellationToken::new();
        token.cancel();
        let req = request("Deck", statements(12), "doings").with_parts(3);
        assert!(matches!(
            Compiler::default().compile(&req, Some(&token)),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn test_swedish_part_titles() {
        let compiler = Compiler::new(CompilerOptions::default().with_language(Language::Sv));
        let output = compiler
            .compile(&request("Plan", statements(4), "doings").with_parts(2), None)
            .unwrap();
        let mut archive = ZipArchive::new(Cursor::new(output.bytes.as_slice())).unwrap();
        let mut inner = Vec::new();
        archive
            .by_name("Plan_Part_2_of_2.pptx")
            .unwrap()
            .read_to_end(&mut inner)
            .unwrap();
        let summary = PptxReader::new().read_bytes(&inner).unwrap();
        assert_eq!(summary.title.as_deref(), Some("Plan (Del 2 av 2)"));
    }

    #[test]
    fn test_global_rotation_matches_whole_deck() {
        let slides = statements(6);
        let whole = Compiler::default()
            .compile(&request("Deck", slides.clone(), "doings-pro"), None)
            .unwrap();
        let split = Compiler::default()
            .compile(&request("Deck", slides, "doings-pro").with_parts(2), None)
            .unwrap();

        let read_slide = |bytes: &[u8], path: &str| {
            let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
            let mut xml = String::new();
            archive.by_name(path).unwrap().read_to_string(&mut xml).unwrap();
            xml
        };
        let mut archive = ZipArchive::new(Cursor::new(split.bytes.as_slice())).unwrap();
        let mut second = Vec::new();
        archive
            .by_name("Deck_Part_2_of_2.pptx")
            .unwrap()
            .read_to_end(&mut second)
            .unwrap();

        assert_eq!(
            read_slide(&whole.bytes, "ppt/slides/slide4.xml"),
            read_slide(&second, "ppt/slides/slide1.xml")
        );
    }
}
