//! PPTX (Office Open XML) packager for rendered slide decks.
//!
//! A [`Compiler`] takes a render request through layout, packages each
//! resulting deck as a `.pptx` ZIP archive and, for split requests, bundles
//! the parts into one archive. [`PptxReader`] reads produced files back.

mod archive;
pub mod bundle;
pub mod compile;
mod parts;
pub mod reader;
mod slide_xml;
pub mod writer;
mod xml;

pub use bundle::{part_filename, write_bundle, PackedPart};
pub use compile::{CompiledOutput, Compiler, PPTX_CONTENT_TYPE, ZIP_CONTENT_TYPE};
pub use reader::{DeckSummary, PptxReader, SlideSummary};
pub use writer::PptxWriter;
