//! Core document model, theme registry and layout engine for compiling
//! slide decks.
//!
//! Everything here is pure computation: a [`Document`] plus a
//! [`StyleConfig`] is laid out into [`RenderOps`] per slide, which the
//! packager crate serializes.

pub mod cancel;
pub mod composite;
pub mod deck;
pub mod decoration;
pub mod error;
pub mod layout;
pub mod locale;
pub mod normalize;
pub mod options;
pub mod render;
pub mod split;
pub mod theme;
pub mod types;

pub use cancel::CancellationToken;
pub use deck::{render_deck, render_slide, RenderedDeck, RenderedSlide};
pub use error::{Error, Result};
pub use layout::{LayoutFamily, LayoutStrategy, SlideContext};
pub use locale::{Labels, Language};
pub use normalize::{filename_stem, sanitize_title};
pub use options::{CompilerOptions, RotationMode};
pub use render::{Background, RenderOp, RenderOps};
pub use split::{chunk_sizes, split_document, DocumentPart};
pub use theme::{resolve_effective_theme, Color, Theme, ThemeKey};
pub use types::{
    BackgroundDecoration, BackgroundMode, Column, CustomColors, Document, FontFamily, FontPair,
    RenderRequest, Slide, SlideBody, SlideImage, SlideKind, StyleConfig, TimelineStep,
};
