//! Error types for slide deck compilation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling a slide deck.
///
/// Unknown slide types, missing optional fields and undecodable images are
/// recovered locally and never show up here.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The render request violates an input invariant.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The style references a theme key that is not registered and no
    /// fallback theme is configured.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// A user-supplied color is not a 6-digit hex triplet.
    #[error("Invalid color for {slot}: {value:?}")]
    InvalidColor { slot: String, value: String },

    /// Slide content cannot be encoded into the package format.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing or reading error.
    #[error("XML error: {0}")]
    XmlError(String),

    /// An attached image could not be decoded.
    #[error("Image error: {0}")]
    Image(String),

    /// The caller cancelled the render before it finished.
    #[error("Render cancelled")]
    Cancelled,
}
