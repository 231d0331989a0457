//! Compiler configuration.

use crate::locale::Language;
use crate::theme::ThemeKey;
use serde::{Deserialize, Serialize};

/// How slide indices feed color rotation when a deck is split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RotationMode {
    /// Each slide keeps its position in the undivided deck, so parts continue
    /// each other visually.
    #[default]
    Global,
    /// Rotation restarts at 0 in every part.
    PerPart,
}

/// Options that shape a compilation but are not part of the request itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    /// Theme used for unknown theme keys. `None` rejects them.
    pub fallback_theme: Option<ThemeKey>,
    pub rotation: RotationMode,
    pub language: Language,
    pub author: String,
    pub subject: String,
    pub company: String,
    /// Package split parts concurrently.
    pub parallel_parts: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            fallback_theme: Some(ThemeKey::DEFAULT),
            rotation: RotationMode::Global,
            language: Language::En,
            author: "Keynote Builder".to_string(),
            subject: "Keynote Presentation".to_string(),
            company: "Generated with AI".to_string(),
            parallel_parts: true,
        }
    }
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_rotation(mut self, rotation: RotationMode) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_fallback_theme(mut self, fallback: Option<ThemeKey>) -> Self {
        self.fallback_theme = fallback;
        self
    }

    pub fn with_parallel_parts(mut self, parallel: bool) -> Self {
        self.parallel_parts = parallel;
        self
    }
}
