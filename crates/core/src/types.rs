//! Domain types for slide deck documents and render requests.

use crate::error::{Error, Result};
use crate::locale::Language;
use crate::normalize::sanitize_title;
use crate::theme::{Color, ThemeKey};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A complete render request as received from a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    /// The slide deck to compile.
    pub document: Document,

    /// Visual style for the whole deck.
    pub style: StyleConfig,

    /// Number of files to split the deck into. `None` means one file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<i64>,
}

impl RenderRequest {
    /// Create a single-file request.
    pub fn new(document: Document, style: StyleConfig) -> Self {
        Self {
            document,
            style,
            parts: None,
        }
    }

    /// Request the deck split into `parts` files.
    pub fn with_parts(mut self, parts: i64) -> Self {
        self.parts = Some(parts);
        self
    }

    /// The validated part count (at least 1).
    pub fn part_count(&self) -> Result<usize> {
        match self.parts {
            None => Ok(1),
            Some(n) if n >= 1 => usize::try_from(n)
                .map_err(|_| Error::InvalidInput(format!("parts out of range: {}", n))),
            Some(n) => Err(Error::InvalidInput(format!(
                "parts must be a positive integer, got {}",
                n
            ))),
        }
    }

    /// Check every input invariant without rendering anything.
    pub fn validate(&self) -> Result<()> {
        self.document.validate()?;
        self.style.validate()?;
        self.part_count()?;
        Ok(())
    }
}

/// A slide deck: a title and its ordered slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Deck title, used for metadata and output filenames.
    pub title: String,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Document {
    /// Create a new document.
    pub fn new(title: impl Into<String>, slides: Vec<Slide>) -> Self {
        Self {
            title: title.into(),
            slides,
        }
    }

    /// Reject documents that cannot be rendered at all.
    pub fn validate(&self) -> Result<()> {
        if self.slides.is_empty() {
            return Err(Error::InvalidInput("document has no slides".to_string()));
        }
        Ok(())
    }

    /// Title reduced to `[A-Za-z0-9]`, for use in filenames.
    pub fn sanitized_title(&self) -> String {
        sanitize_title(&self.title)
    }

    /// Assign `slide-{n}` ids to slides whose id is empty or already taken.
    pub fn with_unique_ids(mut self) -> Self {
        let mut seen = HashSet::new();
        for (idx, slide) in self.slides.iter_mut().enumerate() {
            if slide.id.trim().is_empty() || !seen.insert(slide.id.clone()) {
                let mut candidate = format!("slide-{}", idx + 1);
                while seen.contains(&candidate) {
                    candidate.push('x');
                }
                log::debug!("Reassigning slide id '{}' -> '{}'", slide.id, candidate);
                slide.id = candidate.clone();
                seen.insert(candidate);
            }
        }
        self
    }

    /// The minimal three-slide deck substituted when content generation
    /// produced something unusable.
    pub fn fallback(topic: &str, language: Language) -> Self {
        let labels = language.labels();
        let slides = vec![
            Slide::new("slide-1", SlideBody::Statement, topic)
                .with_subtitle(labels.fallback_subtitle)
                .with_notes(labels.fallback_intro_notes),
            Slide::new(
                "slide-2",
                SlideBody::List {
                    items: labels
                        .fallback_points
                        .iter()
                        .map(|p| p.to_string())
                        .collect(),
                },
                labels.fallback_points_title,
            )
            .with_notes(labels.fallback_points_notes),
            Slide::new("slide-3", SlideBody::Cta, labels.fallback_cta_title)
                .with_subtitle(labels.fallback_cta_subtitle)
                .with_notes(labels.fallback_cta_notes),
        ];
        Self::new(topic, slides)
    }
}

/// The six slide layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    Statement,
    Story,
    List,
    Comparison,
    Timeline,
    Cta,
}

impl SlideKind {
    pub const ALL: [SlideKind; 6] = [
        SlideKind::Statement,
        SlideKind::Story,
        SlideKind::List,
        SlideKind::Comparison,
        SlideKind::Timeline,
        SlideKind::Cta,
    ];

    /// Parse a wire type name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "statement" => Some(Self::Statement),
            "story" => Some(Self::Story),
            "list" => Some(Self::List),
            "comparison" => Some(Self::Comparison),
            "timeline" => Some(Self::Timeline),
            "cta" => Some(Self::Cta),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Statement => "statement",
            Self::Story => "story",
            Self::List => "list",
            Self::Comparison => "comparison",
            Self::Timeline => "timeline",
            Self::Cta => "cta",
        }
    }
}

/// A named column of a comparison slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    pub title: String,
    pub items: Vec<String>,
}

/// One step of a timeline slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineStep {
    pub title: String,
    pub description: String,
}

/// Type-specific slide content.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideBody {
    Statement,
    Story {
        quote: Option<String>,
        attribution: Option<String>,
    },
    List {
        items: Vec<String>,
    },
    Comparison {
        left: Option<Column>,
        right: Option<Column>,
    },
    Timeline {
        steps: Vec<TimelineStep>,
    },
    Cta,
}

impl SlideBody {
    pub fn kind(&self) -> SlideKind {
        match self {
            Self::Statement => SlideKind::Statement,
            Self::Story { .. } => SlideKind::Story,
            Self::List { .. } => SlideKind::List,
            Self::Comparison { .. } => SlideKind::Comparison,
            Self::Timeline { .. } => SlideKind::Timeline,
            Self::Cta => SlideKind::Cta,
        }
    }
}

/// A raster image attached to a slide, still base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ImageWire", rename_all = "camelCase")]
pub struct SlideImage {
    /// Base64 payload.
    pub data: String,

    /// Declared MIME type, if the producer sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl SlideImage {
    pub fn new(data: impl Into<String>, mime_type: Option<&str>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.map(str::to_string),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL. Anything else is taken
    /// as a bare base64 payload.
    pub fn from_data_url(url: &str) -> Self {
        match url.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
            Some((meta, payload)) => {
                let mime = meta.trim_end_matches(";base64");
                Self::new(payload, (!mime.is_empty()).then_some(mime))
            }
            None => Self::new(url, None),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImageWire {
    Inline {
        data: String,
        #[serde(default, rename = "mimeType")]
        mime_type: Option<String>,
    },
    DataUrl(String),
}

impl From<ImageWire> for SlideImage {
    fn from(wire: ImageWire) -> Self {
        match wire {
            ImageWire::Inline { data, mime_type } => Self { data, mime_type },
            ImageWire::DataUrl(url) => Self::from_data_url(&url),
        }
    }
}

/// A single slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSlide", into = "RawSlide")]
pub struct Slide {
    /// Generator-assigned id, unique within a document.
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    /// Speaker notes, attached to the rendered slide verbatim.
    pub speaker_notes: String,
    pub image: Option<SlideImage>,
    pub body: SlideBody,
}

impl Slide {
    /// Create a slide with no subtitle, notes or image.
    pub fn new(id: impl Into<String>, body: SlideBody, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            speaker_notes: String::new(),
            image: None,
            body,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.speaker_notes = notes.into();
        self
    }

    pub fn with_image(mut self, image: SlideImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn kind(&self) -> SlideKind {
        self.body.kind()
    }
}

/// Flat wire representation of a slide, as emitted by the content producer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSlide {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    left_column: Option<Column>,
    #[serde(skip_serializing_if = "Option::is_none")]
    right_column: Option<Column>,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<Vec<TimelineStep>>,
    speaker_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<SlideImage>,
}

/// Treat blank strings as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<RawSlide> for Slide {
    fn from(raw: RawSlide) -> Self {
        let kind = SlideKind::parse(&raw.kind).unwrap_or_else(|| {
            log::warn!(
                "Unknown slide type '{}' on slide '{}', rendering as statement",
                raw.kind,
                raw.id
            );
            SlideKind::Statement
        });

        let body = match kind {
            SlideKind::Statement => SlideBody::Statement,
            SlideKind::Story => SlideBody::Story {
                quote: present(raw.quote),
                attribution: present(raw.attribution),
            },
            SlideKind::List => SlideBody::List {
                items: raw.content.unwrap_or_default(),
            },
            SlideKind::Comparison => SlideBody::Comparison {
                left: raw.left_column,
                right: raw.right_column,
            },
            SlideKind::Timeline => SlideBody::Timeline {
                steps: raw.steps.unwrap_or_default(),
            },
            SlideKind::Cta => SlideBody::Cta,
        };

        Self {
            id: raw.id,
            title: present(raw.title).unwrap_or_else(|| "Untitled Slide".to_string()),
            subtitle: present(raw.subtitle),
            speaker_notes: raw.speaker_notes.unwrap_or_default(),
            image: raw.image,
            body,
        }
    }
}

impl From<Slide> for RawSlide {
    fn from(slide: Slide) -> Self {
        let mut raw = RawSlide {
            id: slide.id,
            kind: slide.body.kind().as_str().to_string(),
            title: Some(slide.title),
            subtitle: slide.subtitle,
            speaker_notes: Some(slide.speaker_notes),
            image: slide.image,
            ..RawSlide::default()
        };

        match slide.body {
            SlideBody::Statement | SlideBody::Cta => {}
            SlideBody::Story { quote, attribution } => {
                raw.quote = quote;
                raw.attribution = attribution;
            }
            SlideBody::List { items } => raw.content = Some(items),
            SlideBody::Comparison { left, right } => {
                raw.left_column = left;
                raw.right_column = right;
            }
            SlideBody::Timeline { steps } => raw.steps = Some(steps),
        }

        raw
    }
}

/// Slide background treatment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    #[default]
    Dark,
    Light,
    Gradient,
}

/// Typeface family for the whole deck.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    #[default]
    Modern,
    Classic,
    Tech,
}

/// Title and body typefaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontPair {
    pub title: &'static str,
    pub body: &'static str,
}

impl FontFamily {
    pub fn fonts(&self) -> FontPair {
        match self {
            Self::Modern => FontPair {
                title: "Arial",
                body: "Arial",
            },
            Self::Classic => FontPair {
                title: "Georgia",
                body: "Georgia",
            },
            Self::Tech => FontPair {
                title: "Consolas",
                body: "Consolas",
            },
        }
    }
}

/// Optional decorative shapes drawn behind slide content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundDecoration {
    /// A thin accent bar along the bottom edge.
    Stripe,
    /// A short row of dots in the top-right corner.
    Dots,
    /// Two outlined rings in the bottom-right corner.
    Rings,
}

/// Five user-chosen colors for the `custom` theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomColors {
    pub color1: String,
    pub color2: String,
    pub color3: String,
    pub color4: String,
    pub color5: String,
}

impl CustomColors {
    /// Parse all five slots, in slot order.
    pub fn parse(&self) -> Result<[Color; 5]> {
        let slots = [
            ("color1", &self.color1),
            ("color2", &self.color2),
            ("color3", &self.color3),
            ("color4", &self.color4),
            ("color5", &self.color5),
        ];

        let mut colors = [Color::BLACK; 5];
        for (color, (slot, value)) in colors.iter_mut().zip(slots) {
            *color = Color::parse_hex(value).ok_or_else(|| Error::InvalidColor {
                slot: slot.to_string(),
                value: value.to_string(),
            })?;
        }
        Ok(colors)
    }
}

/// Style configuration for a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    /// Registry key of the theme (see [`ThemeKey`]).
    #[serde(alias = "palette")]
    pub theme_key: String,

    #[serde(default, alias = "backgroundStyle")]
    pub background_mode: BackgroundMode,

    #[serde(default, alias = "fontStyle")]
    pub font_family: FontFamily,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_decoration: Option<BackgroundDecoration>,

    /// Required exactly when `theme_key` is `custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_colors: Option<CustomColors>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            theme_key: ThemeKey::DEFAULT.as_str().to_string(),
            background_mode: BackgroundMode::default(),
            font_family: FontFamily::default(),
            background_decoration: None,
            custom_colors: None,
        }
    }
}

impl StyleConfig {
    /// Create a style for the given theme key with default options.
    pub fn themed(theme_key: impl Into<String>) -> Self {
        Self {
            theme_key: theme_key.into(),
            ..Self::default()
        }
    }

    /// `custom_colors` must be present exactly when the theme is `custom`.
    pub fn validate(&self) -> Result<()> {
        let is_custom = ThemeKey::parse(&self.theme_key) == Some(ThemeKey::Custom);
        match (is_custom, &self.custom_colors) {
            (true, None) => Err(Error::InvalidInput(
                "theme 'custom' requires customColors".to_string(),
            )),
            (false, Some(_)) => Err(Error::InvalidInput(format!(
                "customColors given for non-custom theme '{}'",
                self.theme_key
            ))),
            (true, Some(colors)) => colors.parse().map(|_| ()),
            (false, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_slide() {
        let json = r#"{
            "id": "s1",
            "type": "comparison",
            "title": "Then vs now",
            "leftColumn": {"title": "Then", "items": ["Slow"]},
            "speakerNotes": "Compare."
        }"#;
        let slide: Slide = serde_json::from_str(json).unwrap();

        assert_eq!(slide.kind(), SlideKind::Comparison);
        assert_eq!(slide.speaker_notes, "Compare.");
        match slide.body {
            SlideBody::Comparison { left, right } => {
                assert_eq!(left.unwrap().items, vec!["Slow"]);
                assert!(right.is_none());
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_becomes_statement() {
        let json = r#"{"id": "s1", "type": "hologram", "title": "Beam me up"}"#;
        let slide: Slide = serde_json::from_str(json).unwrap();
        assert_eq!(slide.kind(), SlideKind::Statement);
        assert_eq!(slide.title, "Beam me up");
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let slide: Slide = serde_json::from_str(r#"{"type": "list"}"#).unwrap();
        assert_eq!(slide.title, "Untitled Slide");
        assert_eq!(slide.speaker_notes, "");
        assert_eq!(slide.body, SlideBody::List { items: vec![] });
    }

    #[test]
    fn test_attribution_is_kept_verbatim() {
        let json = r#"{"type": "story", "title": "T", "quote": "Q", "attribution": "A. Person"}"#;
        let slide: Slide = serde_json::from_str(json).unwrap();
        assert_eq!(
            slide.body,
            SlideBody::Story {
                quote: Some("Q".to_string()),
                attribution: Some("A. Person".to_string()),
            }
        );
    }

    #[test]
    fn test_image_wire_forms() {
        let inline: SlideImage =
            serde_json::from_str(r#"{"data": "AAAA", "mimeType": "image/png"}"#).unwrap();
        assert_eq!(inline, SlideImage::new("AAAA", Some("image/png")));

        let url: SlideImage = serde_json::from_str(r#""data:image/jpeg;base64,BBBB""#).unwrap();
        assert_eq!(url, SlideImage::new("BBBB", Some("image/jpeg")));

        let bare: SlideImage = serde_json::from_str(r#""CCCC""#).unwrap();
        assert_eq!(bare, SlideImage::new("CCCC", None));
    }

    #[test]
    fn test_slide_wire_roundtrip_keeps_type() {
        let slide = Slide::new(
            "s9",
            SlideBody::Timeline {
                steps: vec![TimelineStep {
                    title: "One".to_string(),
                    description: "First".to_string(),
                }],
            },
            "Roadmap",
        );
        let json = serde_json::to_string(&slide).unwrap();
        assert!(json.contains(r#""type":"timeline""#));
        let back: Slide = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slide);
    }

    #[test]
    fn test_document_validate_rejects_empty() {
        let doc = Document::new("Empty", vec![]);
        assert!(matches!(doc.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_unique_ids_assigned() {
        let doc = Document::new(
            "Deck",
            vec![
                Slide::new("a", SlideBody::Statement, "One"),
                Slide::new("a", SlideBody::Statement, "Two"),
                Slide::new("", SlideBody::Cta, "Three"),
            ],
        )
        .with_unique_ids();

        let ids: Vec<&str> = doc.slides.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "slide-2", "slide-3"]);
    }

    #[test]
    fn test_part_count_validation() {
        let request = RenderRequest::new(Document::fallback("Topic", Language::En), StyleConfig::default());
        assert_eq!(request.part_count().unwrap(), 1);
        assert_eq!(request.clone().with_parts(3).part_count().unwrap(), 3);
        assert!(request.clone().with_parts(0).part_count().is_err());
        assert!(request.with_parts(-2).validate().is_err());
    }

    #[test]
    fn test_style_custom_colors_invariant() {
        let mut style = StyleConfig::themed("custom");
        assert!(style.validate().is_err());

        style.custom_colors = Some(CustomColors {
            color1: "E85A9C".to_string(),
            color2: "F5A68C".to_string(),
            color3: "0D0D14".to_string(),
            color4: "1A1A2E".to_string(),
            color5: "FFFFFF".to_string(),
        });
        assert!(style.validate().is_ok());

        style.theme_key = "bold".to_string();
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_style_accepts_legacy_field_names() {
        let json = r#"{"palette": "corporate", "backgroundStyle": "light", "fontStyle": "tech"}"#;
        let style: StyleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(style.theme_key, "corporate");
        assert_eq!(style.background_mode, BackgroundMode::Light);
        assert_eq!(style.font_family, FontFamily::Tech);
    }

    #[test]
    fn test_fallback_document_shape() {
        let doc = Document::fallback("Leadership", Language::En);
        let kinds: Vec<SlideKind> = doc.slides.iter().map(Slide::kind).collect();
        assert_eq!(
            kinds,
            vec![SlideKind::Statement, SlideKind::List, SlideKind::Cta]
        );
        assert_eq!(doc.title, "Leadership");
        assert_eq!(doc.slides[0].title, "Leadership");
    }
}
