//! Localized captions and placeholder text.

use serde::{Deserialize, Serialize};

/// Output language for generated captions and placeholders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Sv,
}

/// Fixed strings the layouts draw alongside slide content.
#[derive(Debug)]
pub struct Labels {
    pub before: &'static str,
    pub after: &'static str,
    pub part: &'static str,
    pub of: &'static str,
    pub take_action: &'static str,
    pub insight: &'static str,
    pub insight_fallback: &'static str,
    pub aha_moment: &'static str,
    pub aha_prompt: &'static str,
    pub story: &'static str,
    pub takeaway: &'static str,
    pub takeaway_fallback: &'static str,
    pub resonate: &'static str,
    pub key_points: &'static str,
    pub step: &'static str,
    pub comparison: &'static str,
    pub timeline: &'static str,
    pub quote_fallback: &'static str,
    pub next_step: &'static str,
    pub fallback_subtitle: &'static str,
    pub fallback_intro_notes: &'static str,
    pub fallback_points_title: &'static str,
    pub fallback_points: &'static [&'static str],
    pub fallback_points_notes: &'static str,
    pub fallback_cta_title: &'static str,
    pub fallback_cta_subtitle: &'static str,
    pub fallback_cta_notes: &'static str,
}

static EN: Labels = Labels {
    before: "Before",
    after: "After",
    part: "Part",
    of: "of",
    take_action: "Take Action →",
    insight: "INSIGHT",
    insight_fallback: "Key insight for this slide.",
    aha_moment: "AHA MOMENT",
    aha_prompt: "Think about it. Have YOU tried this?",
    story: "STORY",
    takeaway: "TAKEAWAY",
    takeaway_fallback: "Key insight from this story.",
    resonate: "Does this resonate with you?",
    key_points: "KEY POINTS",
    step: "Step",
    comparison: "COMPARISON",
    timeline: "TIMELINE",
    quote_fallback: "Key quote for this slide.",
    next_step: "YOUR NEXT STEP",
    fallback_subtitle: "A Keynote Presentation",
    fallback_intro_notes: "Welcome everyone. Today we'll explore an important topic.",
    fallback_points_title: "Key Points",
    fallback_points: &[
        "Main insight from the content",
        "Supporting evidence",
        "Practical implications",
    ],
    fallback_points_notes: "Let me walk you through the key points we'll cover today.",
    fallback_cta_title: "Take Action",
    fallback_cta_subtitle: "Your next step starts now",
    fallback_cta_notes: "Thank you for your attention. Now it's time to take action.",
};

static SV: Labels = Labels {
    before: "Före",
    after: "Efter",
    part: "Del",
    of: "av",
    take_action: "Agera nu →",
    insight: "INSIKT",
    insight_fallback: "Nyckelinsikt för denna slide.",
    aha_moment: "AHA-MOMENT",
    aha_prompt: "Tänk på det. Har DU testat detta?",
    story: "HISTORIA",
    takeaway: "TAKEAWAY",
    takeaway_fallback: "Nyckelinsikt från denna historia.",
    resonate: "Resonerar detta med dig?",
    key_points: "NYCKELPUNKTER",
    step: "Steg",
    comparison: "JÄMFÖRELSE",
    timeline: "TIDSLINJE",
    quote_fallback: "Nyckelcitat för denna slide.",
    next_step: "DITT NÄSTA STEG",
    fallback_subtitle: "En keynote-presentation",
    fallback_intro_notes: "Välkomna allihop. Idag utforskar vi ett viktigt ämne.",
    fallback_points_title: "Nyckelpunkter",
    fallback_points: &[
        "Huvudinsikten från innehållet",
        "Stödjande belägg",
        "Praktiska konsekvenser",
    ],
    fallback_points_notes: "Låt mig gå igenom nyckelpunkterna vi tar upp idag.",
    fallback_cta_title: "Agera nu",
    fallback_cta_subtitle: "Ditt nästa steg börjar nu",
    fallback_cta_notes: "Tack för er uppmärksamhet. Nu är det dags att agera.",
};

impl Language {
    /// Parse a language code such as `"sv"`.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "sv" => Some(Self::Sv),
            _ => None,
        }
    }

    pub fn labels(&self) -> &'static Labels {
        match self {
            Self::En => &EN,
            Self::Sv => &SV,
        }
    }

    /// Title of one part of a split deck, e.g. `"Roadmap (Part 2 of 3)"`.
    pub fn part_title(&self, title: &str, number: usize, total: usize) -> String {
        let labels = self.labels();
        format!("{} ({} {} {} {})", title, labels.part, number, labels.of, total)
    }
}
