//! Keyword guardrails
//!
//! Two advisory checks run against every user question: whether it is about
//! PCOS at all, and whether it mentions an emergency symptom. Matching is
//! plain substring containment on the lower-cased text. Neither check ever
//! blocks a turn on its own; the caller decides what to do with the result.

use serde::Serialize;

/// Substrings that mark a question as belonging to the PCOS domain
pub const TOPIC_KEYWORDS: [&str; 15] = [
    "pcos",
    "polycystic",
    "kista ovarium",
    "sindrom ovarium polikistik",
    "haid",
    "menstruasi",
    "siklus",
    "ovulasi",
    "androgen",
    "insulin",
    "metformin",
    "hirsutisme",
    "jerawat",
    "indeks glikemik",
    "kesuburan",
];

/// Substrings that indicate a possible medical emergency
pub const EMERGENCY_PHRASES: [&str; 8] = [
    "pendarahan berat",
    "pingsan",
    "nyeri perut hebat",
    "demam tinggi",
    "nyeri dada",
    "sesak napas",
    "kehamilan ektopik",
    "darurat",
];

/// Shown when the question mentions an emergency phrase
pub const EMERGENCY_NOTICE: &str = "Gejala yang Anda sebutkan dapat termasuk kegawatdaruratan. \
Segera cari pertolongan medis atau hubungi layanan gawat darurat.";

/// Shown when the question matches no topic keyword
pub const OFF_TOPIC_NOTICE: &str =
    "Aku fokus pada topik PCOS. Coba ajukan pertanyaan terkait PCOS ya 🙏";

fn contains_any(text: &str, needles: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    needles.iter().any(|needle| lowered.contains(needle))
}

/// True iff the text mentions at least one topic keyword
pub fn is_on_topic(text: &str) -> bool {
    contains_any(text, &TOPIC_KEYWORDS)
}

/// True iff the text mentions at least one emergency phrase
pub fn has_emergency_indicator(text: &str) -> bool {
    contains_any(text, &EMERGENCY_PHRASES)
}

/// A non-blocking notice raised by a guardrail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// Urgent: the user should seek medical help now
    Emergency,
    /// Informational: the question is outside the PCOS topic
    OffTopic,
}

impl Advisory {
    /// Text displayed to the user
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::Emergency => EMERGENCY_NOTICE,
            Advisory::OffTopic => OFF_TOPIC_NOTICE,
        }
    }

    /// Stable label for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Advisory::Emergency => "emergency",
            Advisory::OffTopic => "off_topic",
        }
    }
}

/// Run both guardrails; the emergency advisory, if any, comes first
pub fn evaluate(text: &str) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    if has_emergency_indicator(text) {
        advisories.push(Advisory::Emergency);
    }
    if !is_on_topic(text) {
        advisories.push(Advisory::OffTopic);
    }
    advisories
}
