//! Disclaimer enforcement for generated answers

/// Lower-case marker whose presence means an answer already carries a disclaimer
pub const DISCLAIMER_MARKER: &str = "informasi edukatif, bukan nasihat medis";

/// Sentence appended to answers that lack the marker
pub const DISCLAIMER: &str = "*Disclaimer: informasi edukatif, bukan nasihat medis individual.*";

/// Append the disclaimer unless the answer already contains the marker
/// (case-insensitive). Idempotent.
pub fn ensure_disclaimer(text: &str) -> String {
    if text.to_lowercase().contains(DISCLAIMER_MARKER) {
        return text.to_string();
    }
    format!("{}\n\n{}", text.trim_end(), DISCLAIMER)
}
