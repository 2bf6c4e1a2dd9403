//! Output normalization for finished predictions.

use crate::llm::types::PredictionOutput;

/// Join `output`, strip one leading echo of `cue` (case-insensitive), trim.
///
/// Returns `None` when nothing usable is left.
#[must_use]
pub fn normalize_output(output: &PredictionOutput, cue: &str) -> Option<String> {
    normalize_text(&output.joined(), cue)
}

#[must_use]
pub fn normalize_text(raw: &str, cue: &str) -> Option<String> {
    let text = raw.trim_start();
    let text = strip_prefix_ignore_case(text, cue).unwrap_or(text).trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}
