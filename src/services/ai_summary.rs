use crate::constants::ai::{DEFAULT_ADVISORY, DEFAULT_EXPLANATION};
use crate::signal::{AiFields, AiSummary, Confidence, RawSignal};

fn keep_or(supplied: &Option<String>, default: impl FnOnce() -> String) -> String {
    match supplied {
        Some(text) if !text.is_empty() => text.clone(),
        _ => default(),
    }
}

/// Fills each unset narrative field with a deterministic default. Text the
/// caller supplied is kept as is.
pub fn compose(supplied: &AiFields, signal: &RawSignal, confidence: Confidence) -> AiSummary {
    AiSummary {
        explanation: keep_or(&supplied.explanation, || DEFAULT_EXPLANATION.to_string()),
        plan: keep_or(&supplied.plan, || {
            format!(
                "Buy at ₹{}, SL ₹{}, TGT ₹{}",
                signal.entry, signal.stop_loss, signal.target
            )
        }),
        confidence_review: keep_or(&supplied.confidence_review, || {
            format!("Confidence: {}", confidence)
        }),
        advisory: keep_or(&supplied.advisory, || DEFAULT_ADVISORY.to_string()),
    }
}
