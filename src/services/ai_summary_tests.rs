//! Unit tests for AI summary defaulting.

#[cfg(test)]
mod ai_summary_tests {
    use crate::services::ai_summary::compose;
    use crate::signal::{AiFields, Confidence, Direction, RawSignal};

    fn signal() -> RawSignal {
        RawSignal {
            instrument: 2953217,
            pattern: "Hammer".to_string(),
            direction: Direction::Long,
            entry: 3520.5,
            stop_loss: 3490.0,
            target: 3580.0,
            spread: Some(0.3),
            liquidity: Some(2000.0),
            tick: None,
            ai: AiFields::default(),
        }
    }

    #[test]
    fn test_all_defaults() {
        let s = signal();
        let ai = compose(&AiFields::default(), &s, Confidence::High);

        assert_eq!(ai.explanation, "N/A");
        assert_eq!(ai.plan, "Buy at ₹3520.5, SL ₹3490, TGT ₹3580");
        assert_eq!(ai.confidence_review, "Confidence: High");
        assert_eq!(ai.advisory, "Use proper risk management.");
    }

    #[test]
    fn test_supplied_fields_are_kept() {
        let supplied = AiFields {
            explanation: Some("Strong reversal off support".to_string()),
            plan: None,
            confidence_review: Some("Reviewed manually".to_string()),
            advisory: None,
        };
        let ai = compose(&supplied, &signal(), Confidence::Low);

        assert_eq!(ai.explanation, "Strong reversal off support");
        assert_eq!(ai.plan, "Buy at ₹3520.5, SL ₹3490, TGT ₹3580");
        assert_eq!(ai.confidence_review, "Reviewed manually");
        assert_eq!(ai.advisory, "Use proper risk management.");
    }

    #[test]
    fn test_fully_supplied_is_untouched() {
        let supplied = AiFields {
            explanation: Some("a".to_string()),
            plan: Some("b".to_string()),
            confidence_review: Some("c".to_string()),
            advisory: Some("d".to_string()),
        };
        let ai = compose(&supplied, &signal(), Confidence::Medium);

        assert_eq!(ai.explanation, "a");
        assert_eq!(ai.plan, "b");
        assert_eq!(ai.confidence_review, "c");
        assert_eq!(ai.advisory, "d");
    }

    #[test]
    fn test_empty_strings_are_defaulted() {
        let supplied = AiFields {
            explanation: Some(String::new()),
            plan: Some(String::new()),
            confidence_review: Some(String::new()),
            advisory: Some(String::new()),
        };
        let ai = compose(&supplied, &signal(), Confidence::Medium);

        assert_eq!(ai.explanation, "N/A");
        assert_eq!(ai.confidence_review, "Confidence: Medium");
        assert!(ai.plan.starts_with("Buy at ₹"));
    }
}
