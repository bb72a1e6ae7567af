//! Unit tests for the confidence classifier.

#[cfg(test)]
mod confidence_tests {
    use crate::services::confidence::classify;
    use crate::signal::Confidence;

    #[test]
    fn test_high_at_boundary() {
        assert_eq!(classify(Some(0.5), Some(1000.0)), Confidence::High);
    }

    #[test]
    fn test_high_well_inside() {
        assert_eq!(classify(Some(0.1), Some(50_000.0)), Confidence::High);
    }

    #[test]
    fn test_spread_just_above_high_falls_to_medium() {
        assert_eq!(classify(Some(0.5001), Some(1000.0)), Confidence::Medium);
    }

    #[test]
    fn test_liquidity_just_below_high_falls_to_medium() {
        assert_eq!(classify(Some(0.5), Some(999.99)), Confidence::Medium);
    }

    #[test]
    fn test_medium_at_boundary() {
        assert_eq!(classify(Some(1.0), Some(500.0)), Confidence::Medium);
    }

    #[test]
    fn test_spread_just_above_medium_is_low() {
        assert_eq!(classify(Some(1.0001), Some(5000.0)), Confidence::Low);
    }

    #[test]
    fn test_liquidity_just_below_medium_is_low() {
        assert_eq!(classify(Some(0.2), Some(499.99)), Confidence::Low);
    }

    #[test]
    fn test_tight_spread_thin_book_is_low() {
        assert_eq!(classify(Some(0.0), Some(0.0)), Confidence::Low);
    }

    #[test]
    fn test_missing_inputs_are_low() {
        assert_eq!(classify(None, Some(5000.0)), Confidence::Low);
        assert_eq!(classify(Some(0.1), None), Confidence::Low);
        assert_eq!(classify(None, None), Confidence::Low);
    }

    #[test]
    fn test_classify_is_pure() {
        let first = classify(Some(0.8), Some(700.0));
        for _ in 0..10 {
            assert_eq!(classify(Some(0.8), Some(700.0)), first);
        }
        assert_eq!(first, Confidence::Medium);
    }
}
