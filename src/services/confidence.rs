use crate::constants::confidence::{
    HIGH_MAX_SPREAD, HIGH_MIN_LIQUIDITY, MEDIUM_MAX_SPREAD, MEDIUM_MIN_LIQUIDITY,
};
use crate::signal::Confidence;

/// Tier from spread and liquidity. Thresholds are inclusive and the first
/// matching tier wins. A signal missing either input is Low.
pub fn classify(spread: Option<f64>, liquidity: Option<f64>) -> Confidence {
    let (Some(spread), Some(liquidity)) = (spread, liquidity) else {
        return Confidence::Low;
    };

    if spread <= HIGH_MAX_SPREAD && liquidity >= HIGH_MIN_LIQUIDITY {
        Confidence::High
    } else if spread <= MEDIUM_MAX_SPREAD && liquidity >= MEDIUM_MIN_LIQUIDITY {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}
