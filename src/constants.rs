//! Application-wide constants and magic numbers
//!
//! Thresholds and template texts used by the enrichment pipeline live here
//! so the classifier and composer stay free of literals.

/// Conflict detection window
pub mod history {
    /// Lookback for opposite-direction signals on the same instrument (3 minutes)
    pub const RETENTION_WINDOW_MS: i64 = 3 * 60 * 1000;
}

/// Confidence tier thresholds (inclusive)
pub mod confidence {
    pub const HIGH_MAX_SPREAD: f64 = 0.5;
    pub const HIGH_MIN_LIQUIDITY: f64 = 1000.0;

    pub const MEDIUM_MAX_SPREAD: f64 = 1.0;
    pub const MEDIUM_MIN_LIQUIDITY: f64 = 500.0;
}

/// Default narrative texts for the AI summary block
pub mod ai {
    pub const DEFAULT_EXPLANATION: &str = "N/A";
    pub const DEFAULT_ADVISORY: &str = "Use proper risk management.";
}

/// Instrument directory seed
pub mod instruments {
    /// Selection map the dashboard starts with before the first refresh.
    pub const DEFAULT_TOKENS: &[(&str, u64)] = &[
        ("RELIANCE", 738561),
        ("TCS", 2953217),
        ("INFY", 408065),
        ("HDFCBANK", 341249),
        ("SBIN", 779521),
    ];
}

/// Feed envelope event names
pub mod feed {
    pub const TRADE_SIGNAL: &str = "tradeSignal";
    pub const SERVER_MESSAGE: &str = "serverMessage";
}

/// Logging event names for structured logging
pub mod events {
    pub const SIGNAL_ENRICHED: &str = "signal_enriched";
    pub const SIGNAL_REJECTED: &str = "signal_rejected";
    pub const SIGNAL_CONFLICT: &str = "signal_conflict";
    pub const HISTORY_LOADED: &str = "history_loaded";
    pub const INSTRUMENTS_LOADED: &str = "instruments_loaded";
}
