use serde_json::Value;

use crate::signal::EnrichedSignal;

/// Inbound notifications from the signal feed transport.
#[derive(Clone, Debug)]
pub enum FeedEvent {
    Connected,
    Disconnected,
    ConnectError(String),
    ServerMessage(String),
    /// Undecoded signal payload; validation happens in the pipeline
    TradeSignal(Value),
}

#[derive(Clone, Debug)]
pub struct RejectedSignal {
    pub kind: &'static str,
    pub reason: String,
    pub payload: Value,
}

// Global Event Enum
#[derive(Clone, Debug)]
pub enum Event {
    Feed(FeedEvent),
    Enriched(EnrichedSignal),
    Rejected(RejectedSignal),
}
