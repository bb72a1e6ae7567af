//! Signal Desk - trading signal enrichment
//!
//! Takes raw pattern signals from the backend feed, adds order-book
//! analytics, a confidence tier and a conflict flag against recent history
//! for the same instrument, and keeps the resulting records for display.

pub mod api;
pub mod bus;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod events;
pub mod services;
pub mod signal;
pub mod transport;

// Re-export commonly used types
pub use bus::EventBus;
pub use config::AppConfig;
pub use events::{Event, FeedEvent};
pub use services::enrichment::{SharedContext, SignalContext};
pub use signal::{Confidence, Direction, EnrichedSignal, RawSignal};
