use chrono::{DateTime, Utc};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::bus::EventBus;
use crate::events::{Event, FeedEvent, RejectedSignal};
use crate::services::enrichment::{lock, Dispatch, SharedContext};

/// Feeds bus events into the synchronous pipeline, one at a time and in
/// arrival order, and publishes what comes out.
pub struct SignalEngine {
    event_bus: EventBus,
    context: SharedContext,
}

impl SignalEngine {
    pub fn new(event_bus: EventBus, context: SharedContext) -> Self {
        Self { event_bus, context }
    }

    pub fn start(&self) -> JoinHandle<()> {
        let mut rx = self.event_bus.subscribe();
        let bus = self.event_bus.clone();
        let context = self.context.clone();

        tokio::spawn(async move {
            info!("🧠 Signal Engine Started");
            loop {
                match rx.recv().await {
                    Ok(Event::Feed(feed_event)) => {
                        Self::process(&context, &bus, feed_event, Utc::now());
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        Self::record_dropped(&context, skipped, Utc::now());
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            warn!("⚠ Signal Engine stopped: event bus closed");
        })
    }

    /// Reports feed events lost to a lagging receiver in the status log.
    pub fn record_dropped(context: &SharedContext, skipped: u64, now: DateTime<Utc>) {
        warn!("⚠ Signal Engine lagged, {} events dropped", skipped);
        lock(context).record_status(&format!("⚠️ Dropped {} feed events (engine lagging)", skipped), now);
    }

    /// Runs one feed event through the context and publishes the outcome.
    pub fn process(context: &SharedContext, bus: &EventBus, event: FeedEvent, now: DateTime<Utc>) {
        let payload = match &event {
            FeedEvent::TradeSignal(payload) => Some(payload.clone()),
            _ => None,
        };

        let outcome = lock(context).handle(event, now);
        match outcome {
            Ok(Dispatch::Enriched(signal)) => {
                bus.publish(Event::Enriched(signal));
            }
            Ok(Dispatch::Status(_)) => {}
            Err(e) => {
                bus.publish(Event::Rejected(RejectedSignal {
                    kind: e.kind(),
                    reason: e.to_string(),
                    payload: payload.unwrap_or_default(),
                }));
            }
        }
    }
}
