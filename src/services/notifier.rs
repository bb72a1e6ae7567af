use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::bus::EventBus;
use crate::events::Event;
use crate::signal::EnrichedSignal;

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn for_signal(signal: &EnrichedSignal) -> Self {
        Self {
            title: format!("🚨 {} - {}", signal.stock_name, signal.pattern),
            body: format!(
                "Direction: {}\nEntry: ₹{} | SL: ₹{}",
                signal.direction, signal.entry, signal.stop_loss
            ),
        }
    }
}

/// Turns enriched signals into notifications. Delivery to a desktop is
/// outside this crate; notifications go to the log.
pub struct Notifier {
    event_bus: EventBus,
}

impl Notifier {
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }

    pub fn start(&self) -> JoinHandle<()> {
        let mut rx = self.event_bus.subscribe();

        tokio::spawn(async move {
            info!("🔔 Notifier started");
            loop {
                match rx.recv().await {
                    Ok(Event::Enriched(signal)) => {
                        let n = Notification::for_signal(&signal);
                        info!("{} | {}", n.title, n.body.replace('\n', " | "));
                    }
                    Ok(Event::Rejected(rejected)) => {
                        warn!("🚫 Signal rejected ({}): {}", rejected.kind, rejected.reason);
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("⚠ Notifier lagged, {} events dropped", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
