use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, error, info, warn};

use crate::bus::EventBus;
use crate::constants;
use crate::error::FeedError;
use crate::events::{Event, FeedEvent};

/// Text frame shape on the signal feed: `{"event": "...", "data": ...}`.
#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Decodes one text frame into a feed event. Unknown events and
/// undecodable frames yield None.
pub fn parse_frame(text: &str) -> Option<FeedEvent> {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(env) => env,
        Err(e) => {
            warn!("⚠ Failed to parse feed frame: {} ({})", text, e);
            return None;
        }
    };

    match envelope.event.as_str() {
        constants::feed::TRADE_SIGNAL => Some(FeedEvent::TradeSignal(envelope.data)),
        constants::feed::SERVER_MESSAGE => {
            let msg = match envelope.data {
                Value::String(s) => s,
                other => other.to_string(),
            };
            Some(FeedEvent::ServerMessage(msg))
        }
        other => {
            debug!("Ignoring feed event {:?}", other);
            None
        }
    }
}

/// Websocket reader for the backend signal feed. Owns reconnection; the
/// pipeline only sees the events it publishes.
#[derive(Clone)]
pub struct SignalFeed {
    url: String,
    reconnect_delay: Duration,
}

impl SignalFeed {
    pub fn new(url: impl Into<String>, reconnect_delay: Duration) -> Self {
        Self {
            url: url.into(),
            reconnect_delay,
        }
    }

    pub fn start(&self, bus: EventBus) -> JoinHandle<()> {
        let feed = self.clone();
        tokio::spawn(async move {
            loop {
                info!("Connecting to signal feed: {}", feed.url);
                match feed.run_once(&bus).await {
                    Ok(()) => warn!("⚠ Signal feed closed"),
                    Err(e) => {
                        error!("❌ Signal feed error: {}", e);
                        bus.publish(Event::Feed(FeedEvent::ConnectError(e.to_string())));
                    }
                }
                tokio::time::sleep(feed.reconnect_delay).await;
            }
        })
    }

    async fn run_once(&self, bus: &EventBus) -> Result<(), FeedError> {
        let (ws_stream, _) = connect_async(self.url.as_str()).await?;
        info!("✓ Signal feed connected");
        bus.publish(Event::Feed(FeedEvent::Connected));

        let (mut write, mut read) = ws_stream.split();
        let result = loop {
            let Some(msg) = read.next().await else {
                break Ok(());
            };
            match msg {
                Ok(Message::Text(text)) => {
                    if let Some(event) = parse_frame(&text) {
                        bus.publish(Event::Feed(event));
                    }
                }
                Ok(Message::Ping(ping)) => {
                    write.send(Message::Pong(ping)).await.ok();
                }
                Ok(Message::Close(_)) => break Ok(()),
                Ok(_) => {}
                Err(e) => break Err(FeedError::from(e)),
            }
        };

        bus.publish(Event::Feed(FeedEvent::Disconnected));
        result
    }
}
