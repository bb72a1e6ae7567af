use chrono::Utc;
use std::sync::Arc;
use tracing::error;

use crate::services::enrichment::{lock, SharedContext};
use crate::transport::metadata::{MetadataApi, MetadataResult};

/// Runs metadata calls against the backend and folds their results, or
/// their failures, into the session context. No retries.
#[derive(Clone)]
pub struct MetadataSync {
    api: Arc<dyn MetadataApi>,
    context: SharedContext,
}

impl MetadataSync {
    pub fn new(api: Arc<dyn MetadataApi>, context: SharedContext) -> Self {
        Self { api, context }
    }

    fn report_failure(&self, prefix: &str, err: &dyn std::fmt::Display) {
        error!("{}: {}", prefix, err);
        lock(&self.context).record_status(&format!("❌ {}: {}", prefix, err), Utc::now());
    }

    fn report(&self, msg: &str) {
        lock(&self.context).record_status(msg, Utc::now());
    }

    pub async fn load_instruments(&self) -> MetadataResult<usize> {
        match self.api.fetch_instruments().await {
            Ok(instruments) => {
                lock(&self.context).apply_instruments(&instruments, Utc::now());
                Ok(instruments.len())
            }
            Err(e) => {
                self.report_failure("Failed to load stocks", &e);
                Err(e)
            }
        }
    }

    pub async fn load_history(&self) -> MetadataResult<usize> {
        match self.api.fetch_signal_history().await {
            Ok(snapshot) => {
                let retained = lock(&self.context).apply_history(snapshot, Utc::now());
                self.report(&format!("🕘 Loaded {} recent signals from history", retained));
                Ok(retained)
            }
            Err(e) => {
                self.report_failure("Failed to load signal history", &e);
                Err(e)
            }
        }
    }

    pub async fn set_interval(&self, interval_ms: u64) -> MetadataResult<u64> {
        match self.api.set_interval(interval_ms).await {
            Ok(ack) => {
                self.report(&format!("⏲ Interval set to {} ms", ack.interval));
                Ok(ack.interval)
            }
            Err(e) => {
                self.report_failure("Interval change failed", &e);
                Err(e)
            }
        }
    }

    /// Subscribes to the instruments behind the given selection labels.
    /// Labels the directory does not know are dropped.
    pub async fn subscribe(&self, labels: &[String]) -> MetadataResult<Vec<u64>> {
        let tokens = lock(&self.context).directory().tokens_for(labels);
        match self.api.subscribe(&tokens).await {
            Ok(()) => {
                self.report(&format!("🔄 Subscribed to stocks: {}", labels.join(", ")));
                Ok(tokens)
            }
            Err(e) => {
                self.report_failure("Subscription failed", &e);
                Err(e)
            }
        }
    }

    pub async fn add_symbol(&self, token: u64) -> MetadataResult<()> {
        let label = lock(&self.context).directory().resolve(token);
        match self.api.add_symbol(token).await {
            Ok(()) => {
                self.report(&format!("➕ Added {}", label));
                Ok(())
            }
            Err(e) => {
                self.report_failure("Failed to add symbol", &e);
                Err(e)
            }
        }
    }

    pub async fn remove_symbol(&self, token: u64) -> MetadataResult<()> {
        let label = lock(&self.context).directory().resolve(token);
        match self.api.remove_symbol(token).await {
            Ok(()) => {
                self.report(&format!("➖ Removed {}", label));
                Ok(())
            }
            Err(e) => {
                self.report_failure("Failed to remove symbol", &e);
                Err(e)
            }
        }
    }

    pub async fn reset_symbols(&self) -> MetadataResult<()> {
        match self.api.reset_symbols().await {
            Ok(()) => {
                self.report("♻️ Symbols reset");
                Ok(())
            }
            Err(e) => {
                self.report_failure("Failed to reset symbols", &e);
                Err(e)
            }
        }
    }
}
