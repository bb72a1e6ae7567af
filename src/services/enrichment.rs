//! Enrichment orchestrator.
//!
//! `SignalContext` owns all session state (instrument directory, history
//! store, output sequence, status log) and runs one raw signal to completion
//! per call. It performs no I/O and takes the clock as an argument, so a
//! fresh context is a fully isolated pipeline.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::constants;
use crate::data::history::{HistoryEntry, HistorySnapshot, HistoryStore};
use crate::data::instruments::{Instrument, InstrumentDirectory};
use crate::error::SignalError;
use crate::events::FeedEvent;
use crate::services::{ai_summary, confidence, depth, status_log::StatusLog};
use crate::signal::{EnrichedSignal, RawSignal};

pub type SharedContext = Arc<Mutex<SignalContext>>;

/// Locks a shared context, recovering the state if a holder panicked.
pub fn lock(ctx: &SharedContext) -> MutexGuard<'_, SignalContext> {
    ctx.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// What a dispatched feed event produced.
#[derive(Clone, Debug)]
pub enum Dispatch {
    Status(String),
    Enriched(EnrichedSignal),
}

#[derive(Clone, Debug)]
pub struct SignalContext {
    directory: InstrumentDirectory,
    history: HistoryStore,
    signals: VecDeque<EnrichedSignal>,
    signal_limit: Option<usize>,
    log: StatusLog,
}

impl Default for SignalContext {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

impl SignalContext {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            directory: InstrumentDirectory::new(),
            history: HistoryStore::new(config.retention_window_ms),
            signals: VecDeque::new(),
            signal_limit: config.signal_limit,
            log: StatusLog::new(config.message_limit),
        }
    }

    pub fn shared(self) -> SharedContext {
        Arc::new(Mutex::new(self))
    }

    /// Runs resolve → depth → confidence → conflict → AI summary and
    /// prepends the result to the output sequence.
    pub fn enrich(&mut self, raw: RawSignal, now: DateTime<Utc>) -> EnrichedSignal {
        let stock_name = self.directory.resolve(raw.instrument);
        let depth = depth::analyze(&raw);
        let confidence = confidence::classify(raw.spread, raw.liquidity);

        let candidate = HistoryEntry {
            stock: stock_name.clone(),
            pattern: raw.pattern.clone(),
            direction: raw.direction,
            timestamp: now.timestamp_millis(),
        };
        let conflict = self
            .history
            .check_and_record(raw.instrument, candidate, now.timestamp_millis());
        if conflict {
            warn!(
                event = constants::events::SIGNAL_CONFLICT,
                "⚠ Conflicting {} signal for {} within {} ms",
                raw.direction,
                stock_name,
                self.history.window_ms()
            );
        }

        let ai = ai_summary::compose(&raw.ai, &raw, confidence);

        let signal = EnrichedSignal {
            id: Uuid::new_v4(),
            stock: raw.instrument,
            stock_name,
            pattern: raw.pattern,
            direction: raw.direction,
            entry: raw.entry,
            stop_loss: raw.stop_loss,
            target1: raw.target,
            spread: raw.spread,
            liquidity: raw.liquidity,
            live_tick_data: raw.tick,
            enriched_at: now,
            total_buy: depth.total_buy,
            total_sell: depth.total_sell,
            best_bid: depth.best_bid,
            best_ask: depth.best_ask,
            depth_check_passed: depth.depth_check_passed,
            live_vwap: depth.live_vwap,
            live_rsi: depth.live_rsi,
            price_deviation: depth.price_deviation,
            confidence,
            conflict,
            ai,
        };

        info!(
            event = constants::events::SIGNAL_ENRICHED,
            stock = signal.stock,
            confidence = %signal.confidence,
            depth_ok = signal.depth_check_passed,
            conflict = signal.conflict,
            "Received signal {} {}",
            signal.stock_name,
            signal.direction
        );

        self.signals.push_front(signal.clone());
        if let Some(limit) = self.signal_limit {
            self.signals.truncate(limit);
        }
        self.log.push(
            &format!("🚀 Signal for {} ({})", signal.stock_name, signal.pattern),
            now,
        );
        signal
    }

    /// Validates a feed payload, then enriches it. A malformed payload
    /// leaves history and the output sequence untouched.
    pub fn enrich_payload(&mut self, payload: Value, now: DateTime<Utc>) -> Result<EnrichedSignal, SignalError> {
        match RawSignal::from_value(payload) {
            Ok(raw) => Ok(self.enrich(raw, now)),
            Err(e) => {
                warn!(event = constants::events::SIGNAL_REJECTED, kind = e.kind(), "❌ {}", e);
                self.log.push(&format!("❌ Rejected signal: {}", e), now);
                Err(e)
            }
        }
    }

    /// Processes one feed event to completion.
    pub fn handle(&mut self, event: FeedEvent, now: DateTime<Utc>) -> Result<Dispatch, SignalError> {
        let status = match event {
            FeedEvent::TradeSignal(payload) => {
                return self.enrich_payload(payload, now).map(Dispatch::Enriched);
            }
            FeedEvent::Connected => "✅ Connected to backend".to_string(),
            FeedEvent::Disconnected => "❌ Disconnected from backend".to_string(),
            FeedEvent::ConnectError(e) => format!("❌ Connection error: {}", e),
            FeedEvent::ServerMessage(msg) => format!("ℹ️ {}", msg),
        };
        Ok(Dispatch::Status(self.log.push(&status, now).to_string()))
    }

    pub fn apply_instruments(&mut self, instruments: &[Instrument], now: DateTime<Utc>) {
        self.directory.replace_instruments(instruments);
        info!(event = constants::events::INSTRUMENTS_LOADED, count = instruments.len());
        self.log
            .push(&format!("📈 Loaded {} stocks from backend", instruments.len()), now);
    }

    pub fn apply_history(&mut self, snapshot: HistorySnapshot, now: DateTime<Utc>) -> usize {
        let retained = self
            .history
            .load(snapshot, &self.directory, now.timestamp_millis());
        info!(event = constants::events::HISTORY_LOADED, retained);
        retained
    }

    /// Records a status line from an outer collaborator.
    pub fn record_status(&mut self, msg: &str, now: DateTime<Utc>) {
        self.log.push(msg, now);
    }

    /// Enriched signals, newest first.
    pub fn signals(&self) -> &VecDeque<EnrichedSignal> {
        &self.signals
    }

    pub fn messages(&self) -> Vec<String> {
        self.log.lines()
    }

    pub fn directory(&self) -> &InstrumentDirectory {
        &self.directory
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }
}
