use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use tracing::warn;

use crate::constants;
use crate::data::instruments::InstrumentDirectory;
use crate::signal::Direction;

/// One remembered signal direction for an instrument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Display label at the time the signal was seen
    pub stock: String,
    pub pattern: String,
    pub direction: Direction,
    /// Epoch milliseconds
    pub timestamp: i64,
}

/// Backend history record; flat lists may carry the token explicitly.
#[derive(Clone, Debug, Deserialize)]
pub struct HistoryRecord {
    pub stock: String,
    #[serde(default)]
    pub pattern: String,
    pub direction: Direction,
    pub timestamp: i64,
    #[serde(default)]
    pub token: Option<u64>,
}

impl From<HistoryRecord> for HistoryEntry {
    fn from(r: HistoryRecord) -> Self {
        HistoryEntry {
            stock: r.stock,
            pattern: r.pattern,
            direction: r.direction,
            timestamp: r.timestamp,
        }
    }
}

/// Records from one backend list. Unreadable records are skipped.
#[derive(Clone, Debug, Default)]
pub struct HistoryRecords(pub Vec<HistoryRecord>);

impl<'de> Deserialize<'de> for HistoryRecords {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = match Value::deserialize(deserializer)? {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => {
                warn!("⚠ Ignoring history list of unexpected shape: {}", other);
                Vec::new()
            }
        };
        let records = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<HistoryRecord>(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("⚠ Skipping unreadable history record: {}", e);
                    None
                }
            })
            .collect();
        Ok(HistoryRecords(records))
    }
}

/// Shape of `GET /signal-history`: keyed by token, or a flat list.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum HistorySnapshot {
    ByInstrument(HashMap<String, HistoryRecords>),
    Flat(HistoryRecords),
}

/// Per-instrument recent signal directions, bounded by a retention window.
///
/// Every write drops entries whose age reached the window, across all
/// instruments, so memory tracks arrival rate times window length rather
/// than session length.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    entries: HashMap<u64, VecDeque<HistoryEntry>>,
    window_ms: i64,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(constants::history::RETENTION_WINDOW_MS)
    }
}

impl HistoryStore {
    pub fn new(window_ms: i64) -> Self {
        Self {
            entries: HashMap::new(),
            window_ms,
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window_ms
    }

    fn is_live(&self, entry: &HistoryEntry, now_ms: i64) -> bool {
        now_ms.saturating_sub(entry.timestamp) < self.window_ms
    }

    /// Flags `candidate` as conflicting when a live entry for the same
    /// instrument points the other way, then compacts and records it.
    pub fn check_and_record(&mut self, instrument: u64, candidate: HistoryEntry, now_ms: i64) -> bool {
        let conflict = self.entries.get(&instrument).is_some_and(|history| {
            history
                .iter()
                .any(|e| self.is_live(e, now_ms) && e.direction != candidate.direction)
        });

        self.compact(now_ms);
        self.entries.entry(instrument).or_default().push_back(candidate);
        conflict
    }

    /// Drops every entry whose age is at least the window, and any
    /// instrument left with no entries.
    pub fn compact(&mut self, now_ms: i64) {
        let window = self.window_ms;
        self.entries.retain(|_, history| {
            history.retain(|e| now_ms.saturating_sub(e.timestamp) < window);
            !history.is_empty()
        });
    }

    /// Replaces the whole store from a backend snapshot.
    ///
    /// Flat records are placed by their `token`, falling back to a reverse
    /// lookup of the display label. Records that cannot be placed are
    /// skipped. Returns the number of entries retained.
    pub fn load(&mut self, snapshot: HistorySnapshot, directory: &InstrumentDirectory, now_ms: i64) -> usize {
        let mut entries: HashMap<u64, VecDeque<HistoryEntry>> = HashMap::new();

        match snapshot {
            HistorySnapshot::ByInstrument(map) => {
                for (key, records) in map {
                    let Ok(token) = key.parse::<u64>() else {
                        warn!("⚠ Skipping history for non-numeric instrument key {:?}", key);
                        continue;
                    };
                    entries
                        .entry(token)
                        .or_default()
                        .extend(records.0.into_iter().map(HistoryEntry::from));
                }
            }
            HistorySnapshot::Flat(records) => {
                for record in records.0 {
                    let token = record
                        .token
                        .or_else(|| directory.token_for_label(&record.stock));
                    match token {
                        Some(token) => entries.entry(token).or_default().push_back(record.into()),
                        None => warn!("⚠ Skipping history entry for unknown instrument {}", record.stock),
                    }
                }
            }
        }

        for history in entries.values_mut() {
            history.make_contiguous().sort_by_key(|e| e.timestamp);
        }

        self.entries = entries;
        self.compact(now_ms);
        self.len()
    }

    pub fn entries(&self, instrument: u64) -> Vec<HistoryEntry> {
        self.entries
            .get(&instrument)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// All retained entries across instruments, oldest first.
    pub fn all_entries(&self) -> Vec<HistoryEntry> {
        let mut all: Vec<HistoryEntry> = self.entries.values().flatten().cloned().collect();
        all.sort_by_key(|e| e.timestamp);
        all
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
