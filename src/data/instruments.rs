use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants;

/// One row of the backend's instrument list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub name: String,
    pub token: u64,
}

impl Instrument {
    /// Selection label shown to users, e.g. "RELIANCE (738561)".
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.token)
    }
}

/// Token to display-name lookup plus the label to token selection map.
///
/// Refreshed wholesale from the metadata service; the enrichment pipeline
/// only ever reads it.
#[derive(Clone, Debug)]
pub struct InstrumentDirectory {
    names: HashMap<u64, String>,
    selection: HashMap<String, u64>,
    available: Vec<String>,
}

impl Default for InstrumentDirectory {
    fn default() -> Self {
        let selection = constants::instruments::DEFAULT_TOKENS
            .iter()
            .map(|(name, token)| (name.to_string(), *token))
            .collect();
        Self {
            names: HashMap::new(),
            selection,
            available: Vec::new(),
        }
    }
}

impl InstrumentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display label for a token, or a synthesized "Token {id}" when unknown.
    pub fn resolve(&self, token: u64) -> String {
        self.names
            .get(&token)
            .cloned()
            .unwrap_or_else(|| format!("Token {}", token))
    }

    /// Replaces both maps from a fresh instrument list.
    pub fn replace_instruments(&mut self, instruments: &[Instrument]) {
        self.names = instruments
            .iter()
            .map(|i| (i.token, i.name.clone()))
            .collect();
        self.selection = instruments.iter().map(|i| (i.label(), i.token)).collect();
        self.available = instruments.iter().map(Instrument::label).collect();
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    /// Maps selected labels to tokens, skipping labels that are not known.
    pub fn tokens_for(&self, labels: &[String]) -> Vec<u64> {
        labels
            .iter()
            .filter_map(|label| self.selection.get(label).copied())
            .collect()
    }

    /// Reverse lookup from a display name to its token.
    pub fn token_for_label(&self, name: &str) -> Option<u64> {
        self.names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(token, _)| *token)
            .or_else(|| self.selection.get(name).copied())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
