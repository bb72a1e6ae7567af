//! Signal types: the inbound wire payload, the validated raw signal and the
//! enriched record handed to display and notification collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::SignalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "Long"),
            Direction::Short => write!(f, "Short"),
        }
    }
}

impl FromStr for Direction {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(Direction::Long),
            "short" => Ok(Direction::Short),
            _ => Err(SignalError::InvalidDirection { value: s.to_string() }),
        }
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Reliability tier derived from spread and liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}

/// Decoders for the optional tick block. Anything unusable becomes absent
/// instead of failing the whole signal.
mod lenient {
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::DepthLevel;

    fn as_number(value: &Value) -> Option<f64> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        n.filter(|n| n.is_finite())
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(as_number))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(Option::<Value>::deserialize(d)?
            .as_ref()
            .and_then(as_number)
            .filter(|n| *n >= 0.0 && n.fract() == 0.0)
            .map(|n| n as u64))
    }

    pub fn levels<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<DepthLevel>, D::Error> {
        Ok(match Option::<Value>::deserialize(d)? {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn or_none<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(Option::<Value>::deserialize(d)?.and_then(|v| serde_json::from_value(v).ok()))
    }

    /// Instrument ids arrive as numbers or numeric strings.
    pub fn token<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        match Option::<Value>::deserialize(d)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid instrument id {}", n))),
            Some(Value::String(s)) => s
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid instrument id {:?}", s))),
            Some(other) => Err(D::Error::custom(format!("invalid instrument id {}", other))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub orders: Option<u64>,
}

/// Order book levels, best price first on each side.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketDepth {
    #[serde(default, deserialize_with = "lenient::levels")]
    pub buy: Vec<DepthLevel>,
    #[serde(default, deserialize_with = "lenient::levels")]
    pub sell: Vec<DepthLevel>,
}

/// Live tick snapshot embedded in a signal. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveTickData {
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_buy_quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_sell_quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub depth: Option<MarketDepth>,
    #[serde(rename = "liveVWAP", default, deserialize_with = "lenient::number")]
    pub live_vwap: Option<f64>,
    #[serde(rename = "liveRSI", default, deserialize_with = "lenient::number")]
    pub live_rsi: Option<f64>,
    #[serde(rename = "priceDeviation", default, deserialize_with = "lenient::number")]
    pub price_deviation: Option<f64>,
}

/// Narrative fields a caller may pre-populate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiFields {
    pub explanation: Option<String>,
    pub plan: Option<String>,
    pub confidence_review: Option<String>,
    pub advisory: Option<String>,
}

/// Signal as it arrives on the feed, before validation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSignalPayload {
    #[serde(default, deserialize_with = "lenient::token")]
    pub stock: Option<u64>,
    pub pattern: Option<String>,
    pub direction: Option<String>,
    pub entry: Option<f64>,
    pub stop_loss: Option<f64>,
    pub target1: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub spread: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub liquidity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub live_tick_data: Option<LiveTickData>,
    #[serde(default, deserialize_with = "lenient::or_none")]
    pub ai: Option<AiFields>,
}

/// A validated trading-pattern signal. Lives for one enrichment pass.
#[derive(Clone, Debug, PartialEq)]
pub struct RawSignal {
    pub instrument: u64,
    pub pattern: String,
    pub direction: Direction,
    pub entry: f64,
    pub stop_loss: f64,
    pub target: f64,
    pub spread: Option<f64>,
    pub liquidity: Option<f64>,
    pub tick: Option<LiveTickData>,
    pub ai: AiFields,
}

fn require_price(field: &'static str, value: Option<f64>) -> Result<f64, SignalError> {
    let value = value.ok_or(SignalError::MissingField { field })?;
    if !value.is_finite() {
        return Err(SignalError::InvalidPrice { field, value });
    }
    Ok(value)
}

impl TryFrom<RawSignalPayload> for RawSignal {
    type Error = SignalError;

    fn try_from(payload: RawSignalPayload) -> Result<Self, Self::Error> {
        let instrument = payload.stock.ok_or(SignalError::MissingField { field: "stock" })?;
        let direction: Direction = payload
            .direction
            .as_deref()
            .ok_or(SignalError::MissingField { field: "direction" })?
            .parse()?;

        Ok(RawSignal {
            instrument,
            pattern: payload
                .pattern
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            direction,
            entry: require_price("entry", payload.entry)?,
            stop_loss: require_price("stopLoss", payload.stop_loss)?,
            target: require_price("target1", payload.target1)?,
            spread: payload.spread,
            liquidity: payload.liquidity,
            tick: payload.live_tick_data,
            ai: payload.ai.unwrap_or_default(),
        })
    }
}

impl RawSignal {
    /// Decodes and validates a feed payload in one step.
    pub fn from_value(value: Value) -> Result<Self, SignalError> {
        let payload: RawSignalPayload = serde_json::from_value(value)?;
        payload.try_into()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSummary {
    pub explanation: String,
    pub plan: String,
    pub confidence_review: String,
    pub advisory: String,
}

/// Display-ready signal. Never mutated after it is emitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedSignal {
    pub id: Uuid,
    pub stock: u64,
    pub stock_name: String,
    pub pattern: String,
    pub direction: Direction,
    pub entry: f64,
    pub stop_loss: f64,
    pub target1: f64,
    pub spread: Option<f64>,
    pub liquidity: Option<f64>,
    pub live_tick_data: Option<LiveTickData>,
    pub enriched_at: DateTime<Utc>,

    pub total_buy: f64,
    pub total_sell: f64,
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
    pub depth_check_passed: bool,
    #[serde(rename = "liveVWAP")]
    pub live_vwap: Option<f64>,
    #[serde(rename = "liveRSI")]
    pub live_rsi: Option<f64>,
    pub price_deviation: Option<f64>,

    pub confidence: Confidence,
    pub conflict: bool,
    pub ai: AiSummary,
}
