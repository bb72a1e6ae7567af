use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::data::history::HistorySnapshot;
use crate::data::instruments::Instrument;
use crate::error::MetadataError;

pub type MetadataResult<T> = Result<T, MetadataError>;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IntervalAck {
    pub interval: u64,
}

/// Calls the signal backend makes available for instrument metadata and
/// subscription management. The pipeline only consumes their results.
#[async_trait]
pub trait MetadataApi: Send + Sync {
    async fn fetch_instruments(&self) -> MetadataResult<Vec<Instrument>>;
    async fn set_interval(&self, interval_ms: u64) -> MetadataResult<IntervalAck>;
    async fn subscribe(&self, tokens: &[u64]) -> MetadataResult<()>;
    async fn add_symbol(&self, token: u64) -> MetadataResult<()>;
    async fn remove_symbol(&self, token: u64) -> MetadataResult<()>;
    async fn reset_symbols(&self) -> MetadataResult<()>;
    async fn fetch_signal_history(&self) -> MetadataResult<HistorySnapshot>;
}

#[derive(Clone)]
pub struct HttpMetadataClient {
    base_url: Url,
    client: Client,
}

impl HttpMetadataClient {
    pub fn new(base_url: &str, timeout: Duration) -> MetadataResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        // Keep any path prefix on the base when joining endpoints
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> MetadataResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn read<T: DeserializeOwned>(resp: reqwest::Response) -> MetadataResult<T> {
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(MetadataError::Http {
                status: status.as_u16(),
                body,
            });
        }
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> MetadataResult<T> {
        let resp = self.client.get(self.endpoint(path)?).send().await?;
        Self::read(resp).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: serde_json::Value) -> MetadataResult<T> {
        let resp = self.client.post(self.endpoint(path)?).json(&body).send().await?;
        Self::read(resp).await
    }
}

#[async_trait]
impl MetadataApi for HttpMetadataClient {
    async fn fetch_instruments(&self) -> MetadataResult<Vec<Instrument>> {
        self.get("instruments").await
    }

    async fn set_interval(&self, interval_ms: u64) -> MetadataResult<IntervalAck> {
        self.post("set-interval", json!({ "interval": interval_ms })).await
    }

    async fn subscribe(&self, tokens: &[u64]) -> MetadataResult<()> {
        info!("🔄 Subscribing to {} tokens", tokens.len());
        let _: serde_json::Value = self.post("subscribe", json!({ "tokens": tokens })).await?;
        Ok(())
    }

    async fn add_symbol(&self, token: u64) -> MetadataResult<()> {
        let _: serde_json::Value = self.post("symbols/add", json!({ "token": token })).await?;
        Ok(())
    }

    async fn remove_symbol(&self, token: u64) -> MetadataResult<()> {
        let _: serde_json::Value = self.post("symbols/remove", json!({ "token": token })).await?;
        Ok(())
    }

    async fn reset_symbols(&self) -> MetadataResult<()> {
        let _: serde_json::Value = self.post("symbols/reset", json!({})).await?;
        Ok(())
    }

    async fn fetch_signal_history(&self) -> MetadataResult<HistorySnapshot> {
        self.get("signal-history").await
    }
}
