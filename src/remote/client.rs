//! HTTP client for a remote cycle's status endpoints.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::TransportError;
use crate::remote::StatusSource;
use crate::sequencer::session::CycleSnapshot;

/// Wire shape of `GET /evolution/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleStatus {
    pub phase: String,
    pub logs: Vec<String>,
    pub progress: u8,
    pub active: bool,
}

impl CycleStatus {
    /// Resting status with no history.
    pub fn idle() -> Self {
        Self {
            phase: "IDLE".to_string(),
            logs: Vec::new(),
            progress: 0,
            active: false,
        }
    }

    /// Safe default reported when the remote is unreachable. Display layers
    /// render this like any other status; nothing throws.
    pub fn offline(err: &TransportError) -> Self {
        Self {
            phase: "IDLE".to_string(),
            logs: vec![format!("[ERROR] {err}")],
            progress: 0,
            active: false,
        }
    }
}

impl From<&CycleSnapshot> for CycleStatus {
    fn from(snapshot: &CycleSnapshot) -> Self {
        Self {
            phase: snapshot.phase.clone(),
            logs: snapshot.logs.clone(),
            progress: snapshot.progress,
            active: !snapshot.resting,
        }
    }
}

/// Client for the mock status server (or any process speaking the same
/// contract).
pub struct StatusClient {
    http: reqwest::Client,
    base_url: String,
}

impl StatusClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fire-and-forget start signal: `POST /evolution/cycle`.
    pub async fn start_cycle(&self) -> Result<(), TransportError> {
        let url = format!("{}/evolution/cycle", self.base_url);
        let response = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(TransportError::UnexpectedStatus {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    /// `GET /evolution/status`, typed.
    pub async fn fetch_status(&self) -> Result<CycleStatus, TransportError> {
        let url = format!("{}/evolution/status", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(TransportError::UnexpectedStatus {
                status: response.status().as_u16(),
            });
        }

        response
            .json::<CycleStatus>()
            .await
            .map_err(TransportError::MalformedBody)
    }

    /// `fetch_status` degraded to the offline default on failure, with the
    /// failure logged once through `tracing`.
    pub async fn fetch_status_or_offline(&self) -> CycleStatus {
        match self.fetch_status().await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(url = %self.base_url, error = %err, "status fetch failed");
                CycleStatus::offline(&err)
            }
        }
    }
}

#[async_trait]
impl StatusSource for StatusClient {
    async fn trigger(&self) -> Result<(), TransportError> {
        self.start_cycle().await
    }

    async fn fetch(&self) -> Result<CycleStatus, TransportError> {
        self.fetch_status().await
    }
}
