use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::Result;

/// Direction of a logged exchange, from the adapter's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

/// One inbound callback or outbound processor exchange
#[derive(Debug, Clone, Serialize)]
pub struct InteractionLog {
    pub gateway: String,
    pub url: String,
    pub direction: Direction,
    pub payload: serde_json::Value,
    pub success: bool,
    pub created_at: DateTime<Utc>,
}

impl InteractionLog {
    pub fn new(
        url: impl Into<String>,
        direction: Direction,
        payload: serde_json::Value,
        success: bool,
    ) -> Self {
        Self {
            gateway: "khalti".to_string(),
            url: url.into(),
            direction,
            payload,
            success,
            created_at: Utc::now(),
        }
    }
}

/// Destination for interaction records
///
/// Errors returned here are reported and dropped by the caller; they never
/// change a verification outcome.
#[async_trait]
pub trait InteractionSink: Send + Sync {
    async fn record(&self, entry: &InteractionLog) -> Result<()>;
}

/// Writes interaction records as structured tracing events
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

#[async_trait]
impl InteractionSink for TracingSink {
    async fn record(&self, entry: &InteractionLog) -> Result<()> {
        tracing::info!(
            target: "khalti_gateway::interaction",
            gateway = %entry.gateway,
            url = %entry.url,
            direction = ?entry.direction,
            success = entry.success,
            payload = %entry.payload,
            created_at = %entry.created_at.to_rfc3339(),
            "Gateway interaction"
        );
        Ok(())
    }
}
