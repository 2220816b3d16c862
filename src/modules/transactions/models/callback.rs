use serde::{Deserialize, Serialize};

/// Body the processor posts to the webhook endpoint
///
/// `merchant_*` fields are the metadata attached at checkout; the processor
/// passes them through when the widget forwards them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushCallback {
    /// One-time payment token to verify
    pub token: String,

    /// Claimed amount in minor units
    pub amount: i64,

    #[serde(default)]
    pub merchant_client: Option<String>,

    #[serde(default)]
    pub merchant_invoice: Option<String>,
}

/// Query string of the browser redirect back to the return URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnQuery {
    /// Processor transaction index
    pub idx: String,

    /// Client id the host put on the return URL
    #[serde(default)]
    pub client_id: Option<String>,
}
