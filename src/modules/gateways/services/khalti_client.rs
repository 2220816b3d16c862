use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, RequestBuilder};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{default_on_request_failure, RetryTransientMiddleware, Retryable, RetryableStrategy};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::{AppError, Result};
use crate::modules::gateways::models::GatewaySettings;

/// Khalti production API host
pub const DEFAULT_BASE_URL: &str = "https://khalti.com";

/// Push verification endpoint (token + amount)
pub const VERIFY_PATH: &str = "/api/payment/verify/";

/// Pull verification endpoint prefix, followed by `<idx>/`
pub const MERCHANT_TRANSACTION_PATH: &str = "/api/v2/merchant-transaction/";

/// Default bound on one verification, retry included
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Retries after the first attempt, transport failures only
const MAX_RETRIES: u32 = 1;

/// Processor view of a payment, as returned by both verification endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Processor transaction index
    pub idx: String,

    /// Amount in minor units (paisa)
    pub amount: i64,

    #[serde(default)]
    pub state: Option<KhaltiState>,

    /// Merchant metadata attached at checkout and echoed back
    #[serde(default)]
    pub meta: Option<KhaltiMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KhaltiState {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KhaltiMeta {
    #[serde(default)]
    pub merchant_client: Option<String>,

    #[serde(default)]
    pub merchant_invoice: Option<String>,
}

impl VerificationResult {
    pub fn state_name(&self) -> Option<&str> {
        self.state.as_ref()?.name.as_deref()
    }

    pub fn merchant_client(&self) -> Option<&str> {
        self.meta.as_ref()?.merchant_client.as_deref()
    }

    pub fn merchant_invoice(&self) -> Option<&str> {
        self.meta.as_ref()?.merchant_invoice.as_deref()
    }
}

/// Outbound calls to the Khalti verification API
#[async_trait]
pub trait KhaltiApi: Send + Sync {
    /// Base URL requests are sent to
    fn base_url(&self) -> &str;

    /// Re-verifies a pushed payment token and its claimed amount
    async fn verify_token(
        &self,
        settings: &GatewaySettings,
        token: &str,
        amount: i64,
    ) -> Result<VerificationResult>;

    /// Looks up a transaction by the index carried on the return URL
    async fn lookup_transaction(
        &self,
        settings: &GatewaySettings,
        idx: &str,
    ) -> Result<VerificationResult>;
}

/// Retries on connect errors and timeouts, never on an HTTP response
struct TransportFailuresOnly;

impl RetryableStrategy for TransportFailuresOnly {
    fn handle(
        &self,
        res: &std::result::Result<reqwest::Response, reqwest_middleware::Error>,
    ) -> Option<Retryable> {
        match res {
            Ok(_) => None,
            Err(error) => default_on_request_failure(error),
        }
    }
}

#[derive(Serialize)]
struct VerifyForm<'a> {
    token: &'a str,
    amount: i64,
}

/// HTTP client for the Khalti verification API
///
/// API Documentation: https://docs.khalti.com/
#[derive(Clone)]
pub struct KhaltiClient {
    client: ClientWithMiddleware,
    base_url: String,
    deadline: Duration,
}

impl std::fmt::Debug for KhaltiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KhaltiClient")
            .field("base_url", &self.base_url)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl KhaltiClient {
    /// Create a new Khalti client
    ///
    /// # Arguments
    /// * `base_url` - API host, defaults to production
    /// * `timeout` - Deadline for a whole verification; each of the two
    ///   attempts gets half of it
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let attempt_timeout = timeout / 2;
        let http = reqwest::Client::builder()
            .timeout(attempt_timeout)
            .connect_timeout(attempt_timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(50), Duration::from_millis(250))
            .build_with_max_retries(MAX_RETRIES);

        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                TransportFailuresOnly,
            ))
            .build();

        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            deadline: timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        endpoint: &str,
        request: RequestBuilder,
        settings: &GatewaySettings,
    ) -> Result<VerificationResult> {
        let exchange = async {
            let response = request
                .header(AUTHORIZATION, format!("Key {}", settings.secret_key))
                .send()
                .await
                .map_err(|e| {
                    warn!(endpoint = endpoint, error = %e, "Khalti request failed");
                    AppError::unreachable(format!("Khalti {} request failed: {}", endpoint, e))
                })?;

            let status = response.status();
            let body = response.text().await.map_err(|e| {
                AppError::unreachable(format!(
                    "Failed to read Khalti {} response: {}",
                    endpoint, e
                ))
            })?;
            Ok::<_, AppError>((status, body))
        };

        // Attempts, backoff and body read all count against the deadline
        let (status, body) = tokio::time::timeout(self.deadline, exchange)
            .await
            .map_err(|_| {
                warn!(endpoint = endpoint, deadline = ?self.deadline, "Khalti request timed out");
                AppError::unreachable(format!(
                    "Khalti {} request timed out after {:?}",
                    endpoint, self.deadline
                ))
            })??;

        debug!(endpoint = endpoint, status = status.as_u16(), "Khalti responded");

        if !status.is_success() {
            return Err(error_from_response(endpoint, status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            AppError::malformed(format!("Failed to parse Khalti {} response: {}", endpoint, e))
        })
    }
}

/// Classifies a non-2xx response
///
/// Khalti reports request problems as JSON carrying `detail` or `error_key`;
/// those are explicit declines. Anything else is treated as the endpoint
/// being unavailable.
fn error_from_response(endpoint: &str, status: u16, body: &str) -> AppError {
    if let Ok(serde_json::Value::Object(fields)) = serde_json::from_str(body) {
        if let Some(detail) = fields.get("detail").and_then(|v| v.as_str()) {
            return AppError::ProcessorDeclined(detail.to_string());
        }
        if let Some(key) = fields.get("error_key").and_then(|v| v.as_str()) {
            let reasons: Vec<String> = fields
                .iter()
                .filter(|(name, _)| name.as_str() != "error_key")
                .map(|(name, value)| format!("{}: {}", name, value))
                .collect();
            return AppError::ProcessorDeclined(if reasons.is_empty() {
                key.to_string()
            } else {
                format!("{} ({})", key, reasons.join(", "))
            });
        }
    }

    let snippet: String = body.chars().take(200).collect();
    AppError::unreachable(format!(
        "Khalti {} returned HTTP {}: {}",
        endpoint, status, snippet
    ))
}

fn is_valid_idx(idx: &str) -> bool {
    !idx.is_empty()
        && idx
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait]
impl KhaltiApi for KhaltiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn verify_token(
        &self,
        settings: &GatewaySettings,
        token: &str,
        amount: i64,
    ) -> Result<VerificationResult> {
        let request = self
            .client
            .post(self.url(VERIFY_PATH))
            .form(&VerifyForm { token, amount });

        self.send("verify", request, settings).await
    }

    async fn lookup_transaction(
        &self,
        settings: &GatewaySettings,
        idx: &str,
    ) -> Result<VerificationResult> {
        if !is_valid_idx(idx) {
            return Err(AppError::validation(format!(
                "Invalid Khalti transaction index: {:?}",
                idx
            )));
        }

        let url = self.url(&format!("{}{}/", MERCHANT_TRANSACTION_PATH, idx));
        self.send("merchant-transaction", self.client.get(url), settings)
            .await
    }
}
