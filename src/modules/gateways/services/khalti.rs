use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use super::gateway_trait::PaymentGateway;
use super::khalti_client::{
    KhaltiApi, VerificationResult, MERCHANT_TRANSACTION_PATH, VERIFY_PATH,
};
use crate::core::{AppError, Currency, Result};
use crate::modules::checkout::models::{CheckoutOptions, CheckoutRequest, ContactInfo};
use crate::modules::checkout::services::checkout_builder::{
    self, GATEWAY_SEGMENT, SUPPORTED_CURRENCIES,
};
use crate::modules::gateways::models::{validate_settings, GatewaySettings, HostContext};
use crate::modules::transactions::models::{
    InvoiceRef, NormalizedTransaction, PushCallback, ReturnQuery,
};
use crate::modules::transactions::services::{
    declined_from_error, normalize, unserialize_invoices, Direction, InteractionLog,
    InteractionSink, TracingSink,
};

/// Route the customer's browser comes back on after paying
pub const RETURN_PATH: &str = "/return/khalti";

/// Khalti non-merchant gateway
///
/// Holds no per-payment state: settings are passed to every operation and
/// each callback is verified independently.
pub struct KhaltiGateway {
    api: Arc<dyn KhaltiApi>,
    host: HostContext,
    sink: Arc<dyn InteractionSink>,
}

impl KhaltiGateway {
    /// Create a gateway logging interactions through `tracing`
    pub fn new(api: Arc<dyn KhaltiApi>, host: HostContext) -> Self {
        Self {
            api,
            host,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the interaction sink
    pub fn with_sink(mut self, sink: Arc<dyn InteractionSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn host(&self) -> &HostContext {
        &self.host
    }

    async fn log(&self, url: &str, direction: Direction, payload: Value, success: bool) {
        let entry = InteractionLog::new(url, direction, payload, success);
        if let Err(e) = self.sink.record(&entry).await {
            warn!(error = %e, url = url, "Failed to record gateway interaction");
        }
    }

    async fn log_outcome(&self, url: &str, outcome: &Result<VerificationResult>) {
        match outcome {
            Ok(result) => {
                let payload = serde_json::to_value(result).unwrap_or(Value::Null);
                self.log(url, Direction::Output, payload, true).await;
            }
            Err(e) => {
                self.log(url, Direction::Output, json!({ "error": e.to_string() }), false)
                    .await;
            }
        }
    }
}

fn raw_payload(raw_body: &str) -> Value {
    serde_json::from_str(raw_body).unwrap_or_else(|_| Value::String(raw_body.to_string()))
}

#[async_trait]
impl PaymentGateway for KhaltiGateway {
    fn name(&self) -> &str {
        GATEWAY_SEGMENT
    }

    fn supports_currency(&self, currency: Currency) -> bool {
        SUPPORTED_CURRENCIES.contains(&currency)
    }

    fn validate_settings(&self, settings: GatewaySettings) -> Result<GatewaySettings> {
        validate_settings(settings)
    }

    fn build_checkout(
        &self,
        settings: &GatewaySettings,
        contact: &ContactInfo,
        amount: Decimal,
        invoice_amounts: &[InvoiceRef],
        options: &CheckoutOptions,
    ) -> Result<CheckoutRequest> {
        checkout_builder::build_checkout(
            settings,
            &self.host,
            contact,
            amount,
            invoice_amounts,
            options,
        )
    }

    async fn verify_push(
        &self,
        settings: &GatewaySettings,
        raw_body: &str,
    ) -> Result<NormalizedTransaction> {
        let callback_url = self.host.callback_url(GATEWAY_SEGMENT);
        let decoded = serde_json::from_str::<PushCallback>(raw_body);
        self.log(
            &callback_url,
            Direction::Input,
            raw_payload(raw_body),
            decoded.is_ok(),
        )
        .await;

        let callback = decoded
            .map_err(|e| AppError::validation(format!("Invalid Khalti callback payload: {}", e)))?;

        let verify_url = format!("{}{}", self.api.base_url(), VERIFY_PATH);
        self.log(
            &verify_url,
            Direction::Output,
            json!({ "token": callback.token, "amount": callback.amount }),
            true,
        )
        .await;
        let outcome = self
            .api
            .verify_token(settings, &callback.token, callback.amount)
            .await;
        self.log_outcome(&verify_url, &outcome).await;

        match outcome {
            Ok(result) => {
                let client_id = callback
                    .merchant_client
                    .as_deref()
                    .or(result.merchant_client())
                    .unwrap_or_default();
                let transaction =
                    normalize(&result, client_id, callback.merchant_invoice.as_deref());

                info!(
                    transaction_id = %transaction.transaction_id,
                    client_id = %transaction.client_id,
                    status = %transaction.status,
                    amount = %transaction.amount,
                    "Khalti payment verified"
                );
                Ok(transaction)
            }
            Err(e) if e.is_verification_failure() => {
                warn!(error = %e, "Khalti push verification failed, declining");
                let mut transaction = declined_from_error(
                    &e,
                    callback.merchant_client.as_deref().unwrap_or_default(),
                    &callback.token,
                    callback.amount,
                );
                if let Some(invoices) = callback.merchant_invoice.as_deref() {
                    transaction.invoices = unserialize_invoices(invoices);
                }
                Ok(transaction)
            }
            Err(e) => Err(e),
        }
    }

    async fn verify_return(
        &self,
        settings: &GatewaySettings,
        query: &ReturnQuery,
    ) -> Result<NormalizedTransaction> {
        self.log(
            RETURN_PATH,
            Direction::Input,
            serde_json::to_value(query).unwrap_or(Value::Null),
            true,
        )
        .await;

        let lookup_url = format!(
            "{}{}{}/",
            self.api.base_url(),
            MERCHANT_TRANSACTION_PATH,
            query.idx
        );
        self.log(
            &lookup_url,
            Direction::Output,
            json!({ "idx": query.idx }),
            true,
        )
        .await;
        let outcome = self.api.lookup_transaction(settings, &query.idx).await;
        self.log_outcome(&lookup_url, &outcome).await;

        match outcome {
            Ok(result) => {
                let client_id = query
                    .client_id
                    .as_deref()
                    .or(result.merchant_client())
                    .unwrap_or_default();
                let transaction = normalize(&result, client_id, None);

                info!(
                    transaction_id = %transaction.transaction_id,
                    client_id = %transaction.client_id,
                    status = %transaction.status,
                    "Khalti return verified"
                );
                Ok(transaction)
            }
            Err(e) if e.is_verification_failure() => {
                warn!(error = %e, idx = %query.idx, "Khalti return lookup failed, declining");
                Ok(declined_from_error(
                    &e,
                    query.client_id.as_deref().unwrap_or_default(),
                    &query.idx,
                    0,
                ))
            }
            Err(e) => Err(e),
        }
    }

    async fn refund(
        &self,
        _settings: &GatewaySettings,
        reference_id: &str,
        transaction_id: &str,
        amount: Decimal,
        _notes: Option<&str>,
    ) -> Result<NormalizedTransaction> {
        warn!(
            reference_id = reference_id,
            transaction_id = transaction_id,
            amount = %amount,
            "Refund requested but not supported by Khalti"
        );
        Err(AppError::unsupported(
            "The requested operation is not supported by this gateway.",
        ))
    }
}
