use crate::core::{Currency, Result};
use crate::modules::checkout::models::{CheckoutOptions, CheckoutRequest, ContactInfo};
use crate::modules::gateways::models::GatewaySettings;
use crate::modules::transactions::models::{InvoiceRef, NormalizedTransaction, ReturnQuery};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Non-merchant payment gateway as seen by the billing platform
///
/// The customer pays on the processor's hosted page; the gateway shapes the
/// redirect and later confirms the outcome server-side.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Get gateway name
    fn name(&self) -> &str;

    /// Check if gateway supports a currency
    fn supports_currency(&self, currency: Currency) -> bool;

    /// Validate settings before the host stores them
    fn validate_settings(&self, settings: GatewaySettings) -> Result<GatewaySettings>;

    /// Build the checkout payload for the rendering layer
    fn build_checkout(
        &self,
        settings: &GatewaySettings,
        contact: &ContactInfo,
        amount: Decimal,
        invoice_amounts: &[InvoiceRef],
        options: &CheckoutOptions,
    ) -> Result<CheckoutRequest>;

    /// Verify a server-to-server callback body
    async fn verify_push(
        &self,
        settings: &GatewaySettings,
        raw_body: &str,
    ) -> Result<NormalizedTransaction>;

    /// Verify a payment when the customer returns from the processor
    async fn verify_return(
        &self,
        settings: &GatewaySettings,
        query: &ReturnQuery,
    ) -> Result<NormalizedTransaction>;

    /// Refund a previous payment
    async fn refund(
        &self,
        settings: &GatewaySettings,
        reference_id: &str,
        transaction_id: &str,
        amount: Decimal,
        notes: Option<&str>,
    ) -> Result<NormalizedTransaction>;
}
