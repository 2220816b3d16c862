use crate::core::{AppError, Currency};
use crate::modules::gateways::services::khalti_client::VerificationResult;
use crate::modules::transactions::models::{NormalizedTransaction, TransactionStatus};

use super::invoice_codec::unserialize_invoices;

/// Khalti settles in Nepalese Rupees only
pub const SETTLEMENT_CURRENCY: Currency = Currency::NPR;

/// Processor state name for a settled payment
const COMPLETED_STATE: &str = "Completed";

/// Maps a processor state name onto the host status vocabulary
pub fn map_state(state_name: Option<&str>) -> TransactionStatus {
    match state_name {
        Some(COMPLETED_STATE) => TransactionStatus::Approved,
        _ => TransactionStatus::Declined,
    }
}

/// Renders a minor-unit amount as a major-unit string with two fraction digits
pub fn format_minor_units(minor: i64) -> String {
    SETTLEMENT_CURRENCY.format_plain(SETTLEMENT_CURRENCY.from_minor_units(minor))
}

/// Builds the host transaction record from a verified processor result
///
/// `client_id` comes from the inbound request context. `merchant_invoice`
/// overrides the allocation string echoed in the processor metadata when the
/// inbound request carried its own.
pub fn normalize(
    result: &VerificationResult,
    client_id: &str,
    merchant_invoice: Option<&str>,
) -> NormalizedTransaction {
    let invoices = merchant_invoice
        .or_else(|| result.merchant_invoice())
        .map(unserialize_invoices)
        .unwrap_or_default();

    NormalizedTransaction {
        client_id: client_id.to_string(),
        amount: format_minor_units(result.amount),
        currency: SETTLEMENT_CURRENCY,
        status: map_state(result.state_name()),
        transaction_id: result.idx.clone(),
        invoices,
        message: None,
    }
}

/// Builds a declined record for a verification that could not be completed
pub fn declined_from_error(
    error: &AppError,
    client_id: &str,
    transaction_id: &str,
    claimed_minor: i64,
) -> NormalizedTransaction {
    NormalizedTransaction {
        client_id: client_id.to_string(),
        amount: format_minor_units(claimed_minor),
        currency: SETTLEMENT_CURRENCY,
        status: TransactionStatus::Declined,
        transaction_id: transaction_id.to_string(),
        invoices: Vec::new(),
        message: Some(error.to_string()),
    }
}
