// Amount and status normalization of verified processor results

use khalti_gateway::core::{AppError, Currency};
use khalti_gateway::gateways::services::{KhaltiMeta, KhaltiState};
use khalti_gateway::gateways::VerificationResult;
use khalti_gateway::transactions::services::{
    declined_from_error, format_minor_units, map_state, normalize,
};
use khalti_gateway::transactions::{InvoiceRef, TransactionStatus};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

fn verified(amount: i64, state: &str) -> VerificationResult {
    VerificationResult {
        idx: "txn_1".to_string(),
        amount,
        state: Some(KhaltiState {
            name: Some(state.to_string()),
        }),
        meta: Some(KhaltiMeta {
            merchant_client: Some("42".to_string()),
            merchant_invoice: Some("7=50.00".to_string()),
        }),
    }
}

#[test]
fn test_minor_units_render_with_two_fraction_digits() {
    assert_eq!(format_minor_units(10000), "100.00");
    assert_eq!(format_minor_units(1), "0.01");
    assert_eq!(format_minor_units(0), "0.00");
    assert_eq!(format_minor_units(25050), "250.50");
}

#[test]
fn test_only_completed_maps_to_approved() {
    assert_eq!(map_state(Some("Completed")), TransactionStatus::Approved);
    assert_eq!(map_state(Some("Refunded")), TransactionStatus::Declined);
    assert_eq!(map_state(Some("Pending")), TransactionStatus::Declined);
    assert_eq!(map_state(Some("Expired")), TransactionStatus::Declined);
    assert_eq!(map_state(Some("completed")), TransactionStatus::Declined);
    assert_eq!(map_state(None), TransactionStatus::Declined);
}

#[test]
fn test_completed_result_normalizes_to_host_record() {
    let transaction = normalize(&verified(5000, "Completed"), "42", None);

    assert_eq!(transaction.client_id, "42");
    assert_eq!(transaction.amount, "50.00");
    assert_eq!(transaction.currency, Currency::NPR);
    assert_eq!(transaction.status, TransactionStatus::Approved);
    assert_eq!(transaction.transaction_id, "txn_1");
    assert_eq!(
        transaction.invoices,
        vec![InvoiceRef::new("7", Decimal::from_str("50.00").unwrap())]
    );
    assert!(transaction.message.is_none());
}

#[test]
fn test_inbound_invoice_string_overrides_metadata() {
    let transaction = normalize(&verified(5000, "Completed"), "42", Some("9=20.00|10=30.00"));

    let ids: Vec<&str> = transaction.invoices.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["9", "10"]);
}

#[test]
fn test_declined_record_carries_error_message() {
    let error = AppError::unreachable("connection refused");
    let transaction = declined_from_error(&error, "42", "tkn1", 5000);

    assert_eq!(transaction.status, TransactionStatus::Declined);
    assert_eq!(transaction.amount, "50.00");
    assert_eq!(transaction.transaction_id, "tkn1");
    assert!(transaction.invoices.is_empty());
    assert_eq!(
        transaction.message.as_deref(),
        Some("Verification endpoint unreachable: connection refused")
    );
}

proptest! {
    /// The rendered amount always has exactly two fraction digits and
    /// parses back to the same number of minor units
    #[test]
    fn prop_rendered_amount_is_exact(minor in 0i64..1_000_000_000_000_000) {
        let rendered = format_minor_units(minor);
        let (_, fraction) = rendered.split_once('.').expect("has a decimal point");
        prop_assert_eq!(fraction.len(), 2);

        let parsed = Decimal::from_str(&rendered).unwrap();
        prop_assert_eq!(Currency::NPR.to_minor_units(parsed), Some(minor));
    }

    /// Normalization never changes the processor's transaction index
    #[test]
    fn prop_transaction_id_passes_through(idx in "[A-Za-z0-9_-]{1,24}", minor in 0i64..10_000_000) {
        let mut result = verified(minor, "Completed");
        result.idx = idx.clone();
        let transaction = normalize(&result, "42", None);
        prop_assert_eq!(transaction.transaction_id, idx);
    }
}
