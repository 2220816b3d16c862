// Property-based tests for the invoice allocation codec

use khalti_gateway::transactions::services::{serialize_invoices, unserialize_invoices};
use khalti_gateway::transactions::InvoiceRef;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

fn invoice_ref() -> impl Strategy<Value = InvoiceRef> {
    ("[A-Za-z0-9_-]{1,12}", 0i64..10_000_000_000, 0u32..=4)
        .prop_map(|(id, mantissa, scale)| InvoiceRef::new(id, Decimal::new(mantissa, scale)))
}

proptest! {
    /// Any list of well-formed allocations survives a round trip unchanged
    #[test]
    fn prop_round_trip_preserves_allocations(invoices in prop::collection::vec(invoice_ref(), 0..8)) {
        let decoded = unserialize_invoices(&serialize_invoices(&invoices));
        prop_assert_eq!(decoded, invoices);
    }

    /// Amounts keep their scale through the codec
    #[test]
    fn prop_round_trip_preserves_scale(invoices in prop::collection::vec(invoice_ref(), 1..8)) {
        let decoded = unserialize_invoices(&serialize_invoices(&invoices));
        for (before, after) in invoices.iter().zip(decoded.iter()) {
            prop_assert_eq!(before.amount.scale(), after.amount.scale());
        }
    }
}

#[test]
fn test_two_invoices_decode_in_order() {
    let invoices = unserialize_invoices("7=30.00|8=20.00");

    assert_eq!(
        invoices,
        vec![
            InvoiceRef::new("7", Decimal::from_str("30.00").unwrap()),
            InvoiceRef::new("8", Decimal::from_str("20.00").unwrap()),
        ]
    );
    assert_eq!(serialize_invoices(&invoices), "7=30.00|8=20.00");
}

#[test]
fn test_segment_without_separator_is_skipped() {
    let invoices = unserialize_invoices("a=1|bad|c=3");

    assert_eq!(
        invoices,
        vec![
            InvoiceRef::new("a", Decimal::from(1)),
            InvoiceRef::new("c", Decimal::from(3)),
        ]
    );
}

#[test]
fn test_segment_with_non_decimal_amount_is_skipped() {
    let invoices = unserialize_invoices("1=ten|2=5.00");

    assert_eq!(
        invoices,
        vec![InvoiceRef::new("2", Decimal::from_str("5.00").unwrap())]
    );
}

#[test]
fn test_empty_string_decodes_to_no_invoices() {
    assert!(unserialize_invoices("").is_empty());
    assert_eq!(serialize_invoices(&[]), "");
}
