//! Packs invoice allocations into the single free-text metadata field the
//! processor round-trips, in the form `id1=amount1|id2=amount2`.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::modules::transactions::models::InvoiceRef;

const ENTRY_SEPARATOR: char = '|';
const PAIR_SEPARATOR: char = '=';

/// True when `id` survives the codec unchanged, i.e. it holds neither
/// separator
pub fn is_encodable_id(id: &str) -> bool {
    !id.contains(ENTRY_SEPARATOR) && !id.contains(PAIR_SEPARATOR)
}

/// Serializes invoice allocations, preserving their order
pub fn serialize_invoices(invoices: &[InvoiceRef]) -> String {
    invoices
        .iter()
        .map(|invoice| format!("{}{}{}", invoice.id, PAIR_SEPARATOR, invoice.amount))
        .collect::<Vec<_>>()
        .join(&ENTRY_SEPARATOR.to_string())
}

/// Parses a serialized allocation string
///
/// Segments that are not exactly `id=amount`, or whose amount is not a
/// decimal, are dropped so a single corrupt fragment cannot fail the whole
/// transaction.
pub fn unserialize_invoices(serialized: &str) -> Vec<InvoiceRef> {
    serialized
        .split(ENTRY_SEPARATOR)
        .filter_map(|segment| {
            let (id, amount) = segment.split_once(PAIR_SEPARATOR)?;
            match Decimal::from_str(amount) {
                Ok(amount) => Some(InvoiceRef::new(id, amount)),
                Err(e) => {
                    tracing::debug!(segment = %segment, error = %e, "Skipping invoice segment");
                    None
                }
            }
        })
        .collect()
}
