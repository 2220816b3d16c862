use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Portion of a payment allocated to one invoice
///
/// The amount is in major units and keeps the scale it was created with, so
/// `50.00` stays `50.00` when written back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRef {
    /// Host invoice identifier
    pub id: String,

    /// Amount applied to this invoice
    pub amount: Decimal,
}

impl InvoiceRef {
    pub fn new(id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: id.into(),
            amount,
        }
    }
}
