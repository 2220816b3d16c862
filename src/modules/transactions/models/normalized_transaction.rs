use serde::{Deserialize, Serialize};

use super::InvoiceRef;
use crate::core::Currency;

/// Transaction status in the billing platform's vocabulary
///
/// The normalizer only ever produces `Approved` or `Declined`; the other
/// variants exist because hosts exchange the full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Approved,
    Declined,
    Void,
    Pending,
    Reconciled,
    Refunded,
    Returned,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionStatus::Approved => "approved",
            TransactionStatus::Declined => "declined",
            TransactionStatus::Void => "void",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Reconciled => "reconciled",
            TransactionStatus::Refunded => "refunded",
            TransactionStatus::Returned => "returned",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "approved" => Ok(TransactionStatus::Approved),
            "declined" => Ok(TransactionStatus::Declined),
            "void" => Ok(TransactionStatus::Void),
            "pending" => Ok(TransactionStatus::Pending),
            "reconciled" => Ok(TransactionStatus::Reconciled),
            "refunded" => Ok(TransactionStatus::Refunded),
            "returned" => Ok(TransactionStatus::Returned),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

/// Transaction record handed back to the host for ledger posting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    /// Host client the payment belongs to
    pub client_id: String,

    /// Major-unit amount with exactly two fraction digits
    pub amount: String,

    pub currency: Currency,

    pub status: TransactionStatus,

    /// Processor transaction index, passed through unchanged
    pub transaction_id: String,

    /// Invoices the payment applies to
    pub invoices: Vec<InvoiceRef>,

    /// Human-readable detail, set when verification failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
