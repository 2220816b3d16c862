pub mod callback;
pub mod invoice_ref;
pub mod normalized_transaction;

pub use callback::{PushCallback, ReturnQuery};
pub use invoice_ref::InvoiceRef;
pub use normalized_transaction::{NormalizedTransaction, TransactionStatus};
