use serde::{Deserialize, Serialize};

use crate::modules::transactions::models::InvoiceRef;
use crate::modules::transactions::services::serialize_invoices;

/// Contact data the adapter reads from the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Host client the contact belongs to
    pub client_id: String,
}

/// Per-payment options supplied by the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutOptions {
    /// Description of the charge, shown as the product name
    #[serde(default)]
    pub description: String,

    /// Where the customer's browser lands after paying
    #[serde(default)]
    pub return_url: String,
}

/// Payment-initiation payload handed to the rendering layer
///
/// Built fresh for each payment attempt and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Amount in minor units (paisa)
    pub amount_minor_units: i64,

    pub public_key: String,

    pub description: String,

    /// First invoice in the allocation, used as the product identity
    pub primary_invoice_id: String,

    pub callback_url: String,

    pub return_url: String,

    pub client_id: String,

    pub invoice_refs: Vec<InvoiceRef>,
}

/// One hidden input of the checkout form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub value: String,
}

impl CheckoutRequest {
    /// Invoice allocations encoded for the processor metadata field
    pub fn merchant_invoice(&self) -> String {
        serialize_invoices(&self.invoice_refs)
    }

    /// Form inputs in the order the checkout template renders them
    pub fn form_fields(&self) -> Vec<FormField> {
        let field = |name, value: String| FormField { name, value };
        vec![
            field("public_key", self.public_key.clone()),
            field("amount", self.amount_minor_units.to_string()),
            field("product_identity", self.primary_invoice_id.clone()),
            field("product_name", self.description.clone()),
            field("callback_url", self.callback_url.clone()),
            field("return_url", self.return_url.clone()),
            field("merchant_client", self.client_id.clone()),
            field("merchant_invoice", self.merchant_invoice()),
        ]
    }
}
