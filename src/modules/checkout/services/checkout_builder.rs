use rust_decimal::Decimal;
use tracing::debug;

use crate::core::{AppError, Currency, Result};
use crate::modules::checkout::models::{CheckoutOptions, CheckoutRequest, ContactInfo};
use crate::modules::gateways::models::{GatewaySettings, HostContext};
use crate::modules::transactions::models::InvoiceRef;
use crate::modules::transactions::services::is_encodable_id;

/// Path segment identifying this gateway in host callback URLs
pub const GATEWAY_SEGMENT: &str = "khalti";

/// Currencies Khalti accepts
pub const SUPPORTED_CURRENCIES: &[Currency] = &[Currency::NPR];

/// Shapes a checkout request for one payment attempt
///
/// # Arguments
/// * `amount` - Total in major units (rupees)
/// * `invoice_amounts` - Allocation of the total across invoices, may be empty
///
/// Pure data transformation; nothing is sent anywhere.
pub fn build_checkout(
    settings: &GatewaySettings,
    host: &HostContext,
    contact: &ContactInfo,
    amount: Decimal,
    invoice_amounts: &[InvoiceRef],
    options: &CheckoutOptions,
) -> Result<CheckoutRequest> {
    if !SUPPORTED_CURRENCIES.contains(&host.currency) {
        return Err(AppError::validation(format!(
            "Khalti does not accept {} payments",
            host.currency
        )));
    }

    if amount <= Decimal::ZERO {
        return Err(AppError::validation(format!(
            "Payment amount must be positive, got {}",
            amount
        )));
    }

    let amount_minor_units = host
        .currency
        .to_minor_units(amount)
        .ok_or_else(|| AppError::validation(format!("Payment amount {} is too large", amount)))?;

    // Sub-paisa amounts round to nothing
    if amount_minor_units <= 0 {
        return Err(AppError::validation(format!(
            "Payment amount {} is below the smallest {} unit",
            amount, host.currency
        )));
    }

    if let Some(invoice) = invoice_amounts.iter().find(|i| !is_encodable_id(&i.id)) {
        return Err(AppError::validation(format!(
            "Invoice id {:?} may not contain '|' or '='",
            invoice.id
        )));
    }

    let primary_invoice_id = invoice_amounts
        .first()
        .map(|invoice| invoice.id.clone())
        .unwrap_or_default();

    let request = CheckoutRequest {
        amount_minor_units,
        public_key: settings.public_key.clone(),
        description: options.description.clone(),
        primary_invoice_id,
        callback_url: host.callback_url(GATEWAY_SEGMENT),
        return_url: options.return_url.clone(),
        client_id: contact.client_id.clone(),
        invoice_refs: invoice_amounts.to_vec(),
    };

    debug!(
        client_id = %request.client_id,
        amount_minor_units = request.amount_minor_units,
        invoices = request.invoice_refs.len(),
        "Built Khalti checkout request"
    );

    Ok(request)
}
