use std::sync::Arc;

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::AppError;
use crate::modules::checkout::models::{CheckoutOptions, CheckoutRequest, ContactInfo, FormField};
use crate::modules::gateways::models::GatewaySettings;
use crate::modules::gateways::services::{KhaltiGateway, PaymentGateway};
use crate::modules::transactions::models::InvoiceRef;

/// Checkout build request from the host
#[derive(Debug, Deserialize)]
pub struct BuildCheckoutBody {
    pub contact: ContactInfo,
    /// Total in major units
    pub amount: Decimal,
    #[serde(default)]
    pub invoices: Vec<InvoiceRef>,
    #[serde(default)]
    pub options: CheckoutOptions,
}

#[derive(Debug, Serialize)]
pub struct BuildCheckoutResponse {
    pub checkout: CheckoutRequest,
    pub form_fields: Vec<FormField>,
}

/// Build a Khalti checkout form
/// POST /checkout
pub async fn build_checkout(
    gateway: web::Data<Arc<KhaltiGateway>>,
    settings: web::Data<GatewaySettings>,
    body: web::Json<BuildCheckoutBody>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let checkout = gateway.build_checkout(
        &settings,
        &body.contact,
        body.amount,
        &body.invoices,
        &body.options,
    )?;
    let form_fields = checkout.form_fields();

    Ok(HttpResponse::Ok().json(BuildCheckoutResponse {
        checkout,
        form_fields,
    }))
}

/// Configure checkout routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/checkout", web::post().to(build_checkout));
}
