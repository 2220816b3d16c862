use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::gateways::models::GatewaySettings;
use crate::modules::gateways::services::{KhaltiGateway, PaymentGateway};

/// Validate gateway settings before the host stores them
/// POST /settings/validate
/// Returns the settings unchanged, or 422 with field-level errors
pub async fn validate_settings(
    gateway: web::Data<Arc<KhaltiGateway>>,
    body: web::Json<GatewaySettings>,
) -> Result<HttpResponse, AppError> {
    let settings = gateway.validate_settings(body.into_inner())?;
    Ok(HttpResponse::Ok().json(settings))
}

/// Configure gateway routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/settings").route("/validate", web::post().to(validate_settings)));
}
