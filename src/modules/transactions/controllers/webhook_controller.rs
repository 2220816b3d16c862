use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse};
use tracing::info;

use crate::core::{AppError, Result};
use crate::middleware::RequestId;
use crate::modules::gateways::models::GatewaySettings;
use crate::modules::gateways::services::khalti::RETURN_PATH;
use crate::modules::gateways::services::{KhaltiGateway, PaymentGateway};
use crate::modules::transactions::models::ReturnQuery;

/// Receive a Khalti server-to-server callback
///
/// POST /callback/{company_id}/khalti/
///
/// The body is read raw so undecodable payloads still reach the interaction
/// log. Verification failures come back as a `declined` transaction with a
/// message, not as an error status.
///
/// # Returns
/// * `200 OK` - Normalized transaction
/// * `400 Bad Request` - Unknown company or undecodable payload
pub async fn receive_callback(
    req: HttpRequest,
    gateway: web::Data<Arc<KhaltiGateway>>,
    settings: web::Data<GatewaySettings>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let company_id = path.into_inner();
    if company_id != gateway.host().company_id {
        return Err(AppError::validation(format!(
            "Callback for unknown company {}",
            company_id
        )));
    }

    let raw_body = std::str::from_utf8(&body)
        .map_err(|e| AppError::validation(format!("Callback body is not UTF-8: {}", e)))?;

    info!(
        request_id = %request_id(&req),
        company_id = %company_id,
        "Received Khalti callback"
    );

    let transaction = gateway.verify_push(&settings, raw_body).await?;
    Ok(HttpResponse::Ok().json(transaction))
}

/// Verify a payment when the customer's browser returns
///
/// GET /return/khalti?idx=...&client_id=...
pub async fn receive_return(
    req: HttpRequest,
    gateway: web::Data<Arc<KhaltiGateway>>,
    settings: web::Data<GatewaySettings>,
    query: web::Query<ReturnQuery>,
) -> Result<HttpResponse> {
    info!(
        request_id = %request_id(&req),
        idx = %query.idx,
        "Customer returned from Khalti"
    );

    let transaction = gateway.verify_return(&settings, &query).await?;
    Ok(HttpResponse::Ok().json(transaction))
}

fn request_id(req: &HttpRequest) -> String {
    RequestId::of(req).map(|id| id.0).unwrap_or_default()
}

/// Configure callback and return routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/callback/{company_id}/khalti/",
        web::post().to(receive_callback),
    )
    .route(RETURN_PATH, web::get().to(receive_return));
}
