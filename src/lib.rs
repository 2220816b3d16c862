//! Khalti payment gateway adapter
//!
//! Builds checkout requests for Khalti's hosted payment page, verifies the
//! processor's callbacks server-side and normalizes the outcome into the
//! transaction record a billing platform posts to its ledger.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

use actix_web::web;
use std::sync::Arc;

// Re-export commonly used types
pub use modules::checkout;
pub use modules::gateways;
pub use modules::transactions;

/// Registers every HTTP route of the adapter
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(modules::health::configure)
        .configure(modules::checkout::controllers::configure)
        .configure(modules::gateways::configure)
        .configure(modules::transactions::configure);
}

/// Builds the gateway described by `config`, talking to the real processor
pub fn build_gateway(config: &config::Config) -> core::Result<gateways::KhaltiGateway> {
    let client = gateways::KhaltiClient::new(
        Some(config.khalti.base_url.clone()),
        config.khalti.timeout(),
    )?;
    Ok(gateways::KhaltiGateway::new(
        Arc::new(client),
        config.host.clone(),
    ))
}
