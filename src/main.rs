use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use khalti_gateway::checkout::services::checkout_builder::GATEWAY_SEGMENT;
use khalti_gateway::config::Config;
use khalti_gateway::middleware::RequestIdLayer;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(log_level: &str, log_json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("khalti_gateway={},actix_web=info", log_level).into());

    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    init_tracing(&config.app.log_level, config.app.log_json);
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting Khalti gateway adapter");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Processor: {}", config.khalti.base_url);
    tracing::info!(
        "Callback URL: {}",
        config.host.callback_url(GATEWAY_SEGMENT)
    );

    let gateway = Arc::new(
        khalti_gateway::build_gateway(&config).expect("Failed to build Khalti client"),
    );
    let settings = config.khalti.settings.clone();

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdLayer)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(gateway.clone()))
            .app_data(web::Data::new(settings.clone()))
            .configure(khalti_gateway::routes)
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}
