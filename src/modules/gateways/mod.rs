pub mod controllers;
pub mod models;
pub mod services;

pub use controllers::configure;
pub use models::{GatewaySettings, HostContext};
pub use services::{KhaltiApi, KhaltiClient, KhaltiGateway, PaymentGateway, VerificationResult};
