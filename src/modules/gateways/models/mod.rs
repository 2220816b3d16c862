pub mod gateway_settings;
pub mod host_context;

pub use gateway_settings::{validate_settings, GatewaySettings};
pub use host_context::HostContext;
