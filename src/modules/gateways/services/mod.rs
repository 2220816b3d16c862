pub mod gateway_trait;
pub mod khalti;
pub mod khalti_client;

pub use gateway_trait::PaymentGateway;
pub use khalti::KhaltiGateway;
pub use khalti_client::{
    KhaltiApi, KhaltiClient, KhaltiMeta, KhaltiState, VerificationResult, DEFAULT_BASE_URL,
    DEFAULT_TIMEOUT,
};
