use serde::{Deserialize, Serialize};

use crate::core::{AppError, FieldError, Result};

/// Merchant credentials issued by Khalti
///
/// Custom `Debug` implementation redacts `secret_key` so settings can be
/// logged safely.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewaySettings {
    /// Public key embedded in the checkout form
    #[serde(default)]
    pub public_key: String,

    /// Secret key sent as `Authorization: Key <secret_key>`
    #[serde(default)]
    pub secret_key: String,
}

impl GatewaySettings {
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

impl std::fmt::Debug for GatewaySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewaySettings")
            .field("public_key", &self.public_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Validates settings at save time
///
/// Returns the settings unchanged on success. On failure every empty field
/// gets its own error so the host can redisplay the form with field-level
/// messages.
pub fn validate_settings(settings: GatewaySettings) -> Result<GatewaySettings> {
    let mut errors = Vec::new();

    if settings.public_key.trim().is_empty() {
        errors.push(FieldError::new(
            "public_key",
            "You must enter a valid Public Key.",
        ));
    }

    if settings.secret_key.trim().is_empty() {
        errors.push(FieldError::new(
            "secret_key",
            "You must enter a valid Secret Key.",
        ));
    }

    if errors.is_empty() {
        Ok(settings)
    } else {
        Err(AppError::ConfigInvalid(errors))
    }
}
