use serde::{Deserialize, Serialize};

use crate::core::Currency;

/// Values the billing platform supplies about itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostContext {
    /// Prefix of the platform's gateway callback URLs, e.g.
    /// `https://billing.example.com/callback/gw/`
    pub callback_url_base: String,

    /// Tenant the payments are collected for
    pub company_id: String,

    /// Currency of the payment being processed
    pub currency: Currency,
}

impl HostContext {
    pub fn new(
        callback_url_base: impl Into<String>,
        company_id: impl Into<String>,
        currency: Currency,
    ) -> Self {
        Self {
            callback_url_base: callback_url_base.into(),
            company_id: company_id.into(),
            currency,
        }
    }

    /// Copy of this context for a payment in another currency
    pub fn with_currency(&self, currency: Currency) -> Self {
        Self {
            currency,
            ..self.clone()
        }
    }

    /// Callback URL for `gateway`: base, tenant, then the gateway segment
    pub fn callback_url(&self, gateway: &str) -> String {
        format!("{}{}/{}/", self.callback_url_base, self.company_id, gateway)
    }
}
