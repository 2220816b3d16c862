use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies a host may quote a payment in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Nepalese Rupee (2 decimal places, minor unit paisa)
    NPR,
    /// Indian Rupee (2 decimal places)
    INR,
    /// US Dollar (2 decimal places)
    USD,
}

impl Currency {
    /// Returns the decimal scale for this currency
    pub fn scale(&self) -> u32 {
        match self {
            Currency::NPR | Currency::INR | Currency::USD => 2,
        }
    }

    /// Converts a major-unit amount to minor units, rounding half away from
    /// zero. Returns `None` when the result does not fit in an `i64`.
    pub fn to_minor_units(&self, amount: Decimal) -> Option<i64> {
        let factor = Decimal::from(10i64.pow(self.scale()));
        amount
            .checked_mul(factor)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }

    /// Converts minor units back to a major-unit amount at this currency's scale
    pub fn from_minor_units(&self, minor: i64) -> Decimal {
        Decimal::new(minor, self.scale())
    }

    /// Plain fixed-point rendering: exactly `scale` fraction digits, `.` as
    /// separator, no currency code
    pub fn format_plain(&self, amount: Decimal) -> String {
        format!(
            "{:.width$}",
            amount.round_dp(self.scale()),
            width = self.scale() as usize
        )
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::NPR => write!(f, "NPR"),
            Currency::INR => write!(f, "INR"),
            Currency::USD => write!(f, "USD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NPR" => Ok(Currency::NPR),
            "INR" => Ok(Currency::INR),
            "USD" => Ok(Currency::USD),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}
