//! Percentage discount entered at checkout.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A discount percentage, always within 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct DiscountPercent(Decimal);

impl DiscountPercent {
    /// No discount.
    pub const NONE: DiscountPercent = DiscountPercent(Decimal::ZERO);

    /// Create a discount, clamping to 0..=100.
    pub fn new(percent: Decimal) -> Self {
        Self(percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }

    /// The clamped percentage.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Check if no discount applies.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<Decimal> for DiscountPercent {
    fn from(percent: Decimal) -> Self {
        Self::new(percent)
    }
}

impl From<DiscountPercent> for Decimal {
    fn from(percent: DiscountPercent) -> Self {
        percent.0
    }
}

/// Error parsing free-text discount input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid discount percentage: {0:?}")]
pub struct ParseDiscountError(String);

impl FromStr for DiscountPercent {
    type Err = ParseDiscountError;

    /// Parse input such as `"10"`, `"12.5%"` or `"7,5"`. Blank input is no discount.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s.trim().trim_end_matches('%').trim().replace(',', ".");
        if cleaned.is_empty() {
            return Ok(Self::NONE);
        }
        cleaned
            .parse::<Decimal>()
            .map(Self::new)
            .map_err(|_| ParseDiscountError(s.to_string()))
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}
