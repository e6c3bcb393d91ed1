//! Payment method types.

use crate::ids::PaymentMethodId;
use serde::{Deserialize, Serialize};

/// Broad payment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// Paid in cash on delivery/pickup.
    #[default]
    Cash,
    /// Card machine on delivery/pickup.
    Card,
    /// Bank or instant transfer.
    Transfer,
    /// Anything else the backend offers.
    Other,
}

/// A payment method the branch accepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentMethod {
    /// Unique identifier.
    pub id: PaymentMethodId,
    /// Display name.
    pub name: String,
    /// Payment category.
    pub kind: PaymentKind,
    /// Whether customers may pick it at checkout.
    pub enabled: bool,
}

impl PaymentMethod {
    /// Create an enabled payment method.
    pub fn new(id: impl Into<PaymentMethodId>, name: impl Into<String>, kind: PaymentKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            enabled: true,
        }
    }

    /// Whether the method needs change to be prepared.
    pub fn is_cash(&self) -> bool {
        self.kind == PaymentKind::Cash
    }
}

/// Find an enabled method by id.
pub fn find_enabled<'a>(
    methods: &'a [PaymentMethod],
    id: &PaymentMethodId,
) -> Option<&'a PaymentMethod> {
    methods.iter().find(|m| m.enabled && &m.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_enabled_skips_disabled() {
        let mut card = PaymentMethod::new("card", "Card", PaymentKind::Card);
        card.enabled = false;
        let methods = vec![PaymentMethod::new("cash", "Cash", PaymentKind::Cash), card];

        assert!(find_enabled(&methods, &PaymentMethodId::new("cash")).is_some());
        assert!(find_enabled(&methods, &PaymentMethodId::new("card")).is_none());
        assert!(find_enabled(&methods, &PaymentMethodId::new("pix")).is_none());
    }
}
