//! Branch-level checkout configuration.

use std::time::Duration;

use crate::catalog::PaymentMethod;
use crate::checkout::DeliveryZone;

/// Default time allowed for the gateway to create an order.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Zones, payment methods and tunables a checkout session validates against.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSettings {
    /// Delivery zones with their fees.
    pub zones: Vec<DeliveryZone>,
    /// Payment methods; only enabled ones are accepted.
    pub payment_methods: Vec<PaymentMethod>,
    /// Deadline for the order gateway call.
    pub submit_timeout: Duration,
}

impl CheckoutSettings {
    pub fn new(zones: Vec<DeliveryZone>, payment_methods: Vec<PaymentMethod>) -> Self {
        Self {
            zones,
            payment_methods,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    /// Zones that accept orders.
    pub fn active_zones(&self) -> impl Iterator<Item = &DeliveryZone> {
        self.zones.iter().filter(|z| z.active)
    }

    /// Payment methods customers may pick.
    pub fn enabled_payment_methods(&self) -> impl Iterator<Item = &PaymentMethod> {
        self.payment_methods.iter().filter(|m| m.enabled)
    }
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}
