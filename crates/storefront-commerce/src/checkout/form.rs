//! Checkout form draft.

use crate::cart::{compute_pricing, Cart, DiscountPercent, OrderPricing};
use crate::catalog::CustomerProfile;
use crate::checkout::{delivery_fee_for, DeliverySelection, DeliveryZone};
use crate::error::CommerceError;
use crate::ids::PaymentMethodId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Customer identity fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    /// Identity document number.
    #[serde(default)]
    pub document: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    /// Messaging app handle for order updates.
    #[serde(default)]
    pub messaging_handle: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<&CustomerProfile> for CustomerDetails {
    fn from(profile: &CustomerProfile) -> Self {
        Self {
            document: profile.document.clone(),
            name: profile.name.clone(),
            phone: profile.phone.clone(),
            messaging_handle: profile.messaging_handle.clone(),
            email: profile.email.clone(),
        }
    }
}

/// Everything the customer enters at checkout.
///
/// A draft lives for one checkout session. It is edited in place and only
/// read by validation, pricing and payload construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[serde(default)]
    pub customer: CustomerDetails,
    #[serde(default)]
    pub delivery: DeliverySelection,
    /// Selected payment method.
    #[serde(default)]
    pub payment_method: Option<PaymentMethodId>,
    /// Discount percentage, 0 to 100.
    #[serde(default)]
    pub discount: DiscountPercent,
    /// Cash the customer will pay with, so change can be prepared.
    #[serde(default)]
    pub cash_change_for: Option<Money>,
    /// Free-text notes for the whole order.
    #[serde(default)]
    pub notes: String,
}

impl CheckoutForm {
    /// An empty draft.
    pub fn blank() -> Self {
        Self::default()
    }

    /// A draft pre-filled from the signed-in customer, if any.
    pub fn prefilled(profile: Option<&CustomerProfile>) -> Self {
        let Some(profile) = profile else {
            return Self::blank();
        };

        let mut form = Self {
            customer: CustomerDetails::from(profile),
            ..Self::default()
        };
        if let Some(address) = &profile.default_address {
            form.delivery.address = address.clone();
        }
        form.delivery.zone_id = profile.default_zone.clone();
        form
    }

    /// Pricing for `cart` with this draft's discount and delivery choice.
    pub fn pricing(&self, cart: &Cart, zones: &[DeliveryZone]) -> Result<OrderPricing, CommerceError> {
        pricing_for_checkout(cart, self, zones)
    }
}

/// Compute pricing from a cart and a checkout draft.
pub fn pricing_for_checkout(
    cart: &Cart,
    form: &CheckoutForm,
    zones: &[DeliveryZone],
) -> Result<OrderPricing, CommerceError> {
    let fee = delivery_fee_for(&form.delivery, zones, cart.currency);
    compute_pricing(cart, form.discount.value(), fee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::checkout::DeliveryType;
    use crate::ids::ZoneId;
    use crate::money::Currency;
    use rust_decimal::Decimal;

    fn profile() -> CustomerProfile {
        CustomerProfile {
            document: "12345678".into(),
            name: "Ana Souza".into(),
            phone: "+55 11 99999-0000".into(),
            messaging_handle: "@ana".into(),
            default_address: Some("Rua A, 10".into()),
            default_zone: Some(ZoneId::new("centro")),
            ..CustomerProfile::default()
        }
    }

    #[test]
    fn test_blank_defaults() {
        let form = CheckoutForm::prefilled(None);
        assert_eq!(form, CheckoutForm::blank());
        assert_eq!(form.delivery.delivery_type, DeliveryType::Delivery);
        assert!(form.discount.is_zero());
    }

    #[test]
    fn test_prefilled_from_profile() {
        let form = CheckoutForm::prefilled(Some(&profile()));
        assert_eq!(form.customer.name, "Ana Souza");
        assert_eq!(form.customer.messaging_handle, "@ana");
        assert_eq!(form.delivery.address, "Rua A, 10");
        assert_eq!(form.delivery.zone_id, Some(ZoneId::new("centro")));
        assert!(form.payment_method.is_none());
    }

    #[test]
    fn test_pricing_switches_fee_with_delivery_type() {
        let mut cart = Cart::new(Currency::USD);
        cart.add_item(&Product::new("A", "Pizza", Money::from_minor(1800, Currency::USD)), 2, None)
            .unwrap();
        let zones = vec![DeliveryZone::new(
            "centro",
            "Centro",
            Money::from_minor(500, Currency::USD),
        )];

        let mut form = CheckoutForm::prefilled(Some(&profile()));
        form.discount = DiscountPercent::new(Decimal::from(10));
        let delivered = form.pricing(&cart, &zones).unwrap();
        assert_eq!(delivered.total, Money::from_minor(3740, Currency::USD));

        form.delivery.delivery_type = DeliveryType::Pickup;
        let picked_up = form.pricing(&cart, &zones).unwrap();
        assert!(picked_up.delivery_fee.is_zero());
        assert_eq!(picked_up.total, Money::from_minor(3240, Currency::USD));
    }

    #[test]
    fn test_form_deserializes_with_missing_fields() {
        let form: CheckoutForm = serde_json::from_str(
            r#"{"customer": {"name": "Ana"}, "delivery": {"type": "pickup"}, "discount": "5"}"#,
        )
        .unwrap();
        assert_eq!(form.customer.name, "Ana");
        assert_eq!(form.delivery.delivery_type, DeliveryType::Pickup);
        assert_eq!(form.discount.value(), Decimal::from(5));
    }
}
