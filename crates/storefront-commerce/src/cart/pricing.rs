//! Order pricing calculations.

use crate::cart::{Cart, DiscountPercent};
use crate::error::CommerceError;
use crate::money::{Currency, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Complete pricing breakdown for an order.
///
/// Always derived from the current cart and checkout form, never stored.
/// Amounts are unrounded; call [`OrderPricing::rounded`] for presentation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OrderPricing {
    /// Sum of price x quantity.
    pub subtotal: Money,
    /// Discount taken off the subtotal.
    pub discount_amount: Money,
    /// Subtotal minus discount.
    pub discounted_subtotal: Money,
    /// Delivery fee (zero for pickup).
    pub delivery_fee: Money,
    /// Final total (discounted subtotal + delivery fee).
    pub total: Money,
}

impl OrderPricing {
    /// All-zero pricing in a currency.
    pub fn zero(currency: Currency) -> Self {
        let zero = Money::zero(currency);
        Self {
            subtotal: zero,
            discount_amount: zero,
            discounted_subtotal: zero,
            delivery_fee: zero,
            total: zero,
        }
    }

    /// Round to the currency's minor unit.
    ///
    /// Subtotal, discount and fee are rounded; the discounted subtotal and
    /// total are then derived from those, so the rounded breakdown always
    /// adds up.
    pub fn rounded(&self) -> Self {
        let subtotal = self.subtotal.rounded();
        let discount_amount = self.discount_amount.rounded();
        let delivery_fee = self.delivery_fee.rounded();
        let discounted_subtotal = Money::new(
            subtotal.amount.saturating_sub(discount_amount.amount),
            subtotal.currency,
        );
        let total = Money::new(
            discounted_subtotal.amount.saturating_add(delivery_fee.amount),
            subtotal.currency,
        );

        Self {
            subtotal,
            discount_amount,
            discounted_subtotal,
            delivery_fee,
            total,
        }
    }

    /// Check if any discount is applied.
    pub fn has_discount(&self) -> bool {
        self.discount_amount.is_positive()
    }

    /// Check if delivery is charged.
    pub fn has_delivery_fee(&self) -> bool {
        self.delivery_fee.is_positive()
    }
}

/// Compute pricing for a cart.
///
/// - subtotal = sum of price x quantity
/// - discount = subtotal x clamp(discount_percent, 0, 100) / 100
/// - total = subtotal - discount + delivery_fee
///
/// A negative delivery fee counts as zero. Fails only on a delivery fee in
/// another currency or arithmetic overflow.
pub fn compute_pricing(
    cart: &Cart,
    discount_percent: Decimal,
    delivery_fee: Money,
) -> Result<OrderPricing, CommerceError> {
    let currency = cart.currency;
    if delivery_fee.currency != currency {
        return Err(CommerceError::CurrencyMismatch {
            expected: currency.code().to_string(),
            got: delivery_fee.currency.code().to_string(),
        });
    }

    let mut subtotal = Decimal::ZERO;
    for item in &cart.items {
        let line = item
            .price
            .amount
            .checked_mul(Decimal::from(item.quantity))
            .ok_or(CommerceError::Overflow)?;
        subtotal = subtotal.checked_add(line).ok_or(CommerceError::Overflow)?;
    }

    let percent = DiscountPercent::new(discount_percent).value();
    let discount_amount = subtotal
        .checked_mul(percent)
        .ok_or(CommerceError::Overflow)?
        / Decimal::ONE_HUNDRED;
    let discounted_subtotal = subtotal - discount_amount;
    let fee = delivery_fee.amount.max(Decimal::ZERO);
    let total = discounted_subtotal
        .checked_add(fee)
        .ok_or(CommerceError::Overflow)?;

    Ok(OrderPricing {
        subtotal: Money::new(subtotal, currency),
        discount_amount: Money::new(discount_amount, currency),
        discounted_subtotal: Money::new(discounted_subtotal, currency),
        delivery_fee: Money::new(fee, currency),
        total: Money::new(total, currency),
    })
}
