//! Outbound order document.
//!
//! The payload is the only thing the order gateway sees. Amounts are rounded
//! to the currency's minor unit here and sent as JSON numbers.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, LineItem};
use crate::checkout::{pricing_for_checkout, CheckoutForm, CheckoutSettings, DeliveryType, Scheduling};
use crate::error::CommerceError;
use crate::ids::{PaymentMethodId, ProductId, ZoneId};
use crate::money::Currency;

/// Order creation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub customer: CustomerBlock,
    pub items: Vec<PayloadLine>,
    pub delivery: DeliveryBlock,
    pub payment: PaymentBlock,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBlock {
    pub document: String,
    pub name: String,
    pub phone: String,
    pub messaging_handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PayloadLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryBlock {
    #[serde(rename = "type")]
    pub delivery_type: DeliveryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<ZoneId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_reference: Option<String>,
    pub scheduled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_id: Option<PaymentMethodId>,
    pub currency: Currency,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discounted_subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub cash_change_for: Option<Decimal>,
}

/// Assemble the order document from the cart and checkout draft.
///
/// Pure: the same cart, form and settings always produce the same payload.
/// Validation is not repeated here.
pub fn build_order_payload(
    cart: &Cart,
    form: &CheckoutForm,
    settings: &CheckoutSettings,
) -> Result<OrderPayload, CommerceError> {
    let pricing = pricing_for_checkout(cart, form, &settings.zones)?.rounded();
    let customer = &form.customer;
    let delivery = &form.delivery;

    let (scheduled_date, scheduled_time) = match delivery.scheduling {
        Scheduling::Now => (None, None),
        Scheduling::Scheduled { date, time } => (date, time),
    };
    let is_delivery = delivery.is_delivery();

    Ok(OrderPayload {
        customer: CustomerBlock {
            document: customer.document.trim().to_string(),
            name: customer.name.trim().to_string(),
            phone: customer.phone.trim().to_string(),
            messaging_handle: customer.messaging_handle.trim().to_string(),
            email: non_blank(customer.email.as_deref()),
        },
        items: cart.items.iter().map(payload_line).collect(),
        delivery: DeliveryBlock {
            delivery_type: delivery.delivery_type,
            zone_id: delivery.zone_id.clone().filter(|_| is_delivery),
            address: non_blank(Some(&delivery.address)).filter(|_| is_delivery),
            address_reference: non_blank(delivery.address_reference.as_deref())
                .filter(|_| is_delivery),
            scheduled: delivery.scheduling.is_scheduled(),
            scheduled_date,
            scheduled_time,
        },
        payment: PaymentBlock {
            method_id: form.payment_method.clone(),
            currency: cart.currency,
            subtotal: pricing.subtotal.amount,
            discount_percent: form.discount.value(),
            discount_amount: pricing.discount_amount.amount,
            discounted_subtotal: pricing.discounted_subtotal.amount,
            delivery_fee: pricing.delivery_fee.amount,
            total: pricing.total.amount,
            cash_change_for: form.cash_change_for.map(|m| m.rounded().amount),
        },
        notes: non_blank(Some(&form.notes)),
    })
}

fn payload_line(item: &LineItem) -> PayloadLine {
    PayloadLine {
        product_id: item.id.clone(),
        name: item.name.clone(),
        quantity: item.quantity,
        unit_price: item.price.rounded().amount,
        line_total: item.line_total().rounded().amount,
        tax_reference: item.tax_reference.clone(),
        notes: item.notes.clone(),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
