//! Backend JSON shapes and their mapping into ordering-core types.
//!
//! The backend speaks camelCase, sends prices as JSON numbers and hands out
//! ids as either strings or integers. Nothing outside this module sees those
//! shapes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use storefront_commerce::catalog::{CompanyInfo, PaymentKind, PaymentMethod, Product, ProductKind};
use storefront_commerce::checkout::{
    ConfirmationLine, DeliveryType, DeliveryZone, OrderConfirmation, OrderStatus,
};
use storefront_commerce::gateway::CreateOrderResponse;
use storefront_commerce::{BranchId, Currency, Money, OrderId};

/// Accept `"12"` or `12` as an id.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

fn opt_id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }
    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    }))
}

fn default_true() -> bool {
    true
}

/// Blank strings from the backend mean "not set".
fn filled(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireProduct {
    #[serde(deserialize_with = "id_string")]
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(default)]
    product_type: Option<String>,
    #[serde(default)]
    tax_code: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default = "default_true")]
    available: bool,
}

impl WireProduct {
    pub(crate) fn into_product(self, currency: Currency) -> Product {
        Product {
            id: self.id.into(),
            name: self.name,
            description: filled(self.description),
            price: Money::new(self.price, currency),
            kind: self
                .product_type
                .as_deref()
                .map(ProductKind::from_label)
                .unwrap_or_default(),
            tax_reference: filled(self.tax_code),
            category: filled(self.category),
            image_url: filled(self.image_url),
            available: self.available,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireCompany {
    name: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    branch_id: Option<String>,
    #[serde(default)]
    branch_name: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    whatsapp: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    opening_hours: Option<String>,
}

impl WireCompany {
    /// Unknown currency codes fall back to `fallback`.
    pub(crate) fn into_company(self, fallback: Currency) -> CompanyInfo {
        CompanyInfo {
            name: self.name,
            branch_id: self.branch_id.map(BranchId::new),
            branch_name: filled(self.branch_name),
            currency: self
                .currency
                .as_deref()
                .and_then(Currency::from_code)
                .unwrap_or(fallback),
            phone: filled(self.phone),
            messaging_handle: filled(self.whatsapp),
            address: filled(self.address),
            opening_hours: filled(self.opening_hours),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireZone {
    #[serde(deserialize_with = "id_string")]
    id: String,
    name: String,
    #[serde(with = "rust_decimal::serde::float")]
    delivery_fee: Decimal,
    #[serde(default)]
    min_time: Option<u32>,
    #[serde(default)]
    max_time: Option<u32>,
    #[serde(default = "default_true")]
    active: bool,
}

impl WireZone {
    pub(crate) fn into_zone(self, currency: Currency) -> DeliveryZone {
        DeliveryZone {
            id: self.id.into(),
            name: self.name,
            fee: Money::new(self.delivery_fee, currency),
            min_minutes: self.min_time,
            max_minutes: self.max_time,
            active: self.active,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WirePaymentMethod {
    #[serde(deserialize_with = "id_string")]
    id: String,
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default = "default_true")]
    active: bool,
}

impl WirePaymentMethod {
    pub(crate) fn into_method(self) -> PaymentMethod {
        let kind = match self.kind.as_deref().map(str::to_lowercase).as_deref() {
            Some("cash") | Some("efectivo") => PaymentKind::Cash,
            Some("card") | Some("credit_card") | Some("debit_card") => PaymentKind::Card,
            Some("transfer") | Some("bank_transfer") => PaymentKind::Transfer,
            _ => PaymentKind::Other,
        };
        PaymentMethod {
            id: self.id.into(),
            name: self.name,
            kind,
            enabled: self.active,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireCreateOrder {
    #[serde(default)]
    success: bool,
    #[serde(default, deserialize_with = "opt_id_string")]
    order_id: Option<String>,
    #[serde(default, alias = "message")]
    error_message: Option<String>,
}

impl From<WireCreateOrder> for CreateOrderResponse {
    fn from(wire: WireCreateOrder) -> Self {
        CreateOrderResponse {
            success: wire.success,
            order_id: wire.order_id.map(OrderId::new),
            error_message: filled(wire.error_message),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireOrderLine {
    #[serde(deserialize_with = "id_string")]
    product_id: String,
    name: String,
    quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    unit_price: Decimal,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireOrder {
    #[serde(deserialize_with = "id_string")]
    id: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    number: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    customer_name: String,
    #[serde(default)]
    delivery_type: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    items: Vec<WireOrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    subtotal: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    discount: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    delivery_fee: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
    #[serde(default)]
    payment_method: Option<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

fn order_status(label: Option<&str>) -> OrderStatus {
    match label.map(str::to_lowercase).as_deref() {
        Some("confirmed") | Some("accepted") => OrderStatus::Confirmed,
        Some("preparing") | Some("in_preparation") => OrderStatus::Preparing,
        Some("dispatched") | Some("on_the_way") | Some("ready") => OrderStatus::Dispatched,
        Some("delivered") | Some("completed") => OrderStatus::Delivered,
        Some("cancelled") | Some("canceled") | Some("rejected") => OrderStatus::Cancelled,
        _ => OrderStatus::Pending,
    }
}

impl WireOrder {
    pub(crate) fn into_confirmation(self, currency: Currency) -> OrderConfirmation {
        let money = |amount: Decimal| Money::new(amount, currency);
        let delivery_type = match self.delivery_type.as_deref() {
            Some(t) if t.eq_ignore_ascii_case("pickup") => DeliveryType::Pickup,
            _ => DeliveryType::Delivery,
        };

        OrderConfirmation {
            id: OrderId::new(self.id),
            number: self.number,
            status: order_status(self.status.as_deref()),
            customer_name: self.customer_name,
            delivery_type,
            address: filled(self.address),
            lines: self
                .items
                .into_iter()
                .map(|l| ConfirmationLine {
                    product_id: l.product_id.into(),
                    name: l.name,
                    quantity: l.quantity,
                    unit_price: money(l.unit_price),
                    notes: filled(l.notes),
                })
                .collect(),
            subtotal: money(self.subtotal),
            discount_amount: money(self.discount.unwrap_or_default()),
            delivery_fee: money(self.delivery_fee.unwrap_or_default()),
            total: money(self.total),
            payment_method: filled(self.payment_method),
            notes: filled(self.notes),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_product_mapping() {
        let wire: WireProduct = serde_json::from_str(
            r#"{
                "id": 12,
                "name": "Margherita",
                "description": "",
                "price": 18.5,
                "productType": "combo",
                "taxCode": "FOOD-01",
                "category": "Pizzas"
            }"#,
        )
        .unwrap();
        let product = wire.into_product(Currency::BRL);

        assert_eq!(product.id.as_str(), "12");
        assert_eq!(product.price, Money::new(dec("18.5"), Currency::BRL));
        assert_eq!(product.kind, ProductKind::Combo);
        assert_eq!(product.tax_reference.as_deref(), Some("FOOD-01"));
        assert!(product.description.is_none());
        assert!(product.available);
    }

    #[test]
    fn test_company_mapping() {
        let wire: WireCompany = serde_json::from_str(
            r#"{"name": "Pizzeria Roma", "branchId": 3, "branchName": "Centro",
                "currency": "pen", "whatsapp": "+51 999 000 111"}"#,
        )
        .unwrap();
        let company = wire.into_company(Currency::USD);

        assert_eq!(company.display_name(), "Pizzeria Roma - Centro");
        assert_eq!(company.branch_id, Some(BranchId::new("3")));
        assert_eq!(company.currency, Currency::PEN);
        assert_eq!(company.messaging_handle.as_deref(), Some("+51 999 000 111"));
    }

    #[test]
    fn test_unknown_currency_falls_back() {
        let wire: WireCompany = serde_json::from_str(r#"{"name": "X", "currency": "XYZ"}"#).unwrap();
        assert_eq!(wire.into_company(Currency::EUR).currency, Currency::EUR);
    }

    #[test]
    fn test_zone_and_payment_mapping() {
        let zone: WireZone = serde_json::from_str(
            r#"{"id": "centro", "name": "Centro", "deliveryFee": 5, "minTime": 30, "maxTime": 45}"#,
        )
        .unwrap();
        let zone = zone.into_zone(Currency::USD);
        assert_eq!(zone.fee, Money::from_minor(500, Currency::USD));
        assert_eq!(zone.delivery_estimate().as_deref(), Some("30-45 min"));

        let method: WirePaymentMethod =
            serde_json::from_str(r#"{"id": 1, "name": "Efectivo", "type": "CASH", "active": false}"#)
                .unwrap();
        let method = method.into_method();
        assert!(method.is_cash());
        assert!(!method.enabled);
    }

    #[test]
    fn test_create_order_mapping() {
        let ok: WireCreateOrder = serde_json::from_str(r#"{"success": true, "orderId": 981}"#).unwrap();
        assert_eq!(CreateOrderResponse::from(ok), CreateOrderResponse::created("981"));

        let failed: WireCreateOrder =
            serde_json::from_str(r#"{"success": false, "message": "Branch closed"}"#).unwrap();
        assert_eq!(
            CreateOrderResponse::from(failed),
            CreateOrderResponse::rejected("Branch closed")
        );
    }

    #[test]
    fn test_order_mapping() {
        let wire: WireOrder = serde_json::from_str(
            r#"{
                "id": "ord_1",
                "number": 1042,
                "status": "ACCEPTED",
                "customerName": "Ana",
                "deliveryType": "pickup",
                "items": [
                    {"productId": "A", "name": "Pizza", "quantity": 2, "unitPrice": 18.0}
                ],
                "subtotal": 36.0,
                "total": 36.0,
                "createdAt": "2030-06-01T19:30:00Z"
            }"#,
        )
        .unwrap();
        let order = wire.into_confirmation(Currency::USD);

        assert_eq!(order.number.as_deref(), Some("1042"));
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.delivery_type, DeliveryType::Pickup);
        assert_eq!(order.item_count(), 2);
        assert!(order.delivery_fee.is_zero());
        assert_eq!(order.total, Money::from_minor(3600, Currency::USD));
        assert!(order.created_at.is_some());
    }
}
