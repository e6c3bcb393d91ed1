//! Order confirmation returned by the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checkout::DeliveryType;
use crate::ids::{OrderId, ProductId};
use crate::money::Money;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting the branch.
    #[default]
    Pending,
    /// Accepted by the branch.
    Confirmed,
    /// Being prepared.
    Preparing,
    /// Out for delivery or ready for pickup.
    Dispatched,
    /// Handed to the customer.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Dispatched => "Dispatched",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// A placed order, as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderConfirmation {
    /// Unique order identifier.
    pub id: OrderId,
    /// Human-readable order number, if the backend assigns one.
    pub number: Option<String>,
    pub status: OrderStatus,
    pub customer_name: String,
    pub delivery_type: DeliveryType,
    pub address: Option<String>,
    /// Items in the order.
    pub lines: Vec<ConfirmationLine>,
    pub subtotal: Money,
    pub discount_amount: Money,
    pub delivery_fee: Money,
    pub total: Money,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A line item in a placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfirmationLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub notes: Option<String>,
}

impl ConfirmationLine {
    pub fn line_total(&self) -> Money {
        Money::new(
            self.unit_price.amount.saturating_mul(self.quantity.into()),
            self.unit_price.currency,
        )
    }
}

impl OrderConfirmation {
    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Plain-text receipt for display or printing.
    pub fn receipt_lines(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.lines.len() + 8);
        let number = self.number.as_deref().unwrap_or(self.id.as_str());
        out.push(format!("Order #{} ({})", number, self.status.display_name()));
        if let Some(at) = self.created_at {
            out.push(at.format("%Y-%m-%d %H:%M UTC").to_string());
        }
        out.push(format!("Customer: {}", self.customer_name));
        match (&self.delivery_type, &self.address) {
            (DeliveryType::Delivery, Some(address)) => out.push(format!("Deliver to: {address}")),
            (DeliveryType::Delivery, None) => out.push("Delivery".to_string()),
            (DeliveryType::Pickup, _) => out.push("Pickup at branch".to_string()),
        }

        for line in &self.lines {
            out.push(format!(
                "{:>4} x {:<28} {:>12}",
                line.quantity,
                line.name,
                line.line_total().display()
            ));
            if let Some(notes) = &line.notes {
                out.push(format!("       {notes}"));
            }
        }

        out.push(format!("Subtotal: {}", self.subtotal.display()));
        if self.discount_amount.is_positive() {
            out.push(format!("Discount: -{}", self.discount_amount.display()));
        }
        if self.delivery_fee.is_positive() {
            out.push(format!("Delivery: {}", self.delivery_fee.display()));
        }
        out.push(format!("Total: {}", self.total.display()));
        if let Some(method) = &self.payment_method {
            out.push(format!("Payment: {method}"));
        }
        if let Some(notes) = &self.notes {
            out.push(format!("Notes: {notes}"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    fn usd(minor: i64) -> Money {
        Money::from_minor(minor, Currency::USD)
    }

    fn confirmation() -> OrderConfirmation {
        OrderConfirmation {
            id: OrderId::new("ord_1"),
            number: Some("1042".into()),
            status: OrderStatus::Confirmed,
            customer_name: "Ana".into(),
            delivery_type: DeliveryType::Delivery,
            address: Some("Rua A, 10".into()),
            lines: vec![ConfirmationLine {
                product_id: ProductId::new("A"),
                name: "Pizza".into(),
                quantity: 2,
                unit_price: usd(1800),
                notes: Some("no olives".into()),
            }],
            subtotal: usd(3600),
            discount_amount: usd(0),
            delivery_fee: usd(500),
            total: usd(4100),
            payment_method: Some("Cash".into()),
            notes: None,
            created_at: None,
        }
    }

    #[test]
    fn test_status_terminal() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
    }

    #[test]
    fn test_receipt() {
        let receipt = confirmation().receipt_lines();
        assert_eq!(receipt[0], "Order #1042 (Confirmed)");
        assert!(receipt.contains(&"Deliver to: Rua A, 10".to_string()));
        assert!(receipt.iter().any(|l| l.contains("Pizza") && l.contains("$36.00")));
        assert!(receipt.contains(&"Delivery: $5.00".to_string()));
        assert!(!receipt.iter().any(|l| l.starts_with("Discount")));
        assert_eq!(receipt.last().map(String::as_str), Some("Payment: Cash"));
    }

    #[test]
    fn test_item_count() {
        assert_eq!(confirmation().item_count(), 2);
    }
}
