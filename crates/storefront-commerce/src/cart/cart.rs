//! Cart and line item types.

use crate::catalog::{Product, ProductKind};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// A shopping cart: line items keyed by product id, in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Items in the cart.
    pub items: Vec<LineItem>,
    /// Cart currency.
    pub currency: Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            currency,
        }
    }

    /// Rebuild a cart from persisted items.
    ///
    /// Restores the cart invariants: lines with a non-positive quantity or a
    /// foreign currency are dropped, duplicate ids are merged and quantities
    /// are capped at [`MAX_QUANTITY_PER_ITEM`].
    pub fn from_items(items: Vec<LineItem>, currency: Currency) -> Self {
        let mut cart = Self::new(currency);
        for item in items {
            if item.quantity <= 0 || item.price.currency != currency {
                warn!(id = %item.id, quantity = item.quantity, "dropping invalid persisted line");
                continue;
            }
            match cart.items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .saturating_add(item.quantity)
                        .min(MAX_QUANTITY_PER_ITEM);
                }
                None => {
                    let mut item = item;
                    item.quantity = item.quantity.min(MAX_QUANTITY_PER_ITEM);
                    cart.items.push(item);
                }
            }
        }
        cart
    }

    /// Add a product to the cart.
    ///
    /// Adding a product already in the cart increases its quantity and
    /// overwrites its notes. A non-positive quantity is a no-op and returns
    /// `Ok(false)`.
    ///
    /// Returns an error if:
    /// - The product is priced in another currency
    /// - The resulting quantity exceeds MAX_QUANTITY_PER_ITEM
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: i64,
        notes: Option<String>,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(false);
        }

        if product.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: product.price.currency.code().to_string(),
            });
        }

        // Check if item already exists
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == product.id) {
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;

            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }

            existing.quantity = new_quantity;
            existing.notes = normalize_notes(notes);
            return Ok(true);
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        self.items.push(LineItem::from_product(product, quantity, notes));
        Ok(true)
    }

    /// Update item quantity.
    ///
    /// If quantity is <= 0, removes the item. Returns whether the cart changed.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_item(id));
        }

        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        match self.items.iter_mut().find(|i| &i.id == id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Replace the notes on a line. Returns whether the line exists.
    pub fn update_notes(&mut self, id: &ProductId, notes: Option<String>) -> bool {
        match self.items.iter_mut().find(|i| &i.id == id) {
            Some(item) => {
                item.notes = normalize_notes(notes);
                true
            }
            None => false,
        }
    }

    /// Remove an item from the cart.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != id);
        self.items.len() < len_before
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price x quantity over all lines, at full precision.
    pub fn total(&self) -> Money {
        let amount = self
            .items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.line_total().amount));
        Money::new(amount, self.currency)
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Get number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by product id.
    pub fn get_item(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.id == id)
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product id; unique within a cart.
    pub id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Quantity, always positive while in the cart.
    pub quantity: i64,
    /// Customer instructions for this line (e.g., "no onions").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// How the product is sold.
    #[serde(default)]
    pub product_kind: ProductKind,
    /// Fiscal/tax classification forwarded with the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_reference: Option<String>,
}

impl LineItem {
    /// Create a line from a catalog product.
    pub fn from_product(product: &Product, quantity: i64, notes: Option<String>) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity,
            notes: normalize_notes(notes),
            product_kind: product.kind,
            tax_reference: product.tax_reference.clone(),
        }
    }

    /// Unit price x quantity.
    pub fn line_total(&self) -> Money {
        Money::new(
            self.price.amount.saturating_mul(Decimal::from(self.quantity)),
            self.price.currency,
        )
    }
}

/// Blank notes are stored as `None`.
fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}
