//! Product types.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// How a product is sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    /// A plain item sold as-is.
    #[default]
    Simple,
    /// A bundle of several items sold at one price.
    Combo,
    /// An item assembled from customer choices (sizes, toppings).
    Custom,
}

impl ProductKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Simple => "simple",
            ProductKind::Combo => "combo",
            ProductKind::Custom => "custom",
        }
    }

    /// Parse a backend kind label. Unknown labels fall back to `Simple`.
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "combo" | "bundle" => ProductKind::Combo,
            "custom" | "custom_item" => ProductKind::Custom,
            _ => ProductKind::Simple,
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Description shown on the product page.
    pub description: Option<String>,
    /// Unit price.
    pub price: Money,
    /// How the product is sold.
    pub kind: ProductKind,
    /// Fiscal/tax classification code forwarded with orders.
    pub tax_reference: Option<String>,
    /// Catalog section (e.g., "Pizzas", "Drinks").
    pub category: Option<String>,
    /// Product image.
    pub image_url: Option<String>,
    /// Whether the product can currently be ordered.
    pub available: bool,
}

impl Product {
    /// Create a new available simple product.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            price,
            kind: ProductKind::Simple,
            tax_reference: None,
            category: None,
            image_url: None,
            available: true,
        }
    }

    /// Set the product kind.
    pub fn with_kind(mut self, kind: ProductKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the tax reference.
    pub fn with_tax_reference(mut self, tax_reference: impl Into<String>) -> Self {
        self.tax_reference = Some(tax_reference.into());
        self
    }

    /// Set the catalog section.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Check if the product is available for purchase.
    pub fn is_available(&self) -> bool {
        self.available
    }
}

/// Group products by catalog section, preserving catalog order.
///
/// Products without a section land under `None` at the end.
pub fn group_by_category(products: &[Product]) -> Vec<(Option<&str>, Vec<&Product>)> {
    let mut groups: Vec<(Option<&str>, Vec<&Product>)> = Vec::new();
    for product in products {
        let key = product.category.as_deref();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, items)) => items.push(product),
            None => groups.push((key, vec![product])),
        }
    }
    groups.sort_by_key(|(k, _)| k.is_none());
    groups
}
