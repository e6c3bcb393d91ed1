//! Cart persisted to key-value storage.

use storefront_cache::{Cache, KvStore};
use tracing::{debug, instrument, warn};

use crate::cart::{Cart, LineItem};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Default storage key for the cart.
pub const DEFAULT_CART_KEY: &str = "cart";

/// The customer's cart, written through to storage on every mutation.
///
/// Storage is stored as a JSON array of [`LineItem`]. Loading never fails:
/// missing or corrupt data yields an empty cart. Write failures are logged
/// and the in-memory cart stays authoritative.
pub struct CartStore<S> {
    cart: Cart,
    cache: Cache<S>,
    key: String,
}

impl<S: KvStore> CartStore<S> {
    /// Load the cart stored under `key`, or start empty.
    #[instrument(skip(store))]
    pub fn open(store: S, key: impl Into<String> + std::fmt::Debug, currency: Currency) -> Self {
        let key = key.into();
        let cache = Cache::new(store);
        let cart = match cache.get::<Vec<LineItem>>(&key) {
            Ok(Some(items)) => Cart::from_items(items, currency),
            Ok(None) => Cart::new(currency),
            Err(e) => {
                warn!(error = %e, key = %key, "stored cart unreadable, starting empty");
                Cart::new(currency)
            }
        };
        debug!(lines = cart.unique_item_count(), "cart loaded");
        Self { cart, cache, key }
    }

    /// Add a product. See [`Cart::add_item`].
    pub fn add_item(
        &mut self,
        product: &Product,
        quantity: i64,
        notes: Option<String>,
    ) -> Result<bool, CommerceError> {
        let changed = self.cart.add_item(product, quantity, notes)?;
        if changed {
            self.persist();
        }
        Ok(changed)
    }

    /// Set a line's quantity; non-positive removes it.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> Result<bool, CommerceError> {
        let changed = self.cart.update_quantity(id, quantity)?;
        if changed {
            self.persist();
        }
        Ok(changed)
    }

    /// Replace a line's notes.
    pub fn update_notes(&mut self, id: &ProductId, notes: Option<String>) -> bool {
        let changed = self.cart.update_notes(id, notes);
        if changed {
            self.persist();
        }
        changed
    }

    /// Remove a line if present.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let changed = self.cart.remove_item(id);
        if changed {
            self.persist();
        }
        changed
    }

    /// Empty the cart and persist the empty array.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// Sum of price x quantity.
    pub fn total(&self) -> Money {
        self.cart.total()
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> i64 {
        self.cart.item_count()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Current lines.
    pub fn items(&self) -> &[LineItem] {
        &self.cart.items
    }

    /// Borrow the cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    fn persist(&self) {
        if let Err(e) = self.cache.set(&self.key, &self.cart.items) {
            warn!(error = %e, key = %self.key, "failed to persist cart");
        }
    }
}
