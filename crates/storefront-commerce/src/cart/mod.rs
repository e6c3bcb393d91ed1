//! Shopping cart module.
//!
//! Contains the cart and its line items, the persisted cart store, the
//! checkout discount and the pricing calculator.

mod cart;
mod discount;
mod pricing;
mod store;

pub use cart::{Cart, LineItem, MAX_QUANTITY_PER_ITEM};
pub use discount::{DiscountPercent, ParseDiscountError};
pub use pricing::{compute_pricing, OrderPricing};
pub use store::{CartStore, DEFAULT_CART_KEY};
