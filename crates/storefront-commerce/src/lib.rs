//! Ordering core for a restaurant/retail storefront.
//!
//! - **Catalog**: products, delivery zones, payment methods, company info
//! - **Cart**: line items persisted to key-value storage, discount, pricing
//! - **Checkout**: form validation, order payload, submission state machine
//! - **Gateway**: the remote order API boundary
//!
//! # Example
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use storefront_cache::MemoryStore;
//! use storefront_commerce::prelude::*;
//!
//! let mut cart = CartStore::open(MemoryStore::new(), "cart", Currency::USD);
//! cart.add_item(&Product::new("A", "Pizza", Money::from_minor(1800, Currency::USD)), 2, None)
//!     .unwrap();
//! cart.add_item(&Product::new("B", "Soda", Money::from_minor(650, Currency::USD)), 1, None)
//!     .unwrap();
//!
//! let pricing = compute_pricing(
//!     cart.cart(),
//!     Decimal::from(10),
//!     Money::from_minor(500, Currency::USD),
//! )
//! .unwrap();
//! assert_eq!(pricing.total.display(), "$43.25");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod gateway;

pub use error::{CheckoutError, CommerceError};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CheckoutError, CommerceError};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        Catalog, CatalogError, CatalogSource, CompanyInfo, CustomerProfile, PaymentKind,
        PaymentMethod, Product, ProductKind,
    };

    // Cart
    pub use crate::cart::{
        compute_pricing, Cart, CartStore, DiscountPercent, LineItem, OrderPricing,
        DEFAULT_CART_KEY, MAX_QUANTITY_PER_ITEM,
    };

    // Checkout
    pub use crate::checkout::{
        build_order_payload, CheckoutForm, CheckoutSession, CheckoutSettings, CheckoutState,
        CustomerDetails, DeliverySelection, DeliveryType, DeliveryZone, FormField,
        OrderConfirmation, OrderPayload, OrderStatus, Scheduling, ValidationErrors,
        INTERRUPTED_MESSAGE,
    };

    // Gateway
    pub use crate::gateway::{CreateOrderResponse, GatewayError, OrderGateway};
}
