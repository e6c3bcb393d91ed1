//! Catalog module.
//!
//! Contains the backend-facing types the ordering core consumes: products,
//! company metadata, payment methods and customer profiles.

mod company;
mod customer;
mod payment;
mod product;
mod source;

pub use company::CompanyInfo;
pub use customer::CustomerProfile;
pub use payment::{find_enabled, PaymentKind, PaymentMethod};
pub use product::{group_by_category, Product, ProductKind};
pub use source::{Catalog, CatalogError, CatalogSource};
