//! Backend REST adapter for the storefront.
//!
//! [`BackendClient`] talks to the storefront backend over HTTP and plugs into
//! the ordering core as both its catalog source and its order gateway.
//! Backend field names and number formats are translated at this boundary.
//!
//! # Example
//!
//! ```rust,no_run
//! use storefront_commerce::catalog::Catalog;
//! use storefront_data::{BackendClient, BackendConfig};
//!
//! # async fn run() -> Result<(), storefront_data::FetchError> {
//! let config = BackendConfig::new("https://api.example.com/v1").with_api_token("token");
//! let client = BackendClient::new(&config)?;
//!
//! // Degrades to empty collections if the backend is down.
//! let catalog = Catalog::new(client.clone());
//! let products = catalog.available_products().await;
//! println!("{} products", products.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod wire;

pub use client::{BackendClient, BackendConfig, DEFAULT_TIMEOUT};
pub use error::FetchError;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{BackendClient, BackendConfig, FetchError};
}
