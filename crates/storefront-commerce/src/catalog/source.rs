//! Catalog data source and graceful degradation.
//!
//! Pages must render even when the backend is down, so [`Catalog`] turns
//! every fetch failure into a logged warning plus an empty collection or a
//! placeholder value.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::catalog::{CompanyInfo, PaymentMethod, Product};
use crate::checkout::{CheckoutSettings, DeliveryZone};

/// Failure fetching catalog data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The backend could not be reached or answered with an error.
    #[error("Catalog data unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with data we could not understand.
    #[error("Malformed catalog data: {0}")]
    Malformed(String),
}

/// Backend endpoints the storefront reads catalog data from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Products on sale.
    async fn products(&self) -> Result<Vec<Product>, CatalogError>;

    /// Company and branch metadata.
    async fn company(&self) -> Result<CompanyInfo, CatalogError>;

    /// Delivery zones with fees.
    async fn delivery_zones(&self) -> Result<Vec<DeliveryZone>, CatalogError>;

    /// Payment methods, enabled or not.
    async fn payment_methods(&self) -> Result<Vec<PaymentMethod>, CatalogError>;
}

/// Catalog reader that never fails.
pub struct Catalog<S> {
    source: S,
}

impl<S: CatalogSource> Catalog<S> {
    /// Wrap a source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Products, or an empty list if unavailable.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Vec<Product> {
        self.source.products().await.unwrap_or_else(|e| {
            warn!(error = %e, "products unavailable, rendering empty catalog");
            Vec::new()
        })
    }

    /// Products currently orderable.
    pub async fn available_products(&self) -> Vec<Product> {
        self.products()
            .await
            .into_iter()
            .filter(Product::is_available)
            .collect()
    }

    /// Company metadata, or [`CompanyInfo::placeholder`] if unavailable.
    #[instrument(skip(self))]
    pub async fn company(&self) -> CompanyInfo {
        self.source.company().await.unwrap_or_else(|e| {
            warn!(error = %e, "company info unavailable, using placeholder");
            CompanyInfo::placeholder()
        })
    }

    /// Delivery zones, or an empty list if unavailable.
    #[instrument(skip(self))]
    pub async fn delivery_zones(&self) -> Vec<DeliveryZone> {
        self.source.delivery_zones().await.unwrap_or_else(|e| {
            warn!(error = %e, "delivery zones unavailable");
            Vec::new()
        })
    }

    /// Payment methods, or an empty list if unavailable.
    #[instrument(skip(self))]
    pub async fn payment_methods(&self) -> Vec<PaymentMethod> {
        self.source.payment_methods().await.unwrap_or_else(|e| {
            warn!(error = %e, "payment methods unavailable");
            Vec::new()
        })
    }

    /// Checkout settings assembled from zones and payment methods.
    pub async fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings::new(self.delivery_zones().await, self.payment_methods().await)
    }

    /// Borrow the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }
}
