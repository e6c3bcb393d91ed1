//! HTTP client for the storefront backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use storefront_commerce::catalog::{
    CatalogError, CatalogSource, CompanyInfo, PaymentMethod, Product,
};
use storefront_commerce::checkout::{DeliveryZone, OrderConfirmation, OrderPayload};
use storefront_commerce::gateway::{CreateOrderResponse, GatewayError, OrderGateway};
use storefront_commerce::{Currency, OrderId};

use crate::error::FetchError;
use crate::wire::{
    WireCompany, WireCreateOrder, WireOrder, WirePaymentMethod, WireProduct, WireZone,
};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`BackendClient`].
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL, e.g. `https://api.example.com/v1`.
    pub base_url: String,
    /// Bearer token sent with every request.
    pub api_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Currency prices are quoted in when the backend does not say.
    pub currency: Currency,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: None,
            timeout: DEFAULT_TIMEOUT,
            currency: Currency::default(),
        }
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }
}

/// Backend REST client.
///
/// Implements [`CatalogSource`] and [`OrderGateway`]. Cheap to clone.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    currency: Currency,
}

impl BackendClient {
    /// Build a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not http(s) or the token cannot
    /// be sent as a header.
    pub fn new(config: &BackendConfig) -> Result<Self, FetchError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(config.base_url.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = config.api_token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| FetchError::Config(format!("invalid API token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                currency: config.currency,
            }),
        })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Currency used for backend prices.
    pub fn currency(&self) -> Currency {
        self.inner.currency
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// URL of a single order; the id is percent-encoded as one path segment.
    fn order_url(&self, order_id: &OrderId) -> Result<reqwest::Url, FetchError> {
        let invalid = || FetchError::InvalidUrl(self.inner.base_url.clone());
        let mut url = reqwest::Url::parse(&self.inner.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push("orders")
            .push(order_id.as_str());
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        self.get_url(&self.url(path)).await
    }

    async fn get_url<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!(%url, "GET");
        let response = self.inner.http.get(url).send().await?;
        handle_response(response).await
    }

    /// Fetch products.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        let wire: Vec<WireProduct> = self.get("products").await?;
        let currency = self.currency();
        Ok(wire.into_iter().map(|p| p.into_product(currency)).collect())
    }

    /// Fetch company and branch metadata.
    #[instrument(skip(self))]
    pub async fn fetch_company(&self) -> Result<CompanyInfo, FetchError> {
        let wire: WireCompany = self.get("company").await?;
        Ok(wire.into_company(self.currency()))
    }

    /// Fetch delivery zones.
    #[instrument(skip(self))]
    pub async fn fetch_delivery_zones(&self) -> Result<Vec<DeliveryZone>, FetchError> {
        let wire: Vec<WireZone> = self.get("delivery-zones").await?;
        let currency = self.currency();
        Ok(wire.into_iter().map(|z| z.into_zone(currency)).collect())
    }

    /// Fetch payment methods.
    #[instrument(skip(self))]
    pub async fn fetch_payment_methods(&self) -> Result<Vec<PaymentMethod>, FetchError> {
        let wire: Vec<WirePaymentMethod> = self.get("payment-methods").await?;
        Ok(wire.into_iter().map(WirePaymentMethod::into_method).collect())
    }

    /// Create an order.
    ///
    /// A rejection the backend explains in the body, even with a 4xx
    /// status, is returned as an unsuccessful response rather than an error.
    #[instrument(skip_all)]
    pub async fn submit_order(&self, payload: &OrderPayload) -> Result<CreateOrderResponse, FetchError> {
        let url = self.url("orders");
        let response = self.inner.http.post(&url).json(payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<WireCreateOrder>(&body) {
            Ok(wire) => {
                let answer = CreateOrderResponse::from(wire);
                if !status.is_success() && answer.success {
                    warn!(status = status.as_u16(), "backend reported success with an error status");
                    return Err(FetchError::HttpError {
                        status: status.as_u16(),
                        message: body,
                    });
                }
                Ok(answer)
            }
            Err(_) if !status.is_success() => Err(FetchError::HttpError {
                status: status.as_u16(),
                message: body,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a placed order.
    #[instrument(skip(self))]
    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<OrderConfirmation, FetchError> {
        let url = self.order_url(order_id)?;
        let wire: WireOrder = self.get_url(url.as_str()).await?;
        Ok(wire.into_confirmation(self.currency()))
    }
}

/// Parse a JSON body, turning non-2xx answers into [`FetchError::HttpError`].
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, FetchError> {
    let status = response.status();
    if status.is_success() {
        let bytes = response.bytes().await?;
        return serde_json::from_slice(&bytes).map_err(FetchError::from);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(FetchError::HttpError {
        status: status.as_u16(),
        message,
    })
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url)
            .field("currency", &self.inner.currency)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CatalogSource for BackendClient {
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.fetch_products().await?)
    }

    async fn company(&self) -> Result<CompanyInfo, CatalogError> {
        Ok(self.fetch_company().await?)
    }

    async fn delivery_zones(&self) -> Result<Vec<DeliveryZone>, CatalogError> {
        Ok(self.fetch_delivery_zones().await?)
    }

    async fn payment_methods(&self) -> Result<Vec<PaymentMethod>, CatalogError> {
        Ok(self.fetch_payment_methods().await?)
    }
}

#[async_trait]
impl OrderGateway for BackendClient {
    async fn create_order(&self, payload: &OrderPayload) -> Result<CreateOrderResponse, GatewayError> {
        Ok(self.submit_order(payload).await?)
    }

    async fn get_order_by_id(&self, order_id: &OrderId) -> Result<OrderConfirmation, GatewayError> {
        match self.fetch_order(order_id).await {
            Ok(order) => Ok(order),
            Err(FetchError::HttpError { status: 404, .. }) => {
                Err(GatewayError::NotFound(order_id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = BackendClient::new(&BackendConfig::new("https://api.example.com/v1/")).unwrap();
        assert_eq!(client.base_url(), "https://api.example.com/v1");
        assert_eq!(client.url("/products"), "https://api.example.com/v1/products");
        assert_eq!(client.url("orders/7"), "https://api.example.com/v1/orders/7");
    }

    #[test]
    fn test_order_id_stays_one_segment() {
        let client = BackendClient::new(&BackendConfig::new("https://api.example.com/v1")).unwrap();
        let url = client.order_url(&OrderId::new("ord_7")).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/orders/ord_7");

        let url = client.order_url(&OrderId::new("a/../b?x#y")).unwrap();
        assert_eq!(url.path(), "/v1/orders/a%2F..%2Fb%3Fx%23y");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());

        let bare = BackendClient::new(&BackendConfig::new("http://localhost:8080")).unwrap();
        let url = bare.order_url(&OrderId::new("ord_7")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/orders/ord_7");
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = BackendClient::new(&BackendConfig::new("ftp://example.com")).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_rejects_unsendable_token() {
        let config = BackendConfig::new("https://api.example.com").with_api_token("bad\ntoken");
        assert!(matches!(BackendClient::new(&config), Err(FetchError::Config(_))));
    }

    #[test]
    fn test_debug_hides_token() {
        let config = BackendConfig::new("https://api.example.com").with_api_token("s3cret");
        let client = BackendClient::new(&config).unwrap();
        assert!(!format!("{client:?}").contains("s3cret"));
    }
}
