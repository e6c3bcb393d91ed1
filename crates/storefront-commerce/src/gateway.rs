//! Order submission gateway.
//!
//! The remote order API is a black box to the ordering core: it accepts a
//! payload and answers success or failure. Implementations live outside this
//! crate (the HTTP client in `storefront-data`, fakes in tests).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checkout::{OrderConfirmation, OrderPayload};
use crate::ids::OrderId;

/// Answer to an order creation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    /// Message shown to the customer verbatim on failure.
    #[serde(default)]
    pub error_message: Option<String>,
}

impl CreateOrderResponse {
    pub fn created(order_id: impl Into<OrderId>) -> Self {
        Self {
            success: true,
            order_id: Some(order_id.into()),
            error_message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            order_id: None,
            error_message: Some(message.into()),
        }
    }
}

/// Transport-level gateway failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The request could not be delivered or the backend errored.
    #[error("Order service unavailable: {0}")]
    Transport(String),

    /// No answer within the deadline.
    #[error("Order service timed out")]
    Timeout,

    /// The order does not exist.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The backend answered with something we could not read.
    #[error("Invalid response from order service: {0}")]
    InvalidResponse(String),
}

/// Remote order creation and retrieval.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Create an order from a payload.
    async fn create_order(&self, payload: &OrderPayload) -> Result<CreateOrderResponse, GatewayError>;

    /// Fetch a placed order for display or printing.
    async fn get_order_by_id(&self, order_id: &OrderId) -> Result<OrderConfirmation, GatewayError>;
}

#[async_trait]
impl<G: OrderGateway + ?Sized> OrderGateway for std::sync::Arc<G> {
    async fn create_order(&self, payload: &OrderPayload) -> Result<CreateOrderResponse, GatewayError> {
        (**self).create_order(payload).await
    }

    async fn get_order_by_id(&self, order_id: &OrderId) -> Result<OrderConfirmation, GatewayError> {
        (**self).get_order_by_id(order_id).await
    }
}
