//! Commerce error types.

use crate::checkout::ValidationErrors;
use thiserror::Error;

/// Errors that can occur in cart and pricing operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}

/// Errors raised by the checkout state machine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckoutError {
    /// The form is incomplete; nothing was sent.
    #[error("Checkout incomplete: {0}")]
    Validation(ValidationErrors),

    /// Nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// A submission is already in flight.
    #[error("An order submission is already in progress")]
    SubmissionInProgress,

    /// The order was already placed; the draft is gone.
    #[error("Checkout already completed")]
    AlreadyCompleted,

    /// Operation not allowed in the current state.
    #[error("Cannot {action} while checkout is {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    /// The gateway rejected the order or could not be reached.
    #[error("{0}")]
    Gateway(String),

    /// Pricing could not be computed.
    #[error(transparent)]
    Pricing(#[from] CommerceError),
}
