//! Checkout module.
//!
//! Contains the checkout form and its validation, delivery selection,
//! order payload construction, the submission state machine and order
//! confirmations.

mod delivery;
mod form;
mod order;
mod payload;
mod session;
mod settings;
mod validation;

pub use delivery::{delivery_fee_for, DeliverySelection, DeliveryType, DeliveryZone, Scheduling};
pub use form::{pricing_for_checkout, CheckoutForm, CustomerDetails};
pub use order::{ConfirmationLine, OrderConfirmation, OrderStatus};
pub use payload::{
    build_order_payload, CustomerBlock, DeliveryBlock, OrderPayload, PayloadLine, PaymentBlock,
};
pub use session::{CheckoutSession, CheckoutState, INTERRUPTED_MESSAGE};
pub use settings::{CheckoutSettings, DEFAULT_SUBMIT_TIMEOUT};
pub use validation::{validate, FieldError, FormField, ValidationErrors};
