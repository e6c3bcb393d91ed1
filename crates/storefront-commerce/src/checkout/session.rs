//! Checkout state machine.
//!
//! ```text
//! Editing --submit--> Submitting --success--> Completed
//!    ^                    |
//!    +-----failure--------+
//! ```
//!
//! The draft form is only editable while `Editing`. A failed submission
//! returns to `Editing` with every field intact and the error message set.
//! A successful one clears the cart and discards the draft.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use storefront_cache::KvStore;
use tracing::{debug, info, instrument, warn};

use crate::cart::{Cart, CartStore, OrderPricing};
use crate::catalog::CustomerProfile;
use crate::checkout::{
    build_order_payload, pricing_for_checkout, validate, CheckoutForm, CheckoutSettings,
    OrderPayload, ValidationErrors,
};
use crate::error::{CheckoutError, CommerceError};
use crate::gateway::{CreateOrderResponse, GatewayError, OrderGateway};
use crate::ids::OrderId;

/// Shown when a submission is abandoned before the gateway answered.
pub const INTERRUPTED_MESSAGE: &str =
    "Order submission was interrupted. Check your orders before trying again.";

const TIMEOUT_MESSAGE: &str = "The order service did not respond in time. Please try again.";
const UNAVAILABLE_MESSAGE: &str = "Could not reach the order service. Please try again.";
const REJECTED_MESSAGE: &str = "The order could not be placed.";
const MISSING_ID_MESSAGE: &str = "The order service did not confirm the order.";

/// Where a checkout session is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CheckoutState {
    /// Draft open for edits; `error` holds the last failure, if any.
    Editing { error: Option<String> },
    /// Waiting for the gateway.
    Submitting,
    /// Order placed.
    Completed { order_id: OrderId },
}

impl CheckoutState {
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutState::Editing { .. } => "editing",
            CheckoutState::Submitting => "submitting",
            CheckoutState::Completed { .. } => "completed",
        }
    }
}

impl Default for CheckoutState {
    fn default() -> Self {
        CheckoutState::Editing { error: None }
    }
}

/// One customer's checkout: draft form, settings and state.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    state: CheckoutState,
    form: CheckoutForm,
    settings: CheckoutSettings,
}

impl CheckoutSession {
    /// Start editing, pre-filled from the signed-in customer if any.
    pub fn new(settings: CheckoutSettings, profile: Option<&CustomerProfile>) -> Self {
        Self::with_form(settings, CheckoutForm::prefilled(profile))
    }

    /// Start editing an existing draft.
    pub fn with_form(settings: CheckoutSettings, form: CheckoutForm) -> Self {
        Self {
            state: CheckoutState::default(),
            form,
            settings,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    pub fn settings(&self) -> &CheckoutSettings {
        &self.settings
    }

    /// Last failure message while editing.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            CheckoutState::Editing { error } => error.as_deref(),
            _ => None,
        }
    }

    /// Placed order id once completed.
    pub fn order_id(&self) -> Option<&OrderId> {
        match &self.state {
            CheckoutState::Completed { order_id } => Some(order_id),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.state == CheckoutState::Submitting
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, CheckoutState::Completed { .. })
    }

    /// Mutable access to the draft. Only allowed while editing.
    pub fn form_mut(&mut self) -> Result<&mut CheckoutForm, CheckoutError> {
        self.ensure_editing("edit the form")?;
        Ok(&mut self.form)
    }

    /// Apply an edit to the draft.
    pub fn edit(&mut self, f: impl FnOnce(&mut CheckoutForm)) -> Result<(), CheckoutError> {
        f(self.form_mut()?);
        Ok(())
    }

    /// Validate the draft against today's date.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.validate_on(Local::now().date_naive())
    }

    pub fn validate_on(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        validate(&self.form, &self.settings, today)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        self.validate_on(today).is_ok()
    }

    /// Pricing for `cart` with the current draft.
    pub fn pricing(&self, cart: &Cart) -> Result<OrderPricing, CommerceError> {
        pricing_for_checkout(cart, &self.form, &self.settings.zones)
    }

    /// Order document for `cart` with the current draft.
    pub fn build_order_payload(&self, cart: &Cart) -> Result<OrderPayload, CommerceError> {
        build_order_payload(cart, &self.form, &self.settings)
    }

    /// Move to `Submitting` and return the payload to send.
    ///
    /// Nothing changes unless the draft is valid, the cart has items and the
    /// session is editing.
    pub fn begin_submit(&mut self, cart: &Cart, today: NaiveDate) -> Result<OrderPayload, CheckoutError> {
        if self.is_completed() {
            return Err(CheckoutError::AlreadyCompleted);
        }
        self.ensure_editing("submit")?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.validate_on(today).map_err(CheckoutError::Validation)?;
        let payload = self.build_order_payload(cart)?;

        self.state = CheckoutState::Submitting;
        debug!(lines = payload.items.len(), "checkout submitting");
        Ok(payload)
    }

    /// Apply the gateway's answer to a submission started with
    /// [`begin_submit`](Self::begin_submit).
    ///
    /// On success the cart is cleared exactly once and the draft discarded.
    /// On failure the session returns to editing with the message set.
    pub fn finish_submit<S: KvStore>(
        &mut self,
        outcome: Result<CreateOrderResponse, GatewayError>,
        cart: &mut CartStore<S>,
    ) -> Result<OrderId, CheckoutError> {
        if self.state != CheckoutState::Submitting {
            return Err(CheckoutError::InvalidTransition {
                state: self.state.name(),
                action: "finish a submission",
            });
        }

        match order_outcome(outcome) {
            Ok(order_id) => {
                cart.clear();
                self.form = CheckoutForm::blank();
                self.state = CheckoutState::Completed {
                    order_id: order_id.clone(),
                };
                info!(order_id = %order_id, "order placed");
                Ok(order_id)
            }
            Err(message) => {
                warn!(error = %message, "order submission failed");
                self.state = CheckoutState::Editing {
                    error: Some(message.clone()),
                };
                Err(CheckoutError::Gateway(message))
            }
        }
    }

    /// Validate, send the order and apply the answer.
    #[instrument(skip_all)]
    pub async fn submit<S, G>(
        &mut self,
        cart: &mut CartStore<S>,
        gateway: &G,
    ) -> Result<OrderId, CheckoutError>
    where
        S: KvStore,
        G: OrderGateway + ?Sized,
    {
        self.submit_on(cart, gateway, Local::now().date_naive()).await
    }

    /// [`submit`](Self::submit) with an explicit validation date.
    pub async fn submit_on<S, G>(
        &mut self,
        cart: &mut CartStore<S>,
        gateway: &G,
        today: NaiveDate,
    ) -> Result<OrderId, CheckoutError>
    where
        S: KvStore,
        G: OrderGateway + ?Sized,
    {
        let payload = self.begin_submit(cart.cart(), today)?;
        let deadline = self.settings.submit_timeout;

        let guard = InFlight::new(&mut self.state);
        let outcome = match tokio::time::timeout(deadline, gateway.create_order(&payload)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(GatewayError::Timeout),
        };
        guard.disarm();

        self.finish_submit(outcome, cart)
    }

    fn ensure_editing(&self, action: &'static str) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::Editing { .. } => Ok(()),
            CheckoutState::Submitting => Err(CheckoutError::SubmissionInProgress),
            CheckoutState::Completed { .. } => Err(CheckoutError::InvalidTransition {
                state: "completed",
                action,
            }),
        }
    }
}

/// Turn a gateway outcome into an order id or a user-facing message.
fn order_outcome(outcome: Result<CreateOrderResponse, GatewayError>) -> Result<OrderId, String> {
    match outcome {
        Ok(CreateOrderResponse {
            success: true,
            order_id: Some(order_id),
            ..
        }) => Ok(order_id),
        Ok(CreateOrderResponse { success: true, .. }) => Err(MISSING_ID_MESSAGE.to_string()),
        Ok(CreateOrderResponse { error_message, .. }) => Err(error_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| REJECTED_MESSAGE.to_string())),
        Err(GatewayError::Timeout) => Err(TIMEOUT_MESSAGE.to_string()),
        Err(e) => {
            debug!(error = %e, "gateway transport error");
            Err(UNAVAILABLE_MESSAGE.to_string())
        }
    }
}

/// Returns the session to editing if a submission is dropped mid-flight.
struct InFlight<'a> {
    state: &'a mut CheckoutState,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a mut CheckoutState) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed && *self.state == CheckoutState::Submitting {
            warn!("order submission interrupted");
            *self.state = CheckoutState::Editing {
                error: Some(INTERRUPTED_MESSAGE.to_string()),
            };
        }
    }
}
