//! End-to-end checkout against fake order gateways.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use storefront_cache::{KvStore, MemoryStore};
use storefront_commerce::prelude::*;

struct FakeGateway {
    response: Result<CreateOrderResponse, GatewayError>,
    delay: Duration,
    received: Mutex<Vec<OrderPayload>>,
}

impl FakeGateway {
    fn answering(response: Result<CreateOrderResponse, GatewayError>) -> Self {
        Self {
            response,
            delay: Duration::ZERO,
            received: Mutex::new(Vec::new()),
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::answering(Ok(CreateOrderResponse::created("late")))
        }
    }

    fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

#[async_trait]
impl OrderGateway for FakeGateway {
    async fn create_order(&self, payload: &OrderPayload) -> Result<CreateOrderResponse, GatewayError> {
        self.received.lock().unwrap().push(payload.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.response.clone()
    }

    async fn get_order_by_id(&self, order_id: &OrderId) -> Result<OrderConfirmation, GatewayError> {
        Err(GatewayError::NotFound(order_id.clone()))
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 1).unwrap()
}

fn settings() -> CheckoutSettings {
    CheckoutSettings::new(
        vec![DeliveryZone::new("centro", "Centro", Money::from_minor(500, Currency::USD))],
        vec![PaymentMethod::new("cash", "Cash", PaymentKind::Cash)],
    )
}

fn profile() -> CustomerProfile {
    CustomerProfile {
        document: "12345678".into(),
        name: "Ana Souza".into(),
        phone: "555-0100".into(),
        messaging_handle: "@ana".into(),
        default_address: Some("Rua A, 10".into()),
        default_zone: Some(ZoneId::new("centro")),
        ..CustomerProfile::default()
    }
}

fn ready_session() -> CheckoutSession {
    let mut session = CheckoutSession::new(settings(), Some(&profile()));
    session
        .edit(|form| {
            form.payment_method = Some(PaymentMethodId::new("cash"));
            form.discount = "10".parse().unwrap();
        })
        .unwrap();
    session
}

fn filled_cart(mem: &MemoryStore) -> CartStore<MemoryStore> {
    let mut cart = CartStore::open(mem.clone(), DEFAULT_CART_KEY, Currency::USD);
    cart.add_item(&Product::new("A", "Pizza", Money::from_minor(1800, Currency::USD)), 2, None)
        .unwrap();
    cart.add_item(&Product::new("B", "Soda", Money::from_minor(650, Currency::USD)), 1, None)
        .unwrap();
    cart
}

fn stored_cart(mem: &MemoryStore) -> serde_json::Value {
    let bytes = mem.get(DEFAULT_CART_KEY).unwrap().unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn successful_order_clears_cart_and_storage() {
    let mem = MemoryStore::new();
    let mut cart = filled_cart(&mem);
    let mut session = ready_session();
    let gateway = FakeGateway::answering(Ok(CreateOrderResponse::created("ord_42")));

    let order_id = session.submit_on(&mut cart, &gateway, today()).await.unwrap();

    assert_eq!(order_id, OrderId::new("ord_42"));
    assert!(session.is_completed());
    assert!(cart.is_empty());
    assert_eq!(stored_cart(&mem), serde_json::json!([]));

    let sent = gateway.received.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].payment.total, "43.25".parse::<Decimal>().unwrap());
}

#[tokio::test]
async fn rejected_order_keeps_cart_and_draft() {
    let mem = MemoryStore::new();
    let mut cart = filled_cart(&mem);
    let mut session = ready_session();
    let draft = session.form().clone();
    let before = stored_cart(&mem);
    let gateway = FakeGateway::answering(Ok(CreateOrderResponse::rejected(
        "We are not delivering to this zone right now",
    )));

    let err = session.submit_on(&mut cart, &gateway, today()).await.unwrap_err();

    assert_eq!(err.to_string(), "We are not delivering to this zone right now");
    assert_eq!(
        session.state(),
        &CheckoutState::Editing {
            error: Some("We are not delivering to this zone right now".into())
        }
    );
    assert_eq!(session.form(), &draft);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(stored_cart(&mem), before);
}

#[tokio::test]
async fn failed_order_can_be_corrected_and_retried() {
    let mem = MemoryStore::new();
    let mut cart = filled_cart(&mem);
    let mut session = ready_session();

    let down = FakeGateway::answering(Err(GatewayError::Transport("connection refused".into())));
    assert!(session.submit_on(&mut cart, &down, today()).await.is_err());
    assert!(session.error().is_some());

    session.edit(|form| form.notes = "Leave at the door".into()).unwrap();
    let up = FakeGateway::answering(Ok(CreateOrderResponse::created("ord_2")));
    session.submit_on(&mut cart, &up, today()).await.unwrap();

    assert_eq!(up.received.lock().unwrap()[0].notes.as_deref(), Some("Leave at the door"));
}

#[tokio::test]
async fn invalid_form_never_reaches_gateway() {
    let mem = MemoryStore::new();
    let mut cart = filled_cart(&mem);
    let mut session = ready_session();
    session.edit(|form| form.delivery.address.clear()).unwrap();
    let gateway = FakeGateway::answering(Ok(CreateOrderResponse::created("ord_1")));

    let err = session.submit_on(&mut cart, &gateway, today()).await.unwrap_err();

    assert!(matches!(err, CheckoutError::Validation(ref e) if e.has(FormField::Address)));
    assert_eq!(gateway.calls(), 0);
    assert_eq!(session.state().name(), "editing");
}

#[tokio::test(start_paused = true)]
async fn gateway_timeout_returns_to_editing() {
    let mem = MemoryStore::new();
    let mut cart = filled_cart(&mem);
    let mut session = CheckoutSession::with_form(
        settings().with_submit_timeout(Duration::from_secs(5)),
        ready_session().form().clone(),
    );
    let gateway = FakeGateway::slow(Duration::from_secs(60));

    let err = session.submit_on(&mut cart, &gateway, today()).await.unwrap_err();

    assert!(matches!(err, CheckoutError::Gateway(_)));
    assert!(session.error().is_some_and(|m| m.contains("in time")));
    assert_eq!(cart.item_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn abandoned_submission_is_reported_as_interrupted() {
    let mem = MemoryStore::new();
    let mut cart = filled_cart(&mem);
    let mut session = ready_session();
    let gateway = FakeGateway::slow(Duration::from_secs(10));

    let abandoned = tokio::time::timeout(
        Duration::from_secs(1),
        session.submit_on(&mut cart, &gateway, today()),
    )
    .await;

    assert!(abandoned.is_err());
    assert_eq!(gateway.calls(), 1);
    assert_eq!(session.error(), Some(INTERRUPTED_MESSAGE));
    assert_eq!(cart.item_count(), 3);
}

#[tokio::test]
async fn payload_matches_quote() {
    let mem = MemoryStore::new();
    let cart = filled_cart(&mem);
    let session = ready_session();

    let pricing = session.pricing(cart.cart()).unwrap().rounded();
    let payload = session.build_order_payload(cart.cart()).unwrap();

    assert_eq!(payload, session.build_order_payload(cart.cart()).unwrap());
    assert_eq!(payload.payment.subtotal, pricing.subtotal.amount);
    assert_eq!(payload.payment.discount_amount, pricing.discount_amount.amount);
    assert_eq!(payload.payment.delivery_fee, pricing.delivery_fee.amount);
    assert_eq!(payload.payment.total, pricing.total.amount);
}

#[tokio::test]
async fn completed_cart_survives_reload_as_empty() {
    let mem = MemoryStore::new();
    let mut cart = filled_cart(&mem);
    let mut session = ready_session();
    let gateway = FakeGateway::answering(Ok(CreateOrderResponse::created("ord_7")));
    session.submit_on(&mut cart, &gateway, today()).await.unwrap();

    let reloaded = CartStore::open(mem, DEFAULT_CART_KEY, Currency::USD);
    assert!(reloaded.is_empty());
}
