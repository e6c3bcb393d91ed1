//! BackendClient against a canned local HTTP backend.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use storefront_commerce::prelude::*;
use storefront_data::{BackendClient, BackendConfig, FetchError};

type Route = fn(&str) -> (u16, &'static str);

struct Backend {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Backend {
    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn start(route: Route) -> Backend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let seen = seen.clone();
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                let request_line = request.lines().next().unwrap_or_default().to_string();
                seen.lock().unwrap().push(request);

                let (status, body) = route(&request_line);
                let response = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    Backend {
        base_url: format!("http://{addr}/api"),
        requests,
    }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn catalog_routes(request_line: &str) -> (u16, &'static str) {
    match request_line.split_whitespace().nth(1).unwrap_or_default() {
        "/api/products" => (
            200,
            r#"[{"id": 1, "name": "Margherita", "price": 18.0, "taxCode": "FOOD-01"},
                {"id": 2, "name": "Calzone", "price": 21.5, "available": false}]"#,
        ),
        "/api/company" => (200, r#"{"name": "Pizzeria Roma", "branchName": "Centro", "currency": "USD"}"#),
        "/api/delivery-zones" => (200, r#"[{"id": "centro", "name": "Centro", "deliveryFee": 5.0}]"#),
        "/api/payment-methods" => (200, r#"[{"id": "cash", "name": "Cash", "type": "cash"}]"#),
        "/api/orders/ord_1" => (
            200,
            r#"{"id": "ord_1", "status": "pending", "customerName": "Ana", "subtotal": 36.0,
                "total": 41.0, "deliveryFee": 5.0,
                "items": [{"productId": "1", "name": "Margherita", "quantity": 2, "unitPrice": 18.0}]}"#,
        ),
        _ => (404, r#"{"error": "not found"}"#),
    }
}

fn client(backend: &Backend) -> BackendClient {
    let config = BackendConfig::new(&backend.base_url).with_api_token("s3cret");
    BackendClient::new(&config).unwrap()
}

fn payload() -> OrderPayload {
    let mut cart = Cart::new(Currency::USD);
    cart.add_item(&Product::new("1", "Margherita", Money::from_minor(1800, Currency::USD)), 2, None)
        .unwrap();
    let form = CheckoutForm {
        customer: CustomerDetails {
            document: "12345678".into(),
            name: "Ana".into(),
            phone: "555-0100".into(),
            messaging_handle: "@ana".into(),
            email: None,
        },
        delivery: DeliverySelection::pickup(),
        payment_method: Some(PaymentMethodId::new("cash")),
        ..CheckoutForm::default()
    };
    build_order_payload(&cart, &form, &CheckoutSettings::default()).unwrap()
}

#[tokio::test]
async fn reads_catalog_with_bearer_token() {
    let backend = start(catalog_routes).await;
    let catalog = Catalog::new(client(&backend));

    let products = catalog.products().await;
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].tax_reference.as_deref(), Some("FOOD-01"));
    assert_eq!(catalog.available_products().await.len(), 1);
    assert_eq!(catalog.company().await.display_name(), "Pizzeria Roma - Centro");

    let settings = catalog.checkout_settings().await;
    assert_eq!(settings.zones[0].fee, Money::from_minor(500, Currency::USD));
    assert!(settings.payment_methods[0].is_cash());

    let requests = backend.requests();
    assert!(requests
        .iter()
        .all(|r| r.to_lowercase().contains("authorization: bearer s3cret")));
}

#[tokio::test]
async fn unavailable_backend_degrades_to_placeholders() {
    let backend = start(|_| (503, r#"{"error": "maintenance"}"#)).await;
    let catalog = Catalog::new(client(&backend));

    assert!(catalog.products().await.is_empty());
    assert_eq!(catalog.company().await, CompanyInfo::placeholder());
    assert!(catalog.checkout_settings().await.zones.is_empty());
}

#[tokio::test]
async fn creates_order() {
    let backend = start(|_| (201, r#"{"success": true, "orderId": 981}"#)).await;
    let gateway = client(&backend);

    let response = gateway.create_order(&payload()).await.unwrap();
    assert_eq!(response, CreateOrderResponse::created("981"));

    let request = &backend.requests()[0];
    assert!(request.starts_with("POST /api/orders "));
    assert!(request.contains(r#""productId":"1""#));
    assert!(request.contains(r#""type":"pickup""#));
}

#[tokio::test]
async fn explained_rejection_is_not_an_error() {
    let backend = start(|_| (422, r#"{"success": false, "errorMessage": "Branch is closed"}"#)).await;

    let response = client(&backend).create_order(&payload()).await.unwrap();
    assert_eq!(response, CreateOrderResponse::rejected("Branch is closed"));
}

#[tokio::test]
async fn unexplained_failure_is_transport_error() {
    let backend = start(|_| (500, "<html>oops</html>")).await;

    let err = client(&backend).create_order(&payload()).await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
}

#[tokio::test]
async fn fetches_and_misses_orders() {
    let backend = start(catalog_routes).await;
    let gateway = client(&backend);

    let order = gateway.get_order_by_id(&OrderId::new("ord_1")).await.unwrap();
    assert_eq!(order.total, Money::from_minor(4100, Currency::USD));
    assert_eq!(order.lines.len(), 1);

    let missing = gateway.get_order_by_id(&OrderId::new("nope")).await;
    assert_eq!(missing, Err(GatewayError::NotFound(OrderId::new("nope"))));

    // Traversal in the id must not resolve to another order.
    let sneaky = OrderId::new("x/../ord_1");
    let missing = gateway.get_order_by_id(&sneaky).await;
    assert_eq!(missing, Err(GatewayError::NotFound(sneaky)));
}

#[tokio::test]
async fn silent_backend_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let config = BackendConfig::new(format!("http://{addr}"))
        .with_timeout(Duration::from_millis(200));
    let client = BackendClient::new(&config).unwrap();

    assert_eq!(client.fetch_products().await, Err(FetchError::Timeout));
    assert_eq!(client.create_order(&payload()).await, Err(GatewayError::Timeout));
}
