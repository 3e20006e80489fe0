//! HttpCallbackSender against an in-process axum receiver

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use relay_core::domain::{CallbackUrl, Message};
use relay_core::port::{CallbackSender, DeliveryError};
use relay_infra_http::HttpCallbackSender;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

type Received = Arc<Mutex<Vec<(Option<String>, Bytes)>>>;

async fn record(State(received): State<Received>, headers: HeaderMap, body: Bytes) -> StatusCode {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    received.lock().await.push((content_type, body));
    StatusCode::OK
}

async fn spawn_receiver() -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/ok", post(record))
        .route("/fail", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                StatusCode::OK
            }),
        )
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), received)
}

#[tokio::test]
async fn test_delivers_raw_payload() {
    let (base, received) = spawn_receiver().await;
    let sender = HttpCallbackSender::new();
    let payload = vec![0u8, 159, 146, 150, b'x'];

    let receipt = sender
        .send(
            &CallbackUrl::new(format!("{}/ok", base)),
            &Message::from(payload.clone()),
            Duration::from_secs(2),
        )
        .await
        .unwrap();

    assert_eq!(receipt.status, 200);
    let received = received.lock().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].0.as_deref(), Some("application/octet-stream"));
    assert_eq!(received[0].1.as_ref(), payload.as_slice());
}

#[tokio::test]
async fn test_non_success_status_is_rejected() {
    let (base, _) = spawn_receiver().await;
    let sender = HttpCallbackSender::new();

    let err = sender
        .send(
            &CallbackUrl::new(format!("{}/fail", base)),
            &Message::from("x"),
            Duration::from_secs(2),
        )
        .await
        .unwrap_err();

    assert_eq!(err, DeliveryError::Rejected { status: 500 });
}

#[tokio::test]
async fn test_unknown_route_is_rejected() {
    let (base, _) = spawn_receiver().await;
    let sender = HttpCallbackSender::new();

    let err = sender
        .send(
            &CallbackUrl::new(format!("{}/missing", base)),
            &Message::from("x"),
            Duration::from_secs(2),
        )
        .await
        .unwrap_err();

    assert_eq!(err, DeliveryError::Rejected { status: 404 });
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let (base, _) = spawn_receiver().await;
    let sender = HttpCallbackSender::new();

    let started = Instant::now();
    let err = sender
        .send(
            &CallbackUrl::new(format!("{}/slow", base)),
            &Message::from("x"),
            Duration::from_millis(200),
        )
        .await
        .unwrap_err();

    assert_eq!(err, DeliveryError::Timeout(200));
    assert!(started.elapsed() < Duration::from_millis(900));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let sender = HttpCallbackSender::new();
    let err = sender
        .send(
            &CallbackUrl::new(format!("http://{}/ok", addr)),
            &Message::from("x"),
            Duration::from_secs(2),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DeliveryError::Transport(_)));
}

#[tokio::test]
async fn test_malformed_address_is_invalid() {
    let sender = HttpCallbackSender::new();
    let err = sender
        .send(
            &CallbackUrl::from("::not-a-url::"),
            &Message::from("x"),
            Duration::from_secs(1),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DeliveryError::InvalidAddress { .. }));
}
