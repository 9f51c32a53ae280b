// tests/webhook.rs
//
// WebhookDelivery against a local axum receiver.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{http::StatusCode, routing::post, Json, Router};
use chrono::NaiveDate;
use report_bridge::{BridgeError, Delivery, DeliveryPayload, WebhookDelivery};
use serde_json::Value;

type Seen = Arc<Mutex<Vec<Value>>>;

async fn spawn_receiver(status: StatusCode, delay: Duration) -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let app = Router::new().route(
        "/api/cron",
        post(move |Json(body): Json<Value>| {
            let sink = sink.clone();
            async move {
                tokio::time::sleep(delay).await;
                sink.lock().unwrap().push(body);
                status
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api/cron"), seen)
}

fn payload() -> DeliveryPayload {
    DeliveryPayload::new(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(), "老张：开盘了")
}

#[tokio::test]
async fn posts_json_and_accepts_2xx() {
    let (url, seen) = spawn_receiver(StatusCode::ACCEPTED, Duration::ZERO).await;
    WebhookDelivery::new(url).deliver(&payload()).await.unwrap();

    let bodies = seen.lock().unwrap().clone();
    assert_eq!(
        bodies,
        vec![serde_json::json!({ "today": "2025-06-02", "custom_script": "老张：开盘了" })]
    );
}

#[tokio::test]
async fn non_2xx_is_a_delivery_failure() {
    let (url, _seen) = spawn_receiver(StatusCode::INTERNAL_SERVER_ERROR, Duration::ZERO).await;
    let err = WebhookDelivery::new(url)
        .deliver(&payload())
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::DeliveryStatus { status: 500, .. }));
    assert_eq!(err.stage(), "deliver");
}

#[tokio::test]
async fn slow_receiver_hits_timeout() {
    let (url, _seen) = spawn_receiver(StatusCode::OK, Duration::from_secs(3)).await;
    let err = WebhookDelivery::new(url)
        .with_timeout(Duration::from_millis(200))
        .deliver(&payload())
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_receiver_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = WebhookDelivery::new(format!("http://{addr}/api/cron"))
        .with_timeout(Duration::from_secs(2))
        .deliver(&payload())
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Transport(_)), "got {err:?}");
}
