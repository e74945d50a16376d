use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use datakura_client::config::ClientOptions;
use datakura_client::notify::RecordingNotifier;
use datakura_client::response::GENERIC_ERROR_MESSAGE;
use datakura_client::warehouse::{aggregate_packaging, WarehouseItem};
use datakura_client::Datakura;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(uri: &str) -> (Datakura, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let datakura = Datakura::builder(ClientOptions::new(uri))
        .with_notifier(notifier.clone())
        .build()
        .unwrap();
    (datakura, notifier)
}

fn stock(code: &str, amount: f64) -> serde_json::Value {
    json!({
        "code": code,
        "stock_item": {"code": "P-1", "name": "Šroub M6"},
        "unit_of_measure": "ks",
        "amount": amount,
        "package": {"code": format!("BOX-{}", code), "type": "box", "amount": 1.0, "unit": "ks"}
    })
}

#[tokio::test]
async fn test_fetch_location_items() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/warehouse/location-items"))
        .and(query_param("location", "A-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [stock("W1", 3.0), stock("W2", 4.0)]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (datakura, notifier) = client(&mock_server.uri());
    let mut params = HashMap::new();
    params.insert("location".to_string(), "A-01".to_string());

    let items: Vec<WarehouseItem> = datakura
        .fetch_data("warehouse/location-items", params)
        .await
        .unwrap();

    let aggregated = aggregate_packaging(&items);
    assert_eq!(aggregated.len(), 1);
    assert_eq!(aggregated[0].items_count, 2);
    assert_eq!(aggregated[0].item.amount, 7.0);
    assert!(notifier.notifications().is_empty());
}

#[tokio::test]
async fn test_fetch_sends_access_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"user_id": 1, "username": "jana"},
            "access_token": "access-9"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/products"))
        .and(header("Authorization", "bearer access-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (datakura, _) = client(&mock_server.uri());
    assert!(datakura.auth().sign_in("jana", "secret").await);

    let products: Option<Vec<serde_json::Value>> =
        datakura.fetch_data("products", HashMap::new()).await;

    assert_eq!(products, Some(vec![]));
}

#[tokio::test]
async fn test_fetch_unrecognized_response_notifies() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/customers"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let (datakura, notifier) = client(&mock_server.uri());

    let customers: Option<Vec<serde_json::Value>> =
        datakura.fetch_data("customers", HashMap::new()).await;

    assert!(customers.is_none());
    let notifications = notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, GENERIC_ERROR_MESSAGE);
    assert_eq!(notifications[0].caption.as_deref(), Some("502: Bad Gateway"));
}

#[tokio::test]
async fn test_fetch_undecodable_payload_notifies() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/warehouse/location-items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"unexpected": true}
        })))
        .mount(&mock_server)
        .await;

    let (datakura, notifier) = client(&mock_server.uri());

    let items: Option<Vec<WarehouseItem>> = datakura
        .fetch_data("warehouse/location-items", HashMap::new())
        .await;

    assert!(items.is_none());
    assert_eq!(notifier.notifications().len(), 1);
}
