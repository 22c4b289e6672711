//! Tests for the send-event namespace.

use super::SendEventParams;
use crate::Hookbase;
use crate::time::InstantSleeper;
use crate::transport::Transport;
use crate::transport::test_support::{MockClient, config, response};
use serde_json::{Map, json};

fn client(mock: &MockClient) -> Hookbase<&MockClient, InstantSleeper> {
    Hookbase::from_transport(Transport::new(mock, &config()).with_sleeper(InstantSleeper))
}

fn params() -> SendEventParams {
    let mut payload = Map::new();
    payload.insert("orderId".to_string(), json!("ord_1"));
    SendEventParams::new("app_1", "order.created", payload)
}

const QUEUED: &str = r#"{"data":{"eventId":"evt_1","messagesQueued":2,"endpoints":[{"id":"ep_1","url":"https://a"},{"id":"ep_2"}]}}"#;

#[tokio::test]
async fn send_posts_event_and_unwraps_data() {
    let mock = MockClient::new([response(202, QUEUED)]);

    let result = client(&mock).messages().send(&params(), None).await.unwrap();

    assert_eq!(result.event_id, "evt_1");
    assert_eq!(result.messages_queued, 2);
    assert_eq!(result.endpoints[1].url, "");

    let sent = &mock.captured_requests()[0];
    assert_eq!(sent.url.path(), "/api/send-event");
    let body: serde_json::Value = serde_json::from_slice(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(
        body,
        json!({"applicationId": "app_1", "eventType": "order.created", "payload": {"orderId": "ord_1"}})
    );
    assert!(!sent.headers.contains_key("idempotency-key"));
}

#[tokio::test]
async fn idempotency_key_survives_retries() {
    let mock = MockClient::new([
        response(409, r#"{"error":"in progress"}"#),
        response(502, ""),
        response(202, QUEUED),
    ]);

    client(&mock)
        .messages()
        .send(&params(), Some("order-ord_1"))
        .await
        .unwrap();

    let sent = mock.captured_requests();
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().all(|req| req.headers["idempotency-key"] == "order-ord_1"));
}

#[tokio::test]
async fn optional_fields_are_sent_when_set() {
    let mock = MockClient::new([response(202, QUEUED)]);
    let params = SendEventParams {
        event_id: Some("custom".to_string()),
        endpoint_ids: Some(vec!["ep_1".to_string()]),
        ..params()
    };

    client(&mock).messages().send(&params, None).await.unwrap();

    let body: serde_json::Value =
        serde_json::from_slice(mock.captured_requests()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["eventId"], "custom");
    assert_eq!(body["endpointIds"], json!(["ep_1"]));
    assert!(body.get("metadata").is_none());
}

#[tokio::test]
async fn invalid_idempotency_key_fails_before_sending() {
    let mock = MockClient::default();

    let err = client(&mock)
        .messages()
        .send(&params(), Some("bad\nkey"))
        .await
        .unwrap_err();

    assert!(matches!(err, crate::Error::InvalidHeader(_)));
    assert_eq!(mock.calls(), 0);
}
