//! Tests for the client facades.

use super::{BlockingHookbase, Hookbase};
use crate::config::{ClientConfig, ConfigError};
use crate::resources::ListSourcesParams;
use crate::time::InstantSleeper;
use crate::transport::test_support::{MockClient, config, response};
use crate::transport::{ApiRequest, BlockingTransport};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod construction {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(
            Hookbase::new("  "),
            Err(ConfigError::InvalidApiKey { .. })
        ));
        assert!(matches!(
            BlockingHookbase::new(""),
            Err(ConfigError::InvalidApiKey { .. })
        ));
    }

    #[test]
    fn transport_uses_configured_retry_budget() {
        let client = Hookbase::from_config(&config().with_max_retries(7));
        assert_eq!(client.transport().retry_policy().max_retries, 7);
    }
}

mod blocking {
    use super::*;

    #[test]
    fn request_runs_through_retrying_transport() {
        let mock = MockClient::new([response(500, "{}"), response(200, r#"{"ok":true}"#)]);
        let client = BlockingHookbase::from_transport(
            BlockingTransport::new(&mock, &config()).with_sleeper(InstantSleeper),
        );

        let body = client.request(&ApiRequest::get("/api/health")).unwrap();

        assert_eq!(body, Some(json!({"ok": true})));
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn talks_to_server_off_the_runtime() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"ok"}"#))
            .mount(&server)
            .await;

        let config = ClientConfig::new("hb_key").unwrap().with_base_url(&server.uri()).unwrap();
        let status = tokio::task::spawn_blocking(move || {
            let client = BlockingHookbase::from_config(&config);
            client.request_as::<serde_json::Value>(&ApiRequest::get("/api/health"))
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(status["status"], "ok");
    }
}

mod over_the_wire {
    use super::*;

    fn config_for(server: &MockServer) -> ClientConfig {
        ClientConfig::new("hb_key")
            .unwrap()
            .with_base_url(&server.uri())
            .unwrap()
            .with_timeout(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn sends_default_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/sources"))
            .and(header("authorization", "Bearer hb_key"))
            .and(header("accept", "application/json"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"sources":[]}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = Hookbase::from_config(&config_for(&server));
        let page = client.sources().list(&ListSourcesParams::default()).await.unwrap();

        assert!(page.data.is_empty());
        let received = server.received_requests().await.unwrap();
        let agent = received[0].headers["user-agent"].to_str().unwrap();
        assert!(agent.starts_with("hookbase-rust/"));
    }

    #[tokio::test]
    async fn shared_http_client_is_used() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let shared = reqwest::Client::new();
        let client = Hookbase::with_http_client(&config_for(&server), shared.clone());
        client.sources().delete("src_1").await.unwrap();
        drop(client);

        // The caller's client keeps working after the facade is gone.
        let resp = shared.get(format!("{}/ping", server.uri())).send().await;
        assert!(resp.is_ok());
    }

    #[tokio::test]
    async fn retries_server_errors_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let client = Hookbase::from_transport(
            crate::transport::Transport::new(
                crate::transport::ReqwestClient::new(),
                &config_for(&server),
            )
            .with_sleeper(InstantSleeper),
        );

        let body = client.request(&ApiRequest::get("/api/health")).await.unwrap();

        assert_eq!(body, Some(json!({})));
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }
}
