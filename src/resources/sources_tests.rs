//! Tests for the sources namespace.

use super::{CreateSourceParams, ListSourcesParams, UpdateSourceParams};
use crate::Hookbase;
use crate::error::ApiErrorKind;
use crate::time::InstantSleeper;
use crate::transport::Transport;
use crate::transport::test_support::{MockClient, config, response};
use serde_json::json;

fn client(mock: &MockClient) -> Hookbase<&MockClient, InstantSleeper> {
    Hookbase::from_transport(Transport::new(mock, &config()).with_sleeper(InstantSleeper))
}

const SOURCE: &str = r#"{
    "id": "src_1",
    "name": "GitHub",
    "slug": "github",
    "provider": "github",
    "isActive": 1,
    "verifySignature": 0,
    "ipAllowlist": "[\"10.0.0.1\"]",
    "eventCount": 12,
    "createdAt": "2026-01-01T00:00:00Z",
    "unknownField": true
}"#;

mod models {
    use super::*;
    use crate::resources::Source;

    #[test]
    fn accepts_integer_flags_and_encoded_lists() {
        let source: Source = serde_json::from_str(SOURCE).unwrap();

        assert!(source.is_active);
        assert!(!source.verify_signature);
        assert_eq!(source.ip_allowlist, Some(vec!["10.0.0.1".to_string()]));
        assert_eq!(source.ip_denylist, None);
        assert_eq!(source.event_count, 12);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let source: Source =
            serde_json::from_value(json!({"id": "src_2", "name": "n", "slug": "s"})).unwrap();

        assert!(source.is_active);
        assert_eq!(source.provider, "generic");
        assert_eq!(source.ip_filter_mode, "none");
        assert_eq!(source.updated_at, "");
    }

    #[test]
    fn unparsable_encoded_list_is_none() {
        let source: Source = serde_json::from_value(
            json!({"id": "x", "name": "n", "slug": "s", "ipDenylist": "not json"}),
        )
        .unwrap();

        assert_eq!(source.ip_denylist, None);
    }

    #[test]
    fn params_serialize_camel_case_without_unset_fields() {
        let params = CreateSourceParams {
            verify_signature: Some(true),
            ..CreateSourceParams::new("Stripe")
        };

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"name": "Stripe", "verifySignature": true})
        );
    }
}

mod calls {
    use super::*;

    #[tokio::test]
    async fn list_reads_sources_key_and_pagination() {
        let body = format!(
            r#"{{"sources":[{SOURCE}],"pagination":{{"total":41,"page":2,"pageSize":20}}}}"#
        );
        let mock = MockClient::new([response(200, &body)]);
        let params = ListSourcesParams {
            page: Some(2),
            is_active: Some(true),
            ..ListSourcesParams::default()
        };

        let page = client(&mock).sources().list(&params).await.unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, "src_1");
        assert!(page.has_more());
        let url = &mock.captured_requests()[0].url;
        assert_eq!(url.path(), "/api/sources");
        assert_eq!(url.query(), Some("page=2&isActive=true"));
    }

    #[tokio::test]
    async fn get_unwraps_source_envelope() {
        let mock = MockClient::new([response(200, &format!(r#"{{"source":{SOURCE}}}"#))]);

        let source = client(&mock).sources().get("src_1").await.unwrap();

        assert_eq!(source.slug, "github");
        assert_eq!(mock.captured_requests()[0].url.path(), "/api/sources/src_1");
    }

    #[tokio::test]
    async fn get_accepts_bare_body() {
        let mock = MockClient::new([response(200, SOURCE)]);
        let source = client(&mock).sources().get("src_1").await.unwrap();
        assert_eq!(source.name, "GitHub");
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let mock = MockClient::new([response(404, r#"{"error":"Source not found"}"#)]);

        let err = client(&mock).sources().get("nope").await.unwrap_err();

        assert_eq!(err.as_api().unwrap().kind, ApiErrorKind::NotFound);
    }

    #[tokio::test]
    async fn create_posts_body_and_returns_secret() {
        let mock = MockClient::new([response(
            201,
            r#"{"source":{"id":"src_3","name":"Stripe","slug":"stripe","signingSecret":"whsec_abc"}}"#,
        )]);

        let source = client(&mock)
            .sources()
            .create(&CreateSourceParams::new("Stripe"))
            .await
            .unwrap();

        assert_eq!(source.signing_secret.as_deref(), Some("whsec_abc"));
        let sent = &mock.captured_requests()[0];
        assert_eq!(sent.method, http::Method::POST);
        assert_eq!(sent.body.as_deref(), Some(br#"{"name":"Stripe"}"#.as_slice()));
    }

    #[tokio::test]
    async fn update_sends_patch_and_accepts_no_content() {
        let mock = MockClient::new([response(204, "")]);
        let params = UpdateSourceParams {
            is_active: Some(false),
            ..UpdateSourceParams::default()
        };

        client(&mock).sources().update("src_1", &params).await.unwrap();

        let sent = &mock.captured_requests()[0];
        assert_eq!(sent.method, http::Method::PATCH);
        assert_eq!(sent.body.as_deref(), Some(br#"{"isActive":false}"#.as_slice()));
    }

    #[tokio::test]
    async fn delete_sends_delete() {
        let mock = MockClient::new([response(204, "")]);

        client(&mock).sources().delete("src_1").await.unwrap();

        assert_eq!(mock.captured_requests()[0].method, http::Method::DELETE);
    }

    #[tokio::test]
    async fn rotate_secret_returns_new_secret() {
        let mock = MockClient::new([response(200, r#"{"signingSecret":"whsec_new"}"#)]);

        let secret = client(&mock).sources().rotate_secret("src_1").await.unwrap();

        assert_eq!(secret, "whsec_new");
        assert_eq!(
            mock.captured_requests()[0].url.path(),
            "/api/sources/src_1/rotate-secret"
        );
    }

    #[tokio::test]
    async fn reveal_secret_defaults_to_empty() {
        let mock = MockClient::new([response(200, "{}")]);
        let secret = client(&mock).sources().reveal_secret("src_1").await.unwrap();
        assert_eq!(secret, "");
    }
}
