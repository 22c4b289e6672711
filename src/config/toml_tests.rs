//! Tests for TOML configuration parsing.

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_client_section() {
        let toml = r#"
            [client]
            api_key = "hb_test_123"
            base_url = "https://staging.hookbase.app"
            timeout = 10
            max_retries = 5
            debug = true
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let client = &config.client;

        assert_eq!(client.api_key.as_deref(), Some("hb_test_123"));
        assert_eq!(
            client.base_url.as_deref(),
            Some("https://staging.hookbase.app")
        );
        assert_eq!(client.timeout, Some(10));
        assert_eq!(client.max_retries, Some(5));
        assert!(client.debug);
    }

    #[test]
    fn parse_webhook_section() {
        let toml = r#"
            [webhook]
            secret = "whsec_dGVzdA=="
            tolerance = 60
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.webhook.secret.as_deref(), Some("whsec_dGVzdA=="));
        assert_eq!(config.webhook.tolerance, Some(60));
    }

    #[test]
    fn empty_document_gives_defaults() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.client.api_key.is_none());
        assert!(config.client.timeout.is_none());
        assert!(!config.client.debug);
        assert!(config.webhook.secret.is_none());
    }

    #[test]
    fn unknown_section_is_rejected() {
        let result = TomlConfig::parse("[retry]\nmax_attempts = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result = TomlConfig::parse("[client]\napi_token = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn wrong_type_is_rejected() {
        let result = TomlConfig::parse("[client]\ntimeout = \"thirty\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn negative_retries_are_rejected() {
        let result = TomlConfig::parse("[client]\nmax_retries = -1\n");
        assert!(result.is_err());
    }
}

mod template {
    use super::*;

    #[test]
    fn template_is_valid_toml() {
        let template = default_config_template();
        let result = TomlConfig::parse(&template);
        assert!(
            result.is_ok(),
            "Template should be valid TOML: {:?}",
            result.err()
        );
    }

    #[test]
    fn template_contains_all_sections() {
        let template = default_config_template();

        assert!(template.contains("[client]"));
        assert!(template.contains("[webhook]"));
    }

    #[test]
    fn template_documents_every_field() {
        let template = default_config_template();

        for field in [
            "api_key",
            "base_url",
            "timeout",
            "max_retries",
            "debug",
            "secret",
            "tolerance",
        ] {
            assert!(template.contains(field), "Template should document {field}");
        }
    }

    #[test]
    fn template_leaves_everything_commented_out() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert!(config.client.api_key.is_none());
        assert!(config.webhook.secret.is_none());
    }
}

mod file_loading {
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn load_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [client]
            api_key = "hb_test_123"
        "#
        )
        .unwrap();

        let config = TomlConfig::load(file.path()).unwrap();
        assert_eq!(config.client.api_key.as_deref(), Some("hb_test_123"));
    }

    #[test]
    fn load_nonexistent_file_returns_error() {
        let path = Path::new("nonexistent_config_file_12345.toml");
        let result = TomlConfig::load(path);

        assert!(matches!(result, Err(ConfigError::FileRead { .. })));
    }

    #[test]
    fn load_invalid_toml_file_returns_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{{{").unwrap();

        let result = TomlConfig::load(file.path());

        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }
}
