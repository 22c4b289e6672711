//! Tests for `ClientConfig`.

use std::time::Duration;

use super::{ClientConfig, ConfigError};

mod construction {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let config = ClientConfig::new("hb_test").unwrap();

        assert_eq!(config.api_key(), "hb_test");
        assert_eq!(config.base_url(), "https://api.hookbase.app");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries(), 3);
        assert!(!config.debug());
    }

    #[test]
    fn authorization_is_bearer_and_sensitive() {
        let config = ClientConfig::new("hb_test").unwrap();

        assert_eq!(config.authorization(), "Bearer hb_test");
        assert!(config.authorization().is_sensitive());
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(
            ClientConfig::new(""),
            Err(ConfigError::InvalidApiKey { .. })
        ));
    }

    #[test]
    fn control_characters_are_rejected() {
        assert!(matches!(
            ClientConfig::new("key\r\nX-Injected: 1"),
            Err(ConfigError::InvalidApiKey { .. })
        ));
    }
}

mod builders {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = ClientConfig::new("k")
            .unwrap()
            .with_base_url("http://localhost:8787//")
            .unwrap();

        assert_eq!(config.base_url(), "http://localhost:8787");
    }

    #[test]
    fn base_url_keeps_path_prefix() {
        let config = ClientConfig::new("k")
            .unwrap()
            .with_base_url("https://proxy.example.com/hookbase/")
            .unwrap();

        assert_eq!(config.base_url(), "https://proxy.example.com/hookbase");
    }

    #[test]
    fn base_url_with_query_is_rejected() {
        let result = ClientConfig::new("k")
            .unwrap()
            .with_base_url("https://api.hookbase.app/?x=1");

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn remaining_setters() {
        let config = ClientConfig::new("k")
            .unwrap()
            .with_timeout(Duration::from_millis(1_500))
            .with_max_retries(0)
            .with_debug(true);

        assert_eq!(config.timeout(), Duration::from_millis(1_500));
        assert_eq!(config.max_retries(), 0);
        assert!(config.debug());
    }
}

mod formatting {
    use super::*;

    #[test]
    fn debug_redacts_key() {
        let config = ClientConfig::new("hb_super_secret").unwrap();
        let debug = format!("{config:?}");

        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("hb_super_secret"));
    }

    #[test]
    fn display_omits_key() {
        let config = ClientConfig::new("hb_super_secret").unwrap();
        let shown = config.to_string();

        assert!(shown.contains("https://api.hookbase.app"));
        assert!(!shown.contains("hb_super_secret"));
    }
}
