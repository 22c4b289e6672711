//! Tests for CLI vs TOML precedence rules.

use std::time::Duration;

use super::*;

const FULL_TOML: &str = r#"
    [client]
    api_key = "hb_toml"
    base_url = "https://toml.hookbase.app"
    timeout = 15
    max_retries = 1

    [webhook]
    tolerance = 120
"#;

mod cli_precedence {
    use super::*;

    #[test]
    fn cli_values_override_toml() {
        let cli = cli(&[
            "--api-key",
            "hb_cli",
            "--base-url",
            "https://cli.hookbase.app",
            "--timeout",
            "5",
            "--max-retries",
            "7",
            "--tolerance",
            "30",
        ]);
        let toml = toml(FULL_TOML);

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();
        let client = config.client_config().unwrap();

        assert_eq!(client.api_key(), "hb_cli");
        assert_eq!(client.base_url(), "https://cli.hookbase.app");
        assert_eq!(client.timeout(), Duration::from_secs(5));
        assert_eq!(client.max_retries(), 7);
        assert_eq!(config.tolerance, Duration::from_secs(30));
    }

    #[test]
    fn cli_zero_retries_overrides_toml() {
        let cli = cli(&["--max-retries", "0"]);
        let toml = toml(FULL_TOML);

        let config = ValidatedConfig::from_raw(&cli, Some(&toml)).unwrap();

        assert_eq!(config.client_config().unwrap().max_retries(), 0);
    }
}

mod toml_fallback {
    use super::*;

    #[test]
    fn toml_values_used_when_cli_silent() {
        let toml = toml(FULL_TOML);

        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();
        let client = config.client_config().unwrap();

        assert_eq!(client.api_key(), "hb_toml");
        assert_eq!(client.base_url(), "https://toml.hookbase.app");
        assert_eq!(client.timeout(), Duration::from_secs(15));
        assert_eq!(client.max_retries(), 1);
        assert_eq!(config.tolerance, Duration::from_secs(120));
    }

    #[test]
    fn cli_key_with_toml_settings() {
        let toml = toml(FULL_TOML);

        let config = ValidatedConfig::from_raw(&cli(&["--api-key", "hb_cli"]), Some(&toml)).unwrap();
        let client = config.client_config().unwrap();

        assert_eq!(client.api_key(), "hb_cli");
        assert_eq!(client.timeout(), Duration::from_secs(15));
    }
}

mod debug_flag {
    use super::*;

    #[test]
    fn toml_enables_debug() {
        let toml = toml("[client]\napi_key = \"k\"\ndebug = true\n");
        let config = ValidatedConfig::from_raw(&cli(&[]), Some(&toml)).unwrap();

        assert!(config.client_config().unwrap().debug());
    }

    #[test]
    fn cli_enables_debug() {
        let toml = toml("[client]\napi_key = \"k\"\n");
        let config = ValidatedConfig::from_raw(&cli(&["--debug"]), Some(&toml)).unwrap();

        assert!(config.client_config().unwrap().debug());
    }
}
