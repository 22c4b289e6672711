//! Tests for rejected values.

use super::*;

#[test]
fn zero_timeout_is_rejected() {
    let result = ValidatedConfig::from_raw(&cli(&["--api-key", "k", "--timeout", "0"]), None);

    assert!(matches!(
        result,
        Err(ConfigError::InvalidDuration {
            field: "timeout",
            ..
        })
    ));
}

#[test]
fn zero_timeout_without_key_is_ignored() {
    // Client settings are only validated once a key makes them usable.
    assert!(ValidatedConfig::from_raw(&cli(&["--timeout", "0"]), None).is_ok());
}

#[test]
fn zero_tolerance_is_rejected() {
    let result = ValidatedConfig::from_raw(&cli(&["--tolerance", "0"]), None);

    assert!(matches!(
        result,
        Err(ConfigError::InvalidDuration {
            field: "tolerance",
            ..
        })
    ));
}

#[test]
fn invalid_base_url_is_rejected() {
    let result =
        ValidatedConfig::from_raw(&cli(&["--api-key", "k", "--base-url", "not a url"]), None);

    assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
}

#[test]
fn non_http_base_url_is_rejected() {
    let result = ValidatedConfig::from_raw(
        &cli(&["--api-key", "k", "--base-url", "ftp://hookbase.app"]),
        None,
    );

    assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
}

#[test]
fn blank_api_key_is_rejected() {
    let toml = toml("[client]\napi_key = \"  \"\n");
    let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

    assert!(matches!(result, Err(ConfigError::InvalidApiKey { .. })));
}

#[test]
fn api_key_with_newline_is_rejected() {
    let toml = toml("[client]\napi_key = \"bad\\nkey\"\n");
    let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

    assert!(matches!(result, Err(ConfigError::InvalidApiKey { .. })));
}

#[test]
fn undecodable_secret_is_rejected() {
    let result = ValidatedConfig::from_raw(&cli(&["--secret", "whsec_!!!"]), None);

    assert!(matches!(result, Err(ConfigError::InvalidSecret(_))));
}

#[test]
fn empty_secret_is_rejected() {
    let toml = toml("[webhook]\nsecret = \"whsec_\"\n");
    let result = ValidatedConfig::from_raw(&cli(&[]), Some(&toml));

    assert!(matches!(result, Err(ConfigError::InvalidSecret(_))));
}
