//! Command execution for the binary.
//!
//! Each command returns the text to print on stdout; `main` decides the
//! exit code from the error variant.

use std::io::Read;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use hookbase::Hookbase;
use hookbase::config::{Command, ConfigError, ValidatedConfig, parse_header_string, parse_query_string};
use hookbase::time::Sleeper;
use hookbase::transport::{ApiRequest, HttpClient};
use hookbase::webhook::WebhookVerificationError;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for command execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Bad input on the command line or in the config file.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The payload or its headers failed verification.
    #[error("Webhook verification failed: {0}")]
    Verification(#[from] WebhookVerificationError),

    /// The API request failed.
    #[error("Request failed: {0}")]
    Request(#[from] hookbase::Error),

    /// The result could not be rendered as JSON.
    #[error("Failed to format output: {0}")]
    Output(#[source] serde_json::Error),
}

/// Runs a non-`init` command.
///
/// # Errors
///
/// Returns an error if the command's inputs are invalid or the command fails.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: &ValidatedConfig, command: &Command) -> Result<String, RunError> {
    match command {
        Command::Init { .. } => Ok(String::new()),
        Command::Sign {
            payload,
            id,
            timestamp,
        } => sign(config, payload, id.as_deref(), *timestamp),
        Command::Verify { payload, headers } => verify(config, payload, headers),
        Command::Request {
            method,
            path,
            data,
            query,
            idempotency_key,
        } => {
            let request =
                build_request(method, path, data.as_deref(), query, idempotency_key.as_deref())?;
            let client = Hookbase::from_config(config.client_config()?);
            send(&client, &request).await
        }
    }
}

/// Produces the three signature headers for a payload file.
///
/// # Errors
///
/// Returns an error if no secret is configured or the payload cannot be read.
pub fn sign(
    config: &ValidatedConfig,
    payload: &Path,
    id: Option<&str>,
    timestamp: Option<i64>,
) -> Result<String, RunError> {
    let webhook = config.webhook()?;
    let body = read_payload(payload)?;
    let text = String::from_utf8(body).map_err(|e| ConfigError::FileRead {
        path: payload.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;

    let headers = webhook.generate_test_headers(&text, id, timestamp);
    tracing::debug!("Signed payload of {} bytes as {}", text.len(), headers.id);

    Ok(headers
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Verifies a payload file against the given headers and pretty-prints it.
///
/// # Errors
///
/// Returns an error if no secret is configured, a header is malformed, the
/// payload cannot be read, or verification fails.
pub fn verify(config: &ValidatedConfig, payload: &Path, headers: &[String]) -> Result<String, RunError> {
    let webhook = config.webhook()?;
    let headers = headers
        .iter()
        .map(String::as_str)
        .map(parse_header_string)
        .collect::<Result<Vec<_>, _>>()?;
    let body = read_payload(payload)?;

    let value = webhook.verify(&body, headers)?;
    tracing::info!("Webhook signature verified");

    render(&value)
}

/// Builds a logical request from command-line arguments.
///
/// # Errors
///
/// Returns an error if the method, a query parameter or the body is invalid.
pub fn build_request(
    method: &str,
    path: &str,
    data: Option<&str>,
    query: &[String],
    idempotency_key: Option<&str>,
) -> Result<ApiRequest, ConfigError> {
    let method = http::Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| ConfigError::InvalidMethod(method.to_string()))?;

    let mut request = ApiRequest::new(method, path);
    for pair in query {
        let (key, value) = parse_query_string(pair)?;
        request = request.with_query(key, value);
    }
    if let Some(data) = data {
        request = request.with_body(serde_json::from_str(data).map_err(ConfigError::InvalidJson)?);
    }
    if let Some(key) = idempotency_key {
        request = request.with_idempotency_key(key);
    }

    Ok(request)
}

/// Sends one request and pretty-prints the response body.
///
/// An empty response is printed as `null`.
///
/// # Errors
///
/// Returns an error if the request fails after retries.
pub async fn send<H: HttpClient, S: Sleeper>(
    client: &Hookbase<H, S>,
    request: &ApiRequest,
) -> Result<String, RunError> {
    let body = client.request(request).await?;
    render(&body.unwrap_or(Value::Null))
}

fn render(value: &Value) -> Result<String, RunError> {
    serde_json::to_string_pretty(value).map_err(RunError::Output)
}

/// Reads a payload file, or stdin for `-`.
fn read_payload(path: &Path) -> Result<Vec<u8>, ConfigError> {
    let read_error = |source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    if path == Path::new("-") {
        let mut buffer = Vec::new();
        std::io::stdin().read_to_end(&mut buffer).map_err(read_error)?;
        Ok(buffer)
    } else {
        std::fs::read(path).map_err(read_error)
    }
}
