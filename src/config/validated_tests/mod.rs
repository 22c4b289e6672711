//! Tests for validated configuration.

use super::ConfigError;
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::ValidatedConfig;

/// Helper to create CLI args from a slice; global options follow `init`.
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["hookbase", "init"];
    full_args.extend(args);
    Cli::parse_from_iter(full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}

const SECRET: &str = "whsec_dGVzdC1zZWNyZXQta2V5LWZvci13ZWJob29rLXNpZ24=";

mod precedence_tests;
mod validation_tests;
