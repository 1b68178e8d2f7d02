//! Unit tests for client configuration.

use baremetal::{BaremetalApi, BaremetalConfig, BaremetalError, config::ConfigError};
use baremetal::{HttpTransport, Transport};
use rstest::*;

#[fixture]
fn valid_config() -> BaremetalConfig {
    BaremetalConfig {
        secret_key: String::from("SCWSECRETKEYEXAMPLE"),
        api_url: String::from("https://api.scaleway.com"),
        default_zone: Some(String::from("fr-par-2")),
        default_organization_id: Some(String::from("11111111-2222-3333-4444-555555555555")),
        default_page_size: Some(25),
    }
}

#[rstest]
fn config_validation_rejects_missing_secret_with_actionable_error(valid_config: BaremetalConfig) {
    let cfg = BaremetalConfig {
        secret_key: String::new(),
        ..valid_config
    };

    let Err(ConfigError::MissingField(message)) = cfg.validate() else {
        panic!("expected MissingField error");
    };
    assert!(
        message.contains("SCW_SECRET_KEY"),
        "error should mention env var: {message}"
    );
    assert!(
        message.contains("baremetal.toml"),
        "error should mention config file: {message}"
    );
    assert!(
        message.contains("secret_key"),
        "error should mention TOML key: {message}"
    );
}

#[rstest]
fn config_validation_rejects_blank_api_url(valid_config: BaremetalConfig) {
    let cfg = BaremetalConfig {
        api_url: String::from("   "),
        ..valid_config
    };

    let Err(error) = cfg.validate() else {
        panic!("api url is required");
    };
    let message = error.to_string();
    assert!(message.contains("SCW_API_URL"), "unexpected error: {message}");
    assert!(message.contains("api_url"), "unexpected error: {message}");
}

#[rstest]
fn transport_exposes_config_defaults(valid_config: BaremetalConfig) {
    let transport = HttpTransport::new(valid_config)
        .unwrap_or_else(|err| panic!("valid config builds transport: {err}"));

    assert_eq!(transport.default_zone().as_deref(), Some("fr-par-2"));
    assert_eq!(
        transport.default_organization_id().as_deref(),
        Some("11111111-2222-3333-4444-555555555555")
    );
    assert_eq!(transport.default_page_size(), Some(25));
}

#[rstest]
fn blank_defaults_are_treated_as_unset(valid_config: BaremetalConfig) {
    let cfg = BaremetalConfig {
        default_zone: Some(String::from("  ")),
        default_organization_id: Some(String::new()),
        default_page_size: Some(0),
        ..valid_config
    };

    assert_eq!(cfg.zone(), None);
    assert_eq!(cfg.organization_id(), None);
    assert_eq!(cfg.page_size(), None);
}

#[test]
fn new_config_targets_public_api() {
    let cfg = BaremetalConfig::new("secret");

    assert_eq!(cfg.api_url, baremetal::config::DEFAULT_API_URL);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.zone(), None);
}

#[test]
fn client_from_invalid_config_reports_config_error() {
    let result = BaremetalApi::from_config(BaremetalConfig::new(""));

    assert!(matches!(
        result,
        Err(BaremetalError::Config(ConfigError::MissingField(_)))
    ));
}
