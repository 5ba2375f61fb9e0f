//! Validation of connector configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::sync::LazyLock;

use anyhow::Result;
use connector_common::ConnectorConfig;
use regex::Regex;

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Generated names are `<prefix><id>`; the prefix must start a DNS label.
static RESOURCE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z0-9][-a-z0-9]*$").expect("valid regex")
});

// ── Validators ───────────────────────────────────────────────────────────────

/// Reject configurations the connector cannot run with.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` naming the first offending key.
pub fn validate_config(config: &ConnectorConfig) -> Result<()> {
    if !(config.api_endpoint.starts_with("https://") || config.api_endpoint.starts_with("http://"))
    {
        return Err(invalid("api_endpoint", &config.api_endpoint, "must be an http(s) URL"));
    }
    for (key, value) in [
        ("project", &config.project),
        ("service_account", &config.service_account),
        ("external_address", &config.external_address),
    ] {
        if value.trim().is_empty() {
            return Err(invalid(key, value, "must not be empty"));
        }
    }
    if !RESOURCE_PREFIX_RE.is_match(&config.resource_prefix) {
        return Err(invalid(
            "resource_prefix",
            &config.resource_prefix,
            "must start with a lowercase letter or digit and contain only [-a-z0-9]",
        ));
    }
    if config.discovery_attempts == 0 {
        return Err(invalid("discovery_attempts", "0", "must be at least 1"));
    }
    if config.discovery_interval_secs == 0 {
        return Err(invalid("discovery_interval_secs", "0", "must be at least 1"));
    }
    if config.image_override.as_deref().is_some_and(|i| i.trim().is_empty()) {
        return Err(invalid("image_override", "", "must name an image when set"));
    }
    Ok(())
}

fn invalid(key: &str, value: &str, reason: &str) -> anyhow::Error {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
