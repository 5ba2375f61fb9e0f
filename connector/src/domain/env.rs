//! Environment and container-name handling for creation requests.
//!
//! Pure functions only — no I/O, no async.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::domain::error::ConnectorError;

/// Variable carrying the workspace identifier.
pub const WORKSPACE_ID_VAR: &str = "CHE_WORKSPACE_ID";

/// Literal stripped from the front of workspace ids and container names.
const WORKSPACE_MARKER: &str = "workspace";

/// Kubernetes container names must be RFC 1123 labels.
const MAX_CONTAINER_NAME_LEN: usize = 63;

static RFC1123_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid regex")
});

/// Convert `NAME=VALUE` entries into a mapping.
///
/// Only the first `=` separates name from value. Later duplicates win.
///
/// # Errors
///
/// Returns `MalformedEnvEntry` if an entry has no `=` or an empty name.
pub fn parse_env(entries: &[String]) -> Result<BTreeMap<String, String>> {
    let mut env = BTreeMap::new();
    for entry in entries {
        let (name, value) = entry
            .split_once('=')
            .filter(|(name, _)| !name.is_empty())
            .ok_or_else(|| ConnectorError::MalformedEnvEntry(entry.clone()))?;
        env.insert(name.to_string(), value.to_string());
    }
    Ok(env)
}

/// Workspace id carried by `CHE_WORKSPACE_ID`, with the first `workspace`
/// literal removed. Empty when the variable is absent.
#[must_use]
pub fn extract_workspace_id(entries: &[String]) -> String {
    entries
        .iter()
        .filter_map(|entry| entry.split_once('='))
        .find(|(name, _)| *name == WORKSPACE_ID_VAR)
        .map(|(_, value)| value.replacen(WORKSPACE_MARKER, "", 1))
        .unwrap_or_default()
}

/// Turn a Docker container name into a valid Kubernetes container name.
///
/// Drops a leading `workspace` literal, maps `_` to `-`, lower-cases and
/// truncates to 63 characters.
///
/// # Errors
///
/// Returns `InvalidContainerName` if nothing usable is left.
pub fn normalize_container_name(name: &str) -> Result<String> {
    let trimmed = name.trim_start_matches('/');
    let stripped = trimmed.strip_prefix(WORKSPACE_MARKER).unwrap_or(trimmed);
    let mut normalized: String = stripped
        .chars()
        .map(|c| if c == '_' { '-' } else { c.to_ascii_lowercase() })
        .take(MAX_CONTAINER_NAME_LEN)
        .collect();
    normalized = normalized.trim_matches('-').to_string();

    if !RFC1123_LABEL_RE.is_match(&normalized) {
        return Err(ConnectorError::InvalidContainerName {
            name: name.to_string(),
            reason: "must reduce to lowercase letters, digits and '-'".to_string(),
        }
        .into());
    }
    Ok(normalized)
}
