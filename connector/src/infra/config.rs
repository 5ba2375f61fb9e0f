//! Loading `ConnectorConfig` from the environment or a YAML file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use connector_common::ConnectorConfig;

/// Prefix of every configuration environment variable.
pub const ENV_PREFIX: &str = "CHE_OPENSHIFT_";

/// Overrides the configuration file location.
pub const CONFIG_PATH_VAR: &str = "CHE_OPENSHIFT_CONFIG";

/// Read `CHE_OPENSHIFT_*` variables; unset fields take their defaults.
///
/// The port-name and label tables cannot be expressed as flat variables and
/// always keep their defaults here.
///
/// # Errors
///
/// Returns an error if a variable holds a value of the wrong type.
pub fn load_from_env() -> Result<ConnectorConfig> {
    envy::prefixed(ENV_PREFIX)
        .from_env()
        .with_context(|| format!("failed to load config from {ENV_PREFIX}* env vars"))
}

/// Read a YAML file. A missing file yields the default configuration.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_from_file(path: &Path) -> Result<ConnectorConfig> {
    if !path.exists() {
        return Ok(ConnectorConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}

/// `$CHE_OPENSHIFT_CONFIG`, else `~/.che/openshift.yaml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf> {
    if let Ok(val) = std::env::var(CONFIG_PATH_VAR) {
        return Ok(PathBuf::from(val));
    }
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.join(".che").join("openshift.yaml"))
}

/// Load from the configuration file when one exists, else from the
/// environment.
///
/// # Errors
///
/// Returns the first loading failure.
pub fn load() -> Result<ConnectorConfig> {
    let path = default_config_path()?;
    if path.exists() {
        tracing::debug!(path = %path.display(), "loading configuration file");
        return load_from_file(&path);
    }
    load_from_env()
}
