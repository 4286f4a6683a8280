//! Configuration file loading and location
//!
//! Config file resolution follows the same priority order everywhere:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. OS-dependent default location (`<config dir>/voxear/voxear.toml`)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "VOXEAR_CONFIG";

/// File name of the default config file
pub const CONFIG_FILE_NAME: &str = "voxear.toml";

/// Settings that may be provided through the TOML file
///
/// Every field is optional; anything missing falls through to the
/// compiled defaults of the consuming crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Base URL of the remote analysis service
    #[serde(default)]
    pub service_url: Option<String>,

    /// Dwell time per simulated progress step (milliseconds)
    #[serde(default)]
    pub step_dwell_ms: Option<u64>,

    /// Grace interval before leaving the analysis screen (milliseconds)
    #[serde(default)]
    pub grace_ms: Option<u64>,

    /// Upper bound on the wait for the analysis service (seconds, 0 disables)
    #[serde(default)]
    pub analysis_timeout_secs: Option<u64>,

    /// Logging options
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[logging]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset (e.g. "info")
    #[serde(default)]
    pub level: Option<String>,
}

/// Resolve which config file to read
///
/// Returns `None` only when no explicit path was given and the platform has
/// no config directory.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: OS-dependent default
    default_config_path()
}

/// Default config file location for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("voxear").join(CONFIG_FILE_NAME))
}

/// Load the TOML config file
///
/// A missing file is not an error: a warning is logged and `Ok(None)` is
/// returned so the caller proceeds with defaults. A file that exists but
/// cannot be read or parsed is a configuration error.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        warn!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {}: {e}", path.display())))?;

    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {}: {e}", path.display())))?;

    debug!(path = %path.display(), "Loaded TOML config");
    Ok(Some(config))
}
