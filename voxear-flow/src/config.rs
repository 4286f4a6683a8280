//! Configuration resolution for voxear-flow
//!
//! Each setting is resolved independently with priority
//! **CLI → ENV → TOML → compiled default**.

use crate::error::{FlowError, FlowResult};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use voxear_common::config::{load_toml_config, resolve_config_path, TomlConfig, CONFIG_ENV_VAR};

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";
pub const DEFAULT_STEP_DWELL_MS: u64 = 1200;
pub const DEFAULT_GRACE_MS: u64 = 1500;
pub const DEFAULT_ANALYSIS_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

pub const ENV_SERVICE_URL: &str = "VOXEAR_SERVICE_URL";
pub const ENV_STEP_DWELL_MS: &str = "VOXEAR_STEP_DWELL_MS";
pub const ENV_GRACE_MS: &str = "VOXEAR_GRACE_MS";
pub const ENV_ANALYSIS_TIMEOUT_SECS: &str = "VOXEAR_ANALYSIS_TIMEOUT_SECS";

/// Timing of the analysis screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowTiming {
    /// Dwell per simulated step
    pub step_dwell: Duration,
    /// How long the merged step list stays visible before navigating
    pub grace: Duration,
    /// Upper bound on the wait for the service; `None` waits forever
    pub analysis_timeout: Option<Duration>,
}

impl Default for FlowTiming {
    fn default() -> Self {
        Self {
            step_dwell: Duration::from_millis(DEFAULT_STEP_DWELL_MS),
            grace: Duration::from_millis(DEFAULT_GRACE_MS),
            analysis_timeout: Some(Duration::from_secs(DEFAULT_ANALYSIS_TIMEOUT_SECS)),
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub service_url: Option<String>,
    pub step_dwell_ms: Option<u64>,
    pub grace_ms: Option<u64>,
    pub analysis_timeout_secs: Option<u64>,
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowConfig {
    pub service_url: String,
    pub timing: FlowTiming,
    pub event_capacity: usize,
    /// Default log filter from the TOML `[logging]` table
    pub log_level: Option<String>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            timing: FlowTiming::default(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            log_level: None,
        }
    }
}

impl FlowConfig {
    /// Resolve configuration, reading the TOML file if one exists
    pub fn resolve(cli: &CliOverrides) -> FlowResult<Self> {
        let toml = match resolve_config_path(cli.config_path.as_deref(), CONFIG_ENV_VAR) {
            Some(path) => load_toml_config(&path)?.unwrap_or_default(),
            None => TomlConfig::default(),
        };
        Self::from_sources(cli, &toml)
    }

    /// Resolve from already-loaded sources
    pub fn from_sources(cli: &CliOverrides, toml: &TomlConfig) -> FlowResult<Self> {
        let service_url = match cli.service_url.clone() {
            Some(url) => url,
            None => match env_string(ENV_SERVICE_URL) {
                Some(url) => url,
                None => toml
                    .service_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string()),
            },
        };
        let service_url = service_url.trim().to_string();
        if service_url.is_empty() {
            return Err(FlowError::Config(
                "service_url must not be empty".to_string(),
            ));
        }

        let step_dwell_ms = pick_u64(
            "step_dwell_ms",
            cli.step_dwell_ms,
            ENV_STEP_DWELL_MS,
            toml.step_dwell_ms,
            DEFAULT_STEP_DWELL_MS,
        )?;
        if step_dwell_ms == 0 {
            return Err(FlowError::Config(
                "step_dwell_ms must be greater than 0".to_string(),
            ));
        }

        let grace_ms = pick_u64(
            "grace_ms",
            cli.grace_ms,
            ENV_GRACE_MS,
            toml.grace_ms,
            DEFAULT_GRACE_MS,
        )?;

        let timeout_secs = pick_u64(
            "analysis_timeout_secs",
            cli.analysis_timeout_secs,
            ENV_ANALYSIS_TIMEOUT_SECS,
            toml.analysis_timeout_secs,
            DEFAULT_ANALYSIS_TIMEOUT_SECS,
        )?;

        let config = Self {
            service_url,
            timing: FlowTiming {
                step_dwell: Duration::from_millis(step_dwell_ms),
                grace: Duration::from_millis(grace_ms),
                analysis_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            },
            event_capacity: DEFAULT_EVENT_CAPACITY,
            log_level: toml.logging.level.clone(),
        };

        info!(
            service_url = %config.service_url,
            step_dwell_ms,
            grace_ms,
            timeout_secs,
            "Configuration resolved"
        );
        Ok(config)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve one numeric setting: CLI → ENV → TOML → default
fn pick_u64(
    setting: &str,
    cli: Option<u64>,
    env_name: &str,
    toml: Option<u64>,
    default: u64,
) -> FlowResult<u64> {
    if let Some(value) = cli {
        debug!(setting, value, "Using command-line value");
        return Ok(value);
    }

    if let Some(raw) = env_string(env_name) {
        let value = raw.trim().parse::<u64>().map_err(|e| {
            FlowError::Config(format!("{env_name}={raw:?} is not a number: {e}"))
        })?;
        debug!(setting, value, "Using environment value");
        return Ok(value);
    }

    if let Some(value) = toml {
        debug!(setting, value, "Using TOML value");
        return Ok(value);
    }

    Ok(default)
}
