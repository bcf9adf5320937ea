//! Tracker configuration loading
//!
//! Thresholds are deliberately exposed as named, overridable settings
//! rather than baked-in constants: they encode domain plausibility tuning,
//! and different hosts will want to retune them. Loading is TOML from a
//! single file; a missing file means compiled-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use vigil_types::TrackerConfig;

/// Errors that can occur during config loading or validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("invalid setting `{name}`: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Load a config file and validate it. Fails fast on malformed values so
/// a bad threshold never reaches the filter.
pub fn load_file(path: &Path) -> Result<TrackerConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: TrackerConfig = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate(&config)?;
    Ok(config)
}

/// Save a config to a TOML file.
pub fn save_file(path: &Path, config: &TrackerConfig) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    fs::write(path, contents).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Check that every threshold is usable by the filter and aggregator.
pub fn validate(config: &TrackerConfig) -> Result<(), ConfigError> {
    if config.sampling.interval_ms == 0 {
        return Err(ConfigError::Invalid {
            name: "sampling.interval_ms",
            reason: "sampling interval must be positive".into(),
        });
    }

    let inference = &config.inference;
    if !inference.min_delta.is_finite() || inference.min_delta < 0.0 {
        return Err(ConfigError::Invalid {
            name: "inference.min_delta",
            reason: format!("must be finite and non-negative, got {}", inference.min_delta),
        });
    }
    if !inference.max_single_hit.is_finite() || inference.max_single_hit <= inference.min_delta {
        return Err(ConfigError::Invalid {
            name: "inference.max_single_hit",
            reason: format!(
                "must be finite and greater than min_delta ({}), got {}",
                inference.min_delta, inference.max_single_hit
            ),
        });
    }

    let cap = config.capture.kill_blow_cap;
    if !cap.is_finite() || cap < 0.0 {
        return Err(ConfigError::Invalid {
            name: "capture.kill_blow_cap",
            reason: format!("must be finite and non-negative, got {cap}"),
        });
    }

    Ok(())
}

/// Default config file location, under the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vigil").join("tracker.toml"))
}

/// Load from the default location, falling back to defaults when the file
/// does not exist. A present-but-broken file is still an error.
pub fn load_or_default() -> Result<TrackerConfig, ConfigError> {
    match default_config_path() {
        Some(path) if path.exists() => load_file(&path),
        _ => Ok(TrackerConfig::new()),
    }
}
