//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Normalize defaults that cannot be expressed in serde (zero IMU orientation)
//! - Validate configuration legality
//! - Generate `ReplayConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("replay.toml")).unwrap();
//! println!("HUD mode: {}", config.hud.mode);
//! ```

mod parser;
mod validator;

pub use contracts::ReplayConfig;
pub use parser::ConfigFormat;

use contracts::{ContractError, QuatConfig};
use std::path::Path;
use tracing::debug;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<ReplayConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        debug!(path = %path.display(), ?format, "loading config");
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<ReplayConfig, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize ReplayConfig to TOML string
    pub fn to_toml(config: &ReplayConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize ReplayConfig to JSON string
    pub fn to_json(config: &ReplayConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse, normalize and validate configuration content
    fn parse_and_validate(content: &str, format: ConfigFormat) -> Result<ReplayConfig, ContractError> {
        let mut config = parser::parse(content, format)?;
        normalize(&mut config);
        validator::validate(&config)?;
        Ok(config)
    }
}

/// An all-zero IMU orientation means "not configured"; other values are scaled to unit length.
fn normalize(config: &mut ReplayConfig) {
    let q = config.data.imu_orientation;
    if q.is_zero() {
        config.data.imu_orientation = QuatConfig::IDENTITY;
        return;
    }

    let norm = (q.w * q.w + q.x * q.x + q.y * q.y + q.z * q.z).sqrt();
    if norm.is_finite() && (norm - 1.0).abs() > 1e-12 {
        config.data.imu_orientation = QuatConfig {
            w: q.w / norm,
            x: q.x / norm,
            y: q.y / norm,
            z: q.z / norm,
        };
    }
}
