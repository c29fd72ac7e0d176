//! Command implementations.

mod analyze;
mod info;
mod live;
mod render;
mod synth;
mod validate;

pub use analyze::run_analyze;
pub use info::run_info;
pub use live::run_live;
pub use render::run_render;
pub use synth::run_synth;
pub use validate::run_validate;

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use contracts::{ReplayConfig, Sample};
use ingestion::{load_all_fd, Preprocessor};
use tracing::info;

use crate::error::CliError;

/// Load and validate a configuration file
pub(crate) fn load_config(path: &Path) -> Result<ReplayConfig> {
    if !path.exists() {
        return Err(CliError::config_not_found(path).into());
    }
    let config = config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    info!(config = %path.display(), mode = %config.hud.mode, "Configuration loaded");
    Ok(config)
}

/// Decode a whole recording, preprocessing it when a config is given
pub(crate) fn load_samples(path: &Path, config: Option<&ReplayConfig>) -> Result<Vec<Sample>> {
    if !path.exists() {
        return Err(CliError::data_not_found(path).into());
    }
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let raw = load_all_fd(&mut file)
        .with_context(|| format!("Failed to decode {}", path.display()))?;

    let samples = match config {
        Some(config) => Preprocessor::new(config)
            .process_all(raw)
            .with_context(|| format!("Failed to preprocess {}", path.display()))?,
        None => raw,
    };

    if let (Some(first), Some(last)) = (samples.first(), samples.last()) {
        observability::record_samples_loaded(samples.len(), last.time - first.time);
    }
    Ok(samples)
}

/// `load_samples` that rejects empty recordings
pub(crate) fn load_nonempty(path: &Path, config: Option<&ReplayConfig>) -> Result<Vec<Sample>> {
    let samples = load_samples(path, config)?;
    if samples.is_empty() {
        return Err(CliError::empty_recording(path).into());
    }
    Ok(samples)
}
