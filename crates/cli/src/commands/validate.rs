//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{HudMode, ReplayConfig};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    hud_mode: String,
    video_window_ms: (u64, Option<u64>),
    data_offset_ms: u64,
    dpi: f64,
    spi: f64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    hud_mode: config.hud.mode.to_string(),
                    video_window_ms: (config.video.startoff, config.video.end()),
                    data_offset_ms: config.data.startoff,
                    dpi: config.display.dpi,
                    spi: config.display.spi,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &ReplayConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    match config.hud.mode {
        HudMode::Normal => {
            warnings.push("hud.mode is normal - frames are cleared but nothing is drawn".to_string())
        }
        HudMode::Booster if config.booster.radius == 0.0 => {
            warnings.push("booster.radius is 0 - arm geometry is degenerate".to_string())
        }
        _ => {}
    }

    let c = config.data.pressure_coeff;
    if c > 0.0 && c < 1.0 {
        warnings.push(format!(
            "data.pressure_coeff {c} is below 1 - smoothing amplifies pressure changes"
        ));
    }

    if config.graph.redline_g < config.graph.max_g {
        warnings.push(format!(
            "graph.redline_g {} is below graph.max_g {} - the graph top never reaches full red",
            config.graph.redline_g, config.graph.max_g
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  HUD mode: {}", summary.hud_mode);
            match summary.video_window_ms {
                (start, Some(end)) => println!("  Video window: {start} ms .. {end} ms"),
                (start, None) => println!("  Video window: {start} ms .. end"),
            }
            println!("  Data offset: {} ms", summary.data_offset_ms);
            println!("  Density: {} dpi / {} spi", summary.dpi, summary.spi);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
