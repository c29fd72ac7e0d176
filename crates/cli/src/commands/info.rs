//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::Sample;
use serde::Serialize;
use tracing::info;

use super::{load_config, load_nonempty};
use crate::cli::InfoArgs;

/// Recording summary for JSON output
#[derive(Debug, Serialize)]
struct RecordingInfo {
    path: String,
    samples: usize,
    start_us: u64,
    end_us: u64,
    duration_s: f64,
    rate_hz: f64,
    peak_g: f64,
    altitude: AltitudeInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    hud_mode: Option<String>,
}

#[derive(Debug, Serialize)]
struct AltitudeInfo {
    /// Reference the range is measured from (m above sea level)
    ground_m: f64,
    min_m: f64,
    max_m: f64,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(data = %args.data.display(), "Reading recording");

    let config = args.config.as_deref().map(load_config).transpose()?;
    let samples = load_nonempty(&args.data, config.as_ref())?;

    let ground = config.as_ref().map_or(0.0, |c| c.hud.altitude_ground);
    let mut summary = summarize(&samples, ground);
    summary.path = args.data.display().to_string();
    summary.hud_mode = config.as_ref().map(|c| c.hud.mode.to_string());

    if args.json {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize recording info")?;
        println!("{}", json);
    } else {
        print_info(&summary);
    }

    Ok(())
}

fn summarize(samples: &[Sample], ground: f64) -> RecordingInfo {
    let start_us = samples.first().map_or(0, |s| s.time);
    let end_us = samples.last().map_or(0, |s| s.time);
    let duration_s = (end_us - start_us) as f64 / 1e6;
    let rate_hz = if duration_s > 0.0 {
        (samples.len() - 1) as f64 / duration_s
    } else {
        0.0
    };

    let (min_m, max_m) = samples
        .iter()
        .map(|s| s.altitude() - ground)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), a| {
            (lo.min(a), hi.max(a))
        });

    RecordingInfo {
        path: String::new(),
        samples: samples.len(),
        start_us,
        end_us,
        duration_s,
        rate_hz,
        peak_g: samples
            .iter()
            .map(Sample::accel_magnitude)
            .fold(0.0, f64::max),
        altitude: AltitudeInfo {
            ground_m: ground,
            min_m,
            max_m,
        },
        hud_mode: None,
    }
}

fn print_info(info: &RecordingInfo) {
    println!("Recording: {}", info.path);
    println!("\n  Samples: {}", info.samples);
    println!(
        "  Span: {}us .. {}us ({:.3}s)",
        info.start_us, info.end_us, info.duration_s
    );
    println!("  Rate: {:.1} Hz", info.rate_hz);
    println!("  Peak load: {:.2} G", info.peak_g);
    println!(
        "  Altitude: {:.1} m .. {:.1} m (ground {:.1} m)",
        info.altitude.min_m, info.altitude.max_m, info.altitude.ground_m
    );
    if let Some(ref mode) = info.hud_mode {
        println!("  HUD mode: {}", mode);
    }
}
