//! `synth` command implementation.

use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use ingestion::SwingSynth;
use tracing::info;

use crate::cli::SynthArgs;
use crate::error::CliError;

/// Execute the `synth` command
pub fn run_synth(args: &SynthArgs) -> Result<()> {
    let synth = synth_from(args)?;

    let file = File::create(&args.out)
        .with_context(|| format!("Failed to create {}", args.out.display()))?;
    let written = synth.write_to(&mut BufWriter::new(file))?;

    info!(
        out = %args.out.display(),
        samples = written,
        period_s = synth.period_s,
        amplitude_deg = synth.amplitude_deg,
        "Synthetic recording written"
    );
    println!("Wrote {} samples to {}", written, args.out.display());
    Ok(())
}

fn synth_from(args: &SynthArgs) -> Result<SwingSynth, CliError> {
    for (name, value) in [
        ("--seconds", args.seconds),
        ("--rate", args.rate),
        ("--period", args.period),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(CliError::invalid_argument(format!(
                "{name} must be positive, got {value}"
            )));
        }
    }

    Ok(SwingSynth {
        rate_hz: args.rate,
        seconds: args.seconds,
        period_s: args.period,
        amplitude_deg: args.amplitude,
        ..Default::default()
    })
}
