//! `analyze` command implementation.

use anyhow::{Context, Result};
use analysis::{fields, Extremum, FieldView, XyView};
use contracts::Sample;
use serde::Serialize;
use tracing::info;

use super::load_nonempty;
use crate::cli::{AnalyzeArgs, FieldArg, MethodArg};

/// One flagged sample
#[derive(Debug, Serialize, PartialEq)]
struct Landmark {
    index: usize,
    time_us: u64,
    value: f64,
    /// +1 peak / rising, -1 trough / falling
    flag: i8,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum AnalysisReport {
    Landmarks {
        method: String,
        field: String,
        landmarks: Vec<Landmark>,
    },
    Line {
        field: String,
        /// Units of the field per second
        slope: f64,
        intercept: f64,
    },
}

/// Execute the `analyze` command
pub fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let samples = load_nonempty(&args.data, None)?;
    info!(
        samples = samples.len(),
        field = ?args.field,
        method = ?args.method,
        "Analysing recording"
    );

    let report = analyze(&samples, args)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn field_accessor(field: FieldArg) -> analysis::Field<Sample> {
    match field {
        FieldArg::Accel => fields::accel,
        FieldArg::Gyro => fields::gyro,
        FieldArg::Mag => fields::mag,
        FieldArg::Pressure => fields::pressure,
        FieldArg::Temperature => fields::temperature,
    }
}

fn analyze(samples: &[Sample], args: &AnalyzeArgs) -> Result<AnalysisReport> {
    let view = FieldView::new(samples, field_accessor(args.field))?;
    let field = format!("{:?}", args.field).to_lowercase();

    let flags = match args.method {
        MethodArg::Lls => {
            let fit = analysis::lls(&XyView::new(fields::time_seconds, view));
            return Ok(AnalysisReport::Line {
                field,
                slope: fit.slope,
                intercept: fit.intercept,
            });
        }
        MethodArg::Ampd => {
            let mode = if args.troughs {
                Extremum::Trough
            } else {
                Extremum::Peak
            };
            analysis::ampd(&view, mode)?
        }
        MethodArg::Threshold => {
            analysis::thresholding(&view, args.lag, args.threshold, args.influence)?
        }
        MethodArg::Momentum => analysis::pt_momentum(
            &XyView::new(fields::time_seconds, view),
            args.friction,
            args.min_momentum,
        ),
    };

    let landmarks = flags
        .iter()
        .enumerate()
        .filter(|(_, flag)| **flag != 0)
        .map(|(index, &flag)| Landmark {
            index,
            time_us: samples[index].time,
            value: view.value(index),
            flag,
        })
        .collect();

    Ok(AnalysisReport::Landmarks {
        method: format!("{:?}", args.method).to_lowercase(),
        field,
        landmarks,
    })
}

fn print_report(report: &AnalysisReport) {
    match report {
        AnalysisReport::Line {
            field,
            slope,
            intercept,
        } => {
            println!("Least-squares fit of {field} against time (s)");
            println!("  slope: {slope:.6}");
            println!("  intercept: {intercept:.6}");
        }
        AnalysisReport::Landmarks {
            method,
            field,
            landmarks,
        } => {
            println!("{method} on {field}: {} landmarks", landmarks.len());
            for l in landmarks {
                let marker = if l.flag > 0 { "▲" } else { "▼" };
                println!(
                    "  {marker} #{:<6} {:>12}us  {:.4}",
                    l.index, l.time_us, l.value
                );
            }
        }
    }
}
