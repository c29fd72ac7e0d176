//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sensor HUD - render ride telemetry overlays from recorded IMU data
#[derive(Parser, Debug)]
#[command(
    name = "sensorhud",
    author,
    version,
    about = "Sensor telemetry HUD renderer",
    long_about = "Decodes fixed-size IMU sample recordings, renders HUD overlays \n\
                  (swing ride, booster) to PNG frames, runs signal analysis on \n\
                  recorded fields and renders live samples streamed on stdin."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SENSORHUD_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SENSORHUD_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", global = true, env = "SENSORHUD_METRICS_PORT")]
    pub metrics_port: u16,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarise a sample recording
    Info(InfoArgs),

    /// Validate configuration file
    Validate(ValidateArgs),

    /// Render HUD frames from a recording
    Render(RenderArgs),

    /// Run signal analysis over one field of a recording
    Analyze(AnalyzeArgs),

    /// Render samples streamed on stdin
    Live(LiveArgs),

    /// Write a synthetic swing-ride recording
    Synth(SynthArgs),
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Sample recording
    pub data: PathBuf,

    /// Configuration file; enables preprocessing and ground-relative altitude
    #[arg(short, long, env = "SENSORHUD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "sensorhud.toml", env = "SENSORHUD_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `render` command
#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    /// Sample recording
    pub data: PathBuf,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, default_value = "sensorhud.toml", env = "SENSORHUD_CONFIG")]
    pub config: PathBuf,

    /// Video-clock time of the first frame (µs)
    #[arg(long, default_value = "0")]
    pub at: u64,

    /// Frame width (px)
    #[arg(long, default_value = "1920", env = "SENSORHUD_WIDTH")]
    pub width: u32,

    /// Frame height (px)
    #[arg(long, default_value = "1080", env = "SENSORHUD_HEIGHT")]
    pub height: u32,

    /// Output PNG for a single frame
    #[arg(short, long, default_value = "hud.png")]
    pub out: PathBuf,

    /// Number of frames; more than one writes a numbered sequence to `--out-dir`
    #[arg(long, default_value = "1")]
    pub frames: u64,

    /// Time between sequence frames (µs)
    #[arg(long, default_value = "33333")]
    pub step: u64,

    /// Directory for frame sequences
    #[arg(long, default_value = "frames")]
    pub out_dir: PathBuf,
}

/// Arguments for the `analyze` command
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Sample recording
    pub data: PathBuf,

    /// Field to analyse
    #[arg(long, value_enum, default_value = "accel")]
    pub field: FieldArg,

    /// Analysis method
    #[arg(long, value_enum, default_value = "ampd")]
    pub method: MethodArg,

    /// Look for troughs instead of peaks (ampd)
    #[arg(long)]
    pub troughs: bool,

    /// Moving window length (threshold)
    #[arg(long, default_value = "30")]
    pub lag: usize,

    /// Z-score needed to flag a sample (threshold)
    #[arg(long, default_value = "5.0")]
    pub threshold: f64,

    /// Weight of flagged samples in the moving window (threshold)
    #[arg(long, default_value = "0.0")]
    pub influence: f64,

    /// Momentum decay per unit time (momentum)
    #[arg(long, default_value = "0.1")]
    pub friction: f64,

    /// Momentum needed before the first landmark (momentum)
    #[arg(long, default_value = "0.0")]
    pub min_momentum: f64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `live` command
#[derive(Parser, Debug, Clone)]
pub struct LiveArgs {
    /// Configuration file (TOML or JSON)
    #[arg(short, long, default_value = "sensorhud.toml", env = "SENSORHUD_CONFIG")]
    pub config: PathBuf,

    /// Frame width (px)
    #[arg(long, default_value = "1920", env = "SENSORHUD_WIDTH")]
    pub width: u32,

    /// Frame height (px)
    #[arg(long, default_value = "1080", env = "SENSORHUD_HEIGHT")]
    pub height: u32,

    /// Write every rendered frame to this directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

/// Arguments for the `synth` command
#[derive(Parser, Debug, Clone)]
pub struct SynthArgs {
    /// Output recording
    pub out: PathBuf,

    /// Recording length (s)
    #[arg(long, default_value = "10.0")]
    pub seconds: f64,

    /// Sample rate (Hz)
    #[arg(long, default_value = "100.0")]
    pub rate: f64,

    /// Swing period (s)
    #[arg(long, default_value = "10.0")]
    pub period: f64,

    /// Peak swing angle (degrees)
    #[arg(long, default_value = "60.0")]
    pub amplitude: f64,
}

/// Sample field selector
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldArg {
    Accel,
    Gyro,
    Mag,
    Pressure,
    Temperature,
}

/// Analysis method selector
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodArg {
    /// Automatic multiscale peak detection
    Ampd,
    /// Least-squares line against time
    Lls,
    /// Smoothed z-score peaks
    Threshold,
    /// Momentum-based peak/trough tracking against time
    Momentum,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
