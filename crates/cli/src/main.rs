//! # Sensor HUD CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - 录制数据的 HUD 渲染与信号分析
//! - stdin 实时样本渲染

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_analyze, run_info, run_live, run_render, run_synth, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli)?;

    info!(version = env!("CARGO_PKG_VERSION"), "sensorhud starting");

    let result = match &cli.command {
        Commands::Info(args) => run_info(args),
        Commands::Validate(args) => run_validate(args),
        Commands::Render(args) => run_render(args),
        Commands::Analyze(args) => run_analyze(args),
        Commands::Live(args) => run_live(args).await,
        Commands::Synth(args) => run_synth(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Initialize logging and metrics based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    observability::init_with_config(observability::ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: (cli.metrics_port != 0).then_some(cli.metrics_port),
        verbosity: observability::Verbosity::from_flags(cli.quiet, cli.verbose),
    })
}
