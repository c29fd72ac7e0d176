//! # Observability
//!
//! 可观测性模块：日志订阅器 + 可选的 Prometheus 导出。
//!
//! 日志统一写到 stderr，stdout 留给命令输出（JSON 报告、摘要）。
//!
//! ## 使用示例
//!
//! ```ignore
//! use observability::{ObservabilityConfig, Verbosity};
//!
//! observability::init_with_config(ObservabilityConfig {
//!     verbosity: Verbosity::from_flags(false, 1),
//!     ..Default::default()
//! })?;
//! ```

pub mod metrics;

use std::io;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use crate::metrics::{
    record_frame_output, record_render_latency_ms, record_sample_interval_us,
    record_samples_loaded, FrameOutcome, RunningStats, SessionAggregator, SessionSummary,
    StatsSummary,
};

/// 可观测性配置
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    pub log_format: LogFormat,
    /// Prometheus 端口 (None = 禁用)
    pub metrics_port: Option<u16>,
    pub verbosity: Verbosity,
}

/// 日志格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON 结构化日志
    Json,
    /// 人类可读格式
    #[default]
    Pretty,
    /// 紧凑单行格式
    Compact,
}

/// `-q` / `-v` 计数对应的日志级别
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// 默认过滤规则；设置了 `RUST_LOG` 时以环境变量为准
    pub fn directive(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "info",
            // 第三方 crate 保持 info，避免 png 编码等噪音
            Self::Debug => "info,sensorhud=debug,ingestion=debug,timeline=debug,analysis=debug,hud=debug",
            Self::Trace => "trace",
        }
    }
}

/// 初始化日志订阅器，按需启动 Prometheus 导出
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.directive()));

    let base = fmt::layer().with_writer(io::stderr);
    let layer = match config.log_format {
        LogFormat::Json => base.json().with_file(true).with_line_number(true).boxed(),
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Compact => base.compact().without_time().boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    if let Some(port) = config.metrics_port {
        PrometheusBuilder::new()
            .with_http_listener(([0, 0, 0, 0], port))
            .install()
            .with_context(|| format!("Failed to serve metrics on port {port}"))?;
        tracing::info!(port, "Prometheus metrics endpoint initialized");
    }

    tracing::debug!(
        log_format = ?config.log_format,
        verbosity = ?config.verbosity,
        "Observability initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.metrics_port, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.verbosity.directive(), "info");
    }

    #[test]
    fn test_verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, 0), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, 5), Verbosity::Trace);
        assert!(Verbosity::Debug.directive().contains("hud=debug"));
        assert!(EnvFilter::try_new(Verbosity::Debug.directive()).is_ok());
    }
}
