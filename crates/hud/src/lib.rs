//! # HUD
//!
//! 抬头显示渲染模块。
//!
//! 负责：
//! - 根据播放时间戳或实时推送的样本确定当前样本
//! - 按 HUD 模式选择并驱动渲染策略（NORMAL / BOOSTER / SWINGBOAT）
//! - 提供 tiny-skia 光栅画布、录制画布与 PNG 帧输出

mod booster;
pub mod canvas;
mod context;
mod error;
mod frames;
mod metrics;
mod strategy;
pub mod swingboat;

pub use booster::BoosterHud;
pub use canvas::{DrawOp, RecordingCanvas, SkiaCanvas};
pub use context::RenderContext;
pub use error::{HudError, Stage};
pub use frames::FrameWriter;
pub use metrics::{MetricsSnapshot, RenderMetrics};
pub use strategy::{DataSource, HudStrategy, RenderState, StrategyFactory, StrategyRegistry};
pub use swingboat::{tilt_angle, SwingboatHud};
