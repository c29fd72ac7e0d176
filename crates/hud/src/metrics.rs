//! Render metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::Stage;

/// Counters for one render context
#[derive(Debug, Default)]
pub struct RenderMetrics {
    /// Frames with both stages drawn
    frames_rendered: AtomicU64,
    /// Frames cleared without a current sample
    frames_empty: AtomicU64,
    /// Stage failures
    failure_count: AtomicU64,
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered.load(Ordering::Relaxed)
    }

    pub fn inc_frames_rendered(&self) {
        self.frames_rendered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn frames_empty(&self) -> u64 {
        self.frames_empty.load(Ordering::Relaxed)
    }

    pub fn inc_frames_empty(&self) {
        self.frames_empty.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Count a failed stage, locally and in the global recorder
    pub fn record_failure(&self, stage: Stage) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("sensorhud_render_failures_total", "stage" => stage.as_str())
            .increment(1);
    }

    pub fn record_stage_time(&self, stage: Stage, elapsed: Duration) {
        metrics::histogram!("sensorhud_render_stage_seconds", "stage" => stage.as_str())
            .record(elapsed.as_secs_f64());
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_rendered: self.frames_rendered(),
            frames_empty: self.frames_empty(),
            failure_count: self.failure_count(),
        }
    }
}

/// Snapshot of render metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub frames_rendered: u64,
    pub frames_empty: u64,
    pub failure_count: u64,
}
