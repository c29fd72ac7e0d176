//! 回放会话指标模块
//!
//! 记录样本加载、渲染耗时与数据节奏，并在会话结束时输出统计摘要。

use contracts::Sample;
use metrics::{counter, gauge, histogram};

/// 记录一次批量加载的结果
pub fn record_samples_loaded(count: usize, duration_us: u64) {
    gauge!("sensorhud_samples_loaded").set(count as f64);
    gauge!("sensorhud_recording_duration_seconds").set(duration_us as f64 / 1e6);
}

/// 记录单帧渲染耗时
pub fn record_render_latency_ms(latency_ms: f64) {
    histogram!("sensorhud_render_latency_ms").record(latency_ms);
}

/// 记录帧输出结果
pub fn record_frame_output(success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!("sensorhud_frames_output_total", "status" => status).increment(1);
}

/// 记录相邻样本的时间间隔
pub fn record_sample_interval_us(interval_us: u64) {
    histogram!("sensorhud_sample_interval_us").record(interval_us as f64);
}

/// 单帧渲染结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// 两个阶段都已绘制
    Rendered,
    /// 没有当前样本，只清屏
    Empty,
    /// 某个阶段失败
    Failed,
}

/// 会话指标聚合器
///
/// 用于 `render`/`live` 命令结束时打印摘要。
#[derive(Debug, Default)]
pub struct SessionAggregator {
    /// 帧总数
    pub total_frames: u64,
    /// 空帧数
    pub empty_frames: u64,
    /// 失败帧数
    pub failed_frames: u64,
    /// 样本总数
    pub total_samples: u64,
    /// 时间倒退的样本数
    pub backward_samples: u64,
    /// 渲染耗时统计 (ms)
    render_stats: RunningStats,
    /// 样本间隔统计 (us)
    interval_stats: RunningStats,
    /// 加速度幅值统计 (G)
    accel_stats: RunningStats,
    last_time: Option<u64>,
}

impl SessionAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一帧
    pub fn update_frame(&mut self, outcome: FrameOutcome, latency_ms: f64) {
        self.total_frames += 1;
        match outcome {
            FrameOutcome::Rendered => {}
            FrameOutcome::Empty => self.empty_frames += 1,
            FrameOutcome::Failed => self.failed_frames += 1,
        }
        self.render_stats.push(latency_ms);
        record_render_latency_ms(latency_ms);
        record_frame_output(outcome != FrameOutcome::Failed);
    }

    /// 记录一个样本
    pub fn update_sample(&mut self, sample: &Sample) {
        self.total_samples += 1;
        self.accel_stats.push(sample.accel_magnitude());

        if let Some(last) = self.last_time {
            match sample.time.checked_sub(last) {
                Some(interval) => {
                    self.interval_stats.push(interval as f64);
                    record_sample_interval_us(interval);
                }
                None => self.backward_samples += 1,
            }
        }
        self.last_time = Some(sample.time);
    }

    /// 获取统计摘要
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total_frames: self.total_frames,
            empty_frames: self.empty_frames,
            failed_frames: self.failed_frames,
            total_samples: self.total_samples,
            backward_samples: self.backward_samples,
            failure_rate: if self.total_frames > 0 {
                self.failed_frames as f64 / self.total_frames as f64 * 100.0
            } else {
                0.0
            },
            render_ms: StatsSummary::from(&self.render_stats),
            interval_us: StatsSummary::from(&self.interval_stats),
            accel_g: StatsSummary::from(&self.accel_stats),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 会话摘要
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    pub total_frames: u64,
    pub empty_frames: u64,
    pub failed_frames: u64,
    pub total_samples: u64,
    pub backward_samples: u64,
    pub failure_rate: f64,
    pub render_ms: StatsSummary,
    pub interval_us: StatsSummary,
    pub accel_g: StatsSummary,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Session Summary ===")?;
        writeln!(f, "Samples: {}", self.total_samples)?;
        if self.backward_samples > 0 {
            writeln!(f, "Samples going backwards: {}", self.backward_samples)?;
        }
        writeln!(f, "Sample interval (us): {}", self.interval_us)?;
        writeln!(f, "Acceleration (G): {}", self.accel_g)?;
        writeln!(f, "Frames: {} ({} empty)", self.total_frames, self.empty_frames)?;
        writeln!(
            f,
            "Failed frames: {} ({:.2}%)",
            self.failed_frames, self.failure_rate
        )?;
        writeln!(f, "Render time (ms): {}", self.render_ms)?;
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_frames() {
        let mut aggregator = SessionAggregator::new();
        aggregator.update_frame(FrameOutcome::Rendered, 2.0);
        aggregator.update_frame(FrameOutcome::Empty, 1.0);
        aggregator.update_frame(FrameOutcome::Failed, 3.0);
        aggregator.update_frame(FrameOutcome::Rendered, 2.0);

        let summary = aggregator.summary();
        assert_eq!(summary.total_frames, 4);
        assert_eq!(summary.empty_frames, 1);
        assert_eq!(summary.failed_frames, 1);
        assert!((summary.failure_rate - 25.0).abs() < 1e-10);
        assert!((summary.render_ms.mean - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_samples() {
        let mut aggregator = SessionAggregator::new();
        for time in [0, 10_000, 20_000, 15_000, 30_000] {
            aggregator.update_sample(&Sample {
                time,
                accel: [0.0, 0.0, 1.0],
                ..Default::default()
            });
        }

        let summary = aggregator.summary();
        assert_eq!(summary.total_samples, 5);
        assert_eq!(summary.backward_samples, 1);
        assert_eq!(summary.interval_us.count, 3);
        assert!((summary.accel_g.mean - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = SessionAggregator::new();
        aggregator.update_frame(FrameOutcome::Rendered, 1.5);

        let output = format!("{}", aggregator.summary());
        assert!(output.contains("Frames: 1"));
        assert!(output.contains("Acceleration (G): N/A"));
    }
}
