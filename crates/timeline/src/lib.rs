//! # Timeline
//!
//! 时间有序样本存储上的查询与降采样。
//!
//! 负责：
//! - 按时间戳查找样本索引 (带扫描起点提示)
//! - 固定时长分桶降采样，供曲线绘制使用
//!
//! ## 使用示例
//!
//! ```ignore
//! use timeline::{downscale, find_index_for_time};
//!
//! let mut hint = 0;
//! for us in frame_times {
//!     hint = find_index_for_time(&samples, hint, us)?;
//! }
//!
//! let series = downscale(&samples, 1_000_000 / 30)?;
//! ```

mod downsample;
mod index;

// Re-exports
pub use downsample::{downscale, Bucket};
pub use index::find_index_for_time;

// Re-export contracts types
pub use contracts::{Sample, Timestamped};
