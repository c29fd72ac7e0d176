//! Ingestion 错误类型

use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 读取失败 (EINTR 与 EAGAIN 之外)
    #[error("stream read failed: {0}")]
    Io(#[from] std::io::Error),

    /// 帧字段越界
    #[error("malformed frame at byte {offset}: {message}")]
    Decode {
        /// 帧内偏移
        offset: usize,
        /// 错误消息
        message: String,
    },

    /// 流在帧中间结束
    #[error("stream ended inside a frame ({buffered} of {expected} bytes buffered)")]
    TruncatedFrame {
        /// 已缓冲字节数
        buffered: usize,
        /// 帧长度
        expected: usize,
    },

    /// 时间戳回退
    #[error("sample {index} jumped back in time: {time}us < {previous}us")]
    TimeWentBackwards {
        /// 样本序号
        index: usize,
        /// 上一个时间戳
        previous: u64,
        /// 当前时间戳
        time: u64,
    },

    /// 样本数组扩容失败
    #[error("failed to grow sample array to {requested} elements")]
    AllocationFailure {
        /// 请求的容量
        requested: usize,
    },
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
