//! 泵层统一错误定义
//!
//! 聚焦启动与租约释放等基础设施侧的最小必要集合；
//! 处理器与传输实现侧统一使用 `anyhow` 在回调边界上报。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PumpError {
    #[error("pump already started: partition={partition_id}")]
    AlreadyStarted { partition_id: String },
    #[error("lease error: {reason}")]
    Lease { reason: String },
}

/// 统一 Result 类型别名
pub type PumpResult<T> = Result<T, PumpError>;
