//! 事件处理器（EventProcessor）协议
//!
//! 定义用户侧处理逻辑的能力集：open/process/close/error，
//! 以及按 open 尝试创建实例的工厂协议与关停原因枚举。
//!
use crate::context::PartitionContext;
use crate::event::EventData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// 关停原因：显式关停或租约丢失
///
/// 泵内部只在"是否释放租约"这一个分支上区分取值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseReason {
    Shutdown,
    LeaseLost,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::Shutdown => f.write_str("shutdown"),
            CloseReason::LeaseLost => f.write_str("lease lost"),
        }
    }
}

/// 事件处理器：消费单个分区事件的用户侧逻辑
///
/// 回调可以阻塞任意长时间，泵不对其施加超时；限制处理时长属于外部策略。
#[async_trait]
pub trait EventProcessor: Send + Sync {
    /// 处理器就绪回调，严格先于任何 process/close 调用完成
    async fn open(&self, ctx: &PartitionContext) -> anyhow::Result<()>;

    /// 处理一个投递批次（批内顺序即投递顺序，批次可能为空）
    async fn process_events(
        &self,
        ctx: &PartitionContext,
        events: &[EventData],
    ) -> anyhow::Result<()>;

    /// 处理器收尾回调，绝不与 process_events 并发执行
    async fn close(&self, ctx: &PartitionContext, reason: CloseReason) -> anyhow::Result<()>;

    /// 传输层致命错误通知；此回调自身的失败不由泵托管
    async fn on_error(&self, ctx: &PartitionContext, error: &anyhow::Error);
}

/// 处理器工厂：每次 open 尝试创建一个处理器实例，一个泵同时至多一个存活实例
#[async_trait]
pub trait ProcessorFactory: Send + Sync {
    async fn create_processor(
        &self,
        ctx: Arc<PartitionContext>,
    ) -> anyhow::Result<Arc<dyn EventProcessor>>;
}
