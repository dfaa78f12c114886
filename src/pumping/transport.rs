//! 传输接缝（PartitionTransport）
//!
//! 按传输实现注入的能力对象，而非通过继承扩展；状态机因此保持
//! 与具体传输（AMQP 类客户端等）无关。真正的网络订阅只发生在
//! `start_receiving` 内部。
//!
use crate::processor::CloseReason;
use crate::pumping::pump::PartitionPump;
use async_trait::async_trait;
use std::sync::Arc;

/// 单分区传输：订阅的启动与停止
#[async_trait]
pub trait PartitionTransport: Send + Sync {
    /// 启动订阅；成功后传输层经由 `pump` 回调投递批次与致命错误
    ///
    /// 失败时泵保持非 Running，随后走清理关停路径。
    async fn start_receiving(&self, pump: Arc<PartitionPump>) -> anyhow::Result<()>;

    /// 停止订阅；不得失败，每次关停至多调用一次
    ///
    /// 内部错误由传输实现自行消化。
    async fn stop_receiving(&self, reason: CloseReason);
}
