//! 处理上下文（PartitionContext）
//!
//! 每个分区一份的可变记录，在一次 open 尝试的生命周期内以引用方式
//! 在泵与处理器之间共享：分区标识、流路径、消费组、当前租约引用，
//! 以及最近一次投递的位点/序列号。位点字段仅由泵在每个非空投递批次
//! 上单调向前推进；租约引用可被外部调用随时替换（由调用方自行同步）。
//!
use crate::event::EventData;
use crate::host::HostConfig;
use crate::lease::Lease;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError, RwLock};

/// 最近一次投递的流内位置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    offset: String,
    sequence_number: i64,
}

impl Position {
    pub fn offset(&self) -> &str {
        &self.offset
    }

    pub fn sequence_number(&self) -> i64 {
        self.sequence_number
    }
}

/// 检查点：由上下文跟踪的位点/序列号导出的进度标记
///
/// 仅定义数据形态，持久化机制由外部检查点存储实现。
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct Checkpoint {
    partition_id: String,
    offset: String,
    sequence_number: i64,
}

impl Checkpoint {
    pub fn partition_id(&self) -> &str {
        &self.partition_id
    }

    pub fn offset(&self) -> &str {
        &self.offset
    }

    pub fn sequence_number(&self) -> i64 {
        self.sequence_number
    }
}

pub struct PartitionContext {
    host_name: String,
    stream_path: String,
    consumer_group: String,
    partition_id: String,
    lease: RwLock<Lease>,
    position: Mutex<Option<Position>>,
}

impl PartitionContext {
    /// 由宿主配置与租约构建上下文，分区标识取自租约
    pub fn new(config: &HostConfig, lease: Lease) -> Self {
        Self {
            host_name: config.host_name().to_string(),
            stream_path: config.stream_path().to_string(),
            consumer_group: config.consumer_group().to_string(),
            partition_id: lease.partition_id().to_string(),
            lease: RwLock::new(lease),
            position: Mutex::new(None),
        }
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn stream_path(&self) -> &str {
        &self.stream_path
    }

    pub fn consumer_group(&self) -> &str {
        &self.consumer_group
    }

    pub fn partition_id(&self) -> &str {
        &self.partition_id
    }

    /// 当前租约引用（克隆快照）
    pub fn lease(&self) -> Lease {
        self.lease
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 替换租约引用（例如续期或接管后更新；由调用方保证同步）
    pub fn set_lease(&self, lease: Lease) {
        *self.lease.write().unwrap_or_else(PoisonError::into_inner) = lease;
    }

    /// 最近一次投递的位置；尚未投递任何事件时为 None
    pub fn position(&self) -> Option<Position> {
        self.position
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 由当前位置导出检查点；尚未投递任何事件时为 None
    pub fn current_checkpoint(&self) -> Option<Checkpoint> {
        self.position().map(|p| {
            Checkpoint::builder()
                .partition_id(self.partition_id.clone())
                .offset(p.offset)
                .sequence_number(p.sequence_number)
                .build()
        })
    }

    /// 将位点/序列号推进到给定事件（仅由泵在投递路径上调用）
    pub(crate) fn set_position(&self, event: &EventData) {
        let mut guard = self
            .position
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Position {
            offset: event.offset().to_string(),
            sequence_number: event.sequence_number(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn mk_config() -> HostConfig {
        HostConfig::builder()
            .host_name("host-a".to_string())
            .stream_path("orders".to_string())
            .consumer_group("$default".to_string())
            .build()
    }

    fn mk_lease(partition_id: &str) -> Lease {
        Lease::builder()
            .partition_id(partition_id.to_string())
            .owner("host-a".to_string())
            .epoch(1)
            .build()
    }

    fn mk_event(offset: &str, sequence_number: i64) -> EventData {
        EventData::builder()
            .offset(offset.to_string())
            .sequence_number(sequence_number)
            .enqueued_at(Utc::now())
            .body(Vec::new())
            .build()
    }

    // 测试上下文由配置与租约构建
    #[test]
    fn test_context_new() {
        let ctx = PartitionContext::new(&mk_config(), mk_lease("3"));

        assert_eq!(ctx.host_name(), "host-a");
        assert_eq!(ctx.stream_path(), "orders");
        assert_eq!(ctx.consumer_group(), "$default");
        assert_eq!(ctx.partition_id(), "3");
        assert!(ctx.position().is_none());
        assert!(ctx.current_checkpoint().is_none());
    }

    // 测试位置推进与检查点导出
    #[test]
    fn test_context_position_advances() {
        let ctx = PartitionContext::new(&mk_config(), mk_lease("3"));

        ctx.set_position(&mk_event("100", 7));
        let pos = ctx.position().expect("position should be set");
        assert_eq!(pos.offset(), "100");
        assert_eq!(pos.sequence_number(), 7);

        ctx.set_position(&mk_event("250", 19));
        let checkpoint = ctx.current_checkpoint().expect("checkpoint should exist");
        assert_eq!(checkpoint.partition_id(), "3");
        assert_eq!(checkpoint.offset(), "250");
        assert_eq!(checkpoint.sequence_number(), 19);
    }

    // 测试租约引用替换
    #[test]
    fn test_context_set_lease() {
        let ctx = PartitionContext::new(&mk_config(), mk_lease("3"));
        assert_eq!(ctx.lease().epoch(), 1);

        let renewed = Lease::builder()
            .partition_id("3".to_string())
            .owner("host-b".to_string())
            .epoch(2)
            .build();
        ctx.set_lease(renewed);

        assert_eq!(ctx.lease().owner(), "host-b");
        assert_eq!(ctx.lease().epoch(), 2);
    }
}
