//! 租约（Lease）与租约管理协议
//!
//! 租约是对单个分区独占处理权的所有权令牌，由外部租约存储持有与续期；
//! 泵仅通过上下文引用它，并在非"租约丢失"的关停路径上请求释放。
//!
use crate::error::PumpResult;
use async_trait::async_trait;
use bon::Builder;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct Lease {
    /// 租约对应的分区标识
    partition_id: String,
    /// 当前持有者（宿主名）
    owner: String,
    /// 租约世代，用于在接管时隔离旧持有者
    epoch: i64,
}

impl Lease {
    pub fn partition_id(&self) -> &str {
        &self.partition_id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn epoch(&self) -> i64 {
        self.epoch
    }
}

/// 租约管理器：租约的获取/续期/存储均在实现侧，泵只使用释放能力
#[async_trait]
pub trait LeaseManager: Send + Sync {
    /// 释放租约（尽力而为；失败由实现侧记录，泵不重试）
    async fn release_lease(&self, lease: &Lease) -> PumpResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // 测试租约构建与取值方法
    #[test]
    fn test_lease_builder() {
        let lease = Lease::builder()
            .partition_id("3".to_string())
            .owner("host-a".to_string())
            .epoch(2)
            .build();

        assert_eq!(lease.partition_id(), "3");
        assert_eq!(lease.owner(), "host-a");
        assert_eq!(lease.epoch(), 2);
    }
}
