//! 宿主侧配置与协议
//!
//! 定义宿主配置（HostConfig）、失败动作标识（PumpAction）、
//! 异常通知汇（ExceptionSink）与泵属主（PumpOwner）协议。
//! 泵在回调上下文中执行，没有同步调用方可以上报，所有被捕获的
//! 基础设施失败统一经 `ExceptionSink` 通知宿主。
//!
use anyhow::Error;
use async_trait::async_trait;
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct HostConfig {
    /// 宿主实例名（用于日志与异常通知）
    host_name: String,
    /// 事件流路径
    stream_path: String,
    /// 消费组名
    consumer_group: String,
}

impl HostConfig {
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn stream_path(&self) -> &str {
        &self.stream_path
    }

    pub fn consumer_group(&self) -> &str {
        &self.consumer_group
    }
}

/// 失败动作标识：标记异常通知对应的泵侧动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpAction {
    CreatingProcessor,
    OpeningProcessor,
    ClosingProcessor,
    StartingTransport,
}

impl PumpAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PumpAction::CreatingProcessor => "creating processor",
            PumpAction::OpeningProcessor => "opening processor",
            PumpAction::ClosingProcessor => "closing processor",
            PumpAction::StartingTransport => "starting transport",
        }
    }
}

impl fmt::Display for PumpAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 异常通知汇：接收泵捕获到的基础设施失败（fire-and-forget）
#[async_trait]
pub trait ExceptionSink: Send + Sync {
    async fn notify(&self, host_name: &str, error: &Error, action: PumpAction, partition_id: &str);
}

/// 泵属主：多分区编排方在泵致命失败时收到通知，负责移除泵并触发再均衡
///
/// 未送达该通知意味着挂在泵上的传输线程永远不会被回收。
#[async_trait]
pub trait PumpOwner: Send + Sync {
    async fn on_pump_error(&self, partition_id: &str);
}
