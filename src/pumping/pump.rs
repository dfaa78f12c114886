//! 分区泵（PartitionPump）
//!
//! 把一个用户处理器绑定到一个持有租约的分区上，驱动其走完
//! open/run/close，并在投递、关停与致命错误上报这几个独立异步来源
//! 之间维持严格的顺序与互斥保证：
//! - 状态迁移全部经由原子比较交换，关停在并发重复触发下幂等；
//! - 投递与 close 共用一把并发门，二者绝不重叠；
//! - 处理器代码抛出的任何错误都不会越过泵的回调入口向外传播。
//!
use crate::context::PartitionContext;
use crate::error::{PumpError, PumpResult};
use crate::event::EventData;
use crate::host::{ExceptionSink, PumpAction, PumpOwner};
use crate::lease::{Lease, LeaseManager};
use crate::processor::{CloseReason, EventProcessor, ProcessorFactory};
use crate::pumping::status::{PumpStatus, StatusCell};
use crate::pumping::transport::PartitionTransport;
use bon::Builder;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 单分区的生命周期与并发协调器
///
/// 每个持有租约的分区构建一个实例；多个泵在多线程运行时上并发运行，
/// 各自由底层传输的回调驱动。
#[derive(Builder)]
pub struct PartitionPump {
    /// 分区上下文（与处理器按引用共享）
    context: Arc<PartitionContext>,
    /// 泵属主，致命错误时收到通知
    owner: Arc<dyn PumpOwner>,
    /// 处理器工厂，每次 open 尝试创建一个实例
    processor_factory: Arc<dyn ProcessorFactory>,
    /// 租约管理器，仅用于关停时释放
    lease_manager: Arc<dyn LeaseManager>,
    /// 传输接缝，订阅的实际启停
    transport: Arc<dyn PartitionTransport>,
    /// 异常通知汇
    exception_sink: Arc<dyn ExceptionSink>,
    #[builder(skip)]
    status: StatusCell,
    #[builder(skip)]
    processor: Mutex<Option<Arc<dyn EventProcessor>>>,
    /// 并发门：仅在调用 process_events 或 close 期间持有
    #[builder(skip)]
    gate: Mutex<()>,
}

impl PartitionPump {
    /// 启动泵：认领一次性的 Uninitialized -> Opening 迁移，
    /// 并在后台任务中驱动打开序列
    pub fn start(self: Arc<Self>) -> PumpResult<JoinHandle<()>> {
        if !self
            .status
            .transition(PumpStatus::Uninitialized, PumpStatus::Opening)
        {
            return Err(PumpError::AlreadyStarted {
                partition_id: self.context.partition_id().to_string(),
            });
        }
        Ok(tokio::spawn(async move { self.run_open().await }))
    }

    async fn run_open(self: Arc<Self>) {
        let opened = match self
            .processor_factory
            .create_processor(Arc::clone(&self.context))
            .await
        {
            Ok(processor) => match processor.open(&self.context).await {
                Ok(()) => Ok(processor),
                Err(err) => Err((PumpAction::OpeningProcessor, err)),
            },
            Err(err) => Err((PumpAction::CreatingProcessor, err)),
        };

        match opened {
            Ok(processor) => {
                *self.processor.lock().await = Some(processor);
            }
            Err((action, err)) => {
                // 创建或打开失败时不保留处理器引用，之后不再对其做任何操作
                self.status
                    .transition(PumpStatus::Opening, PumpStatus::OpenFailed);
                warn!(
                    host = %self.context.host_name(),
                    partition = %self.context.partition_id(),
                    %action,
                    error = %err,
                    "failed to create or open processor"
                );
                self.exception_sink
                    .notify(
                        self.context.host_name(),
                        &err,
                        action,
                        self.context.partition_id(),
                    )
                    .await;
            }
        }

        if self.status.load() == PumpStatus::Opening {
            // 真正的网络订阅只发生在这里
            match self.transport.start_receiving(Arc::clone(&self)).await {
                Ok(()) => {
                    self.status
                        .transition(PumpStatus::Opening, PumpStatus::Running);
                }
                Err(err) => {
                    warn!(
                        host = %self.context.host_name(),
                        partition = %self.context.partition_id(),
                        error = %err,
                        "transport failed to start receiving"
                    );
                    self.exception_sink
                        .notify(
                            self.context.host_name(),
                            &err,
                            PumpAction::StartingTransport,
                            self.context.partition_id(),
                        )
                        .await;
                }
            }
        }

        if self.status.load() != PumpStatus::Running {
            // 启动未达 Running 的清理关停：订阅从未建立，不停传输、不释放租约
            if self.status.begin_close() {
                self.close_processor(CloseReason::Shutdown).await;
                self.status
                    .transition(PumpStatus::Closing, PumpStatus::Closed);
            }
        }
    }

    /// 投递回调：传输层对同一泵的调用严格串行且不重叠，
    /// 不早于 open 完成，也不晚于关停开始
    pub async fn on_events(&self, events: &[EventData]) {
        // 先推进上下文位点，支持处理器在回调内直接按当前位置打检查点
        if let Some(last) = events.last() {
            self.context.set_position(last);
        }

        let _gate = self.gate.lock().await;
        let processor = self.processor.lock().await.clone();
        let Some(processor) = processor else {
            return;
        };
        if let Err(err) = processor.process_events(&self.context, events).await {
            // 投递失败只记录，不外传也不回送处理器的 on_error，避免反馈环
            warn!(
                host = %self.context.host_name(),
                partition = %self.context.partition_id(),
                error = %err,
                "processor raised from process_events"
            );
        }
    }

    /// 传输层致命错误回调：仅上报，不迁移状态也不触发关停；
    /// 拆除由属主负责（通常经由 `shutdown`）
    pub async fn on_transport_error(&self, error: anyhow::Error) {
        // 传输层保证此刻没有投递在途，本回调返回前也不会有新的投递
        let processor = self.processor.lock().await.clone();
        if let Some(processor) = processor {
            processor.on_error(&self.context, &error).await;
        }
        // 通知属主此泵已失效以便移除并触发恢复；漏报会泄漏挂在泵上的传输线程
        self.owner
            .on_pump_error(self.context.partition_id())
            .await;
    }

    /// 关停泵：可被多个独立触发源并发重复调用
    ///
    /// 例如租约被抢时，接收端断开导致的失败处理与租约扫描可能
    /// 几乎同时各自发起关停；仅有一个调用方会执行完整序列。
    pub async fn shutdown(&self, reason: CloseReason) {
        if !self.status.begin_close() {
            return;
        }
        info!(
            host = %self.context.host_name(),
            partition = %self.context.partition_id(),
            %reason,
            "pump shutdown"
        );

        self.transport.stop_receiving(reason).await;

        self.close_processor(reason).await;

        if reason != CloseReason::LeaseLost {
            // 泵已停，释放租约；租约丢失时租约已不在手中，释放无意义
            let _ = self
                .lease_manager
                .release_lease(&self.context.lease())
                .await;
        }

        self.status
            .transition(PumpStatus::Closing, PumpStatus::Closed);
    }

    async fn close_processor(&self, reason: CloseReason) {
        // 拿到门即表明在途的投递调用已经完成；传输已停，
        // 之后不会再有新的投递，因此可以安全调用 close
        let _gate = self.gate.lock().await;
        let processor = self.processor.lock().await.take();
        if let Some(processor) = processor {
            if let Err(err) = processor.close(&self.context, reason).await {
                // close 失败后处理器状态已不可信，按泵基础设施问题上报通用通知汇
                warn!(
                    host = %self.context.host_name(),
                    partition = %self.context.partition_id(),
                    error = %err,
                    "processor failed to close"
                );
                self.exception_sink
                    .notify(
                        self.context.host_name(),
                        &err,
                        PumpAction::ClosingProcessor,
                        self.context.partition_id(),
                    )
                    .await;
            }
        }
    }

    pub fn status(&self) -> PumpStatus {
        self.status.load()
    }

    /// 是否已进入关停（Closing 或 Closed）
    pub fn is_closing(&self) -> bool {
        self.status.load().is_closing()
    }

    pub fn context(&self) -> &Arc<PartitionContext> {
        &self.context
    }

    /// 更新上下文中的租约引用
    pub fn set_lease(&self, lease: Lease) {
        self.context.set_lease(lease);
    }
}
