//! 分区事件泵基础库（partition-pump）
//!
//! 提供以"每分区一个泵"为中心的生命周期与并发协调构件，用于在应用中实现：
//! - 事件记录（`event`）与处理上下文（`context`）建模
//! - 处理器协议（`processor`）：open/process/close/error 能力集
//! - 租约（`lease`）引用与释放协议
//! - 宿主配置、异常通知与泵属主协议（`host`）
//! - 泵运行时（`pumping`）：状态机、传输接缝与泵本体
//!
//! 本 crate 尽量与传输和存储实现解耦，仅定义协调逻辑与最小必要的错误类型，
//! 以便对接任意消息系统（例如 AMQP 类客户端）与租约存储实现。
//!
//! 典型用法：
//! 1. 实现 `EventProcessor` 与 `ProcessorFactory`，提供业务处理逻辑；
//! 2. 实现 `PartitionTransport`，把底层客户端的订阅启停接到泵上；
//! 3. 为每个持有租约的分区构建一个 `PartitionPump` 并 `start`；
//! 4. 通过 `shutdown` 在租约丢失或宿主停止时幂等地关停泵。
//!
pub mod context;
pub mod error;
pub mod event;
pub mod host;
pub mod lease;
pub mod processor;
pub mod pumping;
