//! 泵运行时（pumping）
//!
//! 提供单分区泵的生命周期与并发协调实现：
//! - `PumpStatus`/状态单元：以原子比较交换为基础的状态机，
//!   所有幂等保证均由其推导；
//! - `PartitionTransport`：传输启停接缝，按传输实现注入；
//! - `PartitionPump`：泵本体，驱动处理器走完 open/run/close，
//!   并保证投递、关停与错误上报之间的安全交织。
//!
pub mod pump;
pub mod status;
pub mod transport;

pub use pump::PartitionPump;
pub use status::PumpStatus;
pub use transport::PartitionTransport;
