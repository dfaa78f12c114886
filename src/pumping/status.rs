//! 泵状态机（PumpStatus）
//!
//! 生命周期状态以原子枚举建模，状态迁移通过显式比较交换完成并返回
//! 是否成功；并发重复触发下的所有幂等保证均由该原语推导。
//!
//! 不变式：到达 Closing 后唯一的后继是 Closed；OpenFailed 仅能由
//! Opening 进入，并经清理路径同样终于 Closed；Closed 之后没有状态。
//!
use std::sync::atomic::{AtomicU8, Ordering};

/// 泵生命周期状态
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpStatus {
    Uninitialized = 0,
    Opening = 1,
    OpenFailed = 2,
    Running = 3,
    Closing = 4,
    Closed = 5,
}

impl PumpStatus {
    /// 是否已进入关停（Closing 或 Closed）
    pub fn is_closing(self) -> bool {
        matches!(self, PumpStatus::Closing | PumpStatus::Closed)
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => PumpStatus::Uninitialized,
            1 => PumpStatus::Opening,
            2 => PumpStatus::OpenFailed,
            3 => PumpStatus::Running,
            4 => PumpStatus::Closing,
            _ => PumpStatus::Closed,
        }
    }
}

/// 状态单元：对状态字段的窄临界区原子访问
///
/// 与投递/关停串行化所用的并发门互相独立。
#[derive(Default)]
pub(crate) struct StatusCell(AtomicU8);

impl StatusCell {
    pub(crate) fn load(&self) -> PumpStatus {
        PumpStatus::from_u8(self.0.load(Ordering::SeqCst))
    }

    /// 尝试 from -> to 迁移，返回是否成功
    pub(crate) fn transition(&self, from: PumpStatus, to: PumpStatus) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// 认领唯一一次进入 Closing 的权利
    ///
    /// 已处于 Closing/Closed 时返回 false；任意并发调用中恰有一个成功。
    pub(crate) fn begin_close(&self) -> bool {
        let mut current = self.load();
        loop {
            if current.is_closing() {
                return false;
            }
            match self.0.compare_exchange(
                current as u8,
                PumpStatus::Closing as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(observed) => current = PumpStatus::from_u8(observed),
            }
        }
    }
}
