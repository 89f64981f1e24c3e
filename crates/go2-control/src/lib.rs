//! # Go2 Control
//!
//! 会话编排层：在 [`go2_driver`] 的连接契约之上，把一次完整的运动模式会话拆成
//! 几个独立的部分：
//!
//! - [`shutdown`]：显式传递的取消令牌 + 信号转发任务
//! - [`bootstrap`]：固定次数、固定间隔的连接重试
//! - [`step`] / [`runner`]：声明式步骤序列及其解释器
//! - [`demo`]：预置的 sport-mode 演示序列
//! - [`session`]：连接 → 等待通道 → 执行序列 → 清理，错误按类型上报
//!
//! 所有步骤在同一个任务内顺序执行；取消是协作式的，在步骤边界和每次暂停时检查。

pub mod bootstrap;
pub mod demo;
pub mod error;
pub mod runner;
pub mod session;
pub mod shutdown;
pub mod step;

// 重新导出常用类型
pub use bootstrap::{RetryPolicy, connect_with_retry};
pub use demo::{DEFAULT_IDLE_SECONDS, sportmode_demo};
pub use error::{ControlError, ErrorKind};
pub use runner::{RunReport, SequenceRunner};
pub use session::{SessionOptions, run_session};
pub use shutdown::{ShutdownToken, Wait, spawn_signal_listener};
pub use step::{Script, Step};
