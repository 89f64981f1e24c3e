//! # Go2 Driver
//!
//! 连接与数据通道的抽象层。
//!
//! 真实设备上的握手、信令交换、数据通道分帧以及请求/响应关联都由外部驱动
//! 完成，本 crate 只定义上层依赖的契约：
//!
//! - [`Connection`]：可重试的 `connect()`，以及对应的数据通道
//! - [`DataChannel`]：`wait_open(timeout)` 与 `publish_request(topic, request)`
//! - [`DeviceTarget`]：连接方式 + 设备身份（IP / 序列号 / 账号）
//!
//! [`sim`] 模块提供一个进程内模拟的机器人后端，用于开发和测试。

pub mod channel;
pub mod error;
pub mod sim;
pub mod target;

// 重新导出常用类型
pub use channel::{Connection, DataChannel};
pub use error::DriverError;
pub use sim::{SimChannel, SimConnection, SimulatedGo2, SimulatedGo2Builder};
pub use target::{ConnectionMethod, Credentials, DeviceTarget};

// 重新导出协议层
pub use go2_protocol as protocol;
