//! 连接与数据通道契约
//!
//! 上层（会话编排、命令序列）只通过这两个 trait 访问设备，不关心背后是真实
//! 的 WebRTC 驱动还是 [`crate::sim`] 中的模拟后端。
//!
//! 返回的 Future 要求 `Send`，以便在多线程运行时中使用。

use crate::error::DriverError;
use crate::target::DeviceTarget;
use go2_protocol::{Request, Response, Topic};
use std::future::Future;
use std::time::Duration;

/// 设备数据通道
pub trait DataChannel: Send + Sync {
    /// 等待数据通道打开
    ///
    /// 超过 `timeout` 时返回 [`DriverError::Timeout`]。
    fn wait_open(&self, timeout: Duration) -> impl Future<Output = Result<(), DriverError>> + Send;

    /// 发布请求并等待对应的响应
    ///
    /// 状态码不在这里检查，由调用方根据 [`Response::is_success`] 决定。
    fn publish_request(
        &self,
        topic: Topic,
        request: Request,
    ) -> impl Future<Output = Result<Response, DriverError>> + Send;
}

/// 设备连接
pub trait Connection: Send {
    /// 数据通道类型
    type Channel: DataChannel;

    /// 连接目标
    fn target(&self) -> &DeviceTarget;

    /// 建立会话
    ///
    /// 失败时返回连接层错误；调用方可以在同一个对象上重试。
    fn connect(&mut self) -> impl Future<Output = Result<(), DriverError>> + Send;

    /// 当前会话的数据通道
    fn datachannel(&self) -> &Self::Channel;

    /// 释放会话
    fn disconnect(&mut self) -> impl Future<Output = Result<(), DriverError>> + Send;
}
