//! 驱动层错误类型定义

use go2_protocol::ProtocolError;
use std::time::Duration;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 连接失败（握手、认证、网络不可达等）
    #[error("Connection error: {0}")]
    Connection(String),

    /// 尚未建立连接
    #[error("Not connected")]
    NotConnected,

    /// 数据通道已关闭
    #[error("Data channel closed")]
    ChannelClosed,

    /// 操作超时
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// 设备目标参数无效
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// 协议错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl DriverError {
    /// 是否属于连接层错误
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            DriverError::Connection(_) | DriverError::NotConnected | DriverError::ChannelClosed
        )
    }
}
