//! 会话层错误类型定义

use go2_driver::DriverError;
use go2_protocol::ProtocolError;
use std::fmt;
use thiserror::Error;

/// 错误类别
///
/// 调用方（通常是 CLI）据此决定进程退出码。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    Connection,
    Protocol,
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Connection => "connection",
            ErrorKind::Protocol => "protocol",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// 会话层错误类型
#[derive(Error, Debug)]
pub enum ControlError {
    /// 所有连接尝试均失败
    #[error("Failed to establish connection after {attempts} attempt(s)")]
    ConnectRetriesExhausted { attempts: u32 },

    /// 某个步骤执行失败
    #[error("Step {index} ({label}) failed: {source}")]
    Step {
        index: usize,
        label: String,
        #[source]
        source: DriverError,
    },

    /// 驱动层错误
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// 协议错误
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl ControlError {
    /// 错误类别
    pub fn kind(&self) -> ErrorKind {
        match self {
            ControlError::ConnectRetriesExhausted { .. } => ErrorKind::Connection,
            ControlError::Step { source, .. } | ControlError::Driver(source) => driver_kind(source),
            ControlError::Protocol(_) => ErrorKind::Protocol,
        }
    }
}

fn driver_kind(err: &DriverError) -> ErrorKind {
    match err {
        DriverError::Timeout(_) => ErrorKind::Timeout,
        e if e.is_connection() => ErrorKind::Connection,
        DriverError::Protocol(_) => ErrorKind::Protocol,
        _ => ErrorKind::Unknown,
    }
}
