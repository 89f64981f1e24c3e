//! 协议层错误类型定义

use thiserror::Error;

/// 协议层错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// 未知 topic（既不是逻辑名称也不是线上标识符）
    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    /// 未知命令名称或 API ID
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// 负载 JSON 编解码失败
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// 设备返回非零状态码
    #[error("Request rejected with status code {code}")]
    RejectedStatus { code: i64 },
}
