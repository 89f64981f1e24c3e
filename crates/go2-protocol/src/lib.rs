//! # Go2 Protocol
//!
//! Go2 数据通道协议定义（无 IO 依赖）
//!
//! ## 模块
//!
//! - `topics`: 逻辑 topic 名称与线上标识符的映射
//! - `api`: Motion Switcher / Sport Mode 的 API ID 常量表
//! - `message`: 请求负载、响应结构与线上信封
//! - `error`: 协议层错误类型
//!
//! ## 消息格式
//!
//! 请求负载为 `{"api_id": …, "parameter": {…}}`；响应携带嵌套的状态码
//! （`header.status.code`，0 表示成功）以及 JSON 编码后的字符串数据。

pub mod api;
pub mod error;
pub mod message;
pub mod topics;

// 重新导出常用类型
pub use api::{MotionSwitcherApi, SportCommand};
pub use error::ProtocolError;
pub use message::{
    Identity, MotionMode, Request, RequestEnvelope, Response, ResponseHeader, STATUS_OK, Status,
};
pub use topics::Topic;
