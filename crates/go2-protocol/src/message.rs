//! 请求/响应消息
//!
//! 数据通道上的请求负载是 `{"api_id": …, "parameter": {…}}`。响应把状态码嵌在
//! `header.status.code` 中，业务数据则是 **JSON 编码后的字符串**，需要二次解码。

use crate::api::{MotionSwitcherApi, SportCommand};
use crate::error::ProtocolError;
use crate::topics::Topic;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// 成功状态码
pub const STATUS_OK: i64 = 0;

/// 请求负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// 数字 API ID
    pub api_id: u32,

    /// 可选参数（结构化 JSON）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<serde_json::Value>,
}

impl Request {
    /// 只带 API ID 的请求
    pub fn api(api_id: u32) -> Self {
        Self {
            api_id,
            parameter: None,
        }
    }

    /// Sport Mode 命令
    pub fn sport(command: SportCommand) -> Self {
        Self::api(command.id())
    }

    /// Motion Switcher 请求
    pub fn motion(api: MotionSwitcherApi) -> Self {
        Self::api(api.id())
    }

    /// 切换运动模式：`{"api_id": 1002, "parameter": {"name": <mode>}}`
    pub fn select_mode(name: &str) -> Self {
        Self::motion(MotionSwitcherApi::SelectMode)
            .with_parameter(serde_json::json!({ "name": name }))
    }

    /// 设置参数
    pub fn with_parameter(mut self, parameter: serde_json::Value) -> Self {
        self.parameter = Some(parameter);
        self
    }
}

/// 请求身份（请求 ID + API ID）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub api_id: u32,
}

/// 嵌套状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub code: i64,
}

/// 响应头
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    #[serde(default)]
    pub identity: Identity,
    pub status: Status,
}

/// 响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub header: ResponseHeader,

    /// JSON 编码后的业务数据（可能为空字符串）
    #[serde(default)]
    pub data: String,
}

impl Response {
    /// 构造响应
    pub fn new(identity: Identity, code: i64, data: impl Into<String>) -> Self {
        Self {
            header: ResponseHeader {
                identity,
                status: Status { code },
            },
            data: data.into(),
        }
    }

    /// 嵌套状态码
    pub fn status_code(&self) -> i64 {
        self.header.status.code
    }

    /// 状态码是否为 0
    pub fn is_success(&self) -> bool {
        self.status_code() == STATUS_OK
    }

    /// 状态码非零时转换为错误
    pub fn ensure_success(&self) -> Result<(), ProtocolError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(ProtocolError::RejectedStatus {
                code: self.status_code(),
            })
        }
    }

    /// 解码 `data` 字段中的 JSON 字符串
    pub fn decode_data<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        Ok(serde_json::from_str(&self.data)?)
    }
}

/// Motion Switcher `CheckMode` 的响应数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionMode {
    /// 模式名称（如 `normal`、`ai`）
    pub name: String,

    /// 机身形态（固件返回字符串，如 `"0"`）
    #[serde(default)]
    pub form: Option<String>,
}

/// 线上请求信封
///
/// ```text
/// {"type": "req", "topic": "rt/api/sport/request",
///  "data": {"header": {"identity": {"id": 7, "api_id": 1016}},
///           "parameter": "<json string>", "binary": []}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub topic: String,
    pub data: RequestBody,
}

/// 信封中的请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub header: RequestHeader,
    /// JSON 编码后的参数（无参数时为空字符串）
    pub parameter: String,
    #[serde(default)]
    pub binary: Vec<u8>,
}

/// 信封中的请求头
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestHeader {
    pub identity: Identity,
}

impl RequestEnvelope {
    /// 由 topic + 请求负载 + 请求 ID 构建信封
    pub fn new(topic: Topic, request: &Request, id: u64) -> Result<Self, ProtocolError> {
        let parameter = match &request.parameter {
            Some(value) => serde_json::to_string(value)?,
            None => String::new(),
        };

        Ok(Self {
            kind: "req".to_string(),
            topic: topic.wire_id().to_string(),
            data: RequestBody {
                header: RequestHeader {
                    identity: Identity {
                        id,
                        api_id: request.api_id,
                    },
                },
                parameter,
                binary: Vec::new(),
            },
        })
    }

    /// 解析信封中的 topic
    pub fn topic(&self) -> Result<Topic, ProtocolError> {
        self.topic.parse()
    }

    /// 还原请求负载
    pub fn request(&self) -> Result<Request, ProtocolError> {
        let parameter = if self.data.parameter.is_empty() {
            None
        } else {
            Some(serde_json::from_str(&self.data.parameter)?)
        };

        Ok(Request {
            api_id: self.data.header.identity.api_id,
            parameter,
        })
    }
}
