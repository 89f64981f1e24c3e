//! 声明式步骤
//!
//! 一个会话就是一串有序的 [`Step`]。每个步骤要么向某个 topic 发送请求（可带
//! 稳定等待时间），要么只是暂停。步骤可以从 JSON 脚本加载：
//!
//! ```json
//! {
//!   "name": "wave",
//!   "description": "say hello then idle",
//!   "steps": [
//!     { "type": "EnsureMode", "mode": "normal", "settle_ms": 5000 },
//!     { "type": "Command", "command": "Hello", "settle_ms": 1000 },
//!     { "type": "Idle", "seconds": 10 }
//!   ]
//! }
//! ```

use go2_protocol::{MotionSwitcherApi, ProtocolError, Request, SportCommand, Topic};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 单个步骤
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Step {
    /// 查询当前运动模式（状态码为 0 时记录）
    QueryMode,

    /// 当前模式不等于 `mode` 时才切换，并等待 `settle_ms`
    EnsureMode {
        mode: String,
        #[serde(default)]
        settle_ms: u64,
    },

    /// 无条件切换运动模式
    SelectMode {
        mode: String,
        #[serde(default)]
        settle_ms: u64,
    },

    /// Sport Mode 命令
    Command {
        command: SportCommand,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parameter: Option<serde_json::Value>,
        #[serde(default)]
        settle_ms: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },

    /// 任意 topic 上的原始请求
    Request {
        topic: Topic,
        api_id: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parameter: Option<serde_json::Value>,
        #[serde(default)]
        settle_ms: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },

    /// 固定暂停
    Pause { duration_ms: u64 },

    /// 空闲等待，每秒检查一次取消
    Idle { seconds: u64 },
}

impl Step {
    /// 无参数的 Sport Mode 命令
    pub fn command(command: SportCommand, settle: Duration) -> Self {
        Step::Command {
            command,
            parameter: None,
            settle_ms: millis(settle),
            label: None,
        }
    }

    /// 带参数的 Sport Mode 命令
    pub fn command_with(
        command: SportCommand,
        parameter: serde_json::Value,
        settle: Duration,
    ) -> Self {
        Step::Command {
            command,
            parameter: Some(parameter),
            settle_ms: millis(settle),
            label: None,
        }
    }

    /// 设置控制台显示的标签（只对请求类步骤生效）
    pub fn labeled(mut self, text: impl Into<String>) -> Self {
        if let Step::Command { label, .. } | Step::Request { label, .. } = &mut self {
            *label = Some(text.into());
        }
        self
    }

    /// 日志中使用的简短名称
    pub fn name(&self) -> String {
        match self {
            Step::QueryMode => "QueryMode".to_string(),
            Step::EnsureMode { mode, .. } => format!("EnsureMode({})", mode),
            Step::SelectMode { mode, .. } => format!("SelectMode({})", mode),
            Step::Command { command, .. } => command.name().to_string(),
            Step::Request { topic, api_id, .. } => format!("{}:{}", topic, api_id),
            Step::Pause { .. } => "Pause".to_string(),
            Step::Idle { .. } => "Idle".to_string(),
        }
    }

    /// 控制台状态行
    pub fn banner(&self) -> String {
        match self {
            Step::QueryMode => "🔍 查询当前运动模式...".to_string(),
            Step::EnsureMode { mode, .. } => format!("🔄 确认运动模式为 '{}'...", mode),
            Step::SelectMode { mode, .. } => format!("🔄 切换运动模式到 '{}'...", mode),
            Step::Command {
                label: Some(label), ..
            }
            | Step::Request {
                label: Some(label), ..
            } => label.clone(),
            Step::Command { command, .. } => format!("🐕 执行 {} ...", command),
            Step::Request { topic, api_id, .. } => format!("📡 发送请求 {} api_id={} ...", topic, api_id),
            Step::Pause { duration_ms } => format!("⏸️  暂停 {} ms", duration_ms),
            Step::Idle { seconds } => {
                format!("⏰ 程序将保持运行 {} 秒，按 Ctrl+C 提前退出", seconds)
            },
        }
    }

    /// 请求完成后的稳定等待时间
    pub fn settle(&self) -> Duration {
        match self {
            Step::EnsureMode { settle_ms, .. }
            | Step::SelectMode { settle_ms, .. }
            | Step::Command { settle_ms, .. }
            | Step::Request { settle_ms, .. } => Duration::from_millis(*settle_ms),
            Step::Pause { duration_ms } => Duration::from_millis(*duration_ms),
            Step::QueryMode | Step::Idle { .. } => Duration::ZERO,
        }
    }

    /// 步骤对应的请求
    ///
    /// `EnsureMode` 返回切换请求本身，是否发送由执行器决定；`Pause`/`Idle`
    /// 返回 `None`。
    pub fn request(&self) -> Option<(Topic, Request)> {
        match self {
            Step::QueryMode => Some((
                Topic::MotionSwitcher,
                Request::motion(MotionSwitcherApi::CheckMode),
            )),
            Step::EnsureMode { mode, .. } | Step::SelectMode { mode, .. } => {
                Some((Topic::MotionSwitcher, Request::select_mode(mode)))
            },
            Step::Command {
                command, parameter, ..
            } => Some((
                Topic::SportMode,
                Request {
                    api_id: command.id(),
                    parameter: parameter.clone(),
                },
            )),
            Step::Request {
                topic,
                api_id,
                parameter,
                ..
            } => Some((
                *topic,
                Request {
                    api_id: *api_id,
                    parameter: parameter.clone(),
                },
            )),
            Step::Pause { .. } | Step::Idle { .. } => None,
        }
    }
}

/// 毫秒数，超出 `u64` 时饱和
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// 步骤脚本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// 脚本名称
    pub name: String,

    /// 脚本描述
    #[serde(default)]
    pub description: String,

    /// 步骤序列
    pub steps: Vec<Step>,
}

impl Script {
    /// 从 JSON 文本解析
    pub fn from_json(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    /// 序列化为格式化的 JSON
    pub fn to_json_pretty(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
