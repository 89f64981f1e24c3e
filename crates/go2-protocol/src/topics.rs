//! Topic 注册表
//!
//! 设备命令总线上的每个端点都有一个逻辑名称（如 `MOTION_SWITCHER`）和一个
//! 线上标识符（如 `rt/api/motion_switcher/request`）。两者都是固定常量。

use crate::error::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 设备命令总线上的请求 topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Topic {
    /// 运动模式切换器（normal / ai 等整体控制模式）
    MotionSwitcher,
    /// 运动模式（接受离散的动作/手势命令）
    SportMode,
    /// 避障服务
    ObstaclesAvoid,
    /// 灯光/音量等人机交互服务
    Vui,
}

impl Topic {
    /// 所有已知 topic
    pub const ALL: [Topic; 4] = [
        Topic::MotionSwitcher,
        Topic::SportMode,
        Topic::ObstaclesAvoid,
        Topic::Vui,
    ];

    /// 线上标识符
    pub fn wire_id(self) -> &'static str {
        match self {
            Topic::MotionSwitcher => "rt/api/motion_switcher/request",
            Topic::SportMode => "rt/api/sport/request",
            Topic::ObstaclesAvoid => "rt/api/obstacles_avoid/request",
            Topic::Vui => "rt/api/vui/request",
        }
    }

    /// 逻辑名称
    pub fn logical_name(self) -> &'static str {
        match self {
            Topic::MotionSwitcher => "MOTION_SWITCHER",
            Topic::SportMode => "SPORT_MOD",
            Topic::ObstaclesAvoid => "OBSTACLES_AVOID",
            Topic::Vui => "VUI",
        }
    }

    /// 通过线上标识符查找
    pub fn from_wire_id(wire_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.wire_id() == wire_id)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.logical_name())
    }
}

impl FromStr for Topic {
    type Err = ProtocolError;

    /// 接受逻辑名称（大小写不敏感）或线上标识符
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.logical_name().eq_ignore_ascii_case(s))
            .or_else(|| Self::from_wire_id(s))
            .ok_or_else(|| ProtocolError::UnknownTopic(s.to_string()))
    }
}

impl TryFrom<String> for Topic {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Topic> for &'static str {
    fn from(topic: Topic) -> Self {
        topic.logical_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_ids() {
        assert_eq!(
            Topic::MotionSwitcher.wire_id(),
            "rt/api/motion_switcher/request"
        );
        assert_eq!(Topic::SportMode.wire_id(), "rt/api/sport/request");
    }

    #[test]
    fn test_parse_logical_and_wire() {
        assert_eq!("SPORT_MOD".parse::<Topic>().unwrap(), Topic::SportMode);
        assert_eq!(
            "motion_switcher".parse::<Topic>().unwrap(),
            Topic::MotionSwitcher
        );
        assert_eq!(
            "rt/api/vui/request".parse::<Topic>().unwrap(),
            Topic::Vui
        );
        assert!(matches!(
            "rt/api/unknown".parse::<Topic>(),
            Err(ProtocolError::UnknownTopic(_))
        ));
    }

    #[test]
    fn test_serde_uses_logical_name() {
        let json = serde_json::to_string(&Topic::SportMode).unwrap();
        assert_eq!(json, "\"SPORT_MOD\"");

        let topic: Topic = serde_json::from_str("\"rt/api/motion_switcher/request\"").unwrap();
        assert_eq!(topic, Topic::MotionSwitcher);

        assert!(serde_json::from_str::<Topic>("\"NOPE\"").is_err());
    }
}
