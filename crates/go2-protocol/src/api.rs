//! API ID 常量表
//!
//! Motion Switcher 与 Sport Mode 两个服务的数字 API ID。数值由设备固件定义，
//! 这里只做名称 ↔ 数值的映射，不对语义做任何假设。

use crate::error::ProtocolError;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Motion Switcher 服务 API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u32)]
pub enum MotionSwitcherApi {
    /// 查询当前模式，响应数据为 `{"form": …, "name": …}`
    CheckMode = 1001,
    /// 切换模式，参数为 `{"name": <mode>}`
    SelectMode = 1002,
    ReleaseMode = 1003,
    SetSilent = 1004,
    GetSilent = 1005,
}

impl MotionSwitcherApi {
    pub const ALL: [MotionSwitcherApi; 5] = [
        MotionSwitcherApi::CheckMode,
        MotionSwitcherApi::SelectMode,
        MotionSwitcherApi::ReleaseMode,
        MotionSwitcherApi::SetSilent,
        MotionSwitcherApi::GetSilent,
    ];

    /// 数字 API ID
    pub fn id(self) -> u32 {
        self.into()
    }
}

macro_rules! sport_commands {
    ($($name:ident = $id:literal),* $(,)?) => {
        /// Sport Mode 命令表
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
        #[derive(Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        #[repr(u32)]
        pub enum SportCommand {
            $($name = $id),*
        }

        impl SportCommand {
            /// 所有已知命令（按 API ID 升序）
            pub const ALL: &'static [SportCommand] = &[$(SportCommand::$name),*];

            /// 命令名称（与固件文档一致，如 `Hello`、`StandOut`）
            pub fn name(self) -> &'static str {
                match self {
                    $(SportCommand::$name => stringify!($name)),*
                }
            }
        }
    };
}

sport_commands! {
    Damp = 1001,
    BalanceStand = 1002,
    StopMove = 1003,
    StandUp = 1004,
    StandDown = 1005,
    RecoveryStand = 1006,
    Euler = 1007,
    Move = 1008,
    Sit = 1009,
    RiseSit = 1010,
    SwitchGait = 1011,
    Trigger = 1012,
    BodyHeight = 1013,
    FootRaiseHeight = 1014,
    SpeedLevel = 1015,
    Hello = 1016,
    Stretch = 1017,
    TrajectoryFollow = 1018,
    ContinuousGait = 1019,
    Content = 1020,
    Wallow = 1021,
    Dance1 = 1022,
    Dance2 = 1023,
    GetBodyHeight = 1024,
    GetFootRaiseHeight = 1025,
    GetSpeedLevel = 1026,
    SwitchJoystick = 1027,
    Pose = 1028,
    Scrape = 1029,
    FrontFlip = 1030,
    FrontJump = 1031,
    FrontPounce = 1032,
    WiggleHips = 1033,
    GetState = 1034,
    EconomicGait = 1035,
    FingerHeart = 1036,
    StandOut = 1039,
    LeftFlip = 1042,
    RightFlip = 1043,
    Backflip = 1044,
    FreeWalk = 1045,
    Handstand = 1301,
    CrossStep = 1302,
    OnesidedStep = 1303,
    Bound = 1304,
}

impl SportCommand {
    /// 数字 API ID
    pub fn id(self) -> u32 {
        self.into()
    }

    /// 通过数字 API ID 查找
    pub fn from_id(id: u32) -> Option<Self> {
        Self::try_from(id).ok()
    }
}

impl fmt::Display for SportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SportCommand {
    type Err = ProtocolError;

    /// 接受命令名称（大小写不敏感）或十进制 API ID
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u32>() {
            return Self::from_id(id).ok_or_else(|| ProtocolError::UnknownCommand(s.to_string()));
        }

        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProtocolError::UnknownCommand(s.to_string()))
    }
}

impl TryFrom<String> for SportCommand {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SportCommand> for &'static str {
    fn from(command: SportCommand) -> Self {
        command.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_command_ids() {
        assert_eq!(SportCommand::Hello.id(), 1016);
        assert_eq!(SportCommand::Move.id(), 1008);
        assert_eq!(SportCommand::StandOut.id(), 1039);
        assert_eq!(MotionSwitcherApi::CheckMode.id(), 1001);
        assert_eq!(MotionSwitcherApi::SelectMode.id(), 1002);
    }

    #[test]
    fn test_lookup_by_name_and_id() {
        assert_eq!("hello".parse::<SportCommand>().unwrap(), SportCommand::Hello);
        assert_eq!("1039".parse::<SportCommand>().unwrap(), SportCommand::StandOut);
        assert_eq!(SportCommand::from_id(1301), Some(SportCommand::Handstand));
        assert_eq!(SportCommand::from_id(4242), None);
        assert!("Fly".parse::<SportCommand>().is_err());
    }

    #[test]
    fn test_table_is_sorted_and_unique() {
        let ids: Vec<u32> = SportCommand::ALL.iter().map(|c| c.id()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_serde_by_name() {
        let json = serde_json::to_string(&SportCommand::StandOut).unwrap();
        assert_eq!(json, "\"StandOut\"");
        let cmd: SportCommand = serde_json::from_str("\"Move\"").unwrap();
        assert_eq!(cmd, SportCommand::Move);
    }
}
