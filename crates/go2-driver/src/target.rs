//! 设备目标
//!
//! 连接方式选择器 + 设备身份参数（本地 IP、序列号或账号密码）。

use crate::error::DriverError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

/// AP 模式下机器人的固定地址
pub const LOCAL_AP_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 12, 1));

/// 连接方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionMethod {
    /// 直连机器人热点
    #[default]
    LocalAp,
    /// 同一局域网（通过 IP 或序列号发现）
    LocalSta,
    /// 经由云端中转（需要序列号和账号）
    Remote,
}

impl fmt::Display for ConnectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionMethod::LocalAp => "local-ap",
            ConnectionMethod::LocalSta => "local-sta",
            ConnectionMethod::Remote => "remote",
        };
        f.write_str(s)
    }
}

impl FromStr for ConnectionMethod {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "local-ap" | "ap" => Ok(ConnectionMethod::LocalAp),
            "local-sta" | "sta" => Ok(ConnectionMethod::LocalSta),
            "remote" => Ok(ConnectionMethod::Remote),
            other => Err(DriverError::InvalidTarget(format!(
                "unknown connection method '{}'",
                other
            ))),
        }
    }
}

/// 账号凭据
///
/// `Debug` 输出不包含密码。
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// 设备目标
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTarget {
    #[serde(default)]
    pub method: ConnectionMethod,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpAddr>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

impl DeviceTarget {
    /// AP 直连
    pub fn local_ap() -> Self {
        Self::default()
    }

    /// 局域网，按 IP
    pub fn local_sta_ip(ip: IpAddr) -> Self {
        Self {
            method: ConnectionMethod::LocalSta,
            ip: Some(ip),
            ..Self::default()
        }
    }

    /// 局域网，按序列号
    pub fn local_sta_serial(serial_number: impl Into<String>) -> Self {
        Self {
            method: ConnectionMethod::LocalSta,
            serial_number: Some(serial_number.into()),
            ..Self::default()
        }
    }

    /// 远程
    pub fn remote(
        serial_number: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            method: ConnectionMethod::Remote,
            ip: None,
            serial_number: Some(serial_number.into()),
            credentials: Some(Credentials {
                username: username.into(),
                password: password.into(),
            }),
        }
    }

    /// 检查参数组合是否满足连接方式的要求
    pub fn validate(&self) -> Result<(), DriverError> {
        match self.method {
            ConnectionMethod::LocalAp => Ok(()),
            ConnectionMethod::LocalSta => {
                if self.ip.is_none() && self.serial_number.is_none() {
                    return Err(DriverError::InvalidTarget(
                        "local-sta requires an ip or a serial number".to_string(),
                    ));
                }
                Ok(())
            },
            ConnectionMethod::Remote => {
                if self.serial_number.is_none() {
                    return Err(DriverError::InvalidTarget(
                        "remote requires a serial number".to_string(),
                    ));
                }
                if self.credentials.is_none() {
                    return Err(DriverError::InvalidTarget(
                        "remote requires username and password".to_string(),
                    ));
                }
                Ok(())
            },
        }
    }

    /// 实际使用的 IP（AP 模式回落到固定地址）
    pub fn effective_ip(&self) -> Option<IpAddr> {
        match (self.method, self.ip) {
            (_, Some(ip)) => Some(ip),
            (ConnectionMethod::LocalAp, None) => Some(LOCAL_AP_ADDR),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.method)?;
        if let Some(ip) = self.effective_ip() {
            write!(f, " ip={}", ip)?;
        }
        if let Some(ref sn) = self.serial_number {
            write!(f, " serial={}", sn)?;
        }
        if let Some(ref creds) = self.credentials {
            write!(f, " user={}", creds.username)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(DeviceTarget::local_ap().validate().is_ok());
        assert!(DeviceTarget::local_sta_serial("B42D2000XXXXXXXX").validate().is_ok());

        let bare_sta = DeviceTarget {
            method: ConnectionMethod::LocalSta,
            ..DeviceTarget::default()
        };
        assert!(matches!(bare_sta.validate(), Err(DriverError::InvalidTarget(_))));

        let mut remote = DeviceTarget::remote("B42D4000", "user@example.com", "secret");
        assert!(remote.validate().is_ok());
        remote.credentials = None;
        assert!(remote.validate().is_err());
    }

    #[test]
    fn test_effective_ip() {
        assert_eq!(DeviceTarget::local_ap().effective_ip(), Some(LOCAL_AP_ADDR));
        assert_eq!(DeviceTarget::local_sta_serial("SN").effective_ip(), None);
    }

    #[test]
    fn test_password_not_printed() {
        let target = DeviceTarget::remote("SN", "user", "hunter2");
        assert!(!format!("{:?}", target).contains("hunter2"));
        assert!(!format!("{}", target).contains("hunter2"));
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("local_sta".parse::<ConnectionMethod>().unwrap(), ConnectionMethod::LocalSta);
        assert_eq!("Remote".parse::<ConnectionMethod>().unwrap(), ConnectionMethod::Remote);
        assert!("bluetooth".parse::<ConnectionMethod>().is_err());
    }
}
