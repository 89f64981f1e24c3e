//! CLI 配置文件
//!
//! 默认位置 `<config_dir>/go2/config.toml`，可用 `--config` 覆盖。文件不存在时
//! 使用默认值；命令行参数优先于文件中的值。
//!
//! ```toml
//! [target]
//! method = "local-sta"
//! ip = "192.168.123.161"
//!
//! [retry]
//! max_retries = 3
//! delay_secs = 5
//!
//! [session]
//! open_timeout_secs = 30
//! cleanup_pause_ms = 1000
//! idle_seconds = 600
//!
//! [simulator]
//! initial_mode = "ai"
//! response_delay_ms = 200
//! ```

use anyhow::{Context, Result};
use go2_control::{DEFAULT_IDLE_SECONDS, RetryPolicy, SessionOptions};
use go2_driver::{DeviceTarget, SimulatedGo2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认配置文件路径
pub fn default_config_file() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;

    path.push("go2");
    path.push("config.toml");
    Ok(path)
}

/// CLI 配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// 设备目标
    pub target: DeviceTarget,

    /// 连接重试
    pub retry: RetryConfig,

    /// 会话参数
    pub session: SessionConfig,

    /// 模拟后端
    pub simulator: SimulatorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// 最大尝试次数（含第一次）
    pub max_retries: u32,

    /// 重试间隔（秒）
    pub delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_retries: policy.max_retries,
            delay_secs: policy.delay.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// 等待数据通道打开的超时（秒）
    pub open_timeout_secs: u64,

    /// 释放连接前的暂停（毫秒）
    pub cleanup_pause_ms: u64,

    /// 演示序列末尾的空闲时长（秒）
    pub idle_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let options = SessionOptions::default();
        Self {
            open_timeout_secs: options.open_timeout.as_secs(),
            cleanup_pause_ms: u64::try_from(options.cleanup_pause.as_millis()).unwrap_or(u64::MAX),
            idle_seconds: DEFAULT_IDLE_SECONDS,
        }
    }
}

/// 模拟后端参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// 初始运动模式
    pub initial_mode: String,

    /// 前 N 次连接失败
    pub connect_failures: u32,

    /// 数据通道打开延迟（毫秒）
    pub open_delay_ms: u64,

    /// 每个请求的响应延迟（毫秒）
    pub response_delay_ms: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            initial_mode: "normal".to_string(),
            connect_failures: 0,
            open_delay_ms: 0,
            response_delay_ms: 0,
        }
    }
}

impl CliConfig {
    /// 加载配置；文件不存在时返回默认值
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config: CliConfig = toml::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        Ok(config)
    }

    /// 保存配置（自动创建父目录）
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("创建配置目录失败")?;
        }

        let content = toml::to_string_pretty(self).context("序列化配置失败")?;
        fs::write(path, format!("# Go2 CLI Configuration\n\n{}", content))
            .context("写入配置文件失败")?;
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_retries,
            Duration::from_secs(self.retry.delay_secs),
        )
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            retry: self.retry_policy(),
            open_timeout: Duration::from_secs(self.session.open_timeout_secs),
            cleanup_pause: Duration::from_millis(self.session.cleanup_pause_ms),
        }
    }

    /// 按 `[simulator]` 段构建模拟机器人
    pub fn simulator(&self) -> SimulatedGo2 {
        SimulatedGo2::builder()
            .initial_mode(self.simulator.initial_mode.clone())
            .connect_failures(self.simulator.connect_failures)
            .open_delay(Duration::from_millis(self.simulator.open_delay_ms))
            .response_delay(Duration::from_millis(self.simulator.response_delay_ms))
            .build()
    }
}
