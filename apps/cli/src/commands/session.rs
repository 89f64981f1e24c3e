//! 会话执行公共部分
//!
//! `demo` 和 `run` 共用：合并配置与命令行参数、安装信号监听、执行会话。

use anyhow::{Context, Result};
use clap::Args;
use go2_control::{RetryPolicy, RunReport, ShutdownToken, Step, run_session, spawn_signal_listener};
use go2_driver::{ConnectionMethod, Credentials, DeviceTarget};
use std::net::IpAddr;
use std::time::Duration;
use tracing::info;

use crate::config::CliConfig;

/// 设备目标参数（覆盖配置）
#[derive(Args, Debug, Default, Clone)]
pub struct TargetArgs {
    /// 连接方式（local-ap / local-sta / remote）
    #[arg(short, long)]
    pub method: Option<ConnectionMethod>,

    /// 机器人 IP
    #[arg(long)]
    pub ip: Option<IpAddr>,

    /// 设备序列号
    #[arg(short, long)]
    pub serial: Option<String>,

    /// 远程账号
    #[arg(long, requires = "password")]
    pub username: Option<String>,

    /// 远程密码
    #[arg(long, requires = "username")]
    pub password: Option<String>,
}

impl TargetArgs {
    pub fn apply(&self, target: &mut DeviceTarget) {
        if let Some(method) = self.method {
            target.method = method;
        }
        if let Some(ip) = self.ip {
            target.ip = Some(ip);
        }
        if let Some(ref serial) = self.serial {
            target.serial_number = Some(serial.clone());
        }
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            target.credentials = Some(Credentials {
                username: username.clone(),
                password: password.clone(),
            });
        }
    }
}

/// 重试参数（覆盖配置）
#[derive(Args, Debug, Default, Clone)]
pub struct RetryArgs {
    /// 最大连接尝试次数
    #[arg(long)]
    pub retries: Option<u32>,

    /// 重试间隔（秒）
    #[arg(long)]
    pub retry_delay: Option<u64>,
}

impl RetryArgs {
    pub fn apply(&self, policy: &mut RetryPolicy) {
        if let Some(retries) = self.retries {
            policy.max_retries = retries;
        }
        if let Some(secs) = self.retry_delay {
            policy.delay = Duration::from_secs(secs);
        }
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct SessionArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub retry: RetryArgs,
}

/// 对模拟机器人执行一次会话
///
/// 会话层错误以 [`go2_control::ControlError`] 形式保留在返回的
/// `anyhow::Error` 中，供 `main` 决定退出码。
pub async fn execute_steps(config: &CliConfig, args: &SessionArgs, steps: &[Step]) -> Result<RunReport> {
    let mut target = config.target.clone();
    args.target.apply(&mut target);
    target.validate().context("设备目标无效")?;

    let mut options = config.session_options();
    args.retry.apply(&mut options.retry);

    info!(
        device = %target,
        max_retries = options.retry.max_retries,
        delay = ?options.retry.delay,
        "starting session against simulated robot"
    );

    let robot = config.simulator();
    let mut conn = robot.connection(target);

    let shutdown = ShutdownToken::new();
    let listener = spawn_signal_listener(shutdown.clone());

    let result = run_session(&mut conn, steps, &options, &shutdown).await;
    listener.abort();

    let report = result?;
    if !report.rejected.is_empty() {
        println!();
        println!("⚠️  被拒绝的请求:");
        for (index, code) in &report.rejected {
            println!("  步骤 {}: code={}", index + 1, code);
        }
    }
    Ok(report)
}
