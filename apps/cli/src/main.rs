//! # Go2 CLI
//!
//! Command-line interface for Go2 sport-mode sessions.
//!
//! 每个会话命令独立执行：读取配置 → 连接（带重试）→ 执行步骤序列 → 清理。
//! 当前只内置模拟后端（`[simulator]` 配置段），不需要实机即可运行。
//!
//! ```bash
//! # 写入默认配置
//! go2-cli config init
//!
//! # 预置演示（Ctrl+C 随时优雅退出）
//! go2-cli demo --idle-seconds 10
//!
//! # 执行 JSON 脚本
//! go2-cli run --script wave.json --retries 5
//! ```
//!
//! 退出码：0 成功或被用户取消；2 连接错误；3 超时；4 协议错误；1 其它错误。

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use go2_control::{ControlError, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod commands;
mod config;

use commands::{ConfigCommand, DemoCommand, RunCommand};
use config::CliConfig;

/// 未设置 `RUST_LOG` 时的默认过滤规则
const DEFAULT_LOG_FILTER: &str = "go2_cli=info";

/// Go2 CLI - 四足机器人运动模式命令行工具
#[derive(Parser, Debug)]
#[command(name = "go2-cli")]
#[command(about = "Command-line interface for Go2 sport-mode sessions", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 <config_dir>/go2/config.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 日志文件目录（每日轮转）
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 执行预置的 sport-mode 演示
    Demo {
        #[command(flatten)]
        args: DemoCommand,
    },

    /// 执行脚本
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 列出 topic 和命令表
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 日志 guard 必须活到进程结束，否则文件日志会丢失
    let _guard = match init_logging(cli.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            return ExitCode::FAILURE;
        },
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // 会话错误已由会话层输出
            if e.downcast_ref::<ControlError>().is_none() {
                eprintln!("❌ {:#}", e);
            }
            exit_code(&e)
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_config_file()?,
    };

    match cli.command {
        Commands::Demo { args } => {
            let config = CliConfig::load(&config_path)?;
            args.execute(&config).await
        },

        Commands::Run { args } => {
            let config = CliConfig::load(&config_path)?;
            args.execute(&config).await
        },

        Commands::Config(cmd) => cmd.execute(&config_path),

        Commands::List => {
            commands::list::execute();
            Ok(())
        },
    }
}

/// 安装日志：stderr + 可选的每日轮转文件
fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry().with(filter).with(stderr_layer).init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("创建日志目录失败: {}", dir.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "go2-cli.log"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();
    Ok(Some(guard))
}

/// 错误 → 进程退出码
fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ControlError>().map(ControlError::kind) {
        Some(ErrorKind::Connection) => ExitCode::from(2),
        Some(ErrorKind::Timeout) => ExitCode::from(3),
        Some(ErrorKind::Protocol) => ExitCode::from(4),
        Some(ErrorKind::Unknown) | None => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use go2_driver::DriverError;
    use std::time::Duration;

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "go2-cli",
            "demo",
            "--method",
            "local-sta",
            "--ip",
            "192.168.123.161",
            "--retries",
            "5",
            "--idle-seconds",
            "10",
        ])
        .unwrap();

        match cli.command {
            Commands::Demo { args } => {
                assert_eq!(args.idle_seconds, Some(10));
                assert_eq!(args.session.retry.retries, Some(5));
                assert!(args.session.target.ip.is_some());
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["go2-cli", "config", "show", "--config", "/tmp/go2.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/go2.toml")));
    }

    #[test]
    fn test_username_requires_password() {
        assert!(Cli::try_parse_from(["go2-cli", "demo", "--username", "me"]).is_err());
    }

    #[test]
    fn test_default_log_filter() {
        assert_eq!(DEFAULT_LOG_FILTER, "go2_cli=info");
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_exit_codes() {
        let code = |e: ControlError| exit_code(&anyhow::Error::from(e));

        assert_eq!(
            code(ControlError::ConnectRetriesExhausted { attempts: 3 }),
            ExitCode::from(2)
        );
        assert_eq!(
            code(ControlError::Driver(DriverError::Timeout(Duration::from_secs(30)))),
            ExitCode::from(3)
        );
        assert_eq!(
            exit_code(&anyhow::anyhow!("config is broken")),
            ExitCode::FAILURE
        );
    }
}
