//! 会话编排
//!
//! 连接（带重试）→ 等待数据通道 → 执行步骤序列 → 清理。
//!
//! 清理在每条路径上恰好执行一次（成功、取消、出错），清理本身的错误只记录不
//! 上报。错误按 [`ErrorKind`](crate::ErrorKind) 分类返回，由调用方决定进程
//! 退出码。

use crate::bootstrap::{RetryPolicy, connect_with_retry};
use crate::error::{ControlError, ErrorKind};
use crate::runner::{RunReport, SequenceRunner};
use crate::shutdown::ShutdownToken;
use crate::step::Step;
use go2_driver::{Connection, DataChannel};
use std::time::Duration;
use tracing::{error, info, warn};

/// 会话配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// 连接重试策略
    pub retry: RetryPolicy,

    /// 等待数据通道打开的超时
    pub open_timeout: Duration,

    /// 释放连接前的暂停
    pub cleanup_pause: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            open_timeout: Duration::from_secs(30),
            cleanup_pause: Duration::from_secs(1),
        }
    }
}

/// 执行一次完整会话
///
/// # 返回
/// - `Ok(report)`: 序列执行完毕或被取消（`report.cancelled`）
/// - `Err(e)`: 连接、超时、协议或其它错误，清理已完成
pub async fn run_session<C: Connection>(
    conn: &mut C,
    steps: &[Step],
    options: &SessionOptions,
    shutdown: &ShutdownToken,
) -> Result<RunReport, ControlError> {
    println!("🚀 开始连接 Go2 ({})...", conn.target());
    info!(device = %conn.target(), steps = steps.len(), "session starting");

    let result = drive(conn, steps, options, shutdown).await;

    match &result {
        Ok(report) if report.cancelled => {
            println!("🛑 会话已取消");
        },
        Ok(report) => {
            println!(
                "✅ 会话完成：{} 个步骤，{} 个请求，{} 个被拒绝",
                report.executed,
                report.requests,
                report.rejected.len()
            );
        },
        Err(e) => report_error(e),
    }

    cleanup(conn, options).await;
    result
}

async fn drive<C: Connection>(
    conn: &mut C,
    steps: &[Step],
    options: &SessionOptions,
    shutdown: &ShutdownToken,
) -> Result<RunReport, ControlError> {
    if !connect_with_retry(conn, &options.retry, shutdown).await {
        if shutdown.is_cancelled() {
            return Ok(cancelled());
        }
        return Err(ControlError::ConnectRetriesExhausted {
            attempts: options.retry.max_retries,
        });
    }

    println!("📡 连接已建立，等待数据通道...");
    conn.datachannel().wait_open(options.open_timeout).await?;
    info!("data channel open");

    if shutdown.is_cancelled() {
        return Ok(cancelled());
    }

    SequenceRunner::new(conn.datachannel(), shutdown.clone()).run(steps).await
}

fn cancelled() -> RunReport {
    RunReport {
        cancelled: true,
        ..RunReport::default()
    }
}

fn report_error(err: &ControlError) {
    match err.kind() {
        ErrorKind::Timeout => println!("⏰ 超时: {}", err),
        ErrorKind::Connection => println!("🔌 连接错误: {}", err),
        ErrorKind::Protocol => println!("📛 协议错误: {}", err),
        ErrorKind::Unknown => println!("❌ 意外错误: {}", err),
    }
    error!(kind = %err.kind(), "session failed: {:?}", err);
}

/// 清理：暂停后释放连接，错误只记录
async fn cleanup<C: Connection>(conn: &mut C, options: &SessionOptions) {
    println!("🧹 清理连接...");
    if !options.cleanup_pause.is_zero() {
        tokio::time::sleep(options.cleanup_pause).await;
    }

    match conn.disconnect().await {
        Ok(()) => info!("connection released"),
        Err(e) => {
            println!("⚠️  清理连接时出错: {}", e);
            warn!("cleanup failed: {}", e);
        },
    }
}
