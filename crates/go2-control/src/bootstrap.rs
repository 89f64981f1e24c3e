//! 连接引导
//!
//! 固定次数、固定间隔的重试。所有失败一视同仁：不区分错误类型，没有指数退避，
//! 也没有抖动。

use crate::shutdown::{ShutdownToken, Wait};
use go2_driver::Connection;
use std::time::Duration;
use tracing::{error, info, warn};

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最大尝试次数（含第一次）
    pub max_retries: u32,

    /// 两次尝试之间的等待时间
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }
}

/// 带重试地建立连接
///
/// 最多尝试 `policy.max_retries` 次；除最后一次外，每次失败后等待
/// `policy.delay`。等待期间收到关闭请求则不再重试。
///
/// 从不返回错误：底层 `connect()` 的所有错误都被记录并视为一次失败尝试。
///
/// # 返回
/// - `true`: 某次尝试成功
/// - `false`: 全部失败、`max_retries == 0`，或被取消
pub async fn connect_with_retry<C: Connection>(
    conn: &mut C,
    policy: &RetryPolicy,
    shutdown: &ShutdownToken,
) -> bool {
    for attempt in 1..=policy.max_retries {
        println!("🔄 连接尝试 {}/{}", attempt, policy.max_retries);

        match conn.connect().await {
            Ok(()) => {
                println!("✅ 连接成功");
                info!(attempt, device = %conn.target(), "connection established");
                return true;
            },
            Err(e) => {
                println!("❌ 第 {} 次连接失败: {}", attempt, e);
                warn!(attempt, max_retries = policy.max_retries, "connection attempt failed: {}", e);
            },
        }

        if attempt < policy.max_retries {
            println!("⏳ {} 秒后重试...", policy.delay.as_secs_f64());
            if shutdown.sleep(policy.delay).await == Wait::Cancelled {
                warn!(attempt, "connection retries interrupted by shutdown");
                return false;
            }
        }
    }

    println!("🚫 所有连接尝试均失败");
    error!(attempts = policy.max_retries, "all connection attempts failed");
    false
}
