//! 协作式关闭
//!
//! [`ShutdownToken`] 由会话入口创建，显式传给每个可能长时间等待的调用；
//! 信号接收被隔离在 [`spawn_signal_listener`] 启动的独立任务中，它只负责把
//! 信号转发到令牌。
//!
//! 取消不是抢占式的：正在进行的网络请求会正常完成，下一个步骤边界才会看到
//! 令牌状态。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 可中断等待的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// 等待时间已到
    Elapsed,
    /// 等待期间收到取消
    Cancelled,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// 取消令牌
///
/// 克隆共享同一个状态。初始为未取消，一旦取消不可恢复。
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    inner: Arc<Inner>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求关闭
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    /// 是否已请求关闭
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// 等待关闭请求
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // 先登记再检查标志，避免错过 cancel() 中的 notify_waiters()
            notified.as_mut().enable();

            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// 等待 `duration`，收到关闭请求时提前返回
    ///
    /// 醒来后总是再检查一次令牌：即使时间已到，只要期间发生了取消也返回
    /// [`Wait::Cancelled`]。
    pub async fn sleep(&self, duration: Duration) -> Wait {
        if self.is_cancelled() {
            return Wait::Cancelled;
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => {},
            _ = self.cancelled() => return Wait::Cancelled,
        }

        if self.is_cancelled() {
            Wait::Cancelled
        } else {
            Wait::Elapsed
        }
    }
}

/// 启动信号监听任务
///
/// Unix 上监听 SIGINT 与 SIGTERM，其它平台监听 Ctrl+C。收到信号后打印提示并
/// 取消令牌，任务随即结束。
pub fn spawn_signal_listener(token: ShutdownToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match wait_for_signal().await {
            Ok(name) => {
                println!("\n🛑 收到信号 {}，正在优雅退出...", name);
                info!(signal = name, "shutdown requested");
                token.cancel();
            },
            Err(e) => {
                warn!("failed to install signal handlers: {}", e);
            },
        }
    })
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = interrupt.recv() => Ok("SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("Ctrl+C")
}
