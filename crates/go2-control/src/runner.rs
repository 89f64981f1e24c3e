//! 步骤执行器
//!
//! 按顺序解释 [`Step`] 序列。执行规则：
//!
//! - 每个步骤开始前、每次暂停结束后检查取消令牌；一旦取消，剩余步骤（及其
//!   请求）全部跳过，执行正常结束并标记为已取消
//! - `QueryMode` 仅在状态码为 0 时更新当前模式
//! - `EnsureMode` 在当前模式已等于目标时跳过请求和稳定等待
//! - 请求返回非零状态码只记录，不中断序列
//! - 驱动层错误立即中断序列并向上返回

use crate::error::ControlError;
use crate::shutdown::{ShutdownToken, Wait};
use crate::step::Step;
use go2_driver::DataChannel;
use go2_protocol::{MotionMode, MotionSwitcherApi, Request, Response, Topic};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// `Idle` 步骤的检查间隔
const IDLE_TICK: Duration = Duration::from_secs(1);

/// 执行结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// 已执行的步骤数（包括在暂停期间被取消的步骤）
    pub executed: usize,

    /// 已发送的请求数
    pub requests: usize,

    /// 返回非零状态码的步骤：`(步骤索引, 状态码)`
    pub rejected: Vec<(usize, i64)>,

    /// 是否因关闭请求提前结束
    pub cancelled: bool,

    /// 结束时已知的运动模式
    pub current_mode: Option<String>,
}

/// 步骤执行器
pub struct SequenceRunner<'a, C: DataChannel> {
    channel: &'a C,
    shutdown: ShutdownToken,
    current_mode: Option<String>,
}

impl<'a, C: DataChannel> SequenceRunner<'a, C> {
    pub fn new(channel: &'a C, shutdown: ShutdownToken) -> Self {
        Self {
            channel,
            shutdown,
            current_mode: None,
        }
    }

    /// 当前已知的运动模式
    pub fn current_mode(&self) -> Option<&str> {
        self.current_mode.as_deref()
    }

    /// 执行整个序列
    pub async fn run(&mut self, steps: &[Step]) -> Result<RunReport, ControlError> {
        let mut report = RunReport::default();

        for (index, step) in steps.iter().enumerate() {
            if self.shutdown.is_cancelled() {
                report.cancelled = true;
                break;
            }

            if !matches!(step, Step::Pause { .. }) {
                println!("{}", step.banner());
            }
            debug!(index, step = %step.name(), "executing step");

            let outcome = match self.execute(index, step, &mut report).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(index, step = %step.name(), "step failed: {}", e);
                    report.current_mode = self.current_mode.clone();
                    return Err(e);
                },
            };
            report.executed += 1;

            if outcome == Wait::Cancelled {
                report.cancelled = true;
                break;
            }
        }

        report.current_mode = self.current_mode.clone();
        if report.cancelled {
            info!(executed = report.executed, total = steps.len(), "sequence cancelled");
        } else {
            info!(executed = report.executed, requests = report.requests, "sequence completed");
        }
        Ok(report)
    }

    async fn execute(
        &mut self,
        index: usize,
        step: &Step,
        report: &mut RunReport,
    ) -> Result<Wait, ControlError> {
        match step {
            Step::QueryMode => {
                let request = Request::motion(MotionSwitcherApi::CheckMode);
                let response = self
                    .publish(index, step, Topic::MotionSwitcher, request, report)
                    .await?;
                if response.is_success() {
                    let mode: MotionMode = response.decode_data()?;
                    println!("📋 当前运动模式: {}", mode.name);
                    info!(mode = %mode.name, "current motion mode");
                    self.current_mode = Some(mode.name);
                } else {
                    println!("⚠️  查询运动模式失败 (code={})", response.status_code());
                }
                Ok(self.checkpoint())
            },

            Step::EnsureMode { mode, .. } => {
                if self.current_mode.as_deref() == Some(mode.as_str()) {
                    println!("✅ 已处于 '{}' 模式，跳过切换", mode);
                    return Ok(self.checkpoint());
                }

                println!(
                    "🔄 切换运动模式: {} → '{}'",
                    self.current_mode.as_deref().unwrap_or("<unknown>"),
                    mode
                );
                self.switch_mode(index, step, mode, report).await
            },

            Step::SelectMode { mode, .. } => self.switch_mode(index, step, mode, report).await,

            Step::Command { .. } | Step::Request { .. } => {
                if let Some((topic, request)) = step.request() {
                    self.publish(index, step, topic, request, report).await?;
                }
                Ok(self.pause(step.settle()).await)
            },

            Step::Pause { .. } => Ok(self.pause(step.settle()).await),

            Step::Idle { seconds } => {
                for _ in 0..*seconds {
                    if self.shutdown.sleep(IDLE_TICK).await == Wait::Cancelled {
                        return Ok(Wait::Cancelled);
                    }
                }
                Ok(self.checkpoint())
            },
        }
    }

    async fn switch_mode(
        &mut self,
        index: usize,
        step: &Step,
        mode: &str,
        report: &mut RunReport,
    ) -> Result<Wait, ControlError> {
        let response = self
            .publish(index, step, Topic::MotionSwitcher, Request::select_mode(mode), report)
            .await?;
        if response.is_success() {
            self.current_mode = Some(mode.to_string());
        }
        Ok(self.pause(step.settle()).await)
    }

    /// 发送请求；非零状态码只记录
    async fn publish(
        &mut self,
        index: usize,
        step: &Step,
        topic: Topic,
        request: Request,
        report: &mut RunReport,
    ) -> Result<Response, ControlError> {
        let api_id = request.api_id;
        let response = self
            .channel
            .publish_request(topic, request)
            .await
            .map_err(|source| ControlError::Step {
                index,
                label: step.name(),
                source,
            })?;
        report.requests += 1;

        if let Err(e) = response.ensure_success() {
            let code = response.status_code();
            warn!(index, %topic, api_id, code, "request rejected by device: {}", e);
            report.rejected.push((index, code));
        }
        Ok(response)
    }

    async fn pause(&self, duration: Duration) -> Wait {
        if duration.is_zero() {
            return self.checkpoint();
        }
        self.shutdown.sleep(duration).await
    }

    fn checkpoint(&self) -> Wait {
        if self.shutdown.is_cancelled() {
            Wait::Cancelled
        } else {
            Wait::Elapsed
        }
    }
}

