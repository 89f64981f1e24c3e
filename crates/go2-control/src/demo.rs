//! 预置的 sport-mode 演示序列
//!
//! 查询模式 → 确保 normal → Hello → 前进 → 后退 → 切到 ai → StandOut → 收回
//! → 空闲等待。每个动作后的等待时间用于让机器人完成物理动作。

use crate::step::Step;
use go2_protocol::SportCommand;
use serde_json::json;
use std::time::Duration;

/// 默认空闲时长（10 分钟）
pub const DEFAULT_IDLE_SECONDS: u64 = 600;

/// 前进/后退速度（m/s）
const MOVE_SPEED: f64 = 0.5;

/// 构建演示序列
pub fn sportmode_demo(idle_seconds: u64) -> Vec<Step> {
    vec![
        Step::QueryMode,
        // 站立需要一些时间
        Step::EnsureMode {
            mode: "normal".to_string(),
            settle_ms: 5_000,
        },
        Step::command(SportCommand::Hello, Duration::from_secs(1)).labeled("👋 执行 Hello 动作..."),
        Step::command_with(
            SportCommand::Move,
            json!({ "x": MOVE_SPEED, "y": 0, "z": 0 }),
            Duration::from_secs(3),
        )
        .labeled("⬆️  前进..."),
        Step::command_with(
            SportCommand::Move,
            json!({ "x": -MOVE_SPEED, "y": 0, "z": 0 }),
            Duration::from_secs(3),
        )
        .labeled("⬇️  后退..."),
        Step::SelectMode {
            mode: "ai".to_string(),
            settle_ms: 10_000,
        },
        Step::command_with(
            SportCommand::StandOut,
            json!({ "data": true }),
            Duration::from_secs(5),
        )
        .labeled("🤸 切换到倒立姿态..."),
        Step::command_with(SportCommand::StandOut, json!({ "data": false }), Duration::ZERO)
            .labeled("🧍 恢复站立姿态..."),
        Step::Idle {
            seconds: idle_seconds,
        },
    ]
}
