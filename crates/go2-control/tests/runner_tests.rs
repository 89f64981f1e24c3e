//! 步骤执行器测试

use go2_control::{ControlError, ErrorKind, SequenceRunner, ShutdownToken, Step, sportmode_demo};
use go2_driver::protocol::{MotionSwitcherApi, SportCommand, Topic};
use go2_driver::{Connection, DeviceTarget, SimConnection, SimulatedGo2};
use std::time::Duration;
use tokio::time::Instant;

async fn connected(robot: &SimulatedGo2) -> SimConnection {
    let mut conn = robot.connection(DeviceTarget::local_ap());
    conn.connect().await.unwrap();
    conn
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_before_start_sends_nothing() {
    let robot = SimulatedGo2::builder().initial_mode("ai").build();
    let conn = connected(&robot).await;
    let token = ShutdownToken::new();
    token.cancel();

    let report = SequenceRunner::new(conn.datachannel(), token)
        .run(&sportmode_demo(600))
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.executed, 0);
    assert_eq!(report.requests, 0);
    assert!(robot.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_rejected_query_leaves_mode_unset() {
    let robot = SimulatedGo2::builder()
        .reject(Topic::MotionSwitcher, MotionSwitcherApi::CheckMode.id(), 3104)
        .build();
    let conn = connected(&robot).await;

    let mut runner = SequenceRunner::new(conn.datachannel(), ShutdownToken::new());
    let report = runner.run(&[Step::QueryMode]).await.unwrap();

    assert_eq!(runner.current_mode(), None);
    assert_eq!(report.current_mode, None);
    assert_eq!(report.rejected, vec![(0, 3104)]);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_query_keeps_known_mode() {
    let robot = SimulatedGo2::builder()
        .initial_mode("ai")
        .reject(Topic::MotionSwitcher, MotionSwitcherApi::CheckMode.id(), 3104)
        .build();
    let conn = connected(&robot).await;

    let steps = [
        Step::SelectMode {
            mode: "normal".to_string(),
            settle_ms: 0,
        },
        Step::QueryMode,
    ];
    let report = SequenceRunner::new(conn.datachannel(), ShutdownToken::new())
        .run(&steps)
        .await
        .unwrap();

    assert_eq!(report.current_mode.as_deref(), Some("normal"));
    assert_eq!(report.rejected, vec![(1, 3104)]);
}

#[tokio::test(start_paused = true)]
async fn test_ensure_mode_skips_when_already_normal() {
    let robot = SimulatedGo2::builder().initial_mode("normal").build();
    let conn = connected(&robot).await;

    let steps = [
        Step::QueryMode,
        Step::EnsureMode {
            mode: "normal".to_string(),
            settle_ms: 5_000,
        },
    ];

    let start = Instant::now();
    let report = SequenceRunner::new(conn.datachannel(), ShutdownToken::new())
        .run(&steps)
        .await
        .unwrap();

    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(report.requests, 1);
    assert_eq!(robot.requests().len(), 1);
    assert_eq!(report.executed, 2);
}

#[tokio::test(start_paused = true)]
async fn test_ensure_mode_switches_and_settles() {
    let robot = SimulatedGo2::builder().initial_mode("ai").build();
    let conn = connected(&robot).await;

    let steps = [
        Step::QueryMode,
        Step::EnsureMode {
            mode: "normal".to_string(),
            settle_ms: 5_000,
        },
    ];

    let start = Instant::now();
    let report = SequenceRunner::new(conn.datachannel(), ShutdownToken::new())
        .run(&steps)
        .await
        .unwrap();

    assert_eq!(start.elapsed(), Duration::from_secs(5));
    assert_eq!(report.requests, 2);
    assert_eq!(report.current_mode.as_deref(), Some("normal"));
    assert_eq!(robot.motion_mode(), "normal");
}

#[tokio::test(start_paused = true)]
async fn test_unknown_mode_is_switched() {
    let robot = SimulatedGo2::builder()
        .initial_mode("normal")
        .reject(Topic::MotionSwitcher, MotionSwitcherApi::CheckMode.id(), 1)
        .build();
    let conn = connected(&robot).await;

    let steps = [
        Step::QueryMode,
        Step::EnsureMode {
            mode: "normal".to_string(),
            settle_ms: 0,
        },
    ];
    let report = SequenceRunner::new(conn.datachannel(), ShutdownToken::new())
        .run(&steps)
        .await
        .unwrap();

    // 查询失败时当前模式未知，仍然发送切换请求
    assert_eq!(report.requests, 2);
    assert_eq!(report.current_mode.as_deref(), Some("normal"));
}

#[tokio::test(start_paused = true)]
async fn test_full_demo_against_simulator() {
    let robot = SimulatedGo2::builder().initial_mode("ai").build();
    let conn = connected(&robot).await;

    let start = Instant::now();
    let report = SequenceRunner::new(conn.datachannel(), ShutdownToken::new())
        .run(&sportmode_demo(3))
        .await
        .unwrap();

    assert!(!report.cancelled);
    assert_eq!(report.executed, 9);
    assert_eq!(report.requests, 8);
    assert!(report.rejected.is_empty());
    assert_eq!(report.current_mode.as_deref(), Some("ai"));
    assert_eq!(start.elapsed(), Duration::from_secs(5 + 1 + 3 + 3 + 10 + 5 + 3));

    assert_eq!(robot.motion_mode(), "ai");
    assert!(!robot.stance_out());
    assert_eq!(robot.last_velocity(), [-0.5, 0.0, 0.0]);

    let api_ids: Vec<u32> = robot.requests().iter().map(|(_, r)| r.api_id).collect();
    assert_eq!(
        api_ids,
        vec![
            MotionSwitcherApi::CheckMode.id(),
            MotionSwitcherApi::SelectMode.id(),
            SportCommand::Hello.id(),
            SportCommand::Move.id(),
            SportCommand::Move.id(),
            MotionSwitcherApi::SelectMode.id(),
            SportCommand::StandOut.id(),
            SportCommand::StandOut.id(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_settle_skips_remaining_requests() {
    let robot = SimulatedGo2::builder().initial_mode("ai").build();
    let conn = connected(&robot).await;
    let token = ShutdownToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let report = SequenceRunner::new(conn.datachannel(), token)
        .run(&sportmode_demo(600))
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(start.elapsed(), Duration::from_secs(2));
    // 查询 + 切换到 normal，之后的请求全部跳过
    assert_eq!(report.requests, 2);
    assert_eq!(robot.requests().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_request_completes_after_cancel() {
    let robot = SimulatedGo2::builder()
        .initial_mode("normal")
        .response_delay(Duration::from_secs(2))
        .build();
    let conn = connected(&robot).await;
    let token = ShutdownToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let report = SequenceRunner::new(conn.datachannel(), token)
        .run(&sportmode_demo(600))
        .await
        .unwrap();

    // 正在进行的查询不被打断，之后的步骤全部跳过
    assert!(report.cancelled);
    assert_eq!(report.requests, 1);
    assert_eq!(report.executed, 1);
    assert_eq!(report.current_mode.as_deref(), Some("normal"));
    assert_eq!(start.elapsed(), Duration::from_secs(2));
    assert_eq!(robot.requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_idle() {
    let robot = SimulatedGo2::builder().initial_mode("normal").build();
    let conn = connected(&robot).await;
    let token = ShutdownToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(100)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let report = SequenceRunner::new(conn.datachannel(), token)
        .run(&[Step::Idle { seconds: 600 }])
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.executed, 1);
    assert_eq!(start.elapsed(), Duration::from_secs(100));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_command_does_not_abort() {
    let robot = SimulatedGo2::builder()
        .reject(Topic::SportMode, SportCommand::Hello.id(), 7)
        .build();
    let conn = connected(&robot).await;

    let steps = [
        Step::command(SportCommand::Hello, Duration::from_secs(1)),
        Step::command(SportCommand::Sit, Duration::ZERO),
    ];
    let report = SequenceRunner::new(conn.datachannel(), ShutdownToken::new())
        .run(&steps)
        .await
        .unwrap();

    assert_eq!(report.executed, 2);
    assert_eq!(report.rejected, vec![(0, 7)]);
}

#[tokio::test(start_paused = true)]
async fn test_publish_error_aborts_sequence() {
    let robot = SimulatedGo2::builder()
        .fail_publish(Topic::SportMode, SportCommand::Hello.id())
        .build();
    let conn = connected(&robot).await;

    let err = SequenceRunner::new(conn.datachannel(), ShutdownToken::new())
        .run(&sportmode_demo(600))
        .await
        .unwrap_err();

    assert!(matches!(err, ControlError::Step { index: 2, .. }));
    assert_eq!(err.kind(), ErrorKind::Connection);
    // 已处于 normal：查询 + Hello，之后没有更多请求
    assert_eq!(robot.requests().len(), 2);
}
