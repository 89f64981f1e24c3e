//! 连接重试测试
//!
//! 使用暂停的 tokio 时钟：模拟连接本身不消耗时间，因此总耗时等于
//! 「重试间隔 × 等待次数」。

use go2_control::{RetryPolicy, ShutdownToken, connect_with_retry};
use go2_driver::{DeviceTarget, SimulatedGo2};
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_fails_twice_then_succeeds() {
    let robot = SimulatedGo2::builder().connect_failures(2).build();
    let mut conn = robot.connection(DeviceTarget::local_ap());
    let policy = RetryPolicy::default();

    let start = Instant::now();
    let connected = connect_with_retry(&mut conn, &policy, &ShutdownToken::new()).await;

    assert!(connected);
    assert_eq!(robot.connect_attempts(), 3);
    // 恰好等待两次
    assert_eq!(start.elapsed(), policy.delay * 2);
}

#[tokio::test(start_paused = true)]
async fn test_always_fails() {
    let robot = SimulatedGo2::builder().connect_failures(u32::MAX).build();
    let mut conn = robot.connection(DeviceTarget::local_ap());
    let policy = RetryPolicy::default();

    let start = Instant::now();
    let connected = connect_with_retry(&mut conn, &policy, &ShutdownToken::new()).await;

    assert!(!connected);
    assert_eq!(robot.connect_attempts(), policy.max_retries);
    assert_eq!(start.elapsed(), policy.delay * (policy.max_retries - 1));
}

#[tokio::test(start_paused = true)]
async fn test_custom_policy() {
    let robot = SimulatedGo2::builder().connect_failures(u32::MAX).build();
    let mut conn = robot.connection(DeviceTarget::local_ap());
    let policy = RetryPolicy::new(5, Duration::from_millis(250));

    let start = Instant::now();
    assert!(!connect_with_retry(&mut conn, &policy, &ShutdownToken::new()).await);

    assert_eq!(robot.connect_attempts(), 5);
    assert_eq!(start.elapsed(), Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_first_attempt_success_does_not_wait() {
    let robot = SimulatedGo2::builder().build();
    let mut conn = robot.connection(DeviceTarget::local_ap());

    let start = Instant::now();
    assert!(connect_with_retry(&mut conn, &RetryPolicy::default(), &ShutdownToken::new()).await);

    assert_eq!(robot.connect_attempts(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_zero_retries_makes_no_attempt() {
    let robot = SimulatedGo2::builder().build();
    let mut conn = robot.connection(DeviceTarget::local_ap());
    let policy = RetryPolicy::new(0, Duration::from_secs(5));

    assert!(!connect_with_retry(&mut conn, &policy, &ShutdownToken::new()).await);
    assert_eq!(robot.connect_attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_during_delay_stops_retrying() {
    let robot = SimulatedGo2::builder().connect_failures(u32::MAX).build();
    let mut conn = robot.connection(DeviceTarget::local_ap());
    let token = ShutdownToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    assert!(!connect_with_retry(&mut conn, &RetryPolicy::default(), &token).await);

    assert_eq!(robot.connect_attempts(), 1);
    assert_eq!(start.elapsed(), Duration::from_secs(1));
}
