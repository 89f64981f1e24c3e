//! 模拟机器人后端
//!
//! 进程内模拟 Go2 的 Motion Switcher / Sport Mode 服务，实现 [`Connection`] 与
//! [`DataChannel`]，用于在没有实机的情况下运行完整的会话流程。
//!
//! 支持注入故障：
//! - 前 N 次 `connect()` 失败
//! - 数据通道打开延迟（配合超时测试）
//! - 指定 API 返回非零状态码
//! - 指定 API 发布时直接报错
//!
//! ```rust
//! use go2_driver::{Connection, DataChannel, DeviceTarget, SimulatedGo2};
//! use go2_driver::protocol::{Request, SportCommand, Topic};
//! use std::time::Duration;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let robot = SimulatedGo2::builder().initial_mode("ai").build();
//! let mut conn = robot.connection(DeviceTarget::local_ap());
//!
//! conn.connect().await.unwrap();
//! conn.datachannel().wait_open(Duration::from_secs(30)).await.unwrap();
//!
//! let resp = conn
//!     .datachannel()
//!     .publish_request(Topic::SportMode, Request::sport(SportCommand::Hello))
//!     .await
//!     .unwrap();
//! assert!(resp.is_success());
//! # });
//! ```

use crate::channel::{Connection, DataChannel};
use crate::error::DriverError;
use crate::target::DeviceTarget;
use go2_protocol::{
    Identity, MotionSwitcherApi, Request, RequestEnvelope, Response, STATUS_OK, SportCommand,
    Topic,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// 未知 API ID
pub const STATUS_UNKNOWN_API: i64 = 3203;

/// 参数缺失或格式错误
pub const STATUS_BAD_PARAMETER: i64 = 3204;

/// 模拟设备状态
#[derive(Debug)]
struct SimState {
    motion_mode: String,
    stance_out: bool,
    velocity: [f64; 3],

    connected: bool,
    channel_closed: bool,
    connect_attempts: u32,
    connect_failures_remaining: u32,

    open_delay: Duration,
    response_delay: Duration,
    rejections: HashMap<(Topic, u32), i64>,
    publish_errors: HashSet<(Topic, u32)>,

    next_request_id: u64,
    log: Vec<RequestEnvelope>,
}

/// 模拟机器人
///
/// 克隆得到的句柄共享同一份设备状态，可在测试中检查请求记录。
#[derive(Debug, Clone)]
pub struct SimulatedGo2 {
    state: Arc<Mutex<SimState>>,
}

/// [`SimulatedGo2`] 构建器
#[derive(Debug, Clone)]
pub struct SimulatedGo2Builder {
    initial_mode: String,
    connect_failures: u32,
    open_delay: Duration,
    response_delay: Duration,
    rejections: HashMap<(Topic, u32), i64>,
    publish_errors: HashSet<(Topic, u32)>,
}

impl Default for SimulatedGo2Builder {
    fn default() -> Self {
        Self {
            initial_mode: "normal".to_string(),
            connect_failures: 0,
            open_delay: Duration::ZERO,
            response_delay: Duration::ZERO,
            rejections: HashMap::new(),
            publish_errors: HashSet::new(),
        }
    }
}

impl SimulatedGo2Builder {
    /// 初始运动模式（默认 `normal`）
    pub fn initial_mode(mut self, mode: impl Into<String>) -> Self {
        self.initial_mode = mode.into();
        self
    }

    /// 前 `n` 次 `connect()` 失败
    pub fn connect_failures(mut self, n: u32) -> Self {
        self.connect_failures = n;
        self
    }

    /// 数据通道打开所需时间
    pub fn open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }

    /// 每个请求的响应延迟
    pub fn response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = delay;
        self
    }

    /// 指定 API 返回非零状态码
    pub fn reject(mut self, topic: Topic, api_id: u32, code: i64) -> Self {
        self.rejections.insert((topic, api_id), code);
        self
    }

    /// 指定 API 发布时返回连接错误
    pub fn fail_publish(mut self, topic: Topic, api_id: u32) -> Self {
        self.publish_errors.insert((topic, api_id));
        self
    }

    pub fn build(self) -> SimulatedGo2 {
        SimulatedGo2 {
            state: Arc::new(Mutex::new(SimState {
                motion_mode: self.initial_mode,
                stance_out: false,
                velocity: [0.0; 3],
                connected: false,
                channel_closed: false,
                connect_attempts: 0,
                connect_failures_remaining: self.connect_failures,
                open_delay: self.open_delay,
                response_delay: self.response_delay,
                rejections: self.rejections,
                publish_errors: self.publish_errors,
                next_request_id: 1,
                log: Vec::new(),
            })),
        }
    }
}

impl SimulatedGo2 {
    pub fn builder() -> SimulatedGo2Builder {
        SimulatedGo2Builder::default()
    }

    /// 创建一个指向该模拟设备的连接
    pub fn connection(&self, target: DeviceTarget) -> SimConnection {
        SimConnection {
            target,
            channel: SimChannel {
                state: self.state.clone(),
            },
        }
    }

    /// 当前运动模式
    pub fn motion_mode(&self) -> String {
        self.state.lock().motion_mode.clone()
    }

    /// 是否处于 StandOut 姿态
    pub fn stance_out(&self) -> bool {
        self.state.lock().stance_out
    }

    /// 最近一次 Move 命令的速度 `[x, y, z]`
    pub fn last_velocity(&self) -> [f64; 3] {
        self.state.lock().velocity
    }

    /// `connect()` 被调用的次数
    pub fn connect_attempts(&self) -> u32 {
        self.state.lock().connect_attempts
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    /// 已收到的请求（线上信封形式）
    pub fn envelopes(&self) -> Vec<RequestEnvelope> {
        self.state.lock().log.clone()
    }

    /// 已收到的请求（topic + 负载形式）
    pub fn requests(&self) -> Vec<(Topic, Request)> {
        self.state
            .lock()
            .log
            .iter()
            .filter_map(|env| Some((env.topic().ok()?, env.request().ok()?)))
            .collect()
    }
}

/// 模拟连接
#[derive(Debug)]
pub struct SimConnection {
    target: DeviceTarget,
    channel: SimChannel,
}

/// 模拟数据通道
#[derive(Debug, Clone)]
pub struct SimChannel {
    state: Arc<Mutex<SimState>>,
}

impl Connection for SimConnection {
    type Channel = SimChannel;

    fn target(&self) -> &DeviceTarget {
        &self.target
    }

    async fn connect(&mut self) -> Result<(), DriverError> {
        self.target.validate()?;

        let mut state = self.channel.state.lock();
        state.connect_attempts += 1;

        if state.connect_failures_remaining > 0 {
            state.connect_failures_remaining -= 1;
            debug!(attempt = state.connect_attempts, "simulated connect failure");
            return Err(DriverError::Connection(format!(
                "simulated failure connecting to {}",
                self.target
            )));
        }

        state.connected = true;
        state.channel_closed = false;
        debug!(device = %self.target, "simulated session established");
        Ok(())
    }

    fn datachannel(&self) -> &SimChannel {
        &self.channel
    }

    async fn disconnect(&mut self) -> Result<(), DriverError> {
        let mut state = self.channel.state.lock();
        state.connected = false;
        state.channel_closed = true;
        debug!("simulated session released");
        Ok(())
    }
}

impl DataChannel for SimChannel {
    async fn wait_open(&self, timeout: Duration) -> Result<(), DriverError> {
        let open_delay = {
            let state = self.state.lock();
            if !state.connected {
                return Err(DriverError::NotConnected);
            }
            state.open_delay
        };

        if open_delay > timeout {
            tokio::time::sleep(timeout).await;
            return Err(DriverError::Timeout(timeout));
        }

        if !open_delay.is_zero() {
            tokio::time::sleep(open_delay).await;
        }
        Ok(())
    }

    async fn publish_request(&self, topic: Topic, request: Request) -> Result<Response, DriverError> {
        let (response, delay) = {
            let mut state = self.state.lock();
            if state.channel_closed {
                return Err(DriverError::ChannelClosed);
            }
            if !state.connected {
                return Err(DriverError::NotConnected);
            }

            let id = state.next_request_id;
            state.next_request_id += 1;
            state.log.push(RequestEnvelope::new(topic, &request, id)?);
            trace!(id, %topic, api_id = request.api_id, "simulated request");

            let key = (topic, request.api_id);
            if state.publish_errors.contains(&key) {
                return Err(DriverError::Connection(format!(
                    "simulated publish failure on {} api {}",
                    topic, request.api_id
                )));
            }

            let identity = Identity {
                id,
                api_id: request.api_id,
            };
            let rejected = state.rejections.get(&key).copied();
            let response = match rejected {
                Some(code) => Response::new(identity, code, ""),
                None => state.handle(topic, &request, identity),
            };
            (response, state.response_delay)
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(response)
    }
}

impl SimState {
    fn handle(&mut self, topic: Topic, request: &Request, identity: Identity) -> Response {
        match topic {
            Topic::MotionSwitcher => self.handle_motion_switcher(request, identity),
            Topic::SportMode => self.handle_sport(request, identity),
            Topic::ObstaclesAvoid | Topic::Vui => Response::new(identity, STATUS_OK, ""),
        }
    }

    fn handle_motion_switcher(&mut self, request: &Request, identity: Identity) -> Response {
        match MotionSwitcherApi::try_from(request.api_id) {
            Ok(MotionSwitcherApi::CheckMode) => {
                let data = serde_json::json!({ "form": "0", "name": self.motion_mode });
                Response::new(identity, STATUS_OK, data.to_string())
            },
            Ok(MotionSwitcherApi::SelectMode) => {
                let name = request
                    .parameter
                    .as_ref()
                    .and_then(|p| p.get("name"))
                    .and_then(|n| n.as_str());
                match name {
                    Some(name) => {
                        debug!(from = %self.motion_mode, to = name, "simulated mode switch");
                        self.motion_mode = name.to_string();
                        Response::new(identity, STATUS_OK, "")
                    },
                    None => Response::new(identity, STATUS_BAD_PARAMETER, ""),
                }
            },
            Ok(MotionSwitcherApi::ReleaseMode) => {
                self.motion_mode.clear();
                Response::new(identity, STATUS_OK, "")
            },
            Ok(_) => Response::new(identity, STATUS_OK, ""),
            Err(_) => Response::new(identity, STATUS_UNKNOWN_API, ""),
        }
    }

    fn handle_sport(&mut self, request: &Request, identity: Identity) -> Response {
        let Some(command) = SportCommand::from_id(request.api_id) else {
            return Response::new(identity, STATUS_UNKNOWN_API, "");
        };

        match command {
            SportCommand::Move => {
                let axis = |key: &str| {
                    request
                        .parameter
                        .as_ref()
                        .and_then(|p| p.get(key))
                        .and_then(|v| v.as_f64())
                };
                match (axis("x"), axis("y"), axis("z")) {
                    (Some(x), Some(y), Some(z)) => self.velocity = [x, y, z],
                    _ => return Response::new(identity, STATUS_BAD_PARAMETER, ""),
                }
            },
            SportCommand::StandOut => {
                match request
                    .parameter
                    .as_ref()
                    .and_then(|p| p.get("data"))
                    .and_then(|v| v.as_bool())
                {
                    Some(out) => self.stance_out = out,
                    None => return Response::new(identity, STATUS_BAD_PARAMETER, ""),
                }
            },
            SportCommand::StopMove => self.velocity = [0.0; 3],
            _ => {},
        }

        Response::new(identity, STATUS_OK, "")
    }
}
