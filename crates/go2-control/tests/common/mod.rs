//! 测试辅助：统计 disconnect 次数的连接包装

#![allow(dead_code)]

use go2_driver::{Connection, DeviceTarget, DriverError, SimChannel, SimConnection, SimulatedGo2};

/// 包装模拟连接，记录清理次数，可选让 disconnect 失败
pub struct CountingConnection {
    inner: SimConnection,
    pub disconnects: usize,
    pub fail_disconnect: bool,
}

impl CountingConnection {
    pub fn new(robot: &SimulatedGo2) -> Self {
        Self {
            inner: robot.connection(DeviceTarget::local_ap()),
            disconnects: 0,
            fail_disconnect: false,
        }
    }
}

impl Connection for CountingConnection {
    type Channel = SimChannel;

    fn target(&self) -> &DeviceTarget {
        self.inner.target()
    }

    async fn connect(&mut self) -> Result<(), DriverError> {
        self.inner.connect().await
    }

    fn datachannel(&self) -> &SimChannel {
        self.inner.datachannel()
    }

    async fn disconnect(&mut self) -> Result<(), DriverError> {
        self.disconnects += 1;
        if self.fail_disconnect {
            return Err(DriverError::Connection("simulated teardown failure".to_string()));
        }
        self.inner.disconnect().await
    }
}
