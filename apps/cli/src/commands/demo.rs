//! demo 命令
//!
//! 执行预置的 sport-mode 演示序列

use anyhow::Result;
use clap::Args;
use go2_control::sportmode_demo;

use super::session::{SessionArgs, execute_steps};
use crate::config::CliConfig;

/// 演示命令参数
#[derive(Args, Debug)]
pub struct DemoCommand {
    #[command(flatten)]
    pub session: SessionArgs,

    /// 序列末尾的空闲时长（秒，覆盖配置）
    #[arg(long)]
    pub idle_seconds: Option<u64>,
}

impl DemoCommand {
    pub async fn execute(&self, config: &CliConfig) -> Result<()> {
        let idle = self.idle_seconds.unwrap_or(config.session.idle_seconds);
        let steps = sportmode_demo(idle);

        println!("🤖 Go2 sport-mode 演示（{} 个步骤，空闲 {} 秒）", steps.len(), idle);
        println!();

        execute_steps(config, &self.session, &steps).await?;
        Ok(())
    }
}
