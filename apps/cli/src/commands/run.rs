//! run 命令
//!
//! 执行 JSON 脚本文件

use anyhow::{Context, Result};
use clap::Args;
use go2_control::Script;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::time::Instant;

use super::session::{SessionArgs, execute_steps};
use crate::config::CliConfig;

/// 脚本执行命令参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 脚本文件路径
    #[arg(long)]
    pub script: PathBuf,

    #[command(flatten)]
    pub session: SessionArgs,
}

impl RunCommand {
    /// 执行脚本
    pub async fn execute(&self, config: &CliConfig) -> Result<()> {
        println!("📜 加载脚本: {}", self.script.display());

        let script = load_script(&self.script)?;

        println!("📋 脚本: {}", script.name);
        if !script.description.is_empty() {
            println!("    {}", script.description);
        }
        println!("    {} 个步骤", script.steps.len());
        println!();

        let start = Instant::now();
        let report = execute_steps(config, &self.session, &script.steps).await?;

        println!();
        println!("📊 执行结果:");
        println!("  总步骤数: {}", script.steps.len());
        println!("  已执行: {}", report.executed);
        println!("  请求数: {}", report.requests);
        println!("  被拒绝: {}", report.rejected.len());
        println!("  耗时: {:.2} 秒", start.elapsed().as_secs_f64());

        Ok(())
    }
}

/// 加载脚本文件
pub fn load_script(path: &Path) -> Result<Script> {
    let content = fs::read_to_string(path).context("读取脚本文件失败")?;
    let script = Script::from_json(&content).context("解析脚本 JSON 失败")?;
    Ok(script)
}
