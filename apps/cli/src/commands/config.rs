//! 配置管理命令

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::Path;

use crate::config::CliConfig;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 显示当前生效的配置
    Show,

    /// 写入默认配置文件
    Init {
        /// 覆盖已有文件
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(self, path: &Path) -> Result<()> {
        match self {
            ConfigCommand::Show => Self::show_(path),

            ConfigCommand::Init { force } => Self::init_(path, force),
        }
    }

    fn show_(path: &Path) -> Result<()> {
        let config = CliConfig::load(path)?;

        if path.exists() {
            println!("# 配置文件: {}", path.display());
        } else {
            println!("# 配置文件不存在，使用默认值: {}", path.display());
        }
        let text = toml::to_string_pretty(&config).context("序列化配置失败")?;
        println!("{}", text);
        Ok(())
    }

    fn init_(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            anyhow::bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
        }

        CliConfig::default().save(path)?;
        println!("✅ 已写入默认配置: {}", path.display());
        Ok(())
    }
}
