//! list 命令
//!
//! 打印 topic 和 Sport Mode 命令注册表

use go2_protocol::{MotionSwitcherApi, SportCommand, Topic};

pub fn execute() {
    println!("📡 Topics:");
    for topic in Topic::ALL {
        println!("  {:<16} {}", topic.logical_name(), topic.wire_id());
    }

    println!();
    println!("🔀 Motion Switcher API:");
    for api in MotionSwitcherApi::ALL {
        println!("  {:<16} {}", format!("{:?}", api), api.id());
    }

    println!();
    println!("🏃 Sport Mode 命令:");
    for command in SportCommand::ALL {
        println!("  {:<16} {}", command.name(), command.id());
    }
}
