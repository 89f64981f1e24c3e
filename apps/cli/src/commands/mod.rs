//! 命令定义和实现

pub mod config;
pub mod demo;
pub mod list;
pub mod run;
pub mod session;

pub use config::ConfigCommand;
pub use demo::DemoCommand;
pub use run::RunCommand;
