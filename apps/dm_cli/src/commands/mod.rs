// apps/dm_cli/src/commands/mod.rs

//! 命令实现

pub mod info;
pub mod run;
