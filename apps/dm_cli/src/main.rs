// apps/dm_cli/src/main.rs

//! DeltaMorph 命令行界面
//!
//! 海岸三角洲形态耦合模型的命令行工具。应用层只接触
//! [`dm_bmi::DeltaModel`] 门面和 `Box<dyn MorphologyKernel>`，
//! 不直接操作引擎内部。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// DeltaMorph 海岸三角洲形态模型命令行工具
#[derive(Parser)]
#[command(name = "dm_cli")]
#[command(author = "DeltaMorph Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "DeltaMorph coastal delta morphology model", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行模拟
    Run(commands::run::RunArgs),
    /// 显示交换量与网格信息
    Info(commands::info::InfoArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
    }
}
