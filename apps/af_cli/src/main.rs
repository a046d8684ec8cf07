// apps/af_cli/src/main.rs

//! AeroFlux 命令行界面
//!
//! 三维可压缩 Navier-Stokes 求解器（均匀笛卡尔网格 + 幽灵单元
//! 浸入边界）的命令行入口。
//!
//! # 运行模式
//!
//! - `run`: 完整求解，按计划导出 EnSight 场并在结束时写检查点
//! - `preprocess`: 只做预处理（装配 + 几何分类 + 第 0 帧导出）
//! - `postprocess`: 从检查点恢复并重新导出
//! - `interactive`: 交互模式

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// AeroFlux 可压缩流求解器命令行工具
#[derive(Parser)]
#[command(name = "af_cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AeroFlux compressible Navier-Stokes solver", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行求解
    Run(commands::run::RunArgs),
    /// 预处理：装配并分类，不推进
    Preprocess(commands::preprocess::PreprocessArgs),
    /// 后处理：从检查点恢复并导出
    Postprocess(commands::postprocess::PostprocessArgs),
    /// 交互模式
    Interactive,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

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

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Preprocess(args) => commands::preprocess::execute(args),
        Commands::Postprocess(args) => commands::postprocess::execute(args),
        Commands::Interactive => commands::interactive::execute(),
    }
}
