// apps/af_cli/src/commands/postprocess.rs

//! 后处理命令
//!
//! 从检查点恢复求解器状态并重新导出一帧场数据，不做推进。

use anyhow::{Context, Result};
use af_io::{build_solver, CaseFile, EnsightExporter, Restart};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// 后处理参数
#[derive(Args)]
pub struct PostprocessArgs {
    /// 算例文件路径
    #[arg(short, long)]
    pub case: PathBuf,

    /// 检查点文件路径
    #[arg(short, long)]
    pub restart: PathBuf,

    /// 输出目录
    #[arg(short, long, default_value = "postprocess")]
    pub output: PathBuf,
}

/// 执行后处理命令
pub fn execute(args: PostprocessArgs) -> Result<()> {
    info!("=== AeroFlux 后处理 ===");

    let case = CaseFile::load(&args.case)
        .with_context(|| format!("加载算例失败: {}", args.case.display()))?;
    let mut solver = build_solver(&case).context("装配求解器失败")?;

    let restart = Restart::load(&args.restart)
        .with_context(|| format!("加载检查点失败: {}", args.restart.display()))?;
    restart.apply(&mut solver).context("恢复检查点失败")?;

    let mut exporter = EnsightExporter::new(&args.output)?;
    exporter.write_step(&solver)?;
    info!(
        "第 {} 步 (t = {:.6}) 的场已导出到 {}",
        solver.time().step_count,
        solver.time().current_time,
        args.output.display()
    );
    Ok(())
}
