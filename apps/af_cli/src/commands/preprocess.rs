// apps/af_cli/src/commands/preprocess.rs

//! 预处理命令
//!
//! 只装配求解器并做几何分类，打印节点统计并导出第 0 帧，不做时间
//! 推进。用于在长算例前检查算例设置。

use anyhow::{Context, Result};
use af_io::{build_solver, CaseFile, EnsightExporter};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// 预处理参数
#[derive(Args)]
pub struct PreprocessArgs {
    /// 算例文件路径
    #[arg(short, long)]
    pub case: PathBuf,

    /// 输出目录
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,
}

/// 执行预处理命令
pub fn execute(args: PreprocessArgs) -> Result<()> {
    info!("=== AeroFlux 预处理 ===");

    let case = CaseFile::load(&args.case)
        .with_context(|| format!("加载算例失败: {}", args.case.display()))?;
    let mut solver = build_solver(&case).context("装配求解器失败")?;

    let space = solver.space();
    info!(
        "节点层数: {} x {} x {} (含幽灵层 {} x {} x {})",
        space.nx, space.ny, space.nz, space.i_max, space.j_max, space.k_max
    );
    info!(
        "网格间距: dx = {:.6e}, dy = {:.6e}, dz = {:.6e}",
        space.dx, space.dy, space.dz
    );
    let (fluid, solid, ghost, exterior) = space.count_kinds();
    info!("节点分类: 流体 {fluid}, 固体 {solid}, 幽灵 {ghost}, 外部 {exterior}");
    info!("刚体数: {}", solver.bodies().len());

    let mut exporter = EnsightExporter::new(&args.output)?;
    exporter.write_step(&solver)?;
    solver.time_mut().mark_output();
    info!("第 0 帧已导出到 {}", args.output.display());
    Ok(())
}
