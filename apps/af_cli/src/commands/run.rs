// apps/af_cli/src/commands/run.rs

//! 运行求解命令
//!
//! 装配求解器后进入主循环：越过导出时刻就写一帧 EnSight 数据，
//! 推进结束后补写末帧并保存重启检查点。

use anyhow::{Context, Result};
use af_io::{build_solver, CaseFile, EnsightExporter, Restart};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// 运行求解参数
#[derive(Args)]
pub struct RunArgs {
    /// 算例文件路径
    #[arg(short, long)]
    pub case: PathBuf,

    /// 输出目录
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// 从检查点继续
    #[arg(long)]
    pub restart: Option<PathBuf>,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== AeroFlux 求解启动 ===");

    let case = CaseFile::load(&args.case)
        .with_context(|| format!("加载算例失败: {}", args.case.display()))?;
    let mut solver = build_solver(&case).context("装配求解器失败")?;

    if let Some(path) = &args.restart {
        let restart = Restart::load(path)
            .with_context(|| format!("加载检查点失败: {}", path.display()))?;
        restart.apply(&mut solver).context("恢复检查点失败")?;
    }

    let (fluid, solid, ghost, exterior) = solver.space().count_kinds();
    info!(
        "网格: {} 节点 (流体 {fluid}, 固体 {solid}, 幽灵 {ghost}, 外部 {exterior})",
        solver.space().n_max
    );
    info!(
        "推进: 总时间 {:.6}, 步数上限 {}, CFL {}",
        solver.time().total_time,
        solver.time().total_step,
        solver.time().cfl
    );

    let mut exporter = EnsightExporter::new(&args.output)?;
    let wall_clock = Instant::now();

    loop {
        if solver.time().should_output() {
            exporter.write_step(&solver)?;
            solver.time_mut().mark_output();
        }
        if solver.time().finished() {
            break;
        }
        let summary = solver.step().context("推进失败")?;
        if solver.time().step_count % 200 == 0 {
            info!(
                "第 {} 步: t = {:.6}, dt = {:.3e}",
                solver.time().step_count,
                summary.time,
                summary.dt
            );
        }
    }

    let checkpoint_path = args.output.join("restart.afck");
    Restart::capture(&solver).save(&checkpoint_path)?;

    info!("=== 求解完成 ===");
    info!("总步数: {}", solver.time().step_count);
    info!("模拟时间: {:.6}", solver.time().current_time);
    info!("墙钟时间: {:.2} s", wall_clock.elapsed().as_secs_f64());
    info!("检查点: {}", checkpoint_path.display());
    Ok(())
}
