// crates/af_physics/src/timestep.rs

//! 时间推进控制
//!
//! CFL 条件下的自适应时间步长与时间推进状态量。最大波速在全部
//! 正常节点上并行归约，时间步长取
//! `dt = CFL * min(dx, dy, dz) / max(|u_s| + c)`。

use af_domain::field::Field;
use af_domain::space::Space;
use af_foundation::error::{CoreError, CoreResult};
use rayon::prelude::*;

use crate::model::FlowModel;

/// 步数上限的替代哨兵（用户给负值时采用）
pub const UNLIMITED_STEPS: usize = 9_000_000;

/// 时间推进状态量
#[derive(Debug, Clone, Copy)]
pub struct TimeControl {
    /// 归一化总时间
    pub total_time: f64,
    /// 当前时间
    pub current_time: f64,
    /// 当前时间步长
    pub dt: f64,
    /// CFL 数
    pub cfl: f64,
    /// 步数上限
    pub total_step: usize,
    /// 已完成步数
    pub step_count: usize,
    /// 计划导出次数
    pub total_output: usize,
    /// 已导出次数
    pub output_count: usize,
}

impl TimeControl {
    /// 解析用户输入
    ///
    /// 总时间按 `U_ref / L_ref` 归一化；步数上限为负表示不设限，
    /// 用大哨兵替代。
    pub fn resolve(
        total_time: f64,
        total_step: i64,
        cfl: f64,
        total_output: usize,
        model: &FlowModel,
    ) -> CoreResult<Self> {
        if total_time <= 0.0 {
            return Err(CoreError::out_of_range("time.total_time", total_time, "总时间必须为正"));
        }
        if cfl <= 0.0 {
            return Err(CoreError::out_of_range("time.cfl", cfl, "CFL 数必须为正"));
        }
        if total_output == 0 {
            return Err(CoreError::out_of_range("time.total_output", total_output, "导出次数至少为 1"));
        }
        Ok(Self {
            total_time: total_time * model.ref_velocity / model.ref_length,
            current_time: 0.0,
            dt: 0.0,
            cfl,
            total_step: if total_step < 0 {
                UNLIMITED_STEPS
            } else {
                total_step as usize
            },
            step_count: 0,
            total_output,
            output_count: 0,
        })
    }

    /// 推进是否结束
    ///
    /// 时间比较带相对松弛，避免末步截断后残余不足一个 ulp 的死循环。
    #[inline]
    pub fn finished(&self) -> bool {
        self.step_count >= self.total_step
            || self.current_time >= self.total_time * (1.0 - 1e-12)
    }

    /// 两次导出之间的时间间隔
    #[inline]
    pub fn output_interval(&self) -> f64 {
        self.total_time / self.total_output as f64
    }

    /// 当前是否应当导出
    ///
    /// 越过下一个导出时刻（或推进结束）即触发。
    pub fn should_output(&self) -> bool {
        if self.output_count > self.total_output {
            return false;
        }
        self.current_time >= self.output_count as f64 * self.output_interval() - 1e-12
    }

    /// 记录一次导出
    pub fn mark_output(&mut self) {
        self.output_count += 1;
    }
}

/// 按 CFL 条件计算时间步长
///
/// 在全部正常节点（含域边界层，不含固体与幽灵节点）上并行归约
/// `max(|u|, |v|, |w|) + c`。
pub fn compute_dt(space: &Space, model: &FlowModel, buf: &[f64], cfl: f64) -> f64 {
    let ng = space.ng;
    let (k_range, j_range, i_range) = (
        ng..space.nz + ng,
        ng..space.ny + ng,
        ng..space.nx + ng,
    );
    let gamma = model.gamma;

    let max_speed = k_range
        .into_par_iter()
        .map(|k| {
            let mut local: f64 = 0.0;
            for j in j_range.clone() {
                for i in i_range.clone() {
                    let idx = space.idx(k, j, i);
                    let kind = space.kind(idx);
                    if kind.is_solid() || kind.is_ghost() {
                        continue;
                    }
                    let u = Field::state(buf, idx);
                    let rho = u[0];
                    let p = (u[4]
                        - 0.5 * (u[1] * u[1] + u[2] * u[2] + u[3] * u[3]) / rho)
                        * (gamma - 1.0);
                    if rho <= 0.0 || p <= 0.0 {
                        continue;
                    }
                    let c = (gamma * p / rho).sqrt();
                    let vmax = (u[1].abs().max(u[2].abs()).max(u[3].abs())) / rho;
                    local = local.max(vmax + c);
                }
            }
            local
        })
        .reduce(|| 0.0, f64::max);

    let min_d = space.dx.min(space.dy).min(space.dz);
    if max_speed <= f64::EPSILON {
        // 静止场退化：退回网格尺度的保守步长
        return cfl * min_d;
    }
    cfl * min_d / max_speed
}
