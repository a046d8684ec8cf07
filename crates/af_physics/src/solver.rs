// crates/af_physics/src/solver.rs

//! 显式时间推进引擎
//!
//! 外层循环每步依次执行：刷新边界板与浸入边界幽灵状态、按 CFL 条件
//! 取时间步长、一次前向 Euler 扫描（x、y、z 三个方向的对流与黏性
//! 通量差在同一次扫描中累加）、交换时间层、刚体运动后整体重分类、
//! 场稳定性检查。
//!
//! 面通量采用特征空间的通量向量分裂：
//!
//! ```text
//! F_hat = 1/2 * (F_L + F_R) - 1/2 * R * (Lambda+ - Lambda-) * L * (U_R - U_L)
//! ```
//!
//! 其中平均态、特征值分裂与左右特征向量见 [`crate::eigen`]。在
//! Lax-Friedrichs 分裂下它退化为局部 Lax-Friedrichs 通量。
//!
//! 扫描读 n 层、写 n+1 层；输出缓冲按 k 平面切片并行，读缓冲共享，
//! 不存在跨迭代的写依赖。

use af_domain::body::BodySet;
use af_domain::field::{Field, DIM_U};
use af_domain::ibm;
use af_domain::partition::{BcValue, BoundaryKind, Partition, Side, SlabBc};
use af_domain::space::Space;
use af_foundation::error::CoreError;
use rayon::prelude::*;

use crate::boundary;
use crate::convective::convective_flux;
use crate::eigen::{
    eigenvalues, eigenvector_l, eigenvector_r, mat_vec, split_eigenvalues, symmetric_average,
    AverageKind, Axis, SplitterKind,
};
use crate::error::{SolveError, SolveResult};
use crate::ic::{apply_initial_conditions, IcRegion};
use crate::model::FlowModel;
use crate::thermo::pressure;
use crate::timestep::{compute_dt, TimeControl};
use crate::viscous::diffusive_flux;

/// 特征分裂面通量
pub fn numerical_flux(
    axis: Axis,
    average: AverageKind,
    splitter: SplitterKind,
    gamma: f64,
    ul: &[f64; DIM_U],
    ur: &[f64; DIM_U],
) -> [f64; DIM_U] {
    let avg = symmetric_average(average, gamma, ul, ur);
    let lambda = eigenvalues(axis, &avg);
    let (plus, minus) = split_eigenvalues(splitter, &lambda);
    let l = eigenvector_l(axis, gamma, &avg);
    let r = eigenvector_r(axis, &avg);
    let fl = convective_flux(axis, gamma, ul);
    let fr = convective_flux(axis, gamma, ur);

    let mut du = [0.0; DIM_U];
    for m in 0..DIM_U {
        du[m] = ur[m] - ul[m];
    }
    let mut w = mat_vec(&l, &du);
    for m in 0..DIM_U {
        w[m] *= plus[m] - minus[m];
    }
    let diss = mat_vec(&r, &w);

    let mut out = [0.0; DIM_U];
    for m in 0..DIM_U {
        out[m] = 0.5 * (fl[m] + fr[m]) - 0.5 * diss[m];
    }
    out
}

/// 一步推进的摘要
#[derive(Debug, Clone, Copy)]
pub struct StepSummary {
    /// 本步时间步长
    pub dt: f64,
    /// 推进后的时间
    pub time: f64,
}

/// 求解器
pub struct Solver {
    space: Space,
    field: Field,
    partition: Partition,
    bodies: BodySet,
    model: FlowModel,
    time: TimeControl,
    average: AverageKind,
    splitter: SplitterKind,
}

impl Solver {
    /// 网格
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// 分区
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// 刚体集合
    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    /// 流动模型
    pub fn model(&self) -> &FlowModel {
        &self.model
    }

    /// 时间推进状态
    pub fn time(&self) -> &TimeControl {
        &self.time
    }

    /// 时间推进状态（可写，导出计数用）
    pub fn time_mut(&mut self) -> &mut TimeControl {
        &mut self.time
    }

    /// 当前时间层
    pub fn current_state(&self) -> &[f64] {
        self.field.current()
    }

    /// 替换刚体集合并整体重分类
    pub fn set_bodies(&mut self, bodies: BodySet) {
        self.bodies = bodies;
        ibm::initialize_domain_geometry(&mut self.space, &self.bodies, &self.partition);
    }

    /// 从检查点恢复场与推进状态
    pub fn restore(&mut self, state: &[f64], step_count: usize, current_time: f64) -> SolveResult<()> {
        CoreError::check_size("restart state", self.field.current().len(), state.len())?;
        self.field.current_mut().copy_from_slice(state);
        self.time.step_count = step_count;
        self.time.current_time = current_time;
        Ok(())
    }

    /// 推进一个时间步
    pub fn step(&mut self) -> SolveResult<StepSummary> {
        boundary::apply_boundary_conditions(
            &self.space,
            &self.partition,
            &self.model,
            self.field.current_mut(),
        );
        boundary::apply_body_ghost_states(
            &self.space,
            &self.partition,
            &self.bodies,
            &self.model,
            self.field.current_mut(),
        );

        let mut dt = compute_dt(&self.space, &self.model, self.field.current(), self.time.cfl);
        let remaining = (self.time.total_time - self.time.current_time).max(0.0);
        if dt > remaining {
            // 末步截断到总时间
            dt = remaining;
        }
        self.time.dt = dt;

        self.sweep(dt);
        self.field.swap();
        self.time.step_count += 1;
        self.time.current_time += dt;

        if self.bodies.any_moving() {
            self.bodies.advance(dt);
            ibm::initialize_domain_geometry(&mut self.space, &self.bodies, &self.partition);
        }

        self.check_field()?;
        tracing::trace!(
            step = self.time.step_count,
            time = self.time.current_time,
            dt,
            "step complete"
        );
        Ok(StepSummary {
            dt,
            time: self.time.current_time,
        })
    }

    /// 推进到结束（不带导出的便捷循环）
    pub fn run(&mut self) -> SolveResult<()> {
        while !self.time.finished() {
            self.step()?;
        }
        Ok(())
    }

    /// 一次前向 Euler 扫描：读 n 层，写 n+1 层
    ///
    /// 更新范围是正常节点盒（含域边界层）；固体与幽灵节点以及纯
    /// 外部幽灵层原样带入新层，下一步由边界驱动刷新。
    fn sweep(&mut self, dt: f64) {
        let space = &self.space;
        let model = self.model;
        let average = self.average;
        let splitter = self.splitter;
        let viscous = model.is_viscous();
        let ng = space.ng;
        let (i_lo, i_hi) = (ng, space.nx + ng);
        let (j_lo, j_hi) = (ng, space.ny + ng);
        let (k_lo, k_hi) = (ng, space.nz + ng);
        let plane = space.j_max * space.i_max * DIM_U;
        let dd = [space.ddx, space.ddy, space.ddz];

        let (read, write) = self.field.levels_mut();
        write
            .par_chunks_mut(plane)
            .enumerate()
            .for_each(|(k, out_plane)| {
                let src_plane = &read[k * plane..(k + 1) * plane];
                if k < k_lo || k >= k_hi {
                    out_plane.copy_from_slice(src_plane);
                    return;
                }
                for j in 0..space.j_max {
                    for i in 0..space.i_max {
                        let offset = (j * space.i_max + i) * DIM_U;
                        let idx = space.idx(k, j, i);
                        let kind = space.kind(idx);
                        let updatable = j >= j_lo
                            && j < j_hi
                            && i >= i_lo
                            && i < i_hi
                            && !kind.is_solid()
                            && !kind.is_ghost();
                        if !updatable {
                            out_plane[offset..offset + DIM_U]
                                .copy_from_slice(&src_plane[offset..offset + DIM_U]);
                            continue;
                        }

                        let u = Field::state(read, idx);
                        let mut rhs = [0.0; DIM_U];
                        for axis in Axis::ALL {
                            let a = axis.index();
                            let (km, jm, im) = match axis {
                                Axis::X => (k, j, i - 1),
                                Axis::Y => (k, j - 1, i),
                                Axis::Z => (k - 1, j, i),
                            };
                            let (kp, jp, ip) = match axis {
                                Axis::X => (k, j, i + 1),
                                Axis::Y => (k, j + 1, i),
                                Axis::Z => (k + 1, j, i),
                            };
                            let u_m = Field::state(read, space.idx(km, jm, im));
                            let u_p = Field::state(read, space.idx(kp, jp, ip));

                            let f_p =
                                numerical_flux(axis, average, splitter, model.gamma, &u, &u_p);
                            let f_m =
                                numerical_flux(axis, average, splitter, model.gamma, &u_m, &u);
                            for m in 0..DIM_U {
                                rhs[m] -= (f_p[m] - f_m[m]) * dd[a];
                            }

                            if viscous {
                                let fv_p = diffusive_flux(axis, space, &model, read, k, j, i);
                                let fv_m = diffusive_flux(axis, space, &model, read, km, jm, im);
                                for m in 0..DIM_U {
                                    rhs[m] += (fv_p[m] - fv_m[m]) * dd[a];
                                }
                            }
                        }

                        for m in 0..DIM_U {
                            out_plane[offset + m] = u[m] + dt * rhs[m];
                        }
                    }
                }
            });
    }

    /// 场稳定性检查
    ///
    /// 全场扫 NaN / Inf（数值发散），核芯流体节点扫密度与压力
    /// （非物理状态）；两者都是致命错误。
    fn check_field(&self) -> SolveResult<()> {
        let buf = self.field.current();
        let step = self.time.step_count;
        if buf.iter().any(|v| !v.is_finite()) {
            return Err(SolveError::Diverged { step });
        }
        let core = self.partition.interior();
        for k in core.k_range() {
            for j in core.j_range() {
                for i in core.i_range() {
                    let idx = self.space.idx(k, j, i);
                    if !self.space.kind(idx).is_fluid() {
                        continue;
                    }
                    let u = Field::state(buf, idx);
                    let rho = u[0];
                    let p = pressure(self.model.gamma, &u);
                    if rho <= 0.0 || p <= 0.0 {
                        return Err(SolveError::NonPhysicalState {
                            k,
                            j,
                            i,
                            step,
                            rho,
                            p,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// 求解器装配
pub struct SolverBuilder {
    space: Space,
    model: FlowModel,
    time: TimeControl,
    bcs: [SlabBc; 6],
    background: BcValue,
    ic_regions: Vec<IcRegion>,
    bodies: BodySet,
    average: AverageKind,
    splitter: SplitterKind,
}

impl SolverBuilder {
    /// 创建装配器；边界默认出流，初始场默认静止单位状态
    pub fn new(space: Space, model: FlowModel, time: TimeControl) -> Self {
        Self {
            space,
            model,
            time,
            bcs: [SlabBc::default(); 6],
            background: BcValue {
                rho: 1.0,
                u: 0.0,
                v: 0.0,
                w: 0.0,
                p: 1.0,
            },
            ic_regions: Vec::new(),
            bodies: BodySet::default(),
            average: AverageKind::default(),
            splitter: SplitterKind::default(),
        }
    }

    /// 设置六块边界板的边界条件（W,E,S,N,F,B 次序）
    pub fn with_boundaries(mut self, bcs: [SlabBc; 6]) -> Self {
        self.bcs = bcs;
        self
    }

    /// 设置全局初始状态
    pub fn with_background(mut self, background: BcValue) -> Self {
        self.background = background;
        self
    }

    /// 追加初始条件区域
    pub fn with_ic_regions(mut self, regions: Vec<IcRegion>) -> Self {
        self.ic_regions = regions;
        self
    }

    /// 设置嵌入刚体
    pub fn with_bodies(mut self, bodies: BodySet) -> Self {
        self.bodies = bodies;
        self
    }

    /// 设置面平均方式
    pub fn with_average(mut self, average: AverageKind) -> Self {
        self.average = average;
        self
    }

    /// 设置特征值分裂格式
    pub fn with_splitter(mut self, splitter: SplitterKind) -> Self {
        self.splitter = splitter;
        self
    }

    /// 完成装配：分区、几何分类、初始场与首次边界刷新
    pub fn build(self) -> SolveResult<Solver> {
        // 周期边界必须成对出现
        for side in Side::ALL {
            let kind = self.bcs[side.slot()].kind;
            let opposite = self.bcs[side.opposite().slot()].kind;
            if kind == BoundaryKind::Periodic && opposite != BoundaryKind::Periodic {
                return Err(CoreError::invalid_input(format!(
                    "周期边界必须成对: {side} 是周期而对侧不是"
                ))
                .into());
            }
        }

        let mut space = self.space;
        let partition = Partition::build(&space, self.bcs);
        ibm::initialize_domain_geometry(&mut space, &self.bodies, &partition);

        let mut field = Field::new(space.n_max);
        apply_initial_conditions(
            &space,
            &self.model,
            &self.background,
            &self.ic_regions,
            field.current_mut(),
        );
        boundary::apply_boundary_conditions(&space, &partition, &self.model, field.current_mut());

        let solver = Solver {
            space,
            field,
            partition,
            bodies: self.bodies,
            model: self.model,
            time: self.time,
            average: self.average,
            splitter: self.splitter,
        };
        solver.check_field()?;
        tracing::debug!(
            nodes = solver.space.n_max,
            bodies = solver.bodies.len(),
            "solver assembled"
        );
        Ok(solver)
    }
}
