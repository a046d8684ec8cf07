// crates/af_io/src/case.rs

//! 算例文件
//!
//! JSON 格式的算例声明：域尺寸、参考尺度、时间控制、数值格式、
//! 六块边界、初始条件与刚体列表。所有几何量按参考长度、速度量按
//! 参考速度在装配时归一化；原始变量取值视为已归一化。
//!
//! # 示例
//!
//! ```json
//! {
//!   "grid": { "cells": [200, 3, 3], "ghost_layers": 2,
//!             "x": [0.0, 1.0], "y": [0.0, 1.0], "z": [0.0, 1.0] },
//!   "time": { "total_time": 0.2, "cfl": 0.5, "output_count": 4 },
//!   "boundaries": { "west": { "kind": "outlet" } },
//!   "initial": { "state": { "rho": 1.0, "p": 1.0 } },
//!   "bodies": [ { "center": [0.5, 0.5, 0.5], "radius": 0.2 } ]
//! }
//! ```

use std::path::Path;

use af_domain::body::{Body, BodySet};
use af_domain::partition::{BcValue, BoundaryKind, Side, SlabBc};
use af_domain::space::GridSpec;
use af_physics::eigen::{AverageKind, SplitterKind};
use af_physics::ic::{IcRegion, IcShape};
use af_physics::model::{FlowModel, ReferenceScales};
use af_physics::solver::{Solver, SolverBuilder};
use af_physics::timestep::TimeControl;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::IoError;

/// 算例文件错误
#[derive(Debug, Error)]
pub enum CaseError {
    /// 文件不可读
    #[error("算例文件不可读: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 解析失败
    #[error("算例解析失败: {0}")]
    Parse(String),

    /// 字段取值非法
    #[error("算例字段非法: {key} = {value}（{reason}）")]
    InvalidValue {
        /// 字段路径
        key: String,
        /// 实际取值
        value: String,
        /// 非法原因
        reason: String,
    },
}

impl CaseError {
    fn invalid(key: &str, value: impl ToString, reason: &str) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

// ============================================================
// 文件结构
// ============================================================

/// 网格小节
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSection {
    /// 三个方向的单元数
    pub cells: [usize; 3],
    /// 幽灵层宽度
    #[serde(default = "default_ghost_layers")]
    pub ghost_layers: usize,
    /// x 方向物理范围 [m]
    pub x: [f64; 2],
    /// y 方向物理范围 [m]
    pub y: [f64; 2],
    /// z 方向物理范围 [m]
    pub z: [f64; 2],
}

fn default_ghost_layers() -> usize {
    2
}

/// 时间小节
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSection {
    /// 总时间 [s]
    pub total_time: f64,
    /// 步数上限，负值表示不设限
    #[serde(default = "default_total_step")]
    pub total_step: i64,
    /// CFL 数
    #[serde(default = "default_cfl")]
    pub cfl: f64,
    /// 导出次数
    #[serde(default = "default_output_count")]
    pub output_count: usize,
}

fn default_total_step() -> i64 {
    -1
}
fn default_cfl() -> f64 {
    0.6
}
fn default_output_count() -> usize {
    1
}

/// 数值格式小节
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct NumericsSection {
    /// 面平均方式
    #[serde(default)]
    pub average: AverageKind,
    /// 特征值分裂格式
    #[serde(default)]
    pub splitter: SplitterKind,
}

/// 边界小节：六块板，缺省出流
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BoundarySection {
    /// -x 板
    #[serde(default)]
    pub west: SlabBc,
    /// +x 板
    #[serde(default)]
    pub east: SlabBc,
    /// -y 板
    #[serde(default)]
    pub south: SlabBc,
    /// +y 板
    #[serde(default)]
    pub north: SlabBc,
    /// -z 板
    #[serde(default)]
    pub front: SlabBc,
    /// +z 板
    #[serde(default)]
    pub back: SlabBc,
}

impl BoundarySection {
    /// 按 W,E,S,N,F,B 次序展开
    pub fn as_array(&self) -> [SlabBc; 6] {
        [
            self.west, self.east, self.south, self.north, self.front, self.back,
        ]
    }
}

/// 初始条件小节
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialSection {
    /// 全局状态
    pub state: BcValue,
    /// 区域覆盖，按声明次序施加
    #[serde(default)]
    pub regions: Vec<IcRegion>,
}

/// 刚体声明
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BodySpec {
    /// 球心 [m]
    pub center: [f64; 3],
    /// 半径 [m]
    pub radius: f64,
    /// 平动速度 [m/s]
    #[serde(default)]
    pub velocity: [f64; 3],
    /// 角速度 [rad/s]
    #[serde(default)]
    pub omega: f64,
}

/// 算例文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFile {
    /// 网格
    pub grid: GridSection,
    /// 参考尺度
    #[serde(default)]
    pub reference: ReferenceScales,
    /// 时间控制
    pub time: TimeSection,
    /// 数值格式
    #[serde(default)]
    pub numerics: NumericsSection,
    /// 边界条件
    #[serde(default)]
    pub boundaries: BoundarySection,
    /// 初始条件
    pub initial: InitialSection,
    /// 刚体列表
    #[serde(default)]
    pub bodies: Vec<BodySpec>,
}

impl CaseFile {
    /// 从文件加载并校验
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CaseError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// 从 JSON 文本解析并校验
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, CaseError> {
        let case: CaseFile =
            serde_json::from_str(content).map_err(|e| CaseError::Parse(e.to_string()))?;
        case.validate()?;
        Ok(case)
    }

    /// 校验字段取值
    pub fn validate(&self) -> Result<(), CaseError> {
        if self.grid.cells.iter().any(|&n| n < 1) {
            return Err(CaseError::invalid(
                "grid.cells",
                format!("{:?}", self.grid.cells),
                "每个方向至少 1 个单元",
            ));
        }
        if self.grid.ghost_layers < 1 {
            return Err(CaseError::invalid(
                "grid.ghost_layers",
                self.grid.ghost_layers,
                "幽灵层宽度至少为 1",
            ));
        }
        for (key, range) in [("grid.x", self.grid.x), ("grid.y", self.grid.y), ("grid.z", self.grid.z)]
        {
            if range[1] <= range[0] {
                return Err(CaseError::invalid(
                    key,
                    format!("{range:?}"),
                    "范围上界必须大于下界",
                ));
            }
        }
        if self.time.cfl <= 0.0 {
            return Err(CaseError::invalid("time.cfl", self.time.cfl, "CFL 数必须为正"));
        }
        if self.time.total_time <= 0.0 {
            return Err(CaseError::invalid(
                "time.total_time",
                self.time.total_time,
                "总时间必须为正",
            ));
        }
        if self.time.output_count == 0 {
            return Err(CaseError::invalid(
                "time.output_count",
                self.time.output_count,
                "导出次数至少为 1",
            ));
        }

        // 周期边界成对检查
        let bcs = self.boundaries.as_array();
        for side in Side::ALL {
            let kind = bcs[side.slot()].kind;
            let other = bcs[side.opposite().slot()].kind;
            if kind == BoundaryKind::Periodic && other != BoundaryKind::Periodic {
                return Err(CaseError::invalid(
                    &format!("boundaries.{side}"),
                    kind,
                    "周期边界必须成对设置",
                ));
            }
        }

        // 坍缩方向（1 个单元）约定配周期边界
        let pairs = [
            (self.grid.cells[0], Side::West),
            (self.grid.cells[1], Side::South),
            (self.grid.cells[2], Side::Front),
        ];
        for (cells, side) in pairs {
            if cells == 1 && bcs[side.slot()].kind != BoundaryKind::Periodic {
                tracing::warn!(
                    "方向 {side} 只有 1 个单元但未设置周期边界，二维退化约定可能失效"
                );
            }
        }

        for (n, body) in self.bodies.iter().enumerate() {
            if body.radius <= 0.0 {
                return Err(CaseError::invalid(
                    &format!("bodies[{n}].radius"),
                    body.radius,
                    "半径必须为正",
                ));
            }
            if body.center.iter().any(|c| !c.is_finite()) {
                return Err(CaseError::invalid(
                    &format!("bodies[{n}].center"),
                    format!("{:?}", body.center),
                    "球心必须有限",
                ));
            }
        }
        Ok(())
    }

    /// 网格构造参数
    pub fn grid_spec(&self) -> GridSpec {
        GridSpec {
            ncx: self.grid.cells[0],
            ncy: self.grid.cells[1],
            ncz: self.grid.cells[2],
            ng: self.grid.ghost_layers,
            x_min: self.grid.x[0],
            x_max: self.grid.x[1],
            y_min: self.grid.y[0],
            y_max: self.grid.y[1],
            z_min: self.grid.z[0],
            z_max: self.grid.z[1],
            ref_length: self.reference.length,
        }
    }

    /// 归一化后的刚体集合
    pub fn body_set(&self) -> BodySet {
        let l = self.reference.length;
        let u = self.reference.velocity;
        let bodies = self
            .bodies
            .iter()
            .map(|spec| Body {
                center: DVec3::from_array(spec.center) / l,
                radius: spec.radius / l,
                velocity: DVec3::from_array(spec.velocity) / u,
                omega: spec.omega * l / u,
            })
            .collect();
        BodySet::new(bodies)
    }

    /// 归一化后的初始条件区域
    pub fn ic_regions(&self) -> Vec<IcRegion> {
        let l = self.reference.length;
        self.initial
            .regions
            .iter()
            .map(|region| IcRegion {
                shape: match region.shape {
                    IcShape::Box { min, max } => IcShape::Box {
                        min: min.map(|s| s / l),
                        max: max.map(|s| s / l),
                    },
                    IcShape::Sphere { center, radius } => IcShape::Sphere {
                        center: center.map(|s| s / l),
                        radius: radius / l,
                    },
                },
                state: region.state,
            })
            .collect()
    }
}

/// 由算例装配求解器
pub fn build_solver(case: &CaseFile) -> Result<Solver, IoError> {
    case.validate()?;
    let space = af_domain::space::Space::new(&case.grid_spec())?;
    let model = FlowModel::resolve(&case.reference)?;
    let time = TimeControl::resolve(
        case.time.total_time,
        case.time.total_step,
        case.time.cfl,
        case.time.output_count,
        &model,
    )?;
    let solver = SolverBuilder::new(space, model, time)
        .with_boundaries(case.boundaries.as_array())
        .with_background(case.initial.state)
        .with_ic_regions(case.ic_regions())
        .with_bodies(case.body_set())
        .with_average(case.numerics.average)
        .with_splitter(case.numerics.splitter)
        .build()?;
    Ok(solver)
}
