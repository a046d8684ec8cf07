// crates/af_physics/src/lib.rs

//! AeroFlux 物理层
//!
//! 三维可压缩 Navier-Stokes 方程的数值核心：
//!
//! - [`model`]: 流动模型参数的归一化与 Sutherland 黏性律
//! - [`thermo`]: 原始变量与守恒变量的相互转换
//! - [`eigen`]: 通量雅可比的特征分解与特征值分裂
//! - [`convective`]: 三个方向的无黏通量
//! - [`viscous`]: 面心黏性通量模板
//! - [`boundary`]: 边界板驱动与浸入边界幽灵状态
//! - [`ic`]: 初始条件填充
//! - [`timestep`]: CFL 时间步长与时间推进控制量
//! - [`solver`]: 显式时间推进引擎
//!
//! 方向与分裂格式均为有限变体集合，一律用枚举做标签分派，三个方向
//! 核共享结构并由编译器单态化。

pub mod boundary;
pub mod convective;
pub mod eigen;
pub mod error;
pub mod ic;
pub mod model;
pub mod solver;
pub mod thermo;
pub mod timestep;
pub mod viscous;

pub use eigen::{AverageKind, Axis, SplitterKind};
pub use error::{SolveError, SolveResult};
pub use model::{FlowModel, ReferenceScales};
pub use solver::{Solver, SolverBuilder};
pub use timestep::TimeControl;
