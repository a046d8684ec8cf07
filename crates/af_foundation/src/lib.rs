// crates/af_foundation/src/lib.rs

//! AeroFlux 基础层
//!
//! 提供整个求解器的底层抽象，不包含任何流体力学概念。
//!
//! # 模块概览
//!
//! - [`error`]: 统一基础错误类型
//! - [`index`]: 三维节点索引与物理坐标的线性化数学
//! - [`geometry`]: 基于 [`glam::DVec3`] 的向量几何工具
//!
//! # 设计原则
//!
//! 1. **纯净性**: 仅依赖 thiserror 与 glam
//! 2. **布局即正确性**: 扁平索引 `(k*jMax + j)*iMax + i` 是上层所有
//!    稠密场数据的唯一寻址方式，由 [`index::GridIndexer`] 统一负责

pub mod error;
pub mod geometry;
pub mod index;

pub use error::{CoreError, CoreResult};
pub use index::GridIndexer;
