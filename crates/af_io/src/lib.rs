// crates/af_io/src/lib.rs

//! AeroFlux IO 层
//!
//! - [`case`]: JSON 算例文件的解析、校验与求解器装配
//! - [`ensight`]: EnSight Gold 格式的场导出（几何 + 标量 + 向量 +
//!   粒子文件）
//! - [`restart`]: 二进制重启检查点（魔数 + 版本 + CRC32 校验）

pub mod case;
pub mod ensight;
pub mod error;
pub mod restart;

pub use case::{build_solver, CaseError, CaseFile};
pub use ensight::EnsightExporter;
pub use error::{IoError, IoResult};
pub use restart::Restart;
