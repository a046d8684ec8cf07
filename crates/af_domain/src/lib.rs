// crates/af_domain/src/lib.rs

//! AeroFlux 计算域层
//!
//! 持有求解器的结构化数据模型：
//!
//! - [`space`]: 均匀笛卡尔网格与节点类型标记
//! - [`field`]: 双时间层守恒变量场（指针交换，不拷贝）
//! - [`partition`]: 十三个带角色标签的索引分区与边界条件元数据
//! - [`body`]: 嵌入刚体（球体 / 隐式曲面）
//! - [`ibm`]: 幽灵单元浸入边界分类器
//!
//! 所有数组共享 `(k*jMax + j)*iMax + i` 扁平布局，由
//! [`af_foundation::GridIndexer`] 统一寻址。

pub mod body;
pub mod field;
pub mod ibm;
pub mod partition;
pub mod space;

pub use body::{Body, BodySet, ImplicitSurface};
pub use field::{Field, DIM_U};
pub use partition::{BcValue, BoundaryKind, Partition, Region, RegionRole, Side, SlabBc};
pub use space::{GridSpec, NodeKind, Space};
