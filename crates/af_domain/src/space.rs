// crates/af_domain/src/space.rs

//! 均匀笛卡尔网格
//!
//! 计算以节点为中心：首末节点落在物理边界上，m 个单元对应 m + 2 层
//! 节点，边界外再垫 ng 层幽灵节点。本模块负责：
//!
//! - 用户单元数到节点层数的细化（`nx = ncx + 2`）
//! - 物理尺度按参考长度的归一化与网格间距推导
//! - 节点类型标记数组（流体 / 固体 / 幽灵 / 外部）
//!
//! # 节点范围约定
//!
//! Sub 取可达值，Sup 取不可达值，计数即 `Sup - Sub`：
//!
//! ```text
//! 全域（含外部幽灵层）:  Sub = 0,          Sup = n + 2*ng
//! 下侧外部幽灵层:        Sub = 0,          Sup = ng
//! 正常节点:              Sub = ng,         Sup = n + ng
//!     下边界层:          Sub = ng,         Sup = ng + 1
//!     内部节点层:        Sub = ng + 1,     Sup = n + ng - 1
//!     上边界层:          Sub = n + ng - 1, Sup = n + ng
//! 上侧外部幽灵层:        Sub = n + ng,     Sup = n + 2*ng
//! ```
//!
//! 二维与三维在此统一：坍缩方向取 1 个单元（三层节点），并配周期
//! 边界条件。

use af_foundation::error::{CoreError, CoreResult};
use af_foundation::index::{clamp_node, coord_from_node, node_from_coord, GridIndexer};
use glam::DVec3;

/// 节点类型
///
/// 原始实现用哨兵整数 {-1, 0, 1, >=2} 区分节点；这里改为带标签的
/// 枚举，固体与幽灵节点随身携带所属刚体编号。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// 边界与外部节点（哨兵 2）
    Exterior,
    /// 内部流体节点（哨兵 0）
    Fluid,
    /// 内部固体节点（哨兵 -1），携带刚体编号
    Solid(u32),
    /// 内部幽灵节点（哨兵 1），携带刚体编号
    Ghost(u32),
}

impl NodeKind {
    /// 是否为流体节点
    #[inline]
    pub const fn is_fluid(self) -> bool {
        matches!(self, Self::Fluid)
    }

    /// 是否为固体节点（不含幽灵）
    #[inline]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Solid(_))
    }

    /// 是否为幽灵节点
    #[inline]
    pub const fn is_ghost(self) -> bool {
        matches!(self, Self::Ghost(_))
    }

    /// 所属刚体编号（仅固体与幽灵节点持有）
    #[inline]
    pub const fn body_id(self) -> Option<u32> {
        match self {
            Self::Solid(id) | Self::Ghost(id) => Some(id),
            _ => None,
        }
    }

    /// 对应的哨兵整数（用于与旧格式数据交换）
    #[inline]
    pub const fn as_flag(self) -> i32 {
        match self {
            Self::Exterior => 2,
            Self::Fluid => 0,
            Self::Solid(_) => -1,
            Self::Ghost(_) => 1,
        }
    }

    /// EnSight iblank 值：流体与幽灵节点参与显示，其余被屏蔽
    #[inline]
    pub const fn iblank(self) -> i32 {
        match self {
            Self::Fluid | Self::Ghost(_) => 1,
            _ => 0,
        }
    }
}

/// 网格构造参数（未归一化的用户输入）
#[derive(Debug, Clone, Copy)]
pub struct GridSpec {
    /// x 方向单元数
    pub ncx: usize,
    /// y 方向单元数
    pub ncy: usize,
    /// z 方向单元数
    pub ncz: usize,
    /// 幽灵层宽度
    pub ng: usize,
    /// 物理域范围 [m]
    pub x_min: f64,
    /// 物理域范围 [m]
    pub x_max: f64,
    /// 物理域范围 [m]
    pub y_min: f64,
    /// 物理域范围 [m]
    pub y_max: f64,
    /// 物理域范围 [m]
    pub z_min: f64,
    /// 物理域范围 [m]
    pub z_max: f64,
    /// 参考长度 [m]
    pub ref_length: f64,
}

/// 均匀笛卡尔网格与节点标记
#[derive(Debug, Clone)]
pub struct Space {
    /// x 方向节点层数（单元数 + 2）
    pub nx: usize,
    /// y 方向节点层数
    pub ny: usize,
    /// z 方向节点层数
    pub nz: usize,
    /// 幽灵层宽度
    pub ng: usize,
    /// 含幽灵层的总节点数
    pub i_max: usize,
    /// 含幽灵层的总节点数
    pub j_max: usize,
    /// 含幽灵层的总节点数
    pub k_max: usize,
    /// 扁平数组总长
    pub n_max: usize,
    /// 归一化域范围
    pub x_min: f64,
    /// 归一化域范围
    pub x_max: f64,
    /// 归一化域范围
    pub y_min: f64,
    /// 归一化域范围
    pub y_max: f64,
    /// 归一化域范围
    pub z_min: f64,
    /// 归一化域范围
    pub z_max: f64,
    /// 网格间距（归一化）
    pub dx: f64,
    /// 网格间距（归一化）
    pub dy: f64,
    /// 网格间距（归一化）
    pub dz: f64,
    /// 间距倒数
    pub ddx: f64,
    /// 间距倒数
    pub ddy: f64,
    /// 间距倒数
    pub ddz: f64,
    /// 几何容差，1e-3 * min(dx, dy, dz)
    pub tiny_l: f64,
    indexer: GridIndexer,
    kinds: Vec<NodeKind>,
}

impl Space {
    /// 由用户输入构造网格
    ///
    /// 完成单元数到节点层数的细化、域范围的归一化与间距推导，并把
    /// 所有节点初始化为外部类型。
    pub fn new(spec: &GridSpec) -> CoreResult<Self> {
        if spec.ncx < 1 || spec.ncy < 1 || spec.ncz < 1 {
            return Err(CoreError::out_of_range(
                "cells",
                format!("{}x{}x{}", spec.ncx, spec.ncy, spec.ncz),
                "每个方向至少 1 个单元",
            ));
        }
        if spec.ng < 1 {
            return Err(CoreError::out_of_range("ng", spec.ng, "幽灵层宽度至少为 1"));
        }
        if spec.ref_length <= 0.0 {
            return Err(CoreError::out_of_range(
                "ref_length",
                spec.ref_length,
                "参考长度必须为正",
            ));
        }
        if spec.x_max <= spec.x_min || spec.y_max <= spec.y_min || spec.z_max <= spec.z_min {
            return Err(CoreError::out_of_range(
                "domain",
                format!(
                    "[{}, {}] x [{}, {}] x [{}, {}]",
                    spec.x_min, spec.x_max, spec.y_min, spec.y_max, spec.z_min, spec.z_max
                ),
                "域范围上界必须大于下界",
            ));
        }

        // 单元数细化为节点层数
        let (nx, ny, nz) = (spec.ncx + 2, spec.ncy + 2, spec.ncz + 2);
        let ng = spec.ng;
        let (i_max, j_max, k_max) = (nx + 2 * ng, ny + 2 * ng, nz + 2 * ng);
        let indexer = GridIndexer::new(k_max, j_max, i_max);
        let n_max = indexer.len();

        // 间距与域范围统一按参考长度归一化
        let l = spec.ref_length;
        let dx = ((spec.x_max - spec.x_min) / (nx - 1) as f64) / l;
        let dy = ((spec.y_max - spec.y_min) / (ny - 1) as f64) / l;
        let dz = ((spec.z_max - spec.z_min) / (nz - 1) as f64) / l;
        let tiny_l = 1.0e-3 * dx.min(dy).min(dz);

        Ok(Self {
            nx,
            ny,
            nz,
            ng,
            i_max,
            j_max,
            k_max,
            n_max,
            x_min: spec.x_min / l,
            x_max: spec.x_max / l,
            y_min: spec.y_min / l,
            y_max: spec.y_max / l,
            z_min: spec.z_min / l,
            z_max: spec.z_max / l,
            dx,
            dy,
            dz,
            ddx: 1.0 / dx,
            ddy: 1.0 / dy,
            ddz: 1.0 / dz,
            tiny_l,
            indexer,
            kinds: vec![NodeKind::Exterior; n_max],
        })
    }

    /// 索引器
    #[inline]
    pub fn indexer(&self) -> GridIndexer {
        self.indexer
    }

    /// (k, j, i) 线性化
    #[inline]
    pub fn idx(&self, k: usize, j: usize, i: usize) -> usize {
        self.indexer.idx(k, j, i)
    }

    /// 节点物理坐标 x
    #[inline]
    pub fn x(&self, i: usize) -> f64 {
        coord_from_node(i, self.x_min, self.dx, self.ng)
    }

    /// 节点物理坐标 y
    #[inline]
    pub fn y(&self, j: usize) -> f64 {
        coord_from_node(j, self.y_min, self.dy, self.ng)
    }

    /// 节点物理坐标 z
    #[inline]
    pub fn z(&self, k: usize) -> f64 {
        coord_from_node(k, self.z_min, self.dz, self.ng)
    }

    /// 节点位置向量
    #[inline]
    pub fn point(&self, k: usize, j: usize, i: usize) -> DVec3 {
        DVec3::new(self.x(i), self.y(j), self.z(k))
    }

    /// 物理坐标换算到最近的 i 节点（静默截断到全域范围）
    pub fn node_i(&self, x: f64) -> CoreResult<usize> {
        let n = node_from_coord(x, self.x_min, self.ddx, self.ng)?;
        Ok(clamp_node(n, 0, self.i_max))
    }

    /// 物理坐标换算到最近的 j 节点
    pub fn node_j(&self, y: f64) -> CoreResult<usize> {
        let n = node_from_coord(y, self.y_min, self.ddy, self.ng)?;
        Ok(clamp_node(n, 0, self.j_max))
    }

    /// 物理坐标换算到最近的 k 节点
    pub fn node_k(&self, z: f64) -> CoreResult<usize> {
        let n = node_from_coord(z, self.z_min, self.ddz, self.ng)?;
        Ok(clamp_node(n, 0, self.k_max))
    }

    /// 节点类型
    #[inline]
    pub fn kind(&self, idx: usize) -> NodeKind {
        self.kinds[idx]
    }

    /// 设置节点类型
    #[inline]
    pub fn set_kind(&mut self, idx: usize, kind: NodeKind) {
        self.kinds[idx] = kind;
    }

    /// 节点类型数组
    #[inline]
    pub fn kinds(&self) -> &[NodeKind] {
        &self.kinds
    }

    /// 把全部节点重置为外部类型
    pub fn reset_kinds(&mut self) {
        self.kinds.fill(NodeKind::Exterior);
    }

    /// 统计各类节点数量：(流体, 固体, 幽灵, 外部)
    pub fn count_kinds(&self) -> (usize, usize, usize, usize) {
        let mut counts = (0usize, 0usize, 0usize, 0usize);
        for &kind in &self.kinds {
            match kind {
                NodeKind::Fluid => counts.0 += 1,
                NodeKind::Solid(_) => counts.1 += 1,
                NodeKind::Ghost(_) => counts.2 += 1,
                NodeKind::Exterior => counts.3 += 1,
            }
        }
        counts
    }
}
