// crates/af_domain/src/partition.rs

//! 计算域分区
//!
//! 把含幽灵层的索引空间枚举为十三个带角色标签的索引盒，求解器按盒
//! 访问而不自己推导范围：
//!
//! - 盒 0：整个含幽灵层的域（导出器使用）
//! - 盒 1..=6：六个外部边界板（西/东/南/北/前/后），法向跨度
//!   `[0, ng+1)` 或 `[n+ng-1, n+2ng)`，切向贯穿全域，携带边界条件
//!   种类、取值与外法向；板间在棱角处重叠，按 W,E,S,N,F,B 的访问
//!   次序由后者覆盖
//! - 盒 7..=11：内部核芯紧贴边界层的五条单层棱带（西/东/南/北/前）
//! - 盒 12：最内层流体核芯 `[ng+1, n+ng-1)^3`，浸入边界分类器与
//!   通量扫描的工作范围
//!
//! 调用方一律通过 [`Partition::entire`]、[`Partition::slabs`]、
//! [`Partition::interior`] 等角色访问器取盒，不得依赖魔法下标。

use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::space::Space;

// ============================================================
// 边界板方位
// ============================================================

/// 域边界的六个方位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// -x
    West,
    /// +x
    East,
    /// -y
    South,
    /// +y
    North,
    /// -z
    Front,
    /// +z
    Back,
}

impl Side {
    /// 六个方位的固定枚举次序（边界条件的访问次序）
    pub const ALL: [Side; 6] = [
        Side::West,
        Side::East,
        Side::South,
        Side::North,
        Side::Front,
        Side::Back,
    ];

    /// 在固定枚举次序中的下标
    #[inline]
    pub const fn slot(self) -> usize {
        match self {
            Side::West => 0,
            Side::East => 1,
            Side::South => 2,
            Side::North => 3,
            Side::Front => 4,
            Side::Back => 5,
        }
    }

    /// 法向所在轴：0 = x, 1 = y, 2 = z
    #[inline]
    pub const fn axis(self) -> usize {
        match self {
            Side::West | Side::East => 0,
            Side::South | Side::North => 1,
            Side::Front | Side::Back => 2,
        }
    }

    /// 是否为低侧（-x / -y / -z）
    #[inline]
    pub const fn is_low(self) -> bool {
        matches!(self, Side::West | Side::South | Side::Front)
    }

    /// 指向域外的单位法向
    #[inline]
    pub const fn outward_normal(self) -> IVec3 {
        match self {
            Side::West => IVec3::new(-1, 0, 0),
            Side::East => IVec3::new(1, 0, 0),
            Side::South => IVec3::new(0, -1, 0),
            Side::North => IVec3::new(0, 1, 0),
            Side::Front => IVec3::new(0, 0, -1),
            Side::Back => IVec3::new(0, 0, 1),
        }
    }

    /// 对侧方位
    #[inline]
    pub const fn opposite(self) -> Side {
        match self {
            Side::West => Side::East,
            Side::East => Side::West,
            Side::South => Side::North,
            Side::North => Side::South,
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Side::West => "west",
            Side::East => "east",
            Side::South => "south",
            Side::North => "north",
            Side::Front => "front",
            Side::Back => "back",
        };
        write!(f, "{}", name)
    }
}

// ============================================================
// 边界条件种类与取值
// ============================================================

/// 边界条件种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BoundaryKind {
    /// 入流：以给定的原始变量覆盖整板
    Inlet = 0,
    /// 出流：沿法向零梯度外推
    #[default]
    Outlet = 1,
    /// 自由滑移壁：法向速度镜像反号，切向保持
    SlipWall = 2,
    /// 无滑移壁：速度镜像到给定壁面速度
    NoSlipWall = 3,
    /// 周期：按节点周期搬运对侧数据
    Periodic = 4,
    /// 流体：占位，不施加任何处理
    Fluid = 5,
}

impl BoundaryKind {
    /// 是否为壁面类边界
    #[inline]
    pub fn is_wall(self) -> bool {
        matches!(self, Self::SlipWall | Self::NoSlipWall)
    }

    /// 是否需要用户给定的取值向量
    #[inline]
    pub fn requires_value(self) -> bool {
        matches!(self, Self::Inlet | Self::NoSlipWall)
    }
}

impl std::fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Inlet => "Inlet",
            Self::Outlet => "Outlet",
            Self::SlipWall => "SlipWall",
            Self::NoSlipWall => "NoSlipWall",
            Self::Periodic => "Periodic",
            Self::Fluid => "Fluid",
        };
        write!(f, "{}", name)
    }
}

/// 边界条件取值向量（原始变量）
///
/// 入流用全部五个分量；无滑移壁只读速度分量（壁面运动速度）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BcValue {
    /// 密度
    #[serde(default)]
    pub rho: f64,
    /// x 速度
    #[serde(default)]
    pub u: f64,
    /// y 速度
    #[serde(default)]
    pub v: f64,
    /// z 速度
    #[serde(default)]
    pub w: f64,
    /// 压力
    #[serde(default)]
    pub p: f64,
}

/// 一块边界板的边界条件
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlabBc {
    /// 边界条件种类
    pub kind: BoundaryKind,
    /// 取值向量
    #[serde(default)]
    pub value: BcValue,
}

impl Default for SlabBc {
    fn default() -> Self {
        Self {
            kind: BoundaryKind::Outlet,
            value: BcValue::default(),
        }
    }
}

// ============================================================
// 索引盒
// ============================================================

/// 索引盒角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionRole {
    /// 整个含幽灵层的域
    Entire,
    /// 外部边界板
    Slab(Side),
    /// 内部核芯的单层棱带
    Edge(Side),
    /// 最内层流体核芯
    Interior,
}

/// 一个索引盒：Sub 可达，Sup 不可达
#[derive(Debug, Clone)]
pub struct Region {
    /// z 方向范围下界（含）
    pub k_sub: usize,
    /// z 方向范围上界（不含）
    pub k_sup: usize,
    /// y 方向范围下界（含）
    pub j_sub: usize,
    /// y 方向范围上界（不含）
    pub j_sup: usize,
    /// x 方向范围下界（含）
    pub i_sub: usize,
    /// x 方向范围上界（不含）
    pub i_sup: usize,
    /// 盒角色
    pub role: RegionRole,
    /// 外法向（非边界板为零向量）
    pub normal: IVec3,
    /// 边界条件（仅边界板持有）
    pub bc: Option<SlabBc>,
}

impl Region {
    /// k 方向范围
    #[inline]
    pub fn k_range(&self) -> Range<usize> {
        self.k_sub..self.k_sup
    }

    /// j 方向范围
    #[inline]
    pub fn j_range(&self) -> Range<usize> {
        self.j_sub..self.j_sup
    }

    /// i 方向范围
    #[inline]
    pub fn i_range(&self) -> Range<usize> {
        self.i_sub..self.i_sup
    }

    /// 盒内节点总数
    #[inline]
    pub fn node_count(&self) -> usize {
        (self.k_sup - self.k_sub) * (self.j_sup - self.j_sub) * (self.i_sup - self.i_sub)
    }

    /// 索引是否落在盒内
    #[inline]
    pub fn contains(&self, k: usize, j: usize, i: usize) -> bool {
        (self.k_sub..self.k_sup).contains(&k)
            && (self.j_sub..self.j_sup).contains(&j)
            && (self.i_sub..self.i_sup).contains(&i)
    }
}

// ============================================================
// 分区
// ============================================================

/// 固定的十三盒分区
#[derive(Debug, Clone)]
pub struct Partition {
    regions: Vec<Region>,
}

/// 分区盒总数
pub const REGION_COUNT: usize = 13;

impl Partition {
    /// 依据网格与六块边界板的边界条件构建分区
    pub fn build(space: &Space, bcs: [SlabBc; 6]) -> Self {
        let (im, jm, km) = (space.i_max, space.j_max, space.k_max);
        let ng = space.ng;
        let (nx, ny, nz) = (space.nx, space.ny, space.nz);

        let full = |role, normal, bc| Region {
            k_sub: 0,
            k_sup: km,
            j_sub: 0,
            j_sup: jm,
            i_sub: 0,
            i_sup: im,
            role,
            normal,
            bc,
        };

        let mut regions = Vec::with_capacity(REGION_COUNT);
        regions.push(full(RegionRole::Entire, IVec3::ZERO, None));

        // 六个外部边界板：法向跨度覆盖外部幽灵层与域边界节点层
        for (slot, side) in Side::ALL.iter().copied().enumerate() {
            let mut region = full(
                RegionRole::Slab(side),
                side.outward_normal(),
                Some(bcs[slot]),
            );
            let n = [nx, ny, nz][side.axis()];
            let (sub, sup) = if side.is_low() {
                (0, ng + 1)
            } else {
                (n + ng - 1, n + 2 * ng)
            };
            match side.axis() {
                0 => {
                    region.i_sub = sub;
                    region.i_sup = sup;
                }
                1 => {
                    region.j_sub = sub;
                    region.j_sup = sup;
                }
                _ => {
                    region.k_sub = sub;
                    region.k_sup = sup;
                }
            }
            regions.push(region);
        }

        // 内部核芯与其棱带
        let core = Region {
            k_sub: ng + 1,
            k_sup: nz + ng - 1,
            j_sub: ng + 1,
            j_sup: ny + ng - 1,
            i_sub: ng + 1,
            i_sup: nx + ng - 1,
            role: RegionRole::Interior,
            normal: IVec3::ZERO,
            bc: None,
        };
        for side in [Side::West, Side::East, Side::South, Side::North, Side::Front] {
            let mut edge = core.clone();
            edge.role = RegionRole::Edge(side);
            let n = [nx, ny, nz][side.axis()];
            let layer = if side.is_low() { ng + 1 } else { n + ng - 2 };
            match side.axis() {
                0 => {
                    edge.i_sub = layer;
                    edge.i_sup = layer + 1;
                }
                1 => {
                    edge.j_sub = layer;
                    edge.j_sup = layer + 1;
                }
                _ => {
                    edge.k_sub = layer;
                    edge.k_sup = layer + 1;
                }
            }
            regions.push(edge);
        }
        regions.push(core);

        debug_assert_eq!(regions.len(), REGION_COUNT);
        Self { regions }
    }

    /// 全部十三个盒
    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// 整域盒
    #[inline]
    pub fn entire(&self) -> &Region {
        &self.regions[0]
    }

    /// 六个边界板，按 W,E,S,N,F,B 次序
    #[inline]
    pub fn slabs(&self) -> &[Region] {
        &self.regions[1..7]
    }

    /// 指定方位的边界板
    #[inline]
    pub fn slab(&self, side: Side) -> &Region {
        &self.regions[1 + side.slot()]
    }

    /// 最内层流体核芯
    #[inline]
    pub fn interior(&self) -> &Region {
        &self.regions[REGION_COUNT - 1]
    }
}
