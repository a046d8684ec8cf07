// crates/af_foundation/src/index.rs

//! 节点索引数学
//!
//! 本模块集中管理稠密三维场的寻址：
//! - (k, j, i) 到扁平偏移的线性化
//! - 物理坐标与节点编号的相互转换（半格舍入）
//!
//! # 布局约定
//!
//! i 沿 x 方向变化最快，k 沿 z 方向变化最慢：
//!
//! ```text
//! idx = (k * jMax + j) * iMax + i
//! ```
//!
//! 该布局是上层守恒变量场与节点标记数组的共同基础，任何改动都会
//! 破坏二进制输出与重启文件的兼容性。

use crate::error::{CoreError, CoreResult};

/// 三维节点索引器
///
/// 持有含幽灵层的总节点数，提供线性化与坐标转换。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridIndexer {
    /// x 方向总节点数（含幽灵层）
    pub i_max: usize,
    /// y 方向总节点数（含幽灵层）
    pub j_max: usize,
    /// z 方向总节点数（含幽灵层）
    pub k_max: usize,
}

impl GridIndexer {
    /// 创建索引器
    pub const fn new(k_max: usize, j_max: usize, i_max: usize) -> Self {
        Self { i_max, j_max, k_max }
    }

    /// 总节点数
    #[inline]
    pub const fn len(&self) -> usize {
        self.i_max * self.j_max * self.k_max
    }

    /// 是否为空网格
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// (k, j, i) 线性化为扁平偏移
    #[inline]
    pub const fn idx(&self, k: usize, j: usize, i: usize) -> usize {
        (k * self.j_max + j) * self.i_max + i
    }

    /// 扁平偏移还原为 (k, j, i)
    #[inline]
    pub const fn unravel(&self, idx: usize) -> (usize, usize, usize) {
        let i = idx % self.i_max;
        let j = (idx / self.i_max) % self.j_max;
        let k = idx / (self.i_max * self.j_max);
        (k, j, i)
    }

    /// 索引是否在网格内
    #[inline]
    pub const fn contains(&self, k: usize, j: usize, i: usize) -> bool {
        k < self.k_max && j < self.j_max && i < self.i_max
    }
}

/// 物理坐标转节点编号（半格舍入）
///
/// 向下取整前加半格偏移，保证得到最近节点；该舍入仅对非负的
/// 相对位移 `s - s_min` 成立。非有限输入返回错误，越界输入由
/// [`clamp_node`] 静默截断。
#[inline]
pub fn node_from_coord(s: f64, s_min: f64, dds: f64, ng: usize) -> CoreResult<i64> {
    if !s.is_finite() {
        return Err(CoreError::invalid_input(format!("非有限坐标: {s}")));
    }
    Ok(((s - s_min) * dds + 0.5) as i64 + ng as i64)
}

/// 节点编号截断到有效区间 `[n_min, n_max)`
#[inline]
pub fn clamp_node(n: i64, n_min: usize, n_max: usize) -> usize {
    n.clamp(n_min as i64, n_max as i64 - 1) as usize
}

/// 节点编号转物理坐标
#[inline]
pub fn coord_from_node(n: usize, s_min: f64, ds: f64, ng: usize) -> f64 {
    s_min + (n as f64 - ng as f64) * ds
}
