// crates/af_physics/src/eigen.rs

//! 特征分解
//!
//! 三个方向的 Euler 通量雅可比特征系统：对称 / Roe 平均、特征值、
//! 左右特征向量矩阵与特征值分裂。矩阵元素为解析闭式，左右矩阵
//! 互逆到浮点精度。
//!
//! 方向与分裂格式都是有限变体集合，用枚举做标签分派；三个方向核
//! 共享全部外层结构，由编译器单态化。

use af_domain::field::DIM_U;
use serde::{Deserialize, Serialize};

/// Steger-Warming 分裂的熵修正参数
const SW_EPSILON: f64 = 1.0e-3;

/// 空间方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// x 方向
    X = 0,
    /// y 方向
    Y = 1,
    /// z 方向
    Z = 2,
}

impl Axis {
    /// 三个方向的固定次序
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// 方向下标
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// 面平均方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AverageKind {
    /// 算术平均
    #[default]
    Arithmetic,
    /// Roe 平均
    Roe,
}

/// 特征值分裂格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitterKind {
    /// 局部 Lax-Friedrichs：全部特征按局部最大波速分裂
    #[default]
    LaxFriedrichs,
    /// Steger-Warming：逐特征光滑化分裂
    StegerWarming,
}

/// 面平均状态 (u, v, w, hT, c)
#[derive(Debug, Clone, Copy)]
pub struct AverageState {
    /// x 速度
    pub u: f64,
    /// y 速度
    pub v: f64,
    /// z 速度
    pub w: f64,
    /// 总焓
    pub h_t: f64,
    /// 声速
    pub c: f64,
}

impl AverageState {
    /// 沿给定方向的速度分量
    #[inline]
    pub fn velocity(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.u,
            Axis::Y => self.v,
            Axis::Z => self.w,
        }
    }
}

/// 由左右守恒状态计算面平均
///
/// Roe 权重 `D = sqrt(rhoR / rhoL)`，算术平均 `D = 1`；速度与总焓
/// 按 `(phiL + D*phiR) / (1 + D)` 平均，声速由总焓闭合：
/// `c = sqrt((gamma-1) * (hT - q))`。
pub fn symmetric_average(
    kind: AverageKind,
    gamma: f64,
    ul: &[f64; DIM_U],
    ur: &[f64; DIM_U],
) -> AverageState {
    let rho_l = ul[0];
    let u_l = ul[1] / rho_l;
    let v_l = ul[2] / rho_l;
    let w_l = ul[3] / rho_l;
    let h_t_l = (ul[4] / rho_l) * gamma
        - 0.5 * (u_l * u_l + v_l * v_l + w_l * w_l) * (gamma - 1.0);
    let rho_r = ur[0];
    let u_r = ur[1] / rho_r;
    let v_r = ur[2] / rho_r;
    let w_r = ur[3] / rho_r;
    let h_t_r = (ur[4] / rho_r) * gamma
        - 0.5 * (u_r * u_r + v_r * v_r + w_r * w_r) * (gamma - 1.0);

    let d = match kind {
        AverageKind::Arithmetic => 1.0,
        AverageKind::Roe => (rho_r / rho_l).sqrt(),
    };
    let u = (u_l + d * u_r) / (1.0 + d);
    let v = (v_l + d * v_r) / (1.0 + d);
    let w = (w_l + d * w_r) / (1.0 + d);
    let h_t = (h_t_l + d * h_t_r) / (1.0 + d);
    let c = ((gamma - 1.0) * (h_t - 0.5 * (u * u + v * v + w * w))).sqrt();

    AverageState { u, v, w, h_t, c }
}

/// 沿给定方向的特征值 (us - c, us, us, us, us + c)
#[inline]
pub fn eigenvalues(axis: Axis, avg: &AverageState) -> [f64; DIM_U] {
    let us = avg.velocity(axis);
    let c = avg.c;
    [us - c, us, us, us, us + c]
}

/// 特征值分裂，返回 (Lambda+, Lambda-)
///
/// 两种分裂都满足 `Lambda+ + Lambda- = Lambda`；Steger-Warming 额外
/// 保证 `Lambda+ >= 0`、`Lambda- <= 0`。
pub fn split_eigenvalues(
    kind: SplitterKind,
    lambda: &[f64; DIM_U],
) -> ([f64; DIM_U], [f64; DIM_U]) {
    let mut plus = [0.0; DIM_U];
    let mut minus = [0.0; DIM_U];
    match kind {
        SplitterKind::LaxFriedrichs => {
            // 局部最大波速 |us| + c，复用已存的特征值组装
            let lambda_star = lambda[1].abs() + lambda[4] - lambda[2];
            for row in 0..DIM_U {
                plus[row] = 0.5 * (lambda[row] + lambda_star);
                minus[row] = 0.5 * (lambda[row] - lambda_star);
            }
        }
        SplitterKind::StegerWarming => {
            for row in 0..DIM_U {
                let smooth = (lambda[row] * lambda[row] + SW_EPSILON * SW_EPSILON).sqrt();
                plus[row] = 0.5 * (lambda[row] + smooth);
                minus[row] = 0.5 * (lambda[row] - smooth);
            }
        }
    }
    (plus, minus)
}

/// 左特征向量矩阵
pub fn eigenvector_l(axis: Axis, gamma: f64, avg: &AverageState) -> [[f64; DIM_U]; DIM_U] {
    let (u, v, w, c) = (avg.u, avg.v, avg.w, avg.c);
    let q = 0.5 * (u * u + v * v + w * w);
    let b = (gamma - 1.0) / (2.0 * c * c);
    let d = 1.0 / (2.0 * c);
    match axis {
        Axis::X => [
            [b * q + d * u, -b * u - d, -b * v, -b * w, b],
            [-2.0 * b * q + 1.0, 2.0 * b * u, 2.0 * b * v, 2.0 * b * w, -2.0 * b],
            [-2.0 * b * q * v, 2.0 * b * v * u, 2.0 * b * v * v + 1.0, 2.0 * b * w * v, -2.0 * b * v],
            [-2.0 * b * q * w, 2.0 * b * w * u, 2.0 * b * w * v, 2.0 * b * w * w + 1.0, -2.0 * b * w],
            [b * q - d * u, -b * u + d, -b * v, -b * w, b],
        ],
        Axis::Y => [
            [b * q + d * v, -b * u, -b * v - d, -b * w, b],
            [-2.0 * b * q * u, 2.0 * b * u * u + 1.0, 2.0 * b * v * u, 2.0 * b * w * u, -2.0 * b * u],
            [-2.0 * b * q + 1.0, 2.0 * b * u, 2.0 * b * v, 2.0 * b * w, -2.0 * b],
            [-2.0 * b * q * w, 2.0 * b * w * u, 2.0 * b * w * v, 2.0 * b * w * w + 1.0, -2.0 * b * w],
            [b * q - d * v, -b * u, -b * v + d, -b * w, b],
        ],
        Axis::Z => [
            [b * q + d * w, -b * u, -b * v, -b * w - d, b],
            [-2.0 * b * q * u, 2.0 * b * u * u + 1.0, 2.0 * b * v * u, 2.0 * b * w * u, -2.0 * b * u],
            [-2.0 * b * q * v, 2.0 * b * v * u, 2.0 * b * v * v + 1.0, 2.0 * b * w * v, -2.0 * b * v],
            [-2.0 * b * q + 1.0, 2.0 * b * u, 2.0 * b * v, 2.0 * b * w, -2.0 * b],
            [b * q - d * w, -b * u, -b * v, -b * w + d, b],
        ],
    }
}

/// 右特征向量矩阵
pub fn eigenvector_r(axis: Axis, avg: &AverageState) -> [[f64; DIM_U]; DIM_U] {
    let (u, v, w, h_t, c) = (avg.u, avg.v, avg.w, avg.h_t, avg.c);
    let q = 0.5 * (u * u + v * v + w * w);
    match axis {
        Axis::X => [
            [1.0, 1.0, 0.0, 0.0, 1.0],
            [u - c, u, 0.0, 0.0, u + c],
            [v, 0.0, 1.0, 0.0, v],
            [w, 0.0, 0.0, 1.0, w],
            [h_t - u * c, u * u - q, v, w, h_t + u * c],
        ],
        Axis::Y => [
            [1.0, 0.0, 1.0, 0.0, 1.0],
            [u, 1.0, 0.0, 0.0, u],
            [v - c, 0.0, v, 0.0, v + c],
            [w, 0.0, 0.0, 1.0, w],
            [h_t - v * c, u, v * v - q, w, h_t + v * c],
        ],
        Axis::Z => [
            [1.0, 0.0, 0.0, 1.0, 1.0],
            [u, 1.0, 0.0, 0.0, u],
            [v, 0.0, 1.0, 0.0, v],
            [w - c, 0.0, 0.0, w, w + c],
            [h_t - w * c, u, v, w * w - q, h_t + w * c],
        ],
    }
}

/// 5x5 矩阵与向量乘积
#[inline]
pub fn mat_vec(m: &[[f64; DIM_U]; DIM_U], x: &[f64; DIM_U]) -> [f64; DIM_U] {
    let mut out = [0.0; DIM_U];
    for (row, out_r) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for col in 0..DIM_U {
            acc += m[row][col] * x[col];
        }
        *out_r = acc;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermo::conservative_from_primitive;

    const GAMMA: f64 = 1.4;

    fn sample_average() -> AverageState {
        let ul = conservative_from_primitive(GAMMA, 1.0, [0.3, -0.2, 0.5], 1.0);
        let ur = conservative_from_primitive(GAMMA, 0.8, [0.1, 0.4, -0.3], 0.7);
        symmetric_average(AverageKind::Roe, GAMMA, &ul, &ur)
    }

    #[test]
    fn test_average_reduces_to_state() {
        // 左右状态相同时，平均速度与总焓应精确还原
        let u = conservative_from_primitive(GAMMA, 1.2, [0.5, -0.1, 0.2], 0.9);
        for kind in [AverageKind::Arithmetic, AverageKind::Roe] {
            let avg = symmetric_average(kind, GAMMA, &u, &u);
            assert!((avg.u - 0.5).abs() < 1e-14);
            assert!((avg.v + 0.1).abs() < 1e-14);
            assert!((avg.w - 0.2).abs() < 1e-14);
            // c^2 = gamma * p / rho
            let c2 = GAMMA * 0.9 / 1.2;
            assert!((avg.c * avg.c - c2).abs() < 1e-12);
        }
    }

    #[test]
    fn test_left_right_inverse() {
        let avg = sample_average();
        for axis in Axis::ALL {
            let l = eigenvector_l(axis, GAMMA, &avg);
            let r = eigenvector_r(axis, &avg);
            let mut max_err: f64 = 0.0;
            for row in 0..DIM_U {
                for col in 0..DIM_U {
                    let mut acc = 0.0;
                    for m in 0..DIM_U {
                        acc += l[row][m] * r[m][col];
                    }
                    let expected = if row == col { 1.0 } else { 0.0 };
                    max_err = max_err.max((acc - expected).abs());
                }
            }
            assert!(max_err < 1e-10, "{axis:?} 方向 L*R 偏离单位阵 {max_err:.3e}");
        }
    }

    #[test]
    fn test_eigenvalue_layout() {
        let avg = sample_average();
        for axis in Axis::ALL {
            let lambda = eigenvalues(axis, &avg);
            let us = avg.velocity(axis);
            assert!((lambda[0] - (us - avg.c)).abs() < 1e-14);
            assert!((lambda[1] - us).abs() < 1e-14);
            assert!((lambda[2] - us).abs() < 1e-14);
            assert!((lambda[3] - us).abs() < 1e-14);
            assert!((lambda[4] - (us + avg.c)).abs() < 1e-14);
        }
    }

    #[test]
    fn test_lax_friedrichs_split_sum_exact() {
        let lambda = [-1.3, 0.2, 0.2, 0.2, 1.7];
        let (plus, minus) = split_eigenvalues(SplitterKind::LaxFriedrichs, &lambda);
        let lambda_star = lambda[1].abs() + lambda[4] - lambda[2];
        for row in 0..DIM_U {
            assert_eq!(plus[row] + minus[row], lambda[row]);
            assert!((plus[row] - 0.5 * (lambda[row] + lambda_star)).abs() < 1e-15);
        }
    }

    #[test]
    fn test_steger_warming_split_signs() {
        let lambda = [-2.0, -1e-6, 0.0, 3e-4, 1.5];
        let (plus, minus) = split_eigenvalues(SplitterKind::StegerWarming, &lambda);
        for row in 0..DIM_U {
            assert!(plus[row] >= 0.0);
            assert!(minus[row] <= 0.0);
            // 和的偏差由 epsilon 光滑化控制
            assert!((plus[row] + minus[row] - lambda[row]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_characteristic_projection_round_trip() {
        // R * (L * x) = x
        let avg = sample_average();
        let x = [0.3, -1.0, 0.7, 0.2, 2.1];
        for axis in Axis::ALL {
            let l = eigenvector_l(axis, GAMMA, &avg);
            let r = eigenvector_r(axis, &avg);
            let back = mat_vec(&r, &mat_vec(&l, &x));
            for m in 0..DIM_U {
                assert!((back[m] - x[m]).abs() < 1e-10);
            }
        }
    }
}
