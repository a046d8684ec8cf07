// crates/af_physics/src/thermo.rs

//! 热力学转换
//!
//! 守恒变量 `U = (rho, rho*u, rho*v, rho*w, rho*E)` 与原始变量
//! `(rho, u, v, w, p, T)` 的相互映射，以及压力、温度的直接求值。
//! 所有公式使用归一化的 gamma / gasR / cv。
//!
//! 调用方不得传入 rho <= 0 或 p <= 0 的状态；运行中的合法性由
//! 求解器的场扫描负责（见 [`crate::solver`]）。

use af_domain::field::DIM_U;

/// 守恒状态向量
pub type Conservative = [f64; DIM_U];

/// 原始状态向量 (rho, u, v, w, p, T)
pub type Primitive = [f64; 6];

/// 守恒变量转原始变量
#[inline]
pub fn primitive_from_conservative(gamma: f64, gas_r: f64, u: &Conservative) -> Primitive {
    let rho = u[0];
    let p = pressure(gamma, u);
    [rho, u[1] / rho, u[2] / rho, u[3] / rho, p, p / (rho * gas_r)]
}

/// 原始变量 (rho, u, v, w, p) 转守恒变量
#[inline]
pub fn conservative_from_primitive(gamma: f64, rho: f64, vel: [f64; 3], p: f64) -> Conservative {
    let [u, v, w] = vel;
    [
        rho,
        rho * u,
        rho * v,
        rho * w,
        0.5 * rho * (u * u + v * v + w * w) + p / (gamma - 1.0),
    ]
}

/// 由守恒状态求压力
#[inline]
pub fn pressure(gamma: f64, u: &Conservative) -> f64 {
    (u[4] - 0.5 * (u[1] * u[1] + u[2] * u[2] + u[3] * u[3]) / u[0]) * (gamma - 1.0)
}

/// 由守恒状态求温度
#[inline]
pub fn temperature(cv: f64, u: &Conservative) -> f64 {
    (u[4] - 0.5 * (u[1] * u[1] + u[2] * u[2] + u[3] * u[3]) / u[0]) / (u[0] * cv)
}

/// 状态是否物理（rho > 0 且 p > 0 且各分量有限）
#[inline]
pub fn is_physical(gamma: f64, u: &Conservative) -> bool {
    u.iter().all(|c| c.is_finite()) && u[0] > 0.0 && pressure(gamma, u) > 0.0
}
