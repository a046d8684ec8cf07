// crates/af_physics/src/convective.rs

//! 无黏（对流）通量
//!
//! 三个方向的 Euler 通量闭式，由守恒状态直接求值。

use af_domain::field::DIM_U;

use crate::eigen::Axis;

/// 沿给定方向的无黏通量 F_s(U)
pub fn convective_flux(axis: Axis, gamma: f64, u_vec: &[f64; DIM_U]) -> [f64; DIM_U] {
    let rho = u_vec[0];
    let u = u_vec[1] / rho;
    let v = u_vec[2] / rho;
    let w = u_vec[3] / rho;
    let e_t = u_vec[4] / rho;
    let p = rho * (e_t - 0.5 * (u * u + v * v + w * w)) * (gamma - 1.0);
    match axis {
        Axis::X => [
            rho * u,
            rho * u * u + p,
            rho * u * v,
            rho * u * w,
            (rho * e_t + p) * u,
        ],
        Axis::Y => [
            rho * v,
            rho * v * u,
            rho * v * v + p,
            rho * v * w,
            (rho * e_t + p) * v,
        ],
        Axis::Z => [
            rho * w,
            rho * w * u,
            rho * w * v,
            rho * w * w + p,
            (rho * e_t + p) * w,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermo::conservative_from_primitive;

    const GAMMA: f64 = 1.4;

    #[test]
    fn test_quiescent_flux_is_pressure_only() {
        let u = conservative_from_primitive(GAMMA, 1.0, [0.0, 0.0, 0.0], 2.0);
        let fx = convective_flux(Axis::X, GAMMA, &u);
        assert_eq!(fx[0], 0.0);
        assert!((fx[1] - 2.0).abs() < 1e-14);
        assert_eq!(fx[2], 0.0);
        assert_eq!(fx[3], 0.0);
        assert_eq!(fx[4], 0.0);
    }

    #[test]
    fn test_rotational_symmetry() {
        // y 方向通量等于把 (u,v,w) 轮换后 x 方向通量的轮换
        let state = conservative_from_primitive(GAMMA, 1.3, [0.4, -0.7, 0.9], 1.1);
        let swapped_xy = conservative_from_primitive(GAMMA, 1.3, [-0.7, 0.4, 0.9], 1.1);
        let fy = convective_flux(Axis::Y, GAMMA, &state);
        let fx = convective_flux(Axis::X, GAMMA, &swapped_xy);
        // (rho, mu, mv, mw, E) 在 x<->y 交换下对应 (rho, mv, mu, mw, E)
        assert!((fy[0] - fx[0]).abs() < 1e-13);
        assert!((fy[1] - fx[2]).abs() < 1e-13);
        assert!((fy[2] - fx[1]).abs() < 1e-13);
        assert!((fy[3] - fx[3]).abs() < 1e-13);
        assert!((fy[4] - fx[4]).abs() < 1e-13);

        let swapped_xz = conservative_from_primitive(GAMMA, 1.3, [0.9, -0.7, 0.4], 1.1);
        let fz = convective_flux(Axis::Z, GAMMA, &state);
        let fx = convective_flux(Axis::X, GAMMA, &swapped_xz);
        assert!((fz[0] - fx[0]).abs() < 1e-13);
        assert!((fz[1] - fx[3]).abs() < 1e-13);
        assert!((fz[2] - fx[2]).abs() < 1e-13);
        assert!((fz[3] - fx[1]).abs() < 1e-13);
        assert!((fz[4] - fx[4]).abs() < 1e-13);
    }

    #[test]
    fn test_mass_flux_matches_momentum() {
        let state = conservative_from_primitive(GAMMA, 0.6, [1.5, 0.2, -0.4], 0.8);
        assert!((convective_flux(Axis::X, GAMMA, &state)[0] - state[1]).abs() < 1e-14);
        assert!((convective_flux(Axis::Y, GAMMA, &state)[0] - state[2]).abs() < 1e-14);
        assert!((convective_flux(Axis::Z, GAMMA, &state)[0] - state[3]).abs() < 1e-14);
    }
}
