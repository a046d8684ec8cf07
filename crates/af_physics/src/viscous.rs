// crates/af_physics/src/viscous.rs

//! 面心黏性（扩散）通量
//!
//! 在 `(k, j, i+1/2)` 类面上组装黏性应力与热流：法向导数用两点
//! 中心差分，两个切向导数用跨面四点平均，面值取两侧算术平均。
//! 法向正应力吸收 `-2/3 * divV` 项；能量通量叠加应力做功与导热。
//! y、z 方向模板是 x 方向在分量与坐标轴上的轮换。

use af_domain::field::DIM_U;
use af_domain::space::Space;

use crate::eigen::Axis;
use crate::model::FlowModel;
use crate::thermo::temperature;

/// 节点速度分量
#[inline]
fn velocity(buf: &[f64], idx: usize) -> (f64, f64, f64) {
    let base = idx * DIM_U;
    let rho = buf[base];
    (buf[base + 1] / rho, buf[base + 2] / rho, buf[base + 3] / rho)
}

/// 节点温度
#[inline]
fn temp(buf: &[f64], idx: usize, cv: f64) -> f64 {
    let base = idx * DIM_U;
    let u: [f64; DIM_U] = [
        buf[base],
        buf[base + 1],
        buf[base + 2],
        buf[base + 3],
        buf[base + 4],
    ];
    temperature(cv, &u)
}

/// 给定方向的面心黏性通量
///
/// 面位于节点 `(k, j, i)` 与其沿该方向 +1 邻居之间。
pub fn diffusive_flux(
    axis: Axis,
    space: &Space,
    model: &FlowModel,
    buf: &[f64],
    k: usize,
    j: usize,
    i: usize,
) -> [f64; DIM_U] {
    match axis {
        Axis::X => diffusive_flux_x(space, model, buf, k, j, i),
        Axis::Y => diffusive_flux_y(space, model, buf, k, j, i),
        Axis::Z => diffusive_flux_z(space, model, buf, k, j, i),
    }
}

fn diffusive_flux_x(
    space: &Space,
    model: &FlowModel,
    buf: &[f64],
    k: usize,
    j: usize,
    i: usize,
) -> [f64; DIM_U] {
    let ix = space.indexer();
    let idx = ix.idx(k, j, i);
    let idx_s = ix.idx(k, j - 1, i);
    let idx_n = ix.idx(k, j + 1, i);
    let idx_f = ix.idx(k - 1, j, i);
    let idx_b = ix.idx(k + 1, j, i);

    let idx_e = ix.idx(k, j, i + 1);
    let idx_se = ix.idx(k, j - 1, i + 1);
    let idx_ne = ix.idx(k, j + 1, i + 1);
    let idx_fe = ix.idx(k - 1, j, i + 1);
    let idx_be = ix.idx(k + 1, j, i + 1);

    let (u, v, w) = velocity(buf, idx);
    let t = temp(buf, idx, model.cv);
    let (u_s, v_s, _) = velocity(buf, idx_s);
    let (u_n, v_n, _) = velocity(buf, idx_n);
    let (u_f, _, w_f) = velocity(buf, idx_f);
    let (u_b, _, w_b) = velocity(buf, idx_b);
    let (u_e, v_e, w_e) = velocity(buf, idx_e);
    let t_e = temp(buf, idx_e, model.cv);
    let (u_se, v_se, _) = velocity(buf, idx_se);
    let (u_ne, v_ne, _) = velocity(buf, idx_ne);
    let (u_fe, _, w_fe) = velocity(buf, idx_fe);
    let (u_be, _, w_be) = velocity(buf, idx_be);

    let du_dx = (u_e - u) * space.ddx;
    let dv_dy = 0.25 * (v_n + v_ne - v_s - v_se) * space.ddy;
    let dw_dz = 0.25 * (w_b + w_be - w_f - w_fe) * space.ddz;
    let du_dy = 0.25 * (u_n + u_ne - u_s - u_se) * space.ddy;
    let dv_dx = (v_e - v) * space.ddx;
    let du_dz = 0.25 * (u_b + u_be - u_f - u_fe) * space.ddz;
    let dw_dx = (w_e - w) * space.ddx;
    let dt_dx = (t_e - t) * space.ddx;

    // 界面值
    let u_hat = 0.5 * (u + u_e);
    let v_hat = 0.5 * (v + v_e);
    let w_hat = 0.5 * (w + w_e);
    let t_hat = 0.5 * (t + t_e);
    let mu = model.dynamic_viscosity(t_hat);
    let heat_k = model.heat_conductivity(mu);
    let div_v = du_dx + dv_dy + dw_dz;

    let f1 = mu * (2.0 * du_dx - (2.0 / 3.0) * div_v);
    let f2 = mu * (du_dy + dv_dx);
    let f3 = mu * (du_dz + dw_dx);
    [0.0, f1, f2, f3, heat_k * dt_dx + f1 * u_hat + f2 * v_hat + f3 * w_hat]
}

fn diffusive_flux_y(
    space: &Space,
    model: &FlowModel,
    buf: &[f64],
    k: usize,
    j: usize,
    i: usize,
) -> [f64; DIM_U] {
    let ix = space.indexer();
    let idx = ix.idx(k, j, i);
    let idx_w = ix.idx(k, j, i - 1);
    let idx_e = ix.idx(k, j, i + 1);
    let idx_f = ix.idx(k - 1, j, i);
    let idx_b = ix.idx(k + 1, j, i);

    let idx_n = ix.idx(k, j + 1, i);
    let idx_wn = ix.idx(k, j + 1, i - 1);
    let idx_en = ix.idx(k, j + 1, i + 1);
    let idx_fn = ix.idx(k - 1, j + 1, i);
    let idx_bn = ix.idx(k + 1, j + 1, i);

    let (u, v, w) = velocity(buf, idx);
    let t = temp(buf, idx, model.cv);
    let (u_w, v_w, _) = velocity(buf, idx_w);
    let (u_e, v_e, _) = velocity(buf, idx_e);
    let (_, v_f, w_f) = velocity(buf, idx_f);
    let (_, v_b, w_b) = velocity(buf, idx_b);
    let (u_n, v_n, w_n) = velocity(buf, idx_n);
    let t_n = temp(buf, idx_n, model.cv);
    let (u_wn, v_wn, _) = velocity(buf, idx_wn);
    let (u_en, v_en, _) = velocity(buf, idx_en);
    let (_, v_fn, w_fn) = velocity(buf, idx_fn);
    let (_, v_bn, w_bn) = velocity(buf, idx_bn);

    let dv_dx = 0.25 * (v_e + v_en - v_w - v_wn) * space.ddx;
    let du_dy = (u_n - u) * space.ddy;
    let dv_dy = (v_n - v) * space.ddy;
    let du_dx = 0.25 * (u_e + u_en - u_w - u_wn) * space.ddx;
    let dw_dz = 0.25 * (w_b + w_bn - w_f - w_fn) * space.ddz;
    let dv_dz = 0.25 * (v_b + v_bn - v_f - v_fn) * space.ddz;
    let dw_dy = (w_n - w) * space.ddy;
    let dt_dy = (t_n - t) * space.ddy;

    let u_hat = 0.5 * (u + u_n);
    let v_hat = 0.5 * (v + v_n);
    let w_hat = 0.5 * (w + w_n);
    let t_hat = 0.5 * (t + t_n);
    let mu = model.dynamic_viscosity(t_hat);
    let heat_k = model.heat_conductivity(mu);
    let div_v = du_dx + dv_dy + dw_dz;

    let f1 = mu * (dv_dx + du_dy);
    let f2 = mu * (2.0 * dv_dy - (2.0 / 3.0) * div_v);
    let f3 = mu * (dv_dz + dw_dy);
    [0.0, f1, f2, f3, heat_k * dt_dy + f1 * u_hat + f2 * v_hat + f3 * w_hat]
}

fn diffusive_flux_z(
    space: &Space,
    model: &FlowModel,
    buf: &[f64],
    k: usize,
    j: usize,
    i: usize,
) -> [f64; DIM_U] {
    let ix = space.indexer();
    let idx = ix.idx(k, j, i);
    let idx_w = ix.idx(k, j, i - 1);
    let idx_e = ix.idx(k, j, i + 1);
    let idx_s = ix.idx(k, j - 1, i);
    let idx_n = ix.idx(k, j + 1, i);

    let idx_b = ix.idx(k + 1, j, i);
    let idx_wb = ix.idx(k + 1, j, i - 1);
    let idx_eb = ix.idx(k + 1, j, i + 1);
    let idx_sb = ix.idx(k + 1, j - 1, i);
    let idx_nb = ix.idx(k + 1, j + 1, i);

    let (u, v, w) = velocity(buf, idx);
    let t = temp(buf, idx, model.cv);
    let (u_w, _, w_w) = velocity(buf, idx_w);
    let (u_e, _, w_e) = velocity(buf, idx_e);
    let (_, v_s, w_s) = velocity(buf, idx_s);
    let (_, v_n, w_n) = velocity(buf, idx_n);
    let (u_b, v_b, w_b) = velocity(buf, idx_b);
    let t_b = temp(buf, idx_b, model.cv);
    let (u_wb, _, w_wb) = velocity(buf, idx_wb);
    let (u_eb, _, w_eb) = velocity(buf, idx_eb);
    let (_, v_sb, w_sb) = velocity(buf, idx_sb);
    let (_, v_nb, w_nb) = velocity(buf, idx_nb);

    let dw_dx = 0.25 * (w_e + w_eb - w_w - w_wb) * space.ddx;
    let du_dz = (u_b - u) * space.ddz;
    let dw_dy = 0.25 * (w_n + w_nb - w_s - w_sb) * space.ddy;
    let dv_dz = (v_b - v) * space.ddz;
    let du_dx = 0.25 * (u_e + u_eb - u_w - u_wb) * space.ddx;
    let dv_dy = 0.25 * (v_n + v_nb - v_s - v_sb) * space.ddy;
    let dw_dz = (w_b - w) * space.ddz;
    let dt_dz = (t_b - t) * space.ddz;

    let u_hat = 0.5 * (u + u_b);
    let v_hat = 0.5 * (v + v_b);
    let w_hat = 0.5 * (w + w_b);
    let t_hat = 0.5 * (t + t_b);
    let mu = model.dynamic_viscosity(t_hat);
    let heat_k = model.heat_conductivity(mu);
    let div_v = du_dx + dv_dy + dw_dz;

    let f1 = mu * (dw_dx + du_dz);
    let f2 = mu * (dw_dy + dv_dz);
    let f3 = mu * (2.0 * dw_dz - (2.0 / 3.0) * div_v);
    [0.0, f1, f2, f3, heat_k * dt_dz + f1 * u_hat + f2 * v_hat + f3 * w_hat]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReferenceScales;
    use crate::thermo::conservative_from_primitive;
    use af_domain::field::Field;
    use af_domain::space::GridSpec;

    fn viscous_model() -> FlowModel {
        FlowModel::resolve(&ReferenceScales {
            length: 1.0,
            velocity: 1.0,
            density: 1.0,
            temperature: 288.0,
            viscosity: 1.0,
        })
        .unwrap()
    }

    /// 按给定速度场填充小网格
    ///
    /// 密度取 1，压力取 gasR，使归一化温度处处为 1。
    fn filled_space(vel: impl Fn(f64, f64, f64) -> [f64; 3]) -> (Space, FlowModel, Vec<f64>) {
        let space = Space::new(&GridSpec {
            ncx: 6,
            ncy: 6,
            ncz: 6,
            ng: 2,
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
            z_min: 0.0,
            z_max: 1.0,
            ref_length: 1.0,
        })
        .unwrap();
        let model = viscous_model();
        let mut buf = vec![0.0; space.n_max * DIM_U];
        for k in 0..space.k_max {
            for j in 0..space.j_max {
                for i in 0..space.i_max {
                    let p = space.point(k, j, i);
                    let state = conservative_from_primitive(
                        model.gamma,
                        1.0,
                        vel(p.x, p.y, p.z),
                        model.gas_r,
                    );
                    Field::set_state(&mut buf, space.idx(k, j, i), state);
                }
            }
        }
        (space, model, buf)
    }

    #[test]
    fn test_uniform_field_has_zero_stress() {
        let (space, model, buf) = filled_space(|_, _, _| [0.3, -0.2, 0.1]);
        for axis in Axis::ALL {
            let f = diffusive_flux(axis, &space, &model, &buf, 5, 5, 5);
            assert_eq!(f[0], 0.0);
            for m in 1..DIM_U {
                assert!(f[m].abs() < 1e-12, "{axis:?} 分量 {m} 非零: {}", f[m]);
            }
        }
    }

    #[test]
    fn test_linear_shear_stress() {
        // u = a*y 的剪切流：x 面的 F2 与 y 面的 F1 都应为 mu*a
        let a = 0.7;
        let (space, model, buf) = filled_space(|_, y, _| [a * y, 0.0, 0.0]);
        let mu = model.dynamic_viscosity(1.0);
        let fx = diffusive_flux(Axis::X, &space, &model, &buf, 5, 5, 5);
        assert!((fx[2] - mu * a).abs() < 1e-12 + 1e-9 * mu);
        let fy = diffusive_flux(Axis::Y, &space, &model, &buf, 5, 5, 5);
        assert!((fy[1] - mu * a).abs() < 1e-12 + 1e-9 * mu);
        // 纯剪切无膨胀，法向正应力为零
        assert!(fx[1].abs() < 1e-14);
        assert!(fy[2].abs() < 1e-14);
    }

    #[test]
    fn test_dilatation_enters_normal_stress() {
        // u = a*x 的单向膨胀：x 面法向应力 mu*(2a - 2a/3)，y 面 -2/3*mu*a
        let a = 0.5;
        let (space, model, buf) = filled_space(|x, _, _| [a * x, 0.0, 0.0]);
        let mu = model.dynamic_viscosity(1.0);
        let fx = diffusive_flux(Axis::X, &space, &model, &buf, 5, 5, 5);
        assert!((fx[1] - mu * a * (2.0 - 2.0 / 3.0)).abs() < 1e-12 + 1e-9 * mu);
        let fy = diffusive_flux(Axis::Y, &space, &model, &buf, 5, 5, 5);
        assert!((fy[2] + mu * a * 2.0 / 3.0).abs() < 1e-12 + 1e-9 * mu);
    }

    #[test]
    fn test_cyclic_rotation_consistency() {
        // 场与坐标按 x->z 轮换后，z 面通量应是 x 面通量的分量轮换
        let field_x = |x: f64, y: f64, z: f64| [0.3 * x + 0.1 * y, 0.2 * z, -0.1 * x + 0.05 * z];
        let rotated = |x: f64, y: f64, z: f64| {
            // 新场 (u', v', w')(x, y, z) = (v, w, u)(z, x, y)
            let [u, v, w] = field_x(z, x, y);
            [v, w, u]
        };
        let (space, model, buf_a) = filled_space(field_x);
        let (_, _, buf_b) = filled_space(rotated);
        // 域为对称立方体，节点 (5,5,5) 在轮换下映射到自身
        let fa = diffusive_flux(Axis::X, &space, &model, &buf_a, 5, 5, 5);
        let fb = diffusive_flux(Axis::Z, &space, &model, &buf_b, 5, 5, 5);
        assert!((fb[0] - fa[0]).abs() < 1e-14);
        assert!((fb[1] - fa[2]).abs() < 1e-12);
        assert!((fb[2] - fa[3]).abs() < 1e-12);
        assert!((fb[3] - fa[1]).abs() < 1e-12);
        assert!((fb[4] - fa[4]).abs() < 1e-12);
    }
}
