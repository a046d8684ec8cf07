// crates/af_physics/src/boundary.rs

//! 边界驱动
//!
//! 每步扫描前把六块外部边界板写成与边界条件一致的状态，并给浸入
//! 边界的幽灵节点填镜像状态。板按 W,E,S,N,F,B 的固定次序访问，棱
//! 角处的重叠由后访问的板覆盖。
//!
//! 各类边界的节点处理（bl 为域边界节点层编号）：
//!
//! - 入流：整板写给定的原始状态
//! - 出流：整板复制第一层内部节点（沿法向零梯度）
//! - 滑移壁：边界层法向速度置零、其余取内侧；幽灵层按 `2*bl - n`
//!   镜像并翻转法向动量
//! - 无滑移壁：边界层速度取壁面速度；幽灵层镜像并令
//!   `v_ghost = 2*v_wall - v_image`
//! - 周期：沿法向按节点周期 `n - 1` 搬运
//! - 流体：占位，不处理

use af_domain::body::BodySet;
use af_domain::field::Field;
use af_domain::partition::{BoundaryKind, Partition, Side};
use af_domain::space::Space;
use glam::DVec3;

use crate::model::FlowModel;
use crate::thermo::{conservative_from_primitive, pressure};

/// 把轴向坐标替换进 (k, j, i)
#[inline]
fn with_axis(axis: usize, k: usize, j: usize, i: usize, n: usize) -> (usize, usize, usize) {
    match axis {
        0 => (k, j, n),
        1 => (k, n, i),
        _ => (n, j, i),
    }
}

/// 按边界条件刷新全部边界板
pub fn apply_boundary_conditions(
    space: &Space,
    part: &Partition,
    model: &FlowModel,
    buf: &mut [f64],
) {
    for side in Side::ALL {
        let region = part.slab(side);
        let Some(bc) = region.bc else { continue };
        if matches!(bc.kind, BoundaryKind::Fluid) {
            continue;
        }

        let axis = side.axis();
        let n_ax = [space.nx, space.ny, space.nz][axis];
        let ng = space.ng;
        let bl = if side.is_low() { ng } else { n_ax + ng - 1 };
        let inward: i64 = if side.is_low() { 1 } else { -1 };
        let period = (n_ax - 1) as i64;

        let inlet_state = conservative_from_primitive(
            model.gamma,
            bc.value.rho,
            [bc.value.u, bc.value.v, bc.value.w],
            bc.value.p,
        );
        let wall_vel = [bc.value.u, bc.value.v, bc.value.w];

        let (k_range, j_range, i_range) = (region.k_range(), region.j_range(), region.i_range());
        for k in k_range {
            for j in j_range.clone() {
                for i in i_range.clone() {
                    let idx = space.idx(k, j, i);
                    let n = [i, j, k][axis];
                    match bc.kind {
                        BoundaryKind::Fluid => {}
                        BoundaryKind::Inlet => {
                            Field::set_state(buf, idx, inlet_state);
                        }
                        BoundaryKind::Outlet => {
                            let src = (bl as i64 + inward) as usize;
                            let (sk, sj, si) = with_axis(axis, k, j, i, src);
                            let state = Field::state(buf, space.idx(sk, sj, si));
                            Field::set_state(buf, idx, state);
                        }
                        BoundaryKind::SlipWall => {
                            let state = if n == bl {
                                let src = (bl as i64 + inward) as usize;
                                let (sk, sj, si) = with_axis(axis, k, j, i, src);
                                let inner = Field::state(buf, space.idx(sk, sj, si));
                                let rho = inner[0];
                                let mut vel = [inner[1] / rho, inner[2] / rho, inner[3] / rho];
                                vel[axis] = 0.0;
                                let p = pressure(model.gamma, &inner);
                                conservative_from_primitive(model.gamma, rho, vel, p)
                            } else {
                                let src = (2 * bl as i64 - n as i64) as usize;
                                let (sk, sj, si) = with_axis(axis, k, j, i, src);
                                let mut mirror = Field::state(buf, space.idx(sk, sj, si));
                                // 法向动量反号即可，动能不变故总能不变
                                mirror[1 + axis] = -mirror[1 + axis];
                                mirror
                            };
                            Field::set_state(buf, idx, state);
                        }
                        BoundaryKind::NoSlipWall => {
                            let state = if n == bl {
                                let src = (bl as i64 + inward) as usize;
                                let (sk, sj, si) = with_axis(axis, k, j, i, src);
                                let inner = Field::state(buf, space.idx(sk, sj, si));
                                let p = pressure(model.gamma, &inner);
                                conservative_from_primitive(model.gamma, inner[0], wall_vel, p)
                            } else {
                                let src = (2 * bl as i64 - n as i64) as usize;
                                let (sk, sj, si) = with_axis(axis, k, j, i, src);
                                let image = Field::state(buf, space.idx(sk, sj, si));
                                let rho = image[0];
                                let vel = [
                                    2.0 * wall_vel[0] - image[1] / rho,
                                    2.0 * wall_vel[1] - image[2] / rho,
                                    2.0 * wall_vel[2] - image[3] / rho,
                                ];
                                let p = pressure(model.gamma, &image);
                                conservative_from_primitive(model.gamma, rho, vel, p)
                            };
                            Field::set_state(buf, idx, state);
                        }
                        BoundaryKind::Periodic => {
                            let rel = n as i64 - ng as i64;
                            let src = (ng as i64 + (rel.rem_euclid(period))) as usize;
                            if src != n {
                                let (sk, sj, si) = with_axis(axis, k, j, i, src);
                                let state = Field::state(buf, space.idx(sk, sj, si));
                                Field::set_state(buf, idx, state);
                            }
                        }
                    }
                }
            }
        }
    }
}

/// 给浸入边界幽灵节点填镜像状态
///
/// 沿刚体外法向的主轴取一步之外的像节点：像为流体时，按无滑移壁
/// 的全反射镜像（速度关于刚体运动速度反射，密度与压力取像值）；
/// 像不是流体的凹角节点保持原值。
pub fn apply_body_ghost_states(
    space: &Space,
    part: &Partition,
    bodies: &BodySet,
    model: &FlowModel,
    buf: &mut [f64],
) {
    if bodies.is_empty() {
        return;
    }
    let core = part.interior().clone();
    for k in core.k_range() {
        for j in core.j_range() {
            for i in core.i_range() {
                let idx = space.idx(k, j, i);
                let Some(id) = space.kind(idx).body_id() else {
                    continue;
                };
                if !space.kind(idx).is_ghost() {
                    continue;
                }
                let body = match bodies.get(id as usize) {
                    Some(body) => body,
                    None => continue,
                };
                let normal = space.point(k, j, i) - body.center;
                let a = normal.abs();
                let (axis, step) = if a.x >= a.y && a.x >= a.z {
                    (0usize, normal.x.signum() as i64)
                } else if a.y >= a.z {
                    (1usize, normal.y.signum() as i64)
                } else {
                    (2usize, normal.z.signum() as i64)
                };
                let n = [i, j, k][axis] as i64 + step;
                let (ik, ij, ii) = with_axis(axis, k, j, i, n as usize);
                let image_idx = space.idx(ik, ij, ii);
                if !space.kind(image_idx).is_fluid() {
                    continue;
                }
                let image = Field::state(buf, image_idx);
                let rho = image[0];
                let vb: DVec3 = body.velocity;
                let vel = [
                    2.0 * vb.x - image[1] / rho,
                    2.0 * vb.y - image[2] / rho,
                    2.0 * vb.z - image[3] / rho,
                ];
                let p = pressure(model.gamma, &image);
                Field::set_state(
                    buf,
                    idx,
                    conservative_from_primitive(model.gamma, rho, vel, p),
                );
            }
        }
    }
}
