// crates/af_physics/src/ic.rs

//! 初始条件
//!
//! 初始场由一个全局原始状态加若干区域覆盖组成：区域按声明次序
//! 施加，后声明者覆盖先声明者。区域形状支持轴对齐盒与球。

use af_domain::field::Field;
use af_domain::partition::BcValue;
use af_domain::space::Space;
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::model::FlowModel;
use crate::thermo::conservative_from_primitive;

/// 初始条件区域形状
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IcShape {
    /// 轴对齐盒 [min, max)
    Box {
        /// 低角点
        min: [f64; 3],
        /// 高角点
        max: [f64; 3],
    },
    /// 球
    Sphere {
        /// 球心
        center: [f64; 3],
        /// 半径
        radius: f64,
    },
}

impl IcShape {
    /// 点是否落在形状内
    pub fn contains(&self, p: DVec3) -> bool {
        match *self {
            IcShape::Box { min, max } => {
                p.x >= min[0]
                    && p.x < max[0]
                    && p.y >= min[1]
                    && p.y < max[1]
                    && p.z >= min[2]
                    && p.z < max[2]
            }
            IcShape::Sphere { center, radius } => {
                p.distance_squared(DVec3::from_array(center)) < radius * radius
            }
        }
    }
}

/// 一块初始条件区域
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IcRegion {
    /// 区域形状
    pub shape: IcShape,
    /// 区域内的原始状态
    pub state: BcValue,
}

/// 填充初始场
///
/// 整个含幽灵层的域先写全局状态，再按区域覆盖；边界板随后由边界
/// 驱动刷新。
pub fn apply_initial_conditions(
    space: &Space,
    model: &FlowModel,
    background: &BcValue,
    regions: &[IcRegion],
    buf: &mut [f64],
) {
    for k in 0..space.k_max {
        for j in 0..space.j_max {
            for i in 0..space.i_max {
                let p = space.point(k, j, i);
                let mut value = *background;
                for region in regions {
                    if region.shape.contains(p) {
                        value = region.state;
                    }
                }
                let state = conservative_from_primitive(
                    model.gamma,
                    value.rho,
                    [value.u, value.v, value.w],
                    value.p,
                );
                Field::set_state(buf, space.idx(k, j, i), state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReferenceScales;
    use crate::thermo::pressure;
    use af_domain::field::DIM_U;
    use af_domain::space::GridSpec;

    #[test]
    fn test_region_overrides_background() {
        let space = Space::new(&GridSpec {
            ncx: 8,
            ncy: 4,
            ncz: 4,
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
        let model = FlowModel::resolve(&ReferenceScales::default()).unwrap();
        let mut buf = vec![0.0; space.n_max * DIM_U];

        let background = BcValue {
            rho: 1.0,
            p: 1.0,
            ..Default::default()
        };
        let right = IcRegion {
            shape: IcShape::Box {
                min: [0.5, -10.0, -10.0],
                max: [10.0, 10.0, 10.0],
            },
            state: BcValue {
                rho: 0.125,
                p: 0.1,
                ..Default::default()
            },
        };
        apply_initial_conditions(&space, &model, &background, &[right], &mut buf);

        let left_idx = space.idx(4, 4, space.node_i(0.25).unwrap());
        let right_idx = space.idx(4, 4, space.node_i(0.75).unwrap());
        let left = Field::state(&buf, left_idx);
        let right_state = Field::state(&buf, right_idx);
        assert!((left[0] - 1.0).abs() < 1e-14);
        assert!((pressure(model.gamma, &left) - 1.0).abs() < 1e-13);
        assert!((right_state[0] - 0.125).abs() < 1e-14);
        assert!((pressure(model.gamma, &right_state) - 0.1).abs() < 1e-13);
    }

    #[test]
    fn test_sphere_shape() {
        let shape = IcShape::Sphere {
            center: [0.5, 0.5, 0.5],
            radius: 0.2,
        };
        assert!(shape.contains(DVec3::new(0.5, 0.5, 0.6)));
        assert!(!shape.contains(DVec3::new(0.5, 0.5, 0.71)));
    }
}
