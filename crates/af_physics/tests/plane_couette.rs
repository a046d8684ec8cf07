// crates/af_physics/tests/plane_couette.rs

//! 平面 Couette 流验证
//!
//! y 方向上下无滑移壁（上壁以 U_wall 平移），x、z 周期，z 方向取
//! 1 个单元按二维退化约定处理。推进到黏性稳态后速度剖面应为线性
//! `u(y) = y * U_wall`，其余速度分量为零。
//!
//! 数值耗散与物理黏性同向叠加，有效扩散远快于纯物理扩散，总时间
//! 取 2 个对流时间已远超稳态所需。

use af_domain::field::Field;
use af_domain::partition::{BcValue, BoundaryKind, SlabBc, Side};
use af_domain::space::{GridSpec, Space};
use af_physics::model::{FlowModel, ReferenceScales};
use af_physics::solver::SolverBuilder;
use af_physics::thermo::pressure;
use af_physics::timestep::TimeControl;

const U_WALL: f64 = 0.05;

#[test]
fn test_plane_couette_converges_to_linear_profile() {
    let space = Space::new(&GridSpec {
        ncx: 3,
        ncy: 8,
        ncz: 1,
        ng: 2,
        x_min: 0.0,
        x_max: 1.0,
        y_min: 0.0,
        y_max: 1.0,
        z_min: 0.0,
        z_max: 0.25,
        ref_length: 1.0,
    })
    .unwrap();

    // 空气参考温度下把黏性缩放提到 Re ~ 4 的量级
    let refs = ReferenceScales {
        length: 1.0,
        velocity: 1.0,
        density: 1.0,
        temperature: 288.0,
        viscosity: 1.4e4,
    };
    let model = FlowModel::resolve(&refs).unwrap();
    assert!(model.is_viscous());
    let time = TimeControl::resolve(2.0, -1, 0.4, 1, &model).unwrap();

    let mut bcs = [SlabBc::default(); 6];
    for side in [Side::West, Side::East, Side::Front, Side::Back] {
        bcs[side.slot()].kind = BoundaryKind::Periodic;
    }
    bcs[Side::South.slot()] = SlabBc {
        kind: BoundaryKind::NoSlipWall,
        value: BcValue::default(),
    };
    bcs[Side::North.slot()] = SlabBc {
        kind: BoundaryKind::NoSlipWall,
        value: BcValue {
            u: U_WALL,
            ..Default::default()
        },
    };

    // 初始静止，归一化温度为 1（p = rho * gasR）
    let mut solver = SolverBuilder::new(space, model, time)
        .with_boundaries(bcs)
        .with_background(BcValue {
            rho: 1.0,
            p: model.gas_r,
            ..Default::default()
        })
        .build()
        .unwrap();

    solver.run().unwrap();
    assert!(solver.time().step_count > 100);

    let space = solver.space();
    let buf = solver.current_state();
    let i = space.ng + space.nx / 2;
    let k = space.ng + space.nz / 2;
    for j in space.ng..space.ny + space.ng {
        let y = space.y(j);
        let u_vec = Field::state(buf, space.idx(k, j, i));
        let rho = u_vec[0];
        let (u, v, w) = (u_vec[1] / rho, u_vec[2] / rho, u_vec[3] / rho);

        // 线性剖面，1e-4 * U_wall 量级
        assert!(
            (u - y * U_WALL).abs() < 1.0e-4 * U_WALL,
            "j = {j}: u = {u:.3e}, 期望 {:.3e}",
            y * U_WALL
        );
        // 其余分量保持为零
        assert!(v.abs() < 1e-8, "j = {j}: v = {v:.3e}");
        assert!(w.abs() < 1e-8, "j = {j}: w = {w:.3e}");
        // 密度与压力保持均匀
        assert!((rho - 1.0).abs() < 1e-4);
        let p = pressure(solver.model().gamma, &u_vec);
        assert!((p / model.gas_r - 1.0).abs() < 1e-4);
    }
}
