// crates/af_io/tests/io_round_trip.rs

//! IO 链路集成测试
//!
//! - 算例解析到参数归一化的端到端检查
//! - EnSight 几何文件的 iblank 与节点计数回读
//! - 重启检查点的保存 / 加载 / 恢复闭环

use std::path::PathBuf;

use af_io::{build_solver, CaseFile, EnsightExporter, IoError, Restart};

fn temp_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const PLAIN_CASE: &str = r#"{
    "grid": { "cells": [10, 10, 10], "ghost_layers": 2,
              "x": [0.0, 1.0], "y": [0.0, 1.0], "z": [0.0, 1.0] },
    "reference": { "length": 1.0, "velocity": 1.0, "density": 1.0,
                   "temperature": 1.0, "viscosity": 0.0 },
    "time": { "total_time": 1.0, "total_step": 16, "cfl": 0.5, "output_count": 2 },
    "initial": { "state": { "rho": 1.0, "p": 1.0 } }
}"#;

const SPHERE_CASE: &str = r#"{
    "grid": { "cells": [20, 20, 20], "ghost_layers": 2,
              "x": [0.0, 1.0], "y": [0.0, 1.0], "z": [0.0, 1.0] },
    "time": { "total_time": 1.0, "total_step": 4, "cfl": 0.5, "output_count": 1 },
    "initial": { "state": { "rho": 1.0, "p": 1.0 } },
    "bodies": [ { "center": [0.5, 0.5, 0.5], "radius": 0.2 } ]
}"#;

#[test]
fn test_case_resolution_normalizes_parameters() {
    // 10^3 单元、ng = 2、参考量全 1 的归一化结果
    let case = CaseFile::from_str(PLAIN_CASE).unwrap();
    let solver = build_solver(&case).unwrap();

    let space = solver.space();
    assert_eq!(space.nx, 12);
    assert_eq!(space.i_max, 16);
    assert_eq!(space.n_max, 16 * 16 * 16);
    assert!((space.dx - 1.0 / 11.0).abs() < 1e-15);
    assert!((space.ddx - 11.0).abs() < 1e-12);

    let model = solver.model();
    assert!((model.gamma - 1.4).abs() < 1e-15);
    let expected_ma = 1.0 / (1.4f64 * 8.314462175).sqrt();
    assert!((model.ref_ma - expected_ma).abs() < 1e-14);
    // 覆盖后的 gasR 落回量纲气体常数
    assert!((model.gas_r - 8.314462175).abs() < 1e-10);
}

#[test]
fn test_ensight_geometry_iblank() {
    let dir = temp_dir("ensight_iblank");
    let case = CaseFile::from_str(SPHERE_CASE).unwrap();
    let solver = build_solver(&case).unwrap();
    let mut exporter = EnsightExporter::new(&dir).unwrap();
    exporter.write_step(&solver).unwrap();

    let space = solver.space();
    let geo = std::fs::read(dir.join("ensight00000.geo")).unwrap();

    // 头部：5 条说明记录 + part 记录 + 编号 + 名称 + 块类型
    assert_eq!(&geo[..8], b"C Binary");
    let mut offset = 5 * 80;
    assert_eq!(&geo[offset..offset + 4], b"part");
    offset += 80;
    let part_num = i32::from_le_bytes(geo[offset..offset + 4].try_into().unwrap());
    assert_eq!(part_num, 1);
    offset += 4;
    offset += 80; // 名称
    assert_eq!(&geo[offset..offset + 14], b"block iblanked");
    offset += 80;

    // 节点计数应覆盖整个含幽灵层的域
    let ni = i32::from_le_bytes(geo[offset..offset + 4].try_into().unwrap()) as usize;
    let nj = i32::from_le_bytes(geo[offset + 4..offset + 8].try_into().unwrap()) as usize;
    let nk = i32::from_le_bytes(geo[offset + 8..offset + 12].try_into().unwrap()) as usize;
    offset += 12;
    assert_eq!((ni, nj, nk), (space.i_max, space.j_max, space.k_max));
    let n = ni * nj * nk;
    assert_eq!(n, space.n_max);

    // 第一个 x 坐标是最外层幽灵节点坐标
    let x0 = f32::from_le_bytes(geo[offset..offset + 4].try_into().unwrap());
    let expected = (space.x_min - space.ng as f64 * space.dx) as f32;
    assert!((x0 - expected).abs() < 1e-6);

    // 跳过三个坐标分量后读 iblank
    offset += 3 * n * 4;
    assert_eq!(geo.len(), offset + n * 4);
    let mut ones = 0usize;
    let mut flat = 0usize;
    for k in 0..space.k_max {
        for j in 0..space.j_max {
            for i in 0..space.i_max {
                let b = i32::from_le_bytes(
                    geo[offset + flat * 4..offset + flat * 4 + 4].try_into().unwrap(),
                );
                assert_eq!(b, space.kind(space.idx(k, j, i)).iblank());
                ones += b as usize;
                flat += 1;
            }
        }
    }
    // iblank = 1 恰好对应流体与幽灵节点
    let (fluid, solid, ghost, _) = space.count_kinds();
    assert!(solid > 0 && ghost > 0);
    assert_eq!(ones, fluid + ghost);

    // 粒子文件带刚体计数，字段按 %.6g 写出
    let particle = std::fs::read_to_string(dir.join("ensight00000.particle")).unwrap();
    let mut lines = particle.lines();
    assert_eq!(lines.next(), Some("N: 1"));
    assert_eq!(lines.next(), Some("0.5, 0.5, 0.5, 0.2, 0, 0, 0, 0"));
}

#[test]
fn test_transient_case_accumulates_steps() {
    let dir = temp_dir("ensight_transient");
    let case = CaseFile::from_str(PLAIN_CASE).unwrap();
    let mut solver = build_solver(&case).unwrap();
    let mut exporter = EnsightExporter::new(&dir).unwrap();

    exporter.write_step(&solver).unwrap();
    solver.time_mut().mark_output();
    solver.step().unwrap();
    exporter.write_step(&solver).unwrap();
    solver.time_mut().mark_output();

    let case_text = std::fs::read_to_string(dir.join("ensight.case")).unwrap();
    assert!(case_text.contains("type: ensight gold"));
    assert!(case_text.contains("number of steps:          2"));
    assert!(dir.join("ensight00001.rho").exists());
    assert!(dir.join("ensight00001.Vel").exists());
}

#[test]
fn test_restart_round_trip() {
    let dir = temp_dir("restart");
    let case = CaseFile::from_str(SPHERE_CASE).unwrap();
    let mut solver = build_solver(&case).unwrap();
    solver.step().unwrap();
    solver.step().unwrap();

    let path = dir.join("checkpoint.afck");
    Restart::capture(&solver).save(&path).unwrap();

    let loaded = Restart::load(&path).unwrap();
    assert_eq!(loaded.step, 2);
    assert_eq!(loaded.bodies.len(), 1);
    assert!((loaded.time - solver.time().current_time).abs() < 1e-15);

    // 写回新装配的求解器后场与推进状态完全一致
    let mut fresh = build_solver(&case).unwrap();
    loaded.apply(&mut fresh).unwrap();
    assert_eq!(fresh.time().step_count, 2);
    assert_eq!(fresh.current_state(), solver.current_state());

    // 两个求解器继续推进一步仍一致
    solver.step().unwrap();
    fresh.step().unwrap();
    assert_eq!(fresh.current_state(), solver.current_state());
}

#[test]
fn test_restart_rejects_corruption() {
    let dir = temp_dir("restart_corrupt");
    let case = CaseFile::from_str(PLAIN_CASE).unwrap();
    let solver = build_solver(&case).unwrap();
    let path = dir.join("checkpoint.afck");
    Restart::capture(&solver).save(&path).unwrap();

    // 翻转负载中的一个字节
    let mut bytes = std::fs::read(&path).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0xFF;
    std::fs::write(&path, &bytes).unwrap();
    assert!(matches!(
        Restart::load(&path),
        Err(IoError::Checksum { .. })
    ));

    // 截断的文件同样拒绝
    std::fs::write(&path, &bytes[..20]).unwrap();
    assert!(Restart::load(&path).is_err());
}

#[test]
fn test_restart_mesh_mismatch() {
    let case_a = CaseFile::from_str(PLAIN_CASE).unwrap();
    let case_b = CaseFile::from_str(SPHERE_CASE).unwrap();
    let solver_a = build_solver(&case_a).unwrap();
    let mut solver_b = build_solver(&case_b).unwrap();
    let snapshot = Restart::capture(&solver_a);
    assert!(matches!(
        snapshot.apply(&mut solver_b),
        Err(IoError::MeshMismatch { .. })
    ));
}
