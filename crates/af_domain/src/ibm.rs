// crates/af_domain/src/ibm.rs

//! 幽灵单元浸入边界分类器
//!
//! 把每个节点标记为流体 / 固体 / 幽灵 / 外部：
//!
//! 1. 全域重置为外部哨兵
//! 2. 在核芯盒内先置流体，再逐刚体做内含测试置固体；节点同时落在
//!    多个刚体内时绑定最后测到的刚体
//! 3. 第二遍扫核芯盒：六邻居中存在流体节点的固体节点晋升为幽灵
//!
//! 分类完成后幽灵节点沿每个固体表面的流体一侧构成一层单元厚的
//! 包带；外部板节点保持哨兵不动；流体与固体节点划分核芯。
//!
//! 刚体静止时只需在预处理阶段执行一次；刚体运动时每步整体重跑，
//! 不允许只重跑定位遍（否则外部板与旧固体区的标记会残留）。

use crate::body::{BodySet, ImplicitSurface};
use crate::partition::Partition;
use crate::space::{NodeKind, Space};

/// 初始化整个域的几何标记
///
/// 重置外部哨兵后执行一次完整分类。预处理阶段与刚体运动后都走
/// 这个入口。
pub fn initialize_domain_geometry(space: &mut Space, bodies: &BodySet, part: &Partition) {
    space.reset_kinds();
    compute_domain_geometry(space, bodies, part);
}

/// 在已重置的域上执行分类（定位固体 + 识别幽灵）
pub fn compute_domain_geometry(space: &mut Space, bodies: &BodySet, part: &Partition) {
    locate_solid_nodes(space, bodies, part);
    identify_ghost_nodes(space, part);
}

/// 定位固体节点
///
/// 核芯盒内每个节点先重置为流体，再对每个刚体做内含测试。
fn locate_solid_nodes(space: &mut Space, bodies: &BodySet, part: &Partition) {
    let core = part.interior().clone();
    for k in core.k_range() {
        for j in core.j_range() {
            for i in core.i_range() {
                let idx = space.idx(k, j, i);
                let p = space.point(k, j, i);
                let mut kind = NodeKind::Fluid;
                for (id, body) in bodies.iter().enumerate() {
                    if body.signed_distance(p) < 0.0 {
                        kind = NodeKind::Solid(id as u32);
                    }
                }
                space.set_kind(idx, kind);
            }
        }
    }
}

/// 识别幽灵节点
///
/// 固体节点的六个轴向邻居里只要有一个流体节点，它就是幽灵节点。
/// 就地晋升是安全的：晋升只把固体改成幽灵，不会产生新的流体邻居。
fn identify_ghost_nodes(space: &mut Space, part: &Partition) {
    let core = part.interior().clone();
    let indexer = space.indexer();
    for k in core.k_range() {
        for j in core.j_range() {
            for i in core.i_range() {
                let idx = indexer.idx(k, j, i);
                let NodeKind::Solid(id) = space.kind(idx) else {
                    continue;
                };
                let neighbors = [
                    indexer.idx(k, j, i - 1),
                    indexer.idx(k, j, i + 1),
                    indexer.idx(k, j - 1, i),
                    indexer.idx(k, j + 1, i),
                    indexer.idx(k - 1, j, i),
                    indexer.idx(k + 1, j, i),
                ];
                if neighbors.iter().any(|&n| space.kind(n).is_fluid()) {
                    space.set_kind(idx, NodeKind::Ghost(id));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::partition::SlabBc;
    use crate::space::GridSpec;
    use glam::DVec3;

    fn classified_sphere(nc: usize, radius: f64) -> (Space, Partition) {
        let mut space = Space::new(&GridSpec {
            ncx: nc,
            ncy: nc,
            ncz: nc,
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
        let part = Partition::build(&space, [SlabBc::default(); 6]);
        let bodies = BodySet::new(vec![Body::sphere(DVec3::splat(0.5), radius)]);
        initialize_domain_geometry(&mut space, &bodies, &part);
        (space, part)
    }

    #[test]
    fn test_no_bodies_all_fluid() {
        let mut space = Space::new(&GridSpec {
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
        let part = Partition::build(&space, [SlabBc::default(); 6]);
        initialize_domain_geometry(&mut space, &BodySet::default(), &part);
        let (fluid, solid, ghost, exterior) = space.count_kinds();
        assert_eq!(fluid, part.interior().node_count());
        assert_eq!(solid, 0);
        assert_eq!(ghost, 0);
        assert_eq!(exterior, space.n_max - fluid);
    }

    #[test]
    fn test_sphere_counts() {
        // dx = 1/99，球半径 0.2 约 19.8 格
        let (space, part) = classified_sphere(98, 0.2);
        let (_, solid, ghost, _) = space.count_kinds();
        let r_cells = 0.2 * space.ddx;

        // 体内节点数接近球体积
        let volume = 4.0 / 3.0 * std::f64::consts::PI * r_cells.powi(3);
        let inside = (solid + ghost) as f64;
        assert!(
            (inside - volume).abs() < 0.1 * volume,
            "体内节点 {inside} 偏离球体积 {volume}"
        );

        // 幽灵带数量与球面积同量级（栅格化包带的计数系数略小于 1）
        let area = 4.0 * std::f64::consts::PI * r_cells.powi(2);
        assert!(
            ghost as f64 > 0.5 * area && (ghost as f64) < 1.5 * area,
            "幽灵节点 {ghost} 偏离球面积 {area}"
        );

        // 外部板保持哨兵
        let entire = part.entire();
        let core = part.interior();
        for k in entire.k_range() {
            for j in entire.j_range() {
                for i in entire.i_range() {
                    if !core.contains(k, j, i) {
                        assert_eq!(space.kind(space.idx(k, j, i)), NodeKind::Exterior);
                    }
                }
            }
        }
    }

    #[test]
    fn test_ghost_band_invariants() {
        let (space, part) = classified_sphere(40, 0.2);
        let indexer = space.indexer();
        let core = part.interior();
        for k in core.k_range() {
            for j in core.j_range() {
                for i in core.i_range() {
                    let neighbors = [
                        indexer.idx(k, j, i - 1),
                        indexer.idx(k, j, i + 1),
                        indexer.idx(k, j - 1, i),
                        indexer.idx(k, j + 1, i),
                        indexer.idx(k - 1, j, i),
                        indexer.idx(k + 1, j, i),
                    ];
                    match space.kind(indexer.idx(k, j, i)) {
                        // 每个幽灵节点必须贴着流体
                        NodeKind::Ghost(id) => {
                            assert_eq!(id, 0);
                            assert!(neighbors.iter().any(|&n| space.kind(n).is_fluid()));
                        }
                        // 不允许有贴着流体的固体节点残留
                        NodeKind::Solid(_) => {
                            assert!(neighbors.iter().all(|&n| !space.kind(n).is_fluid()));
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    #[test]
    fn test_reclassification_after_motion() {
        let mut space = Space::new(&GridSpec {
            ncx: 30,
            ncy: 30,
            ncz: 30,
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
        let part = Partition::build(&space, [SlabBc::default(); 6]);
        let mut body = Body::sphere(DVec3::new(0.3, 0.5, 0.5), 0.15);
        body.velocity = DVec3::new(1.0, 0.0, 0.0);
        let mut bodies = BodySet::new(vec![body]);
        initialize_domain_geometry(&mut space, &bodies, &part);
        let before = space.count_kinds();

        // 球心移动 0.4：整体重分类后原位置不得残留固体
        bodies.advance(0.4);
        initialize_domain_geometry(&mut space, &bodies, &part);
        let after = space.count_kinds();
        assert!((before.1 as i64 - after.1 as i64).abs() < before.1 as i64 / 5 + 8);

        let old_center_idx = space.idx(
            space.node_k(0.5).unwrap(),
            space.node_j(0.5).unwrap(),
            space.node_i(0.3).unwrap(),
        );
        assert!(space.kind(old_center_idx).is_fluid());
        let new_center_idx = space.idx(
            space.node_k(0.5).unwrap(),
            space.node_j(0.5).unwrap(),
            space.node_i(0.7).unwrap(),
        );
        assert!(space.kind(new_center_idx).is_solid());
    }
}
