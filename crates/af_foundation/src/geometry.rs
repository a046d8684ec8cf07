// crates/af_foundation/src/geometry.rs

//! 向量几何工具
//!
//! 点积、叉积与范数直接使用 [`glam::DVec3`]；本模块补充求解器
//! 需要的正交标架构造与距离平方。

use glam::DVec3;

/// 由法向量构造正交标架 (Ta, Tb)
///
/// 选取法向量绝对值最小的分量所在轴，与其构造第一切向量，再经
/// 叉积闭合标架。输入须为非零向量；返回的两个切向量均为单位向量。
pub fn orthonormal_frame(n: DVec3) -> (DVec3, DVec3) {
    let a = n.abs();
    let ta = if a.x <= a.y && a.x <= a.z {
        DVec3::new(0.0, -n.z, n.y)
    } else if a.y <= a.z {
        DVec3::new(-n.z, 0.0, n.x)
    } else {
        DVec3::new(-n.y, n.x, 0.0)
    }
    .normalize();
    let tb = n.normalize().cross(ta);
    (ta, tb)
}

/// 两点距离的平方
#[inline]
pub fn dist2(a: DVec3, b: DVec3) -> f64 {
    a.distance_squared(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(n: DVec3) {
        let (ta, tb) = orthonormal_frame(n);
        let n = n.normalize();
        assert!((ta.length() - 1.0).abs() < 1e-12);
        assert!((tb.length() - 1.0).abs() < 1e-12);
        assert!(n.dot(ta).abs() < 1e-12);
        assert!(n.dot(tb).abs() < 1e-12);
        assert!(ta.dot(tb).abs() < 1e-12);
    }

    #[test]
    fn test_frame_axis_aligned() {
        assert_orthonormal(DVec3::X);
        assert_orthonormal(DVec3::Y);
        assert_orthonormal(DVec3::Z);
    }

    #[test]
    fn test_frame_generic() {
        assert_orthonormal(DVec3::new(1.0, 2.0, 3.0));
        assert_orthonormal(DVec3::new(-0.3, 0.9, -0.1));
    }

    #[test]
    fn test_dist2() {
        let a = DVec3::new(1.0, 0.0, 0.0);
        let b = DVec3::new(0.0, 2.0, 2.0);
        assert!((dist2(a, b) - 9.0).abs() < 1e-12);
    }
}
