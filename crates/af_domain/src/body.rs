// crates/af_domain/src/body.rs

//! 嵌入刚体
//!
//! 刚体由隐式曲面描述：曲面函数在体内取负。当前实现为球体；
//! [`ImplicitSurface`] 把分类器与具体形状解耦，任何提供符号距离
//! 函数的形状都可以接入。

use af_foundation::geometry::dist2;
use glam::DVec3;

/// 隐式曲面：`signed_distance` 在体内为负、体外为正
pub trait ImplicitSurface {
    /// 符号化的距离量（与真实符号距离同号即可）
    fn signed_distance(&self, p: DVec3) -> f64;
}

/// 球形刚体
///
/// 角速度按约定绕 z 轴，随粒子文件持久化；球面几何本身对旋转不
/// 敏感，分类器不读取它。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// 球心（归一化坐标）
    pub center: DVec3,
    /// 半径（归一化）
    pub radius: f64,
    /// 平动速度（归一化）
    pub velocity: DVec3,
    /// 角速度 [rad/s]（归一化）
    pub omega: f64,
}

impl Body {
    /// 创建静止球体
    pub fn sphere(center: DVec3, radius: f64) -> Self {
        Self {
            center,
            radius,
            velocity: DVec3::ZERO,
            omega: 0.0,
        }
    }

    /// 是否在运动
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.velocity != DVec3::ZERO
    }

    /// 平动一个时间步
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        self.center += self.velocity * dt;
    }
}

impl ImplicitSurface for Body {
    /// 球面的距离平方量：`|p - c|^2 - r^2`
    #[inline]
    fn signed_distance(&self, p: DVec3) -> f64 {
        dist2(p, self.center) - self.radius * self.radius
    }
}

/// 刚体集合
#[derive(Debug, Clone, Default)]
pub struct BodySet {
    bodies: Vec<Body>,
}

impl BodySet {
    /// 由刚体列表创建
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies }
    }

    /// 刚体数量
    #[inline]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// 迭代全部刚体
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    /// 按编号取刚体
    #[inline]
    pub fn get(&self, id: usize) -> Option<&Body> {
        self.bodies.get(id)
    }

    /// 是否存在运动刚体
    pub fn any_moving(&self) -> bool {
        self.bodies.iter().any(Body::is_moving)
    }

    /// 全部刚体平动一个时间步
    pub fn advance(&mut self, dt: f64) {
        for body in &mut self.bodies {
            body.advance(dt);
        }
    }
}
