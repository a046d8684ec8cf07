// crates/af_physics/src/model.rs

//! 流动模型参数
//!
//! 把用户给定的参考尺度解析为归一化的模型常数。解析完成后全部
//! 代码统一使用归一化值；量纲运行等价于全部参考量取 1。
//!
//! # 解析次序
//!
//! 1. 比热比 gamma = 1.4，量纲气体常数 R = 8.314462175
//! 2. 参考马赫数 Ma = U_ref / sqrt(gamma * R * T_ref)
//! 3. 覆盖为归一化形式：gasR = 1 / (gamma * Ma^2)，cv = gasR / (gamma - 1)
//! 4. 参考黏性归一化：mu_ref /= rho_ref * U_ref * L_ref

use af_foundation::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// 量纲通用气体常数 [J/(mol*K)]
pub const GAS_R_DIM: f64 = 8.314462175;

/// 空气普朗特数
pub const PRANDTL_AIR: f64 = 0.71;

/// Sutherland 黏性律系数
const SUTHERLAND_C1: f64 = 1.458e-6;
/// Sutherland 温度常数 [K]
const SUTHERLAND_S: f64 = 110.4;

/// 参考尺度（量纲输入）
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReferenceScales {
    /// 参考长度 [m]
    pub length: f64,
    /// 参考速度 [m/s]
    pub velocity: f64,
    /// 参考密度 [kg/m^3]
    pub density: f64,
    /// 参考温度 [K]
    pub temperature: f64,
    /// 参考黏性缩放（无黏算例取 0）
    pub viscosity: f64,
}

impl Default for ReferenceScales {
    fn default() -> Self {
        Self {
            length: 1.0,
            velocity: 1.0,
            density: 1.0,
            temperature: 1.0,
            viscosity: 0.0,
        }
    }
}

/// 归一化流动模型
#[derive(Debug, Clone, Copy)]
pub struct FlowModel {
    /// 比热比
    pub gamma: f64,
    /// 归一化气体常数 1 / (gamma * Ma^2)
    pub gas_r: f64,
    /// 归一化定容比热 gasR / (gamma - 1)
    pub cv: f64,
    /// 参考马赫数
    pub ref_ma: f64,
    /// 归一化参考黏性
    pub ref_mu: f64,
    /// 普朗特数
    pub prandtl: f64,
    /// 参考长度 [m]
    pub ref_length: f64,
    /// 参考速度 [m/s]
    pub ref_velocity: f64,
    /// 参考密度 [kg/m^3]
    pub ref_density: f64,
    /// 参考温度 [K]
    pub ref_temperature: f64,
}

impl FlowModel {
    /// 由参考尺度解析模型
    pub fn resolve(refs: &ReferenceScales) -> CoreResult<Self> {
        if refs.length <= 0.0 {
            return Err(CoreError::out_of_range("reference.length", refs.length, "参考长度必须为正"));
        }
        if refs.velocity <= 0.0 {
            return Err(CoreError::out_of_range("reference.velocity", refs.velocity, "参考速度必须为正"));
        }
        if refs.density <= 0.0 {
            return Err(CoreError::out_of_range("reference.density", refs.density, "参考密度必须为正"));
        }
        if refs.temperature <= 0.0 {
            return Err(CoreError::out_of_range("reference.temperature", refs.temperature, "参考温度必须为正"));
        }
        if refs.viscosity < 0.0 {
            return Err(CoreError::out_of_range("reference.viscosity", refs.viscosity, "参考黏性不能为负"));
        }

        let gamma = 1.4;
        let ref_ma = refs.velocity / (gamma * GAS_R_DIM * refs.temperature).sqrt();
        // 覆盖为对量纲与无量纲运行都成立的通用形式
        let gas_r = 1.0 / (gamma * ref_ma * ref_ma);
        let cv = gas_r / (gamma - 1.0);
        let ref_mu = refs.viscosity / (refs.density * refs.velocity * refs.length);

        Ok(Self {
            gamma,
            gas_r,
            cv,
            ref_ma,
            ref_mu,
            prandtl: PRANDTL_AIR,
            ref_length: refs.length,
            ref_velocity: refs.velocity,
            ref_density: refs.density,
            ref_temperature: refs.temperature,
        })
    }

    /// Sutherland 黏性律，输入量纲温度 [K]
    #[inline]
    pub fn sutherland(t_dim: f64) -> f64 {
        SUTHERLAND_C1 * t_dim.powf(1.5) / (t_dim + SUTHERLAND_S)
    }

    /// 归一化动力黏性，输入归一化温度
    #[inline]
    pub fn dynamic_viscosity(&self, t: f64) -> f64 {
        self.ref_mu * Self::sutherland(t * self.ref_temperature)
    }

    /// 由黏性求导热系数 k = gamma * cv * mu / Pr
    #[inline]
    pub fn heat_conductivity(&self, mu: f64) -> f64 {
        self.gamma * self.cv * mu / self.prandtl
    }

    /// 是否包含黏性项
    #[inline]
    pub fn is_viscous(&self) -> bool {
        self.ref_mu > 0.0
    }
}
