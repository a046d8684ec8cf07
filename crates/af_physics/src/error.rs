// crates/af_physics/src/error.rs

//! 求解层错误类型
//!
//! 两类致命错误来自运行中的场检查：非物理状态带出错节点与步数，
//! 数值发散在场中扫到 NaN 时触发。核心层不做恢复。

use af_foundation::error::CoreError;
use thiserror::Error;

/// 求解结果别名
pub type SolveResult<T> = Result<T, SolveError>;

/// 求解层错误
#[derive(Debug, Error)]
pub enum SolveError {
    /// 场内出现非物理状态（rho <= 0 或 p <= 0）
    #[error(
        "非物理状态: 节点 (k={k}, j={j}, i={i}), 第 {step} 步, rho={rho:.6e}, p={p:.6e}"
    )]
    NonPhysicalState {
        /// 出错节点 k
        k: usize,
        /// 出错节点 j
        j: usize,
        /// 出错节点 i
        i: usize,
        /// 出错步数
        step: usize,
        /// 当时密度
        rho: f64,
        /// 当时压力
        p: f64,
    },

    /// 场内出现 NaN / Inf
    #[error("数值发散: 第 {step} 步场内出现非有限值")]
    Diverged {
        /// 出错步数
        step: usize,
    },

    /// 基础层错误
    #[error(transparent)]
    Core(#[from] CoreError),
}
