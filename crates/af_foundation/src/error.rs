// crates/af_foundation/src/error.rs

//! 基础错误类型
//!
//! 定义输入校验与内部不变量相关的基础错误。求解与 IO 层的高层错误
//! 在各自 crate 中定义，并通过 `#[from]` 向上转换。

use thiserror::Error;

/// 统一结果类型别名
pub type CoreResult<T> = Result<T, CoreError>;

/// 基础层错误
///
/// 所有变体在核心层均为致命错误：报告位置后终止，不做恢复。
#[derive(Debug, Error)]
pub enum CoreError {
    /// 输入数据验证失败
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    /// 配置参数越界（负的网格间距、负的参考量等）
    #[error("参数越界: {key} = {value}（{reason}）")]
    OutOfRange {
        /// 参数名称
        key: &'static str,
        /// 实际取值
        value: String,
        /// 越界原因
        reason: &'static str,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望 {expected}, 实际 {actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 内部不变量被破坏
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

impl CoreError {
    /// 创建无效输入错误
    #[inline]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 创建参数越界错误
    #[inline]
    pub fn out_of_range(key: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self::OutOfRange {
            key,
            value: value.to_string(),
            reason,
        }
    }

    /// 创建内部错误
    #[inline]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// 验证数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> CoreResult<()> {
        if expected != actual {
            Err(Self::SizeMismatch {
                name,
                expected,
                actual,
            })
        } else {
            Ok(())
        }
    }
}
