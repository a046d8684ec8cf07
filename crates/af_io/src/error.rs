// crates/af_io/src/error.rs

//! IO 层错误类型

use af_foundation::error::CoreError;
use af_physics::error::SolveError;
use thiserror::Error;

use crate::case::CaseError;

/// IO 结果别名
pub type IoResult<T> = Result<T, IoError>;

/// IO 层错误
#[derive(Debug, Error)]
pub enum IoError {
    /// 底层 IO 操作失败
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 算例文件错误
    #[error(transparent)]
    Case(#[from] CaseError),

    /// 基础层错误
    #[error(transparent)]
    Core(#[from] CoreError),

    /// 求解层错误
    #[error(transparent)]
    Solve(#[from] SolveError),

    /// 重启文件损坏
    #[error("重启文件损坏: {0}")]
    Corrupted(String),

    /// 重启文件校验和不匹配
    #[error("校验和不匹配: 期望 {expected:08x}, 实际 {found:08x}")]
    Checksum {
        /// 文件中记录的校验和
        expected: u32,
        /// 实际计算出的校验和
        found: u32,
    },

    /// 重启文件版本不兼容
    #[error("版本不兼容: 文件版本 {file}, 当前版本 {current}")]
    Version {
        /// 文件版本
        file: u32,
        /// 当前支持版本
        current: u32,
    },

    /// 重启文件与网格不匹配
    #[error("网格不匹配: 期望 {expected} 个场分量, 文件 {found} 个")]
    MeshMismatch {
        /// 期望的场长度
        expected: usize,
        /// 文件中的场长度
        found: usize,
    },
}
