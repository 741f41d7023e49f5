//! 内核错误类型

use crate::config::ConfigError;
use crate::loader::LoadError;
use core::fmt;
use mm::{PagingError, Pid};

/// 导致模拟无法开始或必须中止的错误
#[derive(Debug)]
pub enum KernelError {
    /// 致命的分页错误
    Paging {
        /// 出错时正在运行的进程
        pid: Pid,
        /// 原始错误
        source: PagingError,
    },
    /// 进程映像加载失败
    Load(LoadError),
    /// 配置无效
    Config(ConfigError),
    /// 超过进程数上限
    TooManyProcesses {
        /// 上限
        limit: usize,
    },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::Paging { pid, source } => {
                write!(f, "fatal paging error in process {pid}: {source}")
            }
            KernelError::Load(e) => write!(f, "load failure: {e}"),
            KernelError::Config(e) => write!(f, "invalid configuration: {e}"),
            KernelError::TooManyProcesses { limit } => {
                write!(f, "too many processes (limit {limit})")
            }
        }
    }
}

impl std::error::Error for KernelError {}

impl From<LoadError> for KernelError {
    fn from(e: LoadError) -> Self {
        KernelError::Load(e)
    }
}

impl From<ConfigError> for KernelError {
    fn from(e: ConfigError) -> Self {
        KernelError::Config(e)
    }
}
