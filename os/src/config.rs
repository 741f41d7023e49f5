//! 模拟器配置
//!
//! 默认常量与启动时确定、之后不再改变的 [`KernelConfig`]。

use core::fmt;
use mm::MmConfig;

/// 页大小（字节）
pub const PAGE_SIZE: usize = 64;
/// 物理内存大小（字节），默认 8 个帧
pub const PHYSICAL_MEMORY_SIZE: usize = 512;
/// 每条指令占用的字节数（含结尾 NUL）
pub const INSTRUCTION_SIZE: usize = 16;
/// 每个进程的寄存器个数
pub const MAX_REGISTERS: usize = 8;
/// 同时装载的最大进程数
pub const MAX_PROCESSES: usize = 10;
/// 单个进程映像的最大字节数
pub const MAX_IMAGE_SIZE: usize = 1 << 20;

/// 内核配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    /// 内存管理配置
    pub mm: MmConfig,
    /// 指令大小
    pub instruction_size: usize,
    /// 寄存器个数
    pub max_registers: usize,
    /// 最大进程数
    pub max_processes: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            mm: MmConfig::new(PAGE_SIZE, PHYSICAL_MEMORY_SIZE),
            instruction_size: INSTRUCTION_SIZE,
            max_registers: MAX_REGISTERS,
            max_processes: MAX_PROCESSES,
        }
    }
}

impl KernelConfig {
    /// 替换内存管理配置
    pub fn with_mm(mut self, mm: MmConfig) -> Self {
        self.mm = mm;
        self
    }

    /// 检查配置是否自洽
    ///
    /// 页大小必须是指令大小的整数倍，保证取指不会跨页。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let page_size = self.mm.page_size();
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.instruction_size == 0 {
            return Err(ConfigError::ZeroInstructionSize);
        }
        if page_size % self.instruction_size != 0 {
            return Err(ConfigError::UnalignedInstruction {
                page_size,
                instruction_size: self.instruction_size,
            });
        }
        if self.mm.total_frames() == 0 {
            return Err(ConfigError::MemoryTooSmall {
                physical_memory_size: self.mm.physical_memory_size(),
                page_size,
            });
        }
        if self.max_registers == 0 {
            return Err(ConfigError::ZeroRegisters);
        }
        if self.max_processes == 0 {
            return Err(ConfigError::ZeroProcessLimit);
        }
        Ok(())
    }
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 页大小为 0
    ZeroPageSize,
    /// 指令大小为 0
    ZeroInstructionSize,
    /// 页大小不是指令大小的整数倍
    UnalignedInstruction {
        /// 页大小
        page_size: usize,
        /// 指令大小
        instruction_size: usize,
    },
    /// 物理内存不足一页
    MemoryTooSmall {
        /// 物理内存大小
        physical_memory_size: usize,
        /// 页大小
        page_size: usize,
    },
    /// 寄存器个数为 0
    ZeroRegisters,
    /// 进程数上限为 0
    ZeroProcessLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroPageSize => write!(f, "page size must be non-zero"),
            ConfigError::ZeroInstructionSize => write!(f, "instruction size must be non-zero"),
            ConfigError::UnalignedInstruction {
                page_size,
                instruction_size,
            } => write!(
                f,
                "page size {page_size} is not a multiple of instruction size {instruction_size}"
            ),
            ConfigError::MemoryTooSmall {
                physical_memory_size,
                page_size,
            } => write!(
                f,
                "physical memory ({physical_memory_size} bytes) is smaller than one page ({page_size} bytes)"
            ),
            ConfigError::ZeroRegisters => write!(f, "register count must be non-zero"),
            ConfigError::ZeroProcessLimit => write!(f, "process limit must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = KernelConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.mm.total_frames(), 8);
    }

    #[test]
    fn test_rejects_straddling_instructions() {
        let config = KernelConfig {
            instruction_size: 24,
            ..KernelConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnalignedInstruction {
                page_size: 64,
                instruction_size: 24
            })
        );
    }

    #[test]
    fn test_rejects_tiny_memory() {
        let config = KernelConfig::default().with_mm(MmConfig::new(64, 32));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MemoryTooSmall { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_limits() {
        let zero_regs = KernelConfig {
            max_registers: 0,
            ..KernelConfig::default()
        };
        assert_eq!(zero_regs.validate(), Err(ConfigError::ZeroRegisters));
        let zero_procs = KernelConfig {
            max_processes: 0,
            ..KernelConfig::default()
        };
        assert_eq!(zero_procs.validate(), Err(ConfigError::ZeroProcessLimit));
        let zero_page = KernelConfig::default().with_mm(MmConfig::new(0, 512));
        assert_eq!(zero_page.validate(), Err(ConfigError::ZeroPageSize));
    }
}
