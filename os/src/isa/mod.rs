//! 玩具指令集
//!
//! 指令为文本：操作码字符后跟空白分隔的十进制操作数，寄存器为 `i32`。
//!
//! | 指令 | 语义 |
//! |---|---|
//! | `M r imm` | `R[r] = imm` |
//! | `A d a b` | `R[d] = R[a] + R[b]`（回绕） |
//! | `L r addr` | `R[r]` = 虚拟地址 `addr` 处的 4 字节小端整数 |
//! | `S r addr` | 把 `R[r]` 以 4 字节小端写入 `addr` |
//!
//! 内存操作数经由 [`MemoryAccess`]，因此可能触发缺页。

use crate::kernel::RegisterSet;
use core::fmt;
use mm::{MemoryAccess, PagingError, Vaddr};

/// 指令执行错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// 无法识别的操作码，按空操作处理
    UnknownOpcode(u8),
    /// 操作数个数或寄存器编号不合法，按空操作处理
    InvalidOperands {
        /// 操作码
        opcode: char,
        /// 指令文本
        text: String,
    },
    /// 内存访问失败
    Memory(PagingError),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::UnknownOpcode(op) => write!(f, "Unknown Opcode ({})", char::from(*op)),
            ExecError::InvalidOperands { opcode, text } => {
                write!(f, "invalid operands for opcode {opcode}: {text:?}")
            }
            ExecError::Memory(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ExecError {}

impl From<PagingError> for ExecError {
    fn from(e: PagingError) -> Self {
        ExecError::Memory(e)
    }
}

/// 解码后的指令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `M r imm`
    Move {
        /// 目标寄存器
        reg: usize,
        /// 立即数
        imm: i32,
    },
    /// `A d a b`
    Add {
        /// 目标寄存器
        dst: usize,
        /// 左操作数寄存器
        lhs: usize,
        /// 右操作数寄存器
        rhs: usize,
    },
    /// `L r addr`
    Load {
        /// 目标寄存器
        reg: usize,
        /// 虚拟地址
        addr: usize,
    },
    /// `S r addr`
    Store {
        /// 源寄存器
        reg: usize,
        /// 虚拟地址
        addr: usize,
    },
}

/// 指令语义
///
/// 执行一条已取出的指令，修改寄存器并通过 `mem` 访问进程内存。
pub trait InstructionSet {
    /// 执行 `instruction` 槽中的指令
    fn execute(
        &self,
        instruction: &[u8],
        regs: &mut RegisterSet,
        mem: &mut dyn MemoryAccess,
    ) -> Result<(), ExecError>;
}

/// 默认的 M/A/L/S 指令集
#[derive(Debug, Clone, Copy, Default)]
pub struct ToyIsa;

impl ToyIsa {
    /// 解码一个以 NUL 结尾的指令槽
    pub fn decode(&self, slot: &[u8], registers: usize) -> Result<Instruction, ExecError> {
        let len = slot.iter().position(|&b| b == 0).unwrap_or(slot.len());
        let bytes = &slot[..len];
        let opcode = bytes.first().copied().unwrap_or(0);
        let text = core::str::from_utf8(bytes).map_err(|_| ExecError::UnknownOpcode(opcode))?;

        let invalid = || ExecError::InvalidOperands {
            opcode: char::from(opcode),
            text: text.to_string(),
        };
        let operands = text.get(1..).unwrap_or_default();
        let fields: Vec<&str> = operands.split_whitespace().collect();
        let reg = |i: usize| -> Result<usize, ExecError> {
            let r: usize = fields.get(i).and_then(|f| f.parse().ok()).ok_or_else(invalid)?;
            if r < registers { Ok(r) } else { Err(invalid()) }
        };
        let num = |i: usize| -> Result<i64, ExecError> {
            fields.get(i).and_then(|f| f.parse().ok()).ok_or_else(invalid)
        };
        let arity = |n: usize| -> Result<(), ExecError> {
            if fields.len() == n { Ok(()) } else { Err(invalid()) }
        };

        match opcode {
            b'M' => {
                arity(2)?;
                let imm = i32::try_from(num(1)?).map_err(|_| invalid())?;
                Ok(Instruction::Move { reg: reg(0)?, imm })
            }
            b'A' => {
                arity(3)?;
                Ok(Instruction::Add {
                    dst: reg(0)?,
                    lhs: reg(1)?,
                    rhs: reg(2)?,
                })
            }
            b'L' | b'S' => {
                arity(2)?;
                let addr = usize::try_from(num(1)?).map_err(|_| invalid())?;
                let reg = reg(0)?;
                if opcode == b'L' {
                    Ok(Instruction::Load { reg, addr })
                } else {
                    Ok(Instruction::Store { reg, addr })
                }
            }
            _ => Err(ExecError::UnknownOpcode(opcode)),
        }
    }
}

impl InstructionSet for ToyIsa {
    fn execute(
        &self,
        instruction: &[u8],
        regs: &mut RegisterSet,
        mem: &mut dyn MemoryAccess,
    ) -> Result<(), ExecError> {
        match self.decode(instruction, regs.len())? {
            Instruction::Move { reg, imm } => regs[reg] = imm,
            Instruction::Add { dst, lhs, rhs } => regs[dst] = regs[lhs].wrapping_add(regs[rhs]),
            Instruction::Load { reg, addr } => {
                let mut word = [0u8; 4];
                mem.read(Vaddr(addr), &mut word)?;
                regs[reg] = i32::from_le_bytes(word);
            }
            Instruction::Store { reg, addr } => {
                mem.write(Vaddr(addr), &regs[reg].to_le_bytes())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm::PagingResult;
    use test_support::pattern::instruction_slot;

    /// 平坦的 64 字节内存
    struct FlatMemory([u8; 64]);

    impl MemoryAccess for FlatMemory {
        fn read(&mut self, vaddr: Vaddr, buf: &mut [u8]) -> PagingResult<()> {
            let end = vaddr.0 + buf.len();
            if end > self.0.len() {
                return Err(PagingError::OutOfRange {
                    vaddr: vaddr.0,
                    pages: 1,
                });
            }
            buf.copy_from_slice(&self.0[vaddr.0..end]);
            Ok(())
        }

        fn write(&mut self, vaddr: Vaddr, buf: &[u8]) -> PagingResult<()> {
            let end = vaddr.0 + buf.len();
            if end > self.0.len() {
                return Err(PagingError::OutOfRange {
                    vaddr: vaddr.0,
                    pages: 1,
                });
            }
            self.0[vaddr.0..end].copy_from_slice(buf);
            Ok(())
        }
    }

    fn run(text: &str, regs: &mut RegisterSet, mem: &mut FlatMemory) -> Result<(), ExecError> {
        ToyIsa.execute(&instruction_slot(text, 16), regs, mem)
    }

    #[test]
    fn test_decode() {
        let isa = ToyIsa;
        assert_eq!(
            isa.decode(&instruction_slot("M 3 -42", 16), 8),
            Ok(Instruction::Move { reg: 3, imm: -42 })
        );
        assert_eq!(
            isa.decode(&instruction_slot("A 0 1 2", 16), 8),
            Ok(Instruction::Add {
                dst: 0,
                lhs: 1,
                rhs: 2
            })
        );
        assert_eq!(
            isa.decode(&instruction_slot("S 1 40", 16), 8),
            Ok(Instruction::Store { reg: 1, addr: 40 })
        );
    }

    #[test]
    fn test_decode_errors() {
        let isa = ToyIsa;
        assert_eq!(
            isa.decode(&instruction_slot("X 1 2", 16), 8),
            Err(ExecError::UnknownOpcode(b'X'))
        );
        assert_eq!(isa.decode(&[0; 16], 8), Err(ExecError::UnknownOpcode(0)));
        assert!(matches!(
            isa.decode(&instruction_slot("M 8 1", 16), 8),
            Err(ExecError::InvalidOperands { opcode: 'M', .. })
        ));
        assert!(matches!(
            isa.decode(&instruction_slot("A 0 1", 16), 8),
            Err(ExecError::InvalidOperands { .. })
        ));
        assert!(matches!(
            isa.decode(&instruction_slot("L 0 -4", 16), 8),
            Err(ExecError::InvalidOperands { .. })
        ));
    }

    #[test]
    fn test_execute_arithmetic_and_memory() {
        let mut regs = RegisterSet::new(4);
        let mut mem = FlatMemory([0; 64]);

        run("M 0 2147483647", &mut regs, &mut mem).unwrap();
        run("M 1 1", &mut regs, &mut mem).unwrap();
        run("A 2 0 1", &mut regs, &mut mem).unwrap();
        assert_eq!(regs[2], i32::MIN);

        run("S 2 32", &mut regs, &mut mem).unwrap();
        assert_eq!(&mem.0[32..36], &i32::MIN.to_le_bytes());
        run("L 3 32", &mut regs, &mut mem).unwrap();
        assert_eq!(regs[3], i32::MIN);
    }

    #[test]
    fn test_memory_error_propagates() {
        let mut regs = RegisterSet::new(2);
        let mut mem = FlatMemory([0; 64]);
        assert!(matches!(
            run("L 0 62", &mut regs, &mut mem),
            Err(ExecError::Memory(PagingError::OutOfRange { vaddr: 62, .. }))
        ));
    }
}
