//! 执行引擎
//!
//! 对一个进程执行恰好一条指令：取出寄存器、取指、推进程序计数器、
//! 执行、写回寄存器、判断是否结束。缺页在取指或访存内部同步解决，
//! 不会让出处理器。

use crate::isa::{ExecError, InstructionSet};
use crate::kernel::task::Pcb;
use mm::{MemoryAccess, PagingError, Vaddr};

/// 一步之后进程是否结束
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// 仍有指令
    Continue,
    /// 已执行完最后一条指令
    Terminated,
}

/// 一步的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// 结束信号
    pub signal: Signal,
    /// 被中止的访存错误（非致命）
    pub fault: Option<PagingError>,
}

/// 执行引擎
#[derive(Debug, Clone)]
pub struct ExecutionEngine<I> {
    isa: I,
    instruction_size: usize,
}

impl<I: InstructionSet> ExecutionEngine<I> {
    /// 创建执行引擎
    pub fn new(isa: I, instruction_size: usize) -> Self {
        Self {
            isa,
            instruction_size,
        }
    }

    /// 指令集
    pub fn isa(&self) -> &I {
        &self.isa
    }

    /// 执行一步
    ///
    /// 无法识别的指令记录警告后按空操作处理。指令的访存越界时，
    /// 本条指令对寄存器的修改被丢弃，程序计数器仍然前进，错误放在
    /// [`StepOutcome::fault`] 中返回。
    ///
    /// # Errors
    ///
    /// 取指失败或致命的访存错误。
    pub fn step(&self, pcb: &mut Pcb, mem: &mut dyn MemoryAccess) -> Result<StepOutcome, PagingError> {
        let mut regs = pcb.saved_registers().clone();

        let mut slot = vec![0u8; self.instruction_size];
        mem.read(Vaddr(pcb.pc()), &mut slot)?;
        pcb.advance(self.instruction_size);

        let mut fault = None;
        match self.isa.execute(&slot, &mut regs, mem) {
            Ok(()) => pcb.save_registers(regs),
            Err(ExecError::Memory(e)) if e.is_fatal() => return Err(e),
            Err(ExecError::Memory(e)) => {
                crate::pr_warn!("{}", e);
                fault = Some(e);
            }
            Err(e) => crate::pr_warn!("{}", e),
        }

        let signal = if pcb.is_finished(self.instruction_size) {
            Signal::Terminated
        } else {
            Signal::Continue
        };
        Ok(StepOutcome { signal, fault })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::ToyIsa;
    use crate::kernel::RegisterSet;
    use mm::{MemoryManager, MmConfig, ProcessImage};
    use test_support::pattern::instruction_slot;

    fn load(mm: &mut MemoryManager, pid: u32, size: usize, program: &[&str]) -> Pcb {
        let text: Vec<u8> = program
            .iter()
            .flat_map(|inst| instruction_slot(inst, 16))
            .collect();
        mm.create_space(pid, ProcessImage::new(size, text).unwrap())
            .unwrap();
        Pcb::new(pid, program.len(), 4)
    }

    #[test]
    fn test_step_until_terminated() {
        let mut mm = MemoryManager::new(MmConfig::new(64, 128));
        let mut pcb = load(&mut mm, 0, 64, &["M 0 3", "M 1 4", "A 2 0 1"]);
        let engine = ExecutionEngine::new(ToyIsa, 16);

        let mut signals = Vec::new();
        for _ in 0..3 {
            signals.push(engine.step(&mut pcb, &mut mm.memory(0)).unwrap().signal);
        }
        assert_eq!(
            signals,
            vec![Signal::Continue, Signal::Continue, Signal::Terminated]
        );
        assert_eq!(pcb.saved_registers().as_slice(), &[3, 4, 7, 0]);
        assert_eq!(pcb.pc(), 48);
    }

    #[test]
    fn test_unknown_opcode_is_noop() {
        let mut mm = MemoryManager::new(MmConfig::new(64, 128));
        let mut pcb = load(&mut mm, 0, 64, &["M 0 1", "Z 9", "M 1 2"]);
        let engine = ExecutionEngine::new(ToyIsa, 16);

        for _ in 0..3 {
            let outcome = engine.step(&mut pcb, &mut mm.memory(0)).unwrap();
            assert_eq!(outcome.fault, None);
        }
        assert_eq!(pcb.saved_registers().as_slice(), &[1, 2, 0, 0]);
    }

    #[test]
    fn test_out_of_range_discards_registers() {
        let mut mm = MemoryManager::new(MmConfig::new(64, 128));
        let mut pcb = load(&mut mm, 0, 64, &["M 0 9", "L 0 200"]);
        let engine = ExecutionEngine::new(ToyIsa, 16);

        engine.step(&mut pcb, &mut mm.memory(0)).unwrap();
        let outcome = engine.step(&mut pcb, &mut mm.memory(0)).unwrap();
        assert_eq!(outcome.signal, Signal::Terminated);
        assert!(matches!(
            outcome.fault,
            Some(PagingError::OutOfRange { vaddr: 200, pages: 1 })
        ));
        let mut expected = RegisterSet::new(4);
        expected[0] = 9;
        assert_eq!(pcb.saved_registers(), &expected);
        assert_eq!(pcb.pc(), 32);
    }

    #[test]
    fn test_misaligned_is_fatal() {
        let mut mm = MemoryManager::new(MmConfig::new(64, 128));
        let mut pcb = load(&mut mm, 0, 128, &["S 0 62"]);
        let engine = ExecutionEngine::new(ToyIsa, 16);
        assert!(matches!(
            engine.step(&mut pcb, &mut mm.memory(0)),
            Err(PagingError::Misaligned { vaddr: 62, len: 4 })
        ));
    }
}
