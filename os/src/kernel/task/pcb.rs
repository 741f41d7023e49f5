//! 进程控制块

use core::fmt;
use core::ops::{Index, IndexMut};
use mm::Pid;

/// 进程的寄存器组
///
/// 每个进程保存自己的一份，执行一步时按值取出、执行完再写回。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterSet(Vec<i32>);

impl RegisterSet {
    /// 创建 `count` 个清零的寄存器
    pub fn new(count: usize) -> Self {
        Self(vec![0; count])
    }

    /// 寄存器个数
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 是否没有寄存器
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 读取寄存器
    pub fn get(&self, index: usize) -> Option<i32> {
        self.0.get(index).copied()
    }

    /// 全部寄存器的值
    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }
}

impl Index<usize> for RegisterSet {
    type Output = i32;

    fn index(&self, index: usize) -> &i32 {
        &self.0[index]
    }
}

impl IndexMut<usize> for RegisterSet {
    fn index_mut(&mut self, index: usize) -> &mut i32 {
        &mut self.0[index]
    }
}

/// 格式：`[RegisterSet]: R[0]=v0, R[1]=v1, ...`
impl fmt::Display for RegisterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[RegisterSet]:")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " R[{i}]={value}")?;
        }
        Ok(())
    }
}

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// 就绪，在就绪队列中
    Ready,
    /// 正在执行一步
    Running,
    /// 已结束
    Terminated,
}

/// 进程控制块
#[derive(Debug, Clone)]
pub struct Pcb {
    pid: Pid,
    pc: usize,
    instruction_count: usize,
    saved_registers: RegisterSet,
    state: TaskState,
}

impl Pcb {
    /// 创建就绪的进程控制块，程序计数器为 0，寄存器清零
    pub fn new(pid: Pid, instruction_count: usize, registers: usize) -> Self {
        Self {
            pid,
            pc: 0,
            instruction_count,
            saved_registers: RegisterSet::new(registers),
            state: TaskState::Ready,
        }
    }

    /// 进程号
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// 程序计数器（虚拟地址）
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// 指令条数
    pub fn instruction_count(&self) -> usize {
        self.instruction_count
    }

    /// 保存的寄存器
    pub fn saved_registers(&self) -> &RegisterSet {
        &self.saved_registers
    }

    /// 状态
    pub fn state(&self) -> TaskState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: TaskState) {
        self.state = state;
    }

    pub(crate) fn advance(&mut self, bytes: usize) {
        self.pc += bytes;
    }

    pub(crate) fn save_registers(&mut self, regs: RegisterSet) {
        self.saved_registers = regs;
    }

    /// 程序计数器是否已越过最后一条指令
    pub fn is_finished(&self, instruction_size: usize) -> bool {
        self.pc >= self.instruction_count * instruction_size
    }

    pub(crate) fn into_registers(self) -> RegisterSet {
        self.saved_registers
    }
}
