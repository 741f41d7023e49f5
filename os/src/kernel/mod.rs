//! 内核
//!
//! [`Kernel`] 把内存管理器、调度器和执行引擎组合在一起：
//! 装载进程、逐步调度、在进程结束时打印寄存器并回收它的帧。

mod exec;
pub mod sched;
pub mod task;

pub use exec::{ExecutionEngine, Signal, StepOutcome};
pub use sched::Scheduler;
pub use task::{Pcb, PidAllocator, RegisterSet, TaskState};

use crate::config::KernelConfig;
use crate::error::KernelError;
use crate::isa::{InstructionSet, ToyIsa};
use crate::loader::ProgramImage;
use klog::LogLevel;
use mm::{MemoryManager, MmStats, PagingError, Pid};

/// 一次调度的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// 执行这一步时的时钟
    pub clock: usize,
    /// 被调度的进程
    pub pid: Pid,
    /// 这一步之后进程是否结束
    pub signal: Signal,
    /// 被中止的越界访问
    pub fault: Option<PagingError>,
}

/// 已结束进程的最终状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedProcess {
    /// 进程号
    pub pid: Pid,
    /// 最终寄存器
    pub registers: RegisterSet,
    /// 结束时的时钟
    pub finished_at: usize,
}

/// 一次完整运行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// 总步数
    pub steps: usize,
    /// 按结束顺序排列的进程
    pub finished: Vec<FinishedProcess>,
    /// 内存管理统计
    pub stats: MmStats,
}

/// 模拟内核
#[derive(Debug)]
pub struct Kernel<I = ToyIsa> {
    config: KernelConfig,
    mm: MemoryManager,
    scheduler: Scheduler,
    engine: ExecutionEngine<I>,
    pids: PidAllocator,
    finished: Vec<FinishedProcess>,
}

impl Kernel<ToyIsa> {
    /// 以默认指令集创建内核
    pub fn new(config: KernelConfig) -> Result<Self, KernelError> {
        Self::with_isa(config, ToyIsa)
    }
}

impl<I: InstructionSet> Kernel<I> {
    /// 以指定指令集创建内核
    ///
    /// # Errors
    ///
    /// 配置无效时返回 [`KernelError::Config`]。
    pub fn with_isa(config: KernelConfig, isa: I) -> Result<Self, KernelError> {
        config.validate()?;
        crate::pr_debug!(
            "kernel: {} frames of {} bytes",
            config.mm.total_frames(),
            config.mm.page_size()
        );
        Ok(Self {
            mm: MemoryManager::new(config.mm),
            scheduler: Scheduler::new(),
            engine: ExecutionEngine::new(isa, config.instruction_size),
            pids: PidAllocator::new(),
            finished: Vec::new(),
            config,
        })
    }

    /// 配置
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// 内存管理器
    pub fn mm(&self) -> &MemoryManager {
        &self.mm
    }

    /// 调度器
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// 当前时钟
    pub fn clock(&self) -> usize {
        self.scheduler.clock()
    }

    /// 已结束的进程
    pub fn finished(&self) -> &[FinishedProcess] {
        &self.finished
    }

    /// 装载一个进程，返回其进程号
    ///
    /// 没有指令的进程立即结束，不占用调度。
    ///
    /// # Errors
    ///
    /// - [`KernelError::TooManyProcesses`]
    /// - [`KernelError::Paging`]：映像无效
    pub fn spawn(&mut self, image: ProgramImage) -> Result<Pid, KernelError> {
        if self.pids.allocated() >= self.config.max_processes {
            return Err(KernelError::TooManyProcesses {
                limit: self.config.max_processes,
            });
        }
        // 映像被接受之后才占用进程号
        let pid = self.pids.peek();
        let instruction_count = image.instruction_count;
        let process_image = image
            .into_process_image()
            .map_err(|source| KernelError::Paging { pid, source })?;
        self.mm
            .create_space(pid, process_image)
            .map_err(|source| KernelError::Paging { pid, source })?;
        let allocated = self.pids.allocate();
        debug_assert_eq!(allocated, pid);

        let pcb = Pcb::new(pid, instruction_count, self.config.max_registers);
        crate::log::set_context(self.clock(), None);
        crate::pr_debug!("loaded pid {} ({} instructions)", pid, instruction_count);
        if instruction_count == 0 {
            let clock = self.clock();
            self.retire(pcb, clock)?;
        } else {
            self.scheduler.enqueue(pcb);
        }
        Ok(pid)
    }

    /// 执行一个调度轮次；没有就绪进程时返回 `None`
    ///
    /// 时钟每一步恰好加一。
    ///
    /// # Errors
    ///
    /// 致命的分页错误，例如脏页无法写回。
    pub fn step(&mut self) -> Result<Option<Dispatch>, KernelError> {
        let Some(mut pcb) = self.scheduler.pick_next() else {
            return Ok(None);
        };
        let pid = pcb.pid();
        let clock = self.scheduler.tick();
        crate::log::set_context(clock, Some(pid));

        let outcome = match self.engine.step(&mut pcb, &mut self.mm.memory(pid)) {
            Ok(outcome) => outcome,
            Err(source) => {
                crate::pr_crit!("aborting: {}", source);
                crate::log::set_context(clock, None);
                return Err(KernelError::Paging { pid, source });
            }
        };

        match outcome.signal {
            Signal::Terminated => self.retire(pcb, clock)?,
            Signal::Continue => self.scheduler.requeue(pcb),
        }
        crate::log::set_context(clock, None);

        Ok(Some(Dispatch {
            clock,
            pid,
            signal: outcome.signal,
            fault: outcome.fault,
        }))
    }

    /// 运行直到没有就绪进程
    pub fn run(&mut self) -> Result<RunReport, KernelError> {
        let mut steps = 0;
        while self.step()?.is_some() {
            steps += 1;
        }
        Ok(RunReport {
            steps,
            finished: core::mem::take(&mut self.finished),
            stats: self.mm.stats(),
        })
    }

    /// 打印寄存器、回收帧并记录结束
    fn retire(&mut self, mut pcb: Pcb, clock: usize) -> Result<(), KernelError> {
        let pid = pcb.pid();
        pcb.set_state(TaskState::Terminated);
        klog::log_with(
            LogLevel::Info,
            clock,
            Some(pid),
            format_args!("{}", pcb.saved_registers()),
        );
        let frames = self
            .mm
            .destroy_space(pid)
            .map_err(|source| KernelError::Paging { pid, source })?;
        crate::pr_debug!("pid {} retired, {} frames reclaimed", pid, frames);
        self.finished.push(FinishedProcess {
            pid,
            registers: pcb.into_registers(),
            finished_at: clock,
        });
        Ok(())
    }
}
