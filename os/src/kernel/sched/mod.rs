//! 轮转调度器
//!
//! 就绪队列按装载顺序排列，每轮取出队首执行一步，未结束则放回队尾。
//! 全局时钟每执行一步加一。

use crate::kernel::task::{Pcb, TaskState};
use mm::Pid;
use std::collections::VecDeque;

/// 轮转调度器
#[derive(Debug, Default)]
pub struct Scheduler {
    ready: VecDeque<Pcb>,
    clock: usize,
}

impl Scheduler {
    /// 创建空的调度器，时钟为 0
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前时钟
    pub fn clock(&self) -> usize {
        self.clock
    }

    /// 时钟前进一步，返回前进前的值
    pub fn tick(&mut self) -> usize {
        let now = self.clock;
        self.clock += 1;
        now
    }

    /// 就绪进程数
    pub fn len(&self) -> usize {
        self.ready.len()
    }

    /// 就绪队列是否为空
    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }

    /// 把新进程加入队尾
    pub fn enqueue(&mut self, mut pcb: Pcb) {
        pcb.set_state(TaskState::Ready);
        self.ready.push_back(pcb);
    }

    /// 取出队首进程并标记为运行
    pub fn pick_next(&mut self) -> Option<Pcb> {
        let mut pcb = self.ready.pop_front()?;
        pcb.set_state(TaskState::Running);
        Some(pcb)
    }

    /// 未结束的进程放回队尾
    pub fn requeue(&mut self, pcb: Pcb) {
        self.enqueue(pcb);
    }

    /// 按队列顺序列出就绪进程
    pub fn ready_pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.ready.iter().map(Pcb::pid)
    }

    /// 查询就绪进程
    pub fn task(&self, pid: Pid) -> Option<&Pcb> {
        self.ready.iter().find(|p| p.pid() == pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_order() {
        let mut sched = Scheduler::new();
        for pid in 0..3 {
            sched.enqueue(Pcb::new(pid, 1, 1));
        }
        let mut trace = Vec::new();
        for _ in 0..6 {
            let pcb = sched.pick_next().unwrap();
            assert_eq!(pcb.state(), TaskState::Running);
            trace.push(pcb.pid());
            sched.requeue(pcb);
            sched.tick();
        }
        assert_eq!(trace, vec![0, 1, 2, 0, 1, 2]);
        assert_eq!(sched.clock(), 6);
    }

    #[test]
    fn test_retired_task_leaves_queue() {
        let mut sched = Scheduler::new();
        sched.enqueue(Pcb::new(0, 1, 1));
        sched.enqueue(Pcb::new(1, 1, 1));
        let first = sched.pick_next().unwrap();
        assert_eq!(first.pid(), 0);
        // 不放回即退出
        assert_eq!(sched.ready_pids().collect::<Vec<_>>(), vec![1]);
        assert_eq!(sched.task(1).map(Pcb::state), Some(TaskState::Ready));
        assert!(sched.task(0).is_none());
        sched.pick_next();
        assert!(sched.is_empty());
    }
}
