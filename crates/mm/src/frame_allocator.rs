//! 帧池模块
//!
//! 本模块提供固定数量物理帧的分配、占用跟踪与淘汰。
//!
//! ## 分配策略（位图）
//!
//! 帧池使用位图（bitmap）跟踪每个物理帧的分配状态：
//!
//! - **bitmap**：每个 bit 表示一个物理帧（0=空闲，1=已分配）
//! - **last_alloc_hint**：上次分配位置提示，利用局部性加速查找
//!
//! 单帧分配时从 last_alloc_hint 开始循环查找第一个空闲位；
//! 释放时直接清除对应 bit。
//!
//! ## 淘汰（FIFO）
//!
//! 所有帧都被占用时，按绑定时间最早的帧作为牺牲者。帧池自己不知道页表，
//! 淘汰前先通过 [`EvictionHandler`] 通知拥有者：拥有者负责把脏页写回后备区
//! 并使自己的页表项失效。拥有者返回错误时帧池状态保持不变。
//!
//! FIFO 队列中的条目带有绑定序号，帧被释放或重新绑定后旧条目自然失效，
//! 出队时跳过即可，无需在释放路径上线性删除。
//!
//! # 模块组成
//!
//! - [`FramePool`]：帧池本体
//! - [`Occupant`]：帧的占用者 (进程, 页)
//! - [`EvictionHandler`]：淘汰回调

use crate::Pid;
use crate::address::{PageNum, Ppn, UsizeConvert, Vpn};
use crate::page_table::{PagingError, PagingResult};
use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec;
use alloc::vec::Vec;

/// 帧的占用者
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Occupant {
    /// 所属进程
    pub pid: Pid,
    /// 该进程中的虚拟页号
    pub vpn: Vpn,
}

impl Occupant {
    /// 创建占用者描述
    pub const fn new(pid: Pid, vpn: Vpn) -> Self {
        Self { pid, vpn }
    }
}

#[derive(Debug, Clone, Default)]
struct Frame {
    occupant: Option<Occupant>,
    dirty: bool,
    /// 绑定序号，用于识别 FIFO 队列中的过期条目
    seq: u64,
}

/// 淘汰回调
///
/// 帧池选中牺牲帧后、重新绑定之前调用。实现者应当：
///
/// 1. 若 `dirty` 为真，把 `contents` 写回 `victim` 所属进程的后备区；
/// 2. 使 `victim` 的页表项失效。
///
/// 返回错误时帧池不做任何修改，错误原样传给分配者。
pub trait EvictionHandler {
    /// 处理一次淘汰
    fn evict(
        &mut self,
        victim: Occupant,
        ppn: Ppn,
        contents: &[u8],
        dirty: bool,
    ) -> PagingResult<()>;
}

/// 帧池统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// 帧总数
    pub total: usize,
    /// 已占用帧数
    pub allocated: usize,
    /// 累计淘汰次数
    pub evictions: usize,
}

/// 物理帧池
///
/// 帧的字节存储也由帧池持有，帧号即 [`Ppn`]。
#[derive(Debug)]
pub struct FramePool {
    page_size: usize,
    memory: Vec<u8>,
    frames: Vec<Frame>,
    /// 位图：每个 bit 表示一个帧（0=空闲，1=已分配）
    bitmap: Vec<u64>,
    allocated_count: usize,
    /// 上次分配位置提示（u64 索引）
    last_alloc_hint: usize,
    /// 按绑定顺序排列的 (帧号, 绑定序号)
    fifo: VecDeque<(Ppn, u64)>,
    next_seq: u64,
    /// 反向索引：(进程, 页) -> 帧
    owners: BTreeMap<Occupant, Ppn>,
    evictions: usize,
}

impl FramePool {
    /// 创建包含 `total_frames` 个帧的帧池，所有帧初始为空闲且清零
    pub fn new(page_size: usize, total_frames: usize) -> Self {
        Self {
            page_size,
            memory: vec![0u8; page_size * total_frames],
            frames: vec![Frame::default(); total_frames],
            bitmap: vec![0u64; total_frames.div_ceil(64)],
            allocated_count: 0,
            last_alloc_hint: 0,
            fifo: VecDeque::with_capacity(total_frames),
            next_seq: 0,
            owners: BTreeMap::new(),
            evictions: 0,
        }
    }

    /// 页大小
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 帧总数
    pub fn total_frames(&self) -> usize {
        self.frames.len()
    }

    /// 已占用帧数
    pub fn allocated_frames(&self) -> usize {
        self.allocated_count
    }

    /// 空闲帧数
    pub fn free_frames(&self) -> usize {
        self.frames.len() - self.allocated_count
    }

    /// 累计淘汰次数
    pub fn eviction_count(&self) -> usize {
        self.evictions
    }

    /// 获取统计信息
    pub fn stats(&self) -> FrameStats {
        FrameStats {
            total: self.total_frames(),
            allocated: self.allocated_count,
            evictions: self.evictions,
        }
    }

    #[inline]
    fn is_free(&self, frame_idx: usize) -> bool {
        let word_idx = frame_idx / 64;
        let bit_idx = frame_idx % 64;
        (self.bitmap[word_idx] & (1u64 << bit_idx)) == 0
    }

    #[inline]
    fn mark_allocated(&mut self, frame_idx: usize) {
        let word_idx = frame_idx / 64;
        let bit_idx = frame_idx % 64;
        self.bitmap[word_idx] |= 1u64 << bit_idx;
        self.allocated_count += 1;
    }

    #[inline]
    fn mark_free(&mut self, frame_idx: usize) {
        let word_idx = frame_idx / 64;
        let bit_idx = frame_idx % 64;
        self.bitmap[word_idx] &= !(1u64 << bit_idx);
        self.allocated_count -= 1;
    }

    /// 从 last_alloc_hint 开始循环查找第一个空闲帧
    fn find_free(&mut self) -> Option<usize> {
        let bitmap_len = self.bitmap.len();
        let start_idx = self.last_alloc_hint;

        // 循环查找：[hint, end) + [0, hint)
        for offset in 0..bitmap_len {
            let idx = (start_idx + offset) % bitmap_len;
            let word = self.bitmap[idx];
            if word == u64::MAX {
                continue;
            }
            let frame_idx = idx * 64 + (!word).trailing_zeros() as usize;
            // 最后一个 word 的高位不对应真实帧
            if frame_idx >= self.frames.len() {
                continue;
            }
            self.last_alloc_hint = idx;
            return Some(frame_idx);
        }
        None
    }

    /// 为 (pid, vpn) 分配一个帧
    ///
    /// 有空闲帧时直接使用；否则按 FIFO 淘汰一个帧，淘汰前调用 `handler`。
    /// 返回的帧内容全部为零，由调用者负责填充。
    ///
    /// # Errors
    ///
    /// - [`PagingError::AlreadyMapped`]：(pid, vpn) 已经占有一个帧
    /// - [`PagingError::NoFrames`]：帧池中没有任何帧
    /// - `handler` 返回的任何错误
    pub fn allocate(
        &mut self,
        pid: Pid,
        vpn: Vpn,
        handler: &mut dyn EvictionHandler,
    ) -> PagingResult<Ppn> {
        let owner = Occupant::new(pid, vpn);
        if self.owners.contains_key(&owner) {
            return Err(PagingError::AlreadyMapped {
                pid,
                vpn: vpn.as_usize(),
            });
        }

        let frame_idx = match self.find_free() {
            Some(idx) => idx,
            None => self.evict_victim(handler)?.as_usize(),
        };
        self.mark_allocated(frame_idx);
        let ppn = Ppn::from_usize(frame_idx);
        self.bind(ppn, owner);
        Ok(ppn)
    }

    /// 淘汰最早绑定的帧
    ///
    /// 先调用 `handler` 通知拥有者，成功后解除绑定并把帧归还为空闲，
    /// 返回该帧号。
    ///
    /// # Errors
    ///
    /// - [`PagingError::NoFrames`]：没有任何已绑定的帧
    /// - `handler` 返回的任何错误（此时帧仍属于原拥有者）
    pub fn evict_victim(&mut self, handler: &mut dyn EvictionHandler) -> PagingResult<Ppn> {
        self.prune_fifo();
        let (ppn, _) = *self.fifo.front().ok_or(PagingError::NoFrames)?;
        let idx = ppn.as_usize();
        let frame = &self.frames[idx];
        let victim = frame.occupant.ok_or(PagingError::NoFrames)?;
        let dirty = frame.dirty;

        let range = ppn.byte_range(self.page_size);
        handler.evict(victim, ppn, &self.memory[range], dirty)?;

        self.fifo.pop_front();
        self.unbind(ppn);
        self.mark_free(idx);
        self.evictions += 1;
        log::debug!(
            "[FramePool] evicted frame {} (pid={}, vpn={}, dirty={})",
            idx,
            victim.pid,
            victim.vpn.as_usize(),
            dirty
        );
        Ok(ppn)
    }

    /// 释放 (pid, vpn) 占有的帧，返回该帧号
    ///
    /// 不做写回，调用者负责在此之前处理脏数据。
    pub fn free(&mut self, pid: Pid, vpn: Vpn) -> Option<Ppn> {
        let ppn = self.owners.get(&Occupant::new(pid, vpn)).copied()?;
        self.unbind(ppn);
        self.mark_free(ppn.as_usize());
        Some(ppn)
    }

    /// 主动淘汰 (pid, vpn) 占有的帧，计入淘汰次数
    ///
    /// 与 [`FramePool::free`] 相同，写回由调用者负责。
    pub fn evict(&mut self, pid: Pid, vpn: Vpn) -> Option<Ppn> {
        let ppn = self.free(pid, vpn)?;
        self.evictions += 1;
        Some(ppn)
    }

    /// 释放进程占有的所有帧，返回释放的帧数
    pub fn release_all(&mut self, pid: Pid) -> usize {
        let lo = Occupant::new(pid, Vpn::from_usize(0));
        let hi = Occupant::new(pid, Vpn::from_usize(usize::MAX));
        let owned: Vec<Ppn> = self.owners.range(lo..=hi).map(|(_, &ppn)| ppn).collect();
        for &ppn in &owned {
            self.unbind(ppn);
            self.mark_free(ppn.as_usize());
        }
        owned.len()
    }

    /// 查询 (pid, vpn) 所在的帧
    pub fn lookup(&self, pid: Pid, vpn: Vpn) -> Option<Ppn> {
        self.owners.get(&Occupant::new(pid, vpn)).copied()
    }

    /// 帧的占用者；帧号越界或空闲时为 `None`
    pub fn occupant(&self, ppn: Ppn) -> Option<Occupant> {
        self.frames.get(ppn.as_usize()).and_then(|f| f.occupant)
    }

    /// 帧是否被写过
    pub fn is_dirty(&self, ppn: Ppn) -> bool {
        self.frames.get(ppn.as_usize()).is_some_and(|f| f.dirty)
    }

    /// 标记帧为脏
    pub fn mark_dirty(&mut self, ppn: Ppn) {
        if let Some(frame) = self.frames.get_mut(ppn.as_usize()) {
            frame.dirty = true;
        }
    }

    /// 按 FIFO 顺序，下一个会被淘汰的帧
    pub fn oldest(&self) -> Option<Ppn> {
        self.fifo
            .iter()
            .find(|entry| self.is_current(entry))
            .map(|&(ppn, _)| ppn)
    }

    /// 所有被占用的帧及其占用者，按帧号升序
    pub fn occupied(&self) -> impl Iterator<Item = (Ppn, Occupant)> + '_ {
        self.frames
            .iter()
            .enumerate()
            .filter_map(|(idx, f)| f.occupant.map(|o| (Ppn::from_usize(idx), o)))
    }

    /// 帧的字节内容
    ///
    /// # Panics
    ///
    /// 帧号越界时 panic。
    pub fn frame_bytes(&self, ppn: Ppn) -> &[u8] {
        &self.memory[ppn.byte_range(self.page_size)]
    }

    /// 帧的可变字节内容
    ///
    /// # Panics
    ///
    /// 帧号越界时 panic。
    pub fn frame_bytes_mut(&mut self, ppn: Ppn) -> &mut [u8] {
        let range = ppn.byte_range(self.page_size);
        &mut self.memory[range]
    }

    /// 绑定空闲帧：清零、记录占用者、入 FIFO 队列
    fn bind(&mut self, ppn: Ppn, owner: Occupant) {
        let seq = self.next_seq;
        self.next_seq += 1;

        self.frame_bytes_mut(ppn).fill(0);
        let idx = ppn.as_usize();
        debug_assert!(!self.is_free(idx));
        self.frames[idx] = Frame {
            occupant: Some(owner),
            dirty: false,
            seq,
        };
        self.fifo.push_back((ppn, seq));
        self.owners.insert(owner, ppn);
    }

    fn unbind(&mut self, ppn: Ppn) {
        let frame = &mut self.frames[ppn.as_usize()];
        if let Some(owner) = frame.occupant.take() {
            self.owners.remove(&owner);
        }
        frame.dirty = false;
    }

    fn is_current(&self, &(ppn, seq): &(Ppn, u64)) -> bool {
        let frame = &self.frames[ppn.as_usize()];
        frame.occupant.is_some() && frame.seq == seq
    }

    /// 丢弃队首的过期条目
    fn prune_fifo(&mut self) {
        while let Some(entry) = self.fifo.front() {
            if self.is_current(entry) {
                break;
            }
            self.fifo.pop_front();
        }
    }
}
