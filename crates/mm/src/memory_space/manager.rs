//! 按需分页内存管理器
//!
//! [`MemoryManager`] 持有帧池和所有进程的地址空间。访问一个未驻留的页时
//! 触发缺页：从帧池取一个帧（必要时淘汰最早绑定的页），再从后备区或映像
//! 填充内容，最后建立映射。对调用者而言，缺页是透明的。
//!
//! 帧池与地址空间表是两个独立字段，淘汰时帧池通过 [`EvictionHandler`]
//! 回调地址空间表，使被淘汰进程的页表项失效。

use crate::Pid;
use crate::address::{Ppn, UsizeConvert, Vaddr, Vpn};
use crate::config::MmConfig;
use crate::frame_allocator::{EvictionHandler, FramePool, Occupant};
use crate::memory_space::{AddressSpace, ProcessImage};
use crate::page_table::{PagingError, PagingResult, Translation};
use alloc::collections::BTreeMap;

/// 内存管理统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MmStats {
    /// 缺页次数
    pub page_faults: usize,
    /// 淘汰次数
    pub evictions: usize,
    /// 脏页写回次数
    pub dirty_flushes: usize,
    /// 从后备区恢复的次数
    pub backing_restores: usize,
}

/// 所有进程的地址空间
#[derive(Debug, Default)]
struct SpaceTable {
    spaces: BTreeMap<Pid, AddressSpace>,
    dirty_flushes: usize,
}

impl SpaceTable {
    fn get(&self, pid: Pid) -> PagingResult<&AddressSpace> {
        self.spaces.get(&pid).ok_or(PagingError::NoSuchSpace(pid))
    }

    fn get_mut(&mut self, pid: Pid) -> PagingResult<&mut AddressSpace> {
        self.spaces.get_mut(&pid).ok_or(PagingError::NoSuchSpace(pid))
    }
}

impl EvictionHandler for SpaceTable {
    fn evict(
        &mut self,
        victim: Occupant,
        ppn: Ppn,
        contents: &[u8],
        dirty: bool,
    ) -> PagingResult<()> {
        let space = self.get_mut(victim.pid)?;
        if space.evict(victim.vpn, ppn, contents, dirty)? {
            self.dirty_flushes += 1;
            log::debug!(
                "[MM] flushed dirty page {} of pid {} to backing store",
                victim.vpn.as_usize(),
                victim.pid
            );
        }
        Ok(())
    }
}

/// 按需分页内存管理器
#[derive(Debug)]
pub struct MemoryManager {
    config: MmConfig,
    frames: FramePool,
    spaces: SpaceTable,
    page_faults: usize,
    backing_restores: usize,
}

impl MemoryManager {
    /// 按配置创建内存管理器，所有帧初始为空闲
    pub fn new(config: MmConfig) -> Self {
        Self {
            frames: FramePool::new(config.page_size(), config.total_frames()),
            config,
            spaces: SpaceTable::default(),
            page_faults: 0,
            backing_restores: 0,
        }
    }

    /// 配置
    pub fn config(&self) -> &MmConfig {
        &self.config
    }

    /// 帧池
    pub fn frames(&self) -> &FramePool {
        &self.frames
    }

    /// 进程的地址空间
    pub fn space(&self, pid: Pid) -> Option<&AddressSpace> {
        self.spaces.spaces.get(&pid)
    }

    /// 当前拥有地址空间的进程数
    pub fn space_count(&self) -> usize {
        self.spaces.spaces.len()
    }

    /// 为进程创建地址空间，不分配任何帧
    ///
    /// # Errors
    ///
    /// 进程已有地址空间时返回 [`PagingError::SpaceExists`]。
    pub fn create_space(&mut self, pid: Pid, image: ProcessImage) -> PagingResult<()> {
        if self.spaces.spaces.contains_key(&pid) {
            return Err(PagingError::SpaceExists(pid));
        }
        let space = AddressSpace::new(
            pid,
            image,
            self.config.page_size(),
            self.config.backing_pages(),
        );
        log::debug!(
            "[MM] pid {} space: {} pages, backing capacity {}",
            pid,
            space.page_table().len(),
            space.backing().capacity()
        );
        self.spaces.spaces.insert(pid, space);
        Ok(())
    }

    /// 销毁地址空间并回收其所有帧，返回回收的帧数
    ///
    /// # Errors
    ///
    /// 进程没有地址空间时返回 [`PagingError::NoSuchSpace`]。
    pub fn destroy_space(&mut self, pid: Pid) -> PagingResult<usize> {
        self.spaces
            .spaces
            .remove(&pid)
            .ok_or(PagingError::NoSuchSpace(pid))?;
        let released = self.frames.release_all(pid);
        log::debug!("[MM] pid {} space destroyed, {} frames reclaimed", pid, released);
        Ok(released)
    }

    /// 翻译一次 `len` 字节的访问，返回 (帧, 页内偏移)
    ///
    /// 页未驻留时在此处理缺页。
    ///
    /// # Errors
    ///
    /// - [`PagingError::NoSuchSpace`]
    /// - [`PagingError::OutOfRange`]、[`PagingError::Misaligned`]
    /// - 缺页处理中的错误，见 [`FramePool::allocate`]
    pub fn translate(&mut self, pid: Pid, vaddr: Vaddr, len: usize) -> PagingResult<(Ppn, usize)> {
        let translation = self.spaces.get(pid)?.translate(vaddr, len)?;
        match translation {
            Translation::Mapped { ppn, offset } => Ok((ppn, offset)),
            Translation::Fault { vpn, offset } => {
                let ppn = self.handle_page_fault(pid, vpn)?;
                Ok((ppn, offset))
            }
        }
    }

    fn handle_page_fault(&mut self, pid: Pid, vpn: Vpn) -> PagingResult<Ppn> {
        self.page_faults += 1;
        let ppn = self.frames.allocate(pid, vpn, &mut self.spaces)?;

        let space = self.spaces.get_mut(pid)?;
        let restored = space.populate(vpn, self.frames.frame_bytes_mut(ppn));
        space.map(vpn, ppn)?;
        if restored {
            self.backing_restores += 1;
        }
        log::debug!(
            "[MM] page fault pid {} vpn {} -> frame {}{}",
            pid,
            vpn.as_usize(),
            ppn.as_usize(),
            if restored { " (restored)" } else { "" }
        );
        Ok(ppn)
    }

    /// 从进程地址空间读取 `buf.len()` 字节
    ///
    /// 访问不能跨越页边界。
    pub fn read(&mut self, pid: Pid, vaddr: Vaddr, buf: &mut [u8]) -> PagingResult<()> {
        let (ppn, offset) = self.translate(pid, vaddr, buf.len())?;
        buf.copy_from_slice(&self.frames.frame_bytes(ppn)[offset..offset + buf.len()]);
        Ok(())
    }

    /// 向进程地址空间写入 `buf`，并把该页标记为脏
    ///
    /// 访问不能跨越页边界。
    pub fn write(&mut self, pid: Pid, vaddr: Vaddr, buf: &[u8]) -> PagingResult<()> {
        let (ppn, offset) = self.translate(pid, vaddr, buf.len())?;
        self.frames.frame_bytes_mut(ppn)[offset..offset + buf.len()].copy_from_slice(buf);
        self.frames.mark_dirty(ppn);
        let (vpn, _) = vaddr.split(self.config.page_size());
        self.spaces.get_mut(pid)?.mark_dirty(vpn);
        Ok(())
    }

    /// 主动淘汰进程的一页
    ///
    /// # Errors
    ///
    /// - [`PagingError::NotMapped`]：该页未驻留
    /// - [`PagingError::FrameExhausted`]：脏页无法写回
    pub fn evict_page(&mut self, pid: Pid, vpn: Vpn) -> PagingResult<()> {
        let ppn = self.frames.lookup(pid, vpn).ok_or(PagingError::NotMapped {
            pid,
            vpn: vpn.as_usize(),
        })?;
        let dirty = self.frames.is_dirty(ppn);
        let space = self.spaces.get_mut(pid)?;
        if space.evict(vpn, ppn, self.frames.frame_bytes(ppn), dirty)? {
            self.spaces.dirty_flushes += 1;
        }
        self.frames.evict(pid, vpn);
        Ok(())
    }

    /// 检查页表与帧池的双向一致性
    ///
    /// 每个有效页表项引用的帧都由 (该进程, 该页) 占用，
    /// 且每个被占用的帧恰好对应这样一个页表项。
    pub fn verify_bindings(&self) -> bool {
        let mut valid_entries = 0;
        for (&pid, space) in &self.spaces.spaces {
            for (vpn, ppn) in space.page_table().mapped() {
                valid_entries += 1;
                if self.frames.occupant(ppn) != Some(Occupant::new(pid, vpn)) {
                    log::warn!(
                        "[MM] pid {} vpn {} maps frame {} owned by {:?}",
                        pid,
                        vpn.as_usize(),
                        ppn.as_usize(),
                        self.frames.occupant(ppn)
                    );
                    return false;
                }
            }
        }
        valid_entries == self.frames.allocated_frames()
            && self.frames.occupied().count() == valid_entries
    }

    /// 统计信息
    pub fn stats(&self) -> MmStats {
        MmStats {
            page_faults: self.page_faults,
            evictions: self.frames.eviction_count(),
            dirty_flushes: self.spaces.dirty_flushes,
            backing_restores: self.backing_restores,
        }
    }

    /// 进程视角的内存访问句柄
    pub fn memory(&mut self, pid: Pid) -> ProcessMemory<'_> {
        ProcessMemory { mm: self, pid }
    }
}

/// 按进程虚拟地址读写内存
pub trait MemoryAccess {
    /// 读取 `buf.len()` 字节
    fn read(&mut self, vaddr: Vaddr, buf: &mut [u8]) -> PagingResult<()>;
    /// 写入 `buf`
    fn write(&mut self, vaddr: Vaddr, buf: &[u8]) -> PagingResult<()>;
}

/// 绑定到单个进程的内存视图
pub struct ProcessMemory<'a> {
    mm: &'a mut MemoryManager,
    pid: Pid,
}

impl ProcessMemory<'_> {
    /// 所属进程
    pub fn pid(&self) -> Pid {
        self.pid
    }
}

impl MemoryAccess for ProcessMemory<'_> {
    fn read(&mut self, vaddr: Vaddr, buf: &mut [u8]) -> PagingResult<()> {
        self.mm.read(self.pid, vaddr, buf)
    }

    fn write(&mut self, vaddr: Vaddr, buf: &[u8]) -> PagingResult<()> {
        self.mm.write(self.pid, vaddr, buf)
    }
}
