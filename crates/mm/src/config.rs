//! 内存管理配置

/// 内存管理配置常量
///
/// 在启动时确定，之后不再改变。帧数为 `physical_memory_size / page_size`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmConfig {
    /// 页大小（字节）
    page_size: usize,
    /// 物理内存大小（字节）
    physical_memory_size: usize,
    /// 每个进程后备区的页数；`None` 表示与进程映像的页数相同
    backing_pages: Option<usize>,
}

impl MmConfig {
    /// 创建配置，后备区容量按数据区大小自动确定
    pub const fn new(page_size: usize, physical_memory_size: usize) -> Self {
        Self {
            page_size,
            physical_memory_size,
            backing_pages: None,
        }
    }

    /// 为所有进程统一指定后备区页数
    pub const fn with_backing_pages(mut self, pages: usize) -> Self {
        self.backing_pages = Some(pages);
        self
    }

    /// 页大小
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// 物理内存大小
    pub const fn physical_memory_size(&self) -> usize {
        self.physical_memory_size
    }

    /// 后备区页数覆盖值
    pub const fn backing_pages(&self) -> Option<usize> {
        self.backing_pages
    }

    /// 物理帧总数
    pub const fn total_frames(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            self.physical_memory_size / self.page_size
        }
    }
}
