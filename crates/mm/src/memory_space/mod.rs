//! 内存空间模块
//!
//! 本模块定义进程映像、后备区、每进程地址空间，
//! 以及把它们与帧池组合起来的按需分页内存管理器。

mod backing;
mod image;
mod manager;
mod space;

pub use backing::BackingStore;
pub use image::ProcessImage;
pub use manager::*;
pub use space::AddressSpace;
