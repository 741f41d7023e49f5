//! 地址模块
//!
//! 此模块提供虚拟地址以及页码的抽象。页大小在运行时配置，
//! 因此所有与页大小相关的换算都显式接收 `page_size` 参数。
//!
//! # 地址类型
//!
//! - [`Vaddr`] - 进程虚拟地址
//!
//! # 页码
//!
//! - [`PageNum`] - 表示页码的 Trait
//! - [`Ppn`] - 物理页码（即帧号）
//! - [`Vpn`] - 虚拟页码
//!
//! # 操作
//!
//! - [`UsizeConvert`] - 在类型和 usize 之间进行转换
pub mod operations;
pub mod page_num;
pub mod types;

pub use operations::UsizeConvert;
pub use page_num::{PageNum, Ppn, Vpn};
pub use types::Vaddr;
