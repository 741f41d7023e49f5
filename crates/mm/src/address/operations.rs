//! 地址与页码的通用操作

/// 在类型和 usize 之间进行转换
pub trait UsizeConvert: Copy {
    /// 从 usize 构造
    fn from_usize(value: usize) -> Self;
    /// 转换为 usize
    fn as_usize(&self) -> usize;
}

/// 为 `usize` 新类型实现 [`UsizeConvert`]、`From<usize>` 与 `Display`
macro_rules! impl_usize_convert {
    ($ty:ident) => {
        impl $crate::address::UsizeConvert for $ty {
            #[inline]
            fn from_usize(value: usize) -> Self {
                $ty(value)
            }

            #[inline]
            fn as_usize(&self) -> usize {
                self.0
            }
        }

        impl From<usize> for $ty {
            fn from(value: usize) -> Self {
                $ty(value)
            }
        }

        impl core::fmt::Display for $ty {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{:#x}", self.0)
            }
        }
    };
}

pub(crate) use impl_usize_convert;
