//! 可捕获输出的接收端

use std::sync::Mutex;

/// 线程安全的字符串缓冲区，常用作测试中的控制台输出
pub struct CaptureBuffer {
    inner: Mutex<String>,
}

impl CaptureBuffer {
    /// 创建空缓冲区，可用于 `static`
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(String::new()),
        }
    }

    /// 追加文本
    pub fn push_str(&self, s: &str) {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_str(s);
    }

    /// 取出并清空已捕获的全部文本
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

impl Default for CaptureBuffer {
    fn default() -> Self {
        Self::new()
    }
}
