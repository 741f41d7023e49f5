//! 后备区
//!
//! 每个进程一块，保存被淘汰的脏页。容量以页为单位，在创建时确定。
//! 同一页再次写回时覆盖原槽位，不占用新的容量。

use crate::address::Vpn;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;

/// 进程后备区
#[derive(Debug, Clone, Default)]
pub struct BackingStore {
    capacity: usize,
    slots: BTreeMap<Vpn, Box<[u8]>>,
}

impl BackingStore {
    /// 创建容量为 `capacity` 页的后备区
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: BTreeMap::new(),
        }
    }

    /// 容量（页）
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 已使用的槽位数
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// 是否没有保存任何页
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 是否保存了 `vpn`
    pub fn contains(&self, vpn: Vpn) -> bool {
        self.slots.contains_key(&vpn)
    }

    /// 能否保存 `vpn`
    pub fn can_store(&self, vpn: Vpn) -> bool {
        self.contains(vpn) || self.slots.len() < self.capacity
    }

    /// 保存一页；后备区已满且 `vpn` 没有已有槽位时返回 false
    pub fn store(&mut self, vpn: Vpn, contents: &[u8]) -> bool {
        if let Some(slot) = self.slots.get_mut(&vpn) {
            slot.copy_from_slice(contents);
            return true;
        }
        if self.slots.len() >= self.capacity {
            return false;
        }
        self.slots.insert(vpn, contents.into());
        true
    }

    /// 把 `vpn` 的内容恢复到 `dst`；没有保存过时返回 false
    pub fn restore(&self, vpn: Vpn, dst: &mut [u8]) -> bool {
        match self.slots.get(&vpn) {
            Some(slot) => {
                dst.copy_from_slice(slot);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_and_overwrite() {
        let mut store = BackingStore::new(1);
        assert!(store.store(Vpn(2), &[1, 2]));
        assert!(!store.store(Vpn(3), &[3, 4]));
        assert!(store.store(Vpn(2), &[5, 6]));
        assert_eq!(store.len(), 1);

        let mut buf = [0u8; 2];
        assert!(store.restore(Vpn(2), &mut buf));
        assert_eq!(buf, [5, 6]);
        assert!(!store.restore(Vpn(3), &mut buf));
    }

    #[test]
    fn test_zero_capacity() {
        let mut store = BackingStore::new(0);
        assert!(!store.can_store(Vpn(0)));
        assert!(!store.store(Vpn(0), &[0]));
        assert!(store.is_empty());
    }
}
