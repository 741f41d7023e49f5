//! 有界环形日志缓冲区
//!
//! 单调递增的读/写索引：`reader_index` 是最旧未读条目的序号，
//! `writer_index` 是下一条将写入条目的序号。缓冲区满时丢弃最旧条目。

use crate::entry::LogEntry;
use alloc::collections::VecDeque;

pub(crate) struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    writer: usize,
    dropped: usize,
}

impl LogBuffer {
    pub(crate) const fn new(capacity: usize) -> Self {
        LogBuffer {
            entries: VecDeque::new(),
            capacity,
            writer: 0,
            dropped: 0,
        }
    }

    pub(crate) fn write(&mut self, mut entry: LogEntry) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.dropped += 1;
        }
        entry.set_seq(self.writer);
        self.writer += 1;
        self.entries.push_back(entry);
    }

    pub(crate) fn read(&mut self) -> Option<LogEntry> {
        self.entries.pop_front()
    }

    pub(crate) fn peek(&self, index: usize) -> Option<LogEntry> {
        let start = self.reader_index();
        if index < start {
            return None;
        }
        self.entries.get(index - start).cloned()
    }

    pub(crate) fn reader_index(&self) -> usize {
        self.writer - self.entries.len()
    }

    pub(crate) fn writer_index(&self) -> usize {
        self.writer
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn dropped(&self) -> usize {
        self.dropped
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }
}
