//! Append-only record of completed cycles

use crate::aggregator::HistoryRecord;
use std::collections::VecDeque;

/// Most recent first. Records can be added but never changed or removed.
#[derive(Debug, Clone, Default)]
pub struct History {
    records: VecDeque<HistoryRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record at the front and hand back a view of it
    pub fn push(&mut self, record: HistoryRecord) -> &HistoryRecord {
        self.records.push_front(record);
        &self.records[0]
    }

    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryRecord;
    type IntoIter = std::collections::vec_deque::Iter<'a, HistoryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
