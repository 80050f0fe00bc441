//! History store contract and an in-memory implementation.

use std::cell::RefCell;
use std::rc::Rc;

/// Read access to a command-history store. Index 0 is the oldest record; a record may span
/// several lines joined with `\n`.
pub trait History {
    fn len(&self) -> usize;

    fn at(&self, index: usize) -> Option<String>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Simple append-only store. Empty records and immediate repeats are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryHistory {
    entries: Vec<String>,
    limit: Option<usize>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `limit` records, dropping the oldest.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: Some(limit.max(1)),
        }
    }

    pub fn push(&mut self, record: impl Into<String>) {
        let record = record.into();
        if record.is_empty() || self.entries.last() == Some(&record) {
            return;
        }
        self.entries.push(record);
        if let Some(limit) = self.limit
            && self.entries.len() > limit
        {
            let excess = self.entries.len() - limit;
            self.entries.drain(..excess);
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl<S: Into<String>> FromIterator<S> for MemoryHistory {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut h = MemoryHistory::new();
        for record in iter {
            h.push(record);
        }
        h
    }
}

impl History for MemoryHistory {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn at(&self, index: usize) -> Option<String> {
        self.entries.get(index).cloned()
    }
}

/// Shared store: the REPL keeps one handle to push accepted input while the editor reads.
impl<H: History> History for Rc<RefCell<H>> {
    fn len(&self) -> usize {
        self.borrow().len()
    }

    fn at(&self, index: usize) -> Option<String> {
        self.borrow().at(index)
    }
}
