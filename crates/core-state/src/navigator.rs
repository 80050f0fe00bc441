//! History navigation with unsaved-edit preservation.
//!
//! The pointer ranges over `0..=len`: `0..len` are stored records, `len` is the draft slot
//! (whatever the user was typing before recalling history; its stored text is empty).
//! Before every successful move the text currently on screen is compared with the record
//! the pointer sits on; when they differ it is kept in a per-slot overlay so navigating back
//! shows the edit again. The store itself is never written.
//!
//! Moving past either end is a no-op unless cycling is enabled: previous from the oldest
//! record wraps to the newest, next from the draft slot wraps to the oldest.

use crate::history::History;
use ahash::AHashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryNav {
    ptr: usize,
    cycling: bool,
    modified: AHashMap<usize, String>,
}

impl HistoryNav {
    pub fn new(cycling: bool) -> Self {
        Self {
            cycling,
            ..Self::default()
        }
    }

    pub fn set_cycling(&mut self, cycling: bool) {
        self.cycling = cycling;
    }

    /// Start a fresh read: pointer on the draft slot, overlay cleared.
    pub fn reset(&mut self, history: &dyn History) {
        self.ptr = history.len();
        self.modified.clear();
    }

    pub fn ptr(&self) -> usize {
        self.ptr
    }

    /// Number of slots holding an unsaved edit.
    pub fn modified_count(&self) -> usize {
        self.modified.len()
    }

    /// Slot the pointer would move to, or `None` at a boundary without cycling.
    pub fn target(&self, history: &dyn History, dir: Direction) -> Option<usize> {
        let len = history.len();
        if len == 0 {
            return None;
        }
        let ptr = self.ptr.min(len);
        match dir {
            Direction::Previous if ptr == 0 => self.cycling.then(|| len - 1),
            Direction::Previous => Some(ptr - 1),
            Direction::Next if ptr >= len => self.cycling.then_some(0),
            Direction::Next => Some(ptr + 1),
        }
    }

    /// Move one slot; `current` is the full multi-line text now on screen. Returns the text
    /// to show for the new slot (the unsaved edit if any, else the stored record).
    pub fn step(&mut self, history: &dyn History, dir: Direction, current: &str) -> Option<String> {
        let target = self.target(history, dir)?;
        self.remember(history, current);
        self.ptr = target;
        debug!(
            target: "editor.history",
            ptr = self.ptr,
            len = history.len(),
            modified = self.modified.len(),
            "history_step"
        );
        Some(self.text_at(history, target))
    }

    /// Text to display for slot `index`.
    pub fn text_at(&self, history: &dyn History, index: usize) -> String {
        if let Some(edit) = self.modified.get(&index) {
            return edit.clone();
        }
        stored(history, index)
    }

    /// Jump straight to `index` (incremental search commit), keeping the overlay.
    pub fn jump(&mut self, history: &dyn History, index: usize, current: &str) {
        self.remember(history, current);
        self.ptr = index.min(history.len());
    }

    fn remember(&mut self, history: &dyn History, current: &str) {
        let ptr = self.ptr.min(history.len());
        if current == stored(history, ptr) {
            self.modified.remove(&ptr);
        } else {
            self.modified.insert(ptr, current.to_string());
        }
    }
}

fn stored(history: &dyn History, index: usize) -> String {
    history.at(index).unwrap_or_default()
}
