//! Linear undo/redo history of full tree snapshots.
//!
//! Recording a new snapshot truncates any redo branch, appends the snapshot and moves
//! the cursor to it. The history keeps at most [`HISTORY_LIMIT`] snapshots; the oldest
//! are dropped first. Undo and redo only move the cursor.

use crate::model::component::Component;

/// Maximum number of snapshots retained.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Vec<Component>>,
    index: usize,
}

impl History {
    /// Starts a history holding `initial` as its only snapshot.
    pub fn new(initial: Vec<Component>) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    /// Records `tree` as the newest snapshot, discarding anything after the cursor.
    pub fn record(&mut self, tree: Vec<Component>) {
        self.entries.truncate(self.index + 1);
        self.entries.push(tree);
        if self.entries.len() > HISTORY_LIMIT {
            let overflow = self.entries.len() - HISTORY_LIMIT;
            self.entries.drain(..overflow);
        }
        self.index = self.entries.len() - 1;
    }

    /// Steps back one snapshot and returns it, or `None` at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&[Component]> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Steps forward one snapshot and returns it, or `None` at the newest snapshot.
    pub fn redo(&mut self) -> Option<&[Component]> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    pub fn current(&self) -> &[Component] {
        &self.entries[self.index]
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Drops every snapshot and starts over from `initial`.
    pub fn reset(&mut self, initial: Vec<Component>) {
        self.entries = vec![initial];
        self.index = 0;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
