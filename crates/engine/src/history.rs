//! Linear undo/redo over whole-state snapshots.
//!
//! Snapshots form a sequence `[S0..Sn]` with a cursor on the current one.
//! Recording after an undo drops everything past the cursor.

use std::collections::VecDeque;

/// Default number of snapshots kept.
pub const DEFAULT_LIMIT: usize = 100;

#[derive(Clone, Debug)]
pub struct History<T> {
    snapshots: VecDeque<T>,
    cursor: usize,
    limit: usize,
}

impl<T: Clone> History<T> {
    /// Start a history whose baseline is `initial`.
    pub fn new(initial: T, limit: usize) -> Self {
        Self {
            snapshots: VecDeque::from([initial]),
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> &T {
        &self.snapshots[self.cursor]
    }

    /// Snapshots up to and including the current one.
    pub fn past_len(&self) -> usize {
        self.cursor + 1
    }

    pub fn future_len(&self) -> usize {
        self.snapshots.len() - self.cursor - 1
    }

    /// The baseline snapshot is not an undoable step on its own.
    pub fn can_undo(&self) -> bool {
        self.past_len() > 1
    }

    pub fn can_redo(&self) -> bool {
        self.future_len() > 0
    }

    /// Append `snapshot` after the cursor, discarding any redo steps.
    pub fn record(&mut self, snapshot: T) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
        }
        self.cursor = self.snapshots.len() - 1;
    }

    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    /// Forget every snapshot but the current one.
    pub fn clear(&mut self) {
        if let Some(current) = self.snapshots.remove(self.cursor) {
            self.snapshots = VecDeque::from([current]);
        }
        self.cursor = 0;
    }
}
