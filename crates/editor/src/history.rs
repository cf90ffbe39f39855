use std::collections::VecDeque;

/// Bounded undo/redo stacks of buffer snapshots.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<String>,
    redo: Vec<String>,
    limit: usize,
}

impl History {
    /// Creates a history keeping at most `limit` undo steps.
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Records the buffer as it was before a change.
    ///
    /// Any redo steps are discarded. A snapshot equal to the latest one is
    /// not stored twice, and the oldest step is dropped past the limit.
    pub fn record(&mut self, previous: String) {
        self.redo.clear();
        if self.limit == 0 || self.undo.back() == Some(&previous) {
            return;
        }
        self.undo.push_back(previous);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }

    /// Steps back. `current` moves onto the redo stack.
    pub fn undo(&mut self, current: &str) -> Option<String> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current.to_string());
        Some(previous)
    }

    /// Steps forward again. `current` moves back onto the undo stack.
    pub fn redo(&mut self, current: &str) -> Option<String> {
        let next = self.redo.pop()?;
        self.undo.push_back(current.to_string());
        Some(next)
    }

    /// Whether there is anything to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether there is anything to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Drops all steps.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
