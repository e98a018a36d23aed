//! Undo/redo over record snapshots

use std::collections::VecDeque;

use vedra_domain::Record;

/// Default number of undo steps kept
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Bounded undo and redo stacks
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Record>,
    redo: Vec<Record>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Remember `previous` before a change; clears the redo stack
    pub fn record(&mut self, previous: Record) {
        if self.limit == 0 {
            return;
        }
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(previous);
        self.redo.clear();
    }

    /// Step back from `current`, returning the record to restore
    pub fn undo(&mut self, current: &Record) -> Option<Record> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current.clone());
        Some(previous)
    }

    /// Step forward from `current`, returning the record to restore
    pub fn redo(&mut self, current: &Record) -> Option<Record> {
        let next = self.redo.pop()?;
        self.undo.push_back(current.clone());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
