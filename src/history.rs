//! Session history
//!
//! A browser-style history stack. The router owns one instance and is its
//! only writer:
//! - `push` records a new entry and drops anything ahead of the cursor
//! - `replace` overwrites the current entry
//! - `back`, `forward` and `go` move the cursor (history traversal)
//! - the stack is capped; the oldest entries go first

use crate::NavigationDirection;

/// Default number of entries kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

/// One entry in the session history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Path as it was navigated to
    pub path: String,
}

impl HistoryEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// The result of moving through history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStep {
    /// Path before the move
    pub from: String,
    /// Path after the move
    pub to: String,
    /// How the cursor moved
    pub direction: NavigationDirection,
}

/// Session history stack
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    current: usize,
    /// Maximum number of entries (0 = unlimited)
    limit: usize,
}

impl History {
    /// Create a history holding only the initial location.
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self::with_limit(initial_path, DEFAULT_HISTORY_LIMIT)
    }

    /// Create with a custom entry limit (0 = unlimited).
    pub fn with_limit(initial_path: impl Into<String>, limit: usize) -> Self {
        Self {
            entries: vec![HistoryEntry::new(initial_path)],
            current: 0,
            limit,
        }
    }

    pub fn current_path(&self) -> &str {
        &self.entries[self.current].path
    }

    pub fn current_entry(&self) -> &HistoryEntry {
        &self.entries[self.current]
    }

    /// Record a new entry after the cursor, discarding forward entries.
    pub fn push(&mut self, path: impl Into<String>) -> HistoryStep {
        let from = self.current_path().to_string();
        let path = path.into();

        self.entries.truncate(self.current + 1);
        self.entries.push(HistoryEntry::new(path.clone()));
        self.current += 1;
        self.enforce_limit();

        HistoryStep {
            from,
            to: path,
            direction: NavigationDirection::Forward,
        }
    }

    /// Overwrite the current entry.
    pub fn replace(&mut self, path: impl Into<String>) -> HistoryStep {
        let from = self.current_path().to_string();
        let path = path.into();

        self.entries[self.current] = HistoryEntry::new(path.clone());

        HistoryStep {
            from,
            to: path,
            direction: NavigationDirection::Replace,
        }
    }

    pub fn back(&mut self) -> Option<HistoryStep> {
        self.go(-1)
    }

    pub fn forward(&mut self) -> Option<HistoryStep> {
        self.go(1)
    }

    /// Move the cursor by `delta` entries.
    ///
    /// Returns `None` (and stays put) when the target is out of range or
    /// `delta` is zero.
    pub fn go(&mut self, delta: isize) -> Option<HistoryStep> {
        if delta == 0 {
            return None;
        }

        let target = self.current.checked_add_signed(delta)?;
        if target >= self.entries.len() {
            return None;
        }

        let from = self.current_path().to_string();
        self.current = target;

        Some(HistoryStep {
            from,
            to: self.current_path().to_string(),
            direction: if delta < 0 {
                NavigationDirection::Back
            } else {
                NavigationDirection::Forward
            },
        })
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.current + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the initial entry is never removed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    fn enforce_limit(&mut self) {
        if self.limit > 0 && self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(0..excess);
            self.current = self.current.saturating_sub(excess);
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new("/")
    }
}
