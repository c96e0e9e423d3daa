//! Linear undo/redo history of project snapshots.

use std::collections::VecDeque;

use tracing::debug;

use crate::project::ProjectSnapshot;

/// Most snapshots kept before the oldest is evicted.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Where the cursor sits relative to the stack bounds.
///
/// A single-entry stack is `AtNewest`: there is nothing to undo or redo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPosition {
    Empty,
    AtOldest,
    Middle,
    AtNewest,
}

/// Bounded, linear stack of snapshots with a cursor on the one the surface
/// currently shows.
///
/// Recording after an undo prunes everything past the cursor; there is no
/// branching. Consecutive identical snapshots are stored once.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<ProjectSnapshot>,
    cursor: Option<usize>,
    limit: usize,
}

impl History {
    /// Creates an empty history holding at most `limit` snapshots (min 1).
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            limit: limit.max(1),
        }
    }

    /// Pushes `snapshot` as the newest entry. Returns false when it equals
    /// the entry under the cursor and nothing was appended.
    pub fn record(&mut self, snapshot: ProjectSnapshot) -> bool {
        if let Some(cursor) = self.cursor {
            if cursor + 1 < self.entries.len() {
                debug!(
                    pruned = self.entries.len() - cursor - 1,
                    "discarding redo branch"
                );
                self.entries.truncate(cursor + 1);
            }
            if self.entries[cursor] == snapshot {
                debug!(cursor, "snapshot unchanged, not recorded");
                return false;
            }
        }

        self.entries.push_back(snapshot);
        let mut cursor = self.entries.len() - 1;
        while self.entries.len() > self.limit {
            self.entries.pop_front();
            cursor = cursor.saturating_sub(1);
        }
        self.cursor = Some(cursor);
        debug!(cursor, len = self.entries.len(), "snapshot recorded");
        true
    }

    /// Steps back one entry and returns the snapshot to show.
    pub fn undo(&mut self) -> Option<&ProjectSnapshot> {
        let cursor = self.cursor.filter(|&c| c > 0)? - 1;
        self.cursor = Some(cursor);
        debug!(cursor, "undo");
        self.entries.get(cursor)
    }

    /// Steps forward one entry and returns the snapshot to show.
    pub fn redo(&mut self) -> Option<&ProjectSnapshot> {
        let cursor = self.cursor.filter(|&c| c + 1 < self.entries.len())? + 1;
        self.cursor = Some(cursor);
        debug!(cursor, "redo");
        self.entries.get(cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Index of the current entry, `None` while empty.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The entry the surface is showing.
    pub fn current(&self) -> Option<&ProjectSnapshot> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn position(&self) -> HistoryPosition {
        match self.cursor {
            None => HistoryPosition::Empty,
            Some(c) if c + 1 == self.entries.len() => HistoryPosition::AtNewest,
            Some(0) => HistoryPosition::AtOldest,
            Some(_) => HistoryPosition::Middle,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &ProjectSnapshot> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(label: &str) -> ProjectSnapshot {
        ProjectSnapshot::new(format!("<div class=\"script-action\">{label}</div>"))
    }

    fn stack(history: &History) -> Vec<String> {
        history.entries().map(|s| s.script_content.clone()).collect()
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::default();
        assert_eq!(history.position(), HistoryPosition::Empty);
        assert_eq!(history.cursor(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_first_record_always_appends() {
        let mut history = History::default();
        assert!(history.record(ProjectSnapshot::default()));
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(history.position(), HistoryPosition::AtNewest);
    }

    #[test]
    fn test_undo_redo_walk() {
        let mut history = History::default();
        for label in ["a", "b", "c"] {
            history.record(snap(label));
        }

        assert_eq!(history.undo(), Some(&snap("b")));
        assert_eq!(history.position(), HistoryPosition::Middle);
        assert_eq!(history.undo(), Some(&snap("a")));
        assert_eq!(history.position(), HistoryPosition::AtOldest);
        assert!(history.undo().is_none());
        assert_eq!(history.cursor(), Some(0));

        assert_eq!(history.redo(), Some(&snap("b")));
        assert_eq!(history.redo(), Some(&snap("c")));
        assert!(history.redo().is_none());
        assert_eq!(history.cursor(), Some(2));
    }

    #[test]
    fn test_record_after_undo_prunes_redo_branch() {
        let mut history = History::default();
        for label in ["a", "b", "c"] {
            history.record(snap(label));
        }
        history.undo();
        history.undo();

        assert!(history.record(snap("d")));
        assert_eq!(stack(&history), vec![snap("a").script_content, snap("d").script_content]);
        assert_eq!(history.cursor(), Some(1));
        assert!(!history.can_redo());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_duplicate_is_not_recorded() {
        let mut history = History::default();
        history.record(snap("x"));
        assert!(!history.record(snap("x")));
        assert_eq!(history.len(), 1);
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn test_duplicate_after_undo_still_prunes() {
        let mut history = History::default();
        for label in ["a", "b"] {
            history.record(snap(label));
        }
        history.undo();

        assert!(!history.record(snap("a")));
        assert_eq!(history.len(), 1);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_eviction_keeps_cursor_on_tip() {
        let mut history = History::default();
        for i in 0..60 {
            history.record(snap(&i.to_string()));
        }

        assert_eq!(history.len(), 50);
        assert_eq!(history.cursor(), Some(49));
        assert_eq!(history.entries().next(), Some(&snap("10")));
        assert_eq!(history.current(), Some(&snap("59")));
    }

    #[test]
    fn test_custom_limit() {
        let mut history = History::new(2);
        for label in ["a", "b", "c"] {
            history.record(snap(label));
        }
        assert_eq!(stack(&history), vec![snap("b").script_content, snap("c").script_content]);
        assert!(history.can_undo());

        let clamped = History::new(0);
        assert_eq!(clamped.limit(), 1);
    }
}
