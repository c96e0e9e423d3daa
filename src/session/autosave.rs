//! Debounced autosave scheduling.
//!
//! The scheduler holds no clock. Callers pass the current time in
//! milliseconds, and a host timer either polls with [`AutosaveScheduler::take_due`]
//! or redeems the [`SaveToken`] it was handed when the save was armed.

use tracing::debug;

/// Quiet period after the last edit before a save runs.
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 1500;

/// Identifies one arming of the scheduler. Only the newest token is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SaveToken(u64);

impl SaveToken {
    pub fn id(self) -> u64 {
        self.0
    }

    pub fn from_id(id: u64) -> Self {
        Self(id)
    }
}

/// A save that is waiting for its quiet period to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket {
    pub token: SaveToken,
    pub due_at_ms: u64,
    pub delay_ms: u64,
}

/// Holds at most one pending save. Re-arming replaces the pending one.
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    delay_ms: u64,
    next_token: u64,
    pending: Option<SaveTicket>,
}

impl AutosaveScheduler {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            next_token: 0,
            pending: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Cancels any pending save and schedules a new one `delay_ms` after `now_ms`.
    pub fn arm(&mut self, now_ms: u64) -> SaveTicket {
        self.next_token += 1;
        let ticket = SaveTicket {
            token: SaveToken(self.next_token),
            due_at_ms: now_ms.saturating_add(self.delay_ms),
            delay_ms: self.delay_ms,
        };
        if let Some(previous) = self.pending.replace(ticket) {
            debug!(
                cancelled = previous.token.id(),
                token = ticket.token.id(),
                due_at_ms = ticket.due_at_ms,
                "autosave re-armed"
            );
        } else {
            debug!(
                token = ticket.token.id(),
                due_at_ms = ticket.due_at_ms,
                "autosave armed"
            );
        }
        ticket
    }

    pub fn pending(&self) -> Option<SaveTicket> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending save, if any, and returns it.
    pub fn cancel(&mut self) -> Option<SaveTicket> {
        let cancelled = self.pending.take();
        if let Some(ticket) = cancelled {
            debug!(token = ticket.token.id(), "autosave cancelled");
        }
        cancelled
    }

    /// Takes the pending save once `now_ms` has reached its due time.
    pub fn take_due(&mut self, now_ms: u64) -> Option<SaveTicket> {
        match self.pending {
            Some(ticket) if now_ms >= ticket.due_at_ms => self.pending.take(),
            _ => None,
        }
    }

    /// Takes the pending save if `token` is the live one. Stale tokens are
    /// ignored and leave the pending save in place.
    pub fn claim(&mut self, token: SaveToken) -> Option<SaveTicket> {
        match self.pending {
            Some(ticket) if ticket.token == token => self.pending.take(),
            _ => {
                debug!(token = token.id(), "stale autosave token ignored");
                None
            }
        }
    }

    /// Takes the pending save regardless of its due time.
    pub fn take_pending(&mut self) -> Option<SaveTicket> {
        self.pending.take()
    }
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY_MS)
    }
}
