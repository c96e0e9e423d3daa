//! Save status indicator and the sink that presents it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of the most recent load, save or import, for presentation only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Imported,
    Error,
    Offline,
}

impl SaveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SaveStatus::Idle => "idle",
            SaveStatus::Saving => "saving",
            SaveStatus::Saved => "saved",
            SaveStatus::Imported => "imported",
            SaveStatus::Error => "error",
            SaveStatus::Offline => "offline",
        }
    }

    /// Text for the status badge.
    pub fn label(self) -> &'static str {
        match self {
            SaveStatus::Idle => "",
            SaveStatus::Saving => "Saving...",
            SaveStatus::Saved => "Saved to Browser",
            SaveStatus::Imported => "Imported! Saving...",
            SaveStatus::Error => "Error",
            SaveStatus::Offline => "Offline",
        }
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation hook for status changes. Fire-and-forget; never fails.
pub trait StatusSink {
    fn report(&mut self, status: SaveStatus);
}

impl<F> StatusSink for F
where
    F: FnMut(SaveStatus),
{
    fn report(&mut self, status: SaveStatus) {
        self(status)
    }
}

/// Sink that remembers every status it was given.
#[derive(Debug, Clone, Default)]
pub struct StatusLog {
    reported: Vec<SaveStatus>,
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent status, or `Idle` if nothing was reported yet.
    pub fn latest(&self) -> SaveStatus {
        self.reported.last().copied().unwrap_or_default()
    }

    pub fn reported(&self) -> &[SaveStatus] {
        &self.reported
    }

    pub fn clear(&mut self) {
        self.reported.clear();
    }
}

impl StatusSink for StatusLog {
    fn report(&mut self, status: SaveStatus) {
        self.reported.push(status);
    }
}
