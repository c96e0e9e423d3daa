//! Editing session module.
//!
//! This module provides:
//! - `status`: The save status indicator and the sink it is reported to
//! - `history`: Bounded linear undo/redo stack of snapshots
//! - `autosave`: Debounce scheduling with per-arming tokens
//! - `config`: Session settings (storage key, autosave delay, history limit)
//! - `manager`: `ProjectSession`, which coordinates all of the above
//! - `wasm`: Browser bindings (only with the `wasm` feature)

pub mod autosave;
pub mod config;
pub mod history;
pub mod manager;
pub mod status;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use autosave::{AutosaveScheduler, SaveTicket, SaveToken, DEFAULT_AUTOSAVE_DELAY_MS};
pub use config::{SessionConfig, DEFAULT_STORAGE_KEY};
pub use history::{History, HistoryPosition, DEFAULT_HISTORY_LIMIT};
pub use manager::{LoadOutcome, ProjectSession, SaveOutcome};
pub use status::{SaveStatus, StatusLog, StatusSink};

#[cfg(feature = "wasm")]
pub use wasm::JsProjectSession;
