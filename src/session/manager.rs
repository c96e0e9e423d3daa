//! ProjectSession: the editing session that ties the surface, the store,
//! autosave and undo/redo together.
//!
//! Control flow:
//! - Edits mutate the surface, then [`ProjectSession::notify_edit`] reports
//!   `saving` and (re)arms the autosave.
//! - When the quiet period elapses the save task captures the surface, writes
//!   it under the configured key and, on success, records it in history.
//! - Undo/redo restore a history entry straight onto the surface. The surface
//!   as captured right after the restore is held as a restore token, so the
//!   autosave that the restore itself provokes does not record it again.

use tracing::{debug, error, info, warn};

use super::autosave::{AutosaveScheduler, SaveTicket, SaveToken};
use super::config::SessionConfig;
use super::history::History;
use super::status::{SaveStatus, StatusSink};
use crate::error::{ToolkitError, ToolkitResult};
use crate::project::{ProjectSnapshot, SnapshotCodec};
use crate::script::export_plain_text;
use crate::store::PersistenceStore;

/// How [`ProjectSession::load_or_init`] populated the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A stored project was restored.
    Restored,
    /// Nothing was stored; the new-project default was restored and saved.
    Created,
    /// The stored project could not be parsed; the default replaced it.
    Recovered,
}

/// What a completed save did to history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written and appended to history.
    Recorded,
    /// Written; history already held this snapshot at the cursor.
    Unchanged,
    /// Written; the snapshot is the one undo/redo just restored.
    RestoreEcho,
    /// The token was not the live one; nothing ran.
    Stale,
}

/// Marks the surface as it stood right after a restore from history.
///
/// Consumed by the next save task whatever that save's outcome.
#[derive(Debug, Clone)]
struct RestoreToken {
    snapshot: ProjectSnapshot,
}

// =============================================================================
// PROJECT SESSION
// =============================================================================

/// One editing session over a single project.
///
/// Time is passed in explicitly as milliseconds; the session never reads a
/// clock. A host either polls [`poll`](Self::poll) or redeems the token
/// returned by [`notify_edit`](Self::notify_edit) with [`fire`](Self::fire).
pub struct ProjectSession<C, S, K> {
    codec: C,
    store: S,
    status_sink: K,
    config: SessionConfig,
    history: History,
    scheduler: AutosaveScheduler,
    restore_token: Option<RestoreToken>,
    status: SaveStatus,
}

impl<C, S, K> ProjectSession<C, S, K>
where
    C: SnapshotCodec,
    S: PersistenceStore,
    K: StatusSink,
{
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Creates a session with the default configuration.
    pub fn new(codec: C, store: S, status_sink: K) -> Self {
        Self::build(SessionConfig::default(), codec, store, status_sink)
    }

    /// Creates a session after validating `config`.
    pub fn with_config(
        config: SessionConfig,
        codec: C,
        store: S,
        status_sink: K,
    ) -> ToolkitResult<Self> {
        config.validate()?;
        Ok(Self::build(config, codec, store, status_sink))
    }

    fn build(config: SessionConfig, codec: C, store: S, status_sink: K) -> Self {
        Self {
            history: History::new(config.history_limit),
            scheduler: AutosaveScheduler::new(config.autosave_delay_ms),
            codec,
            store,
            status_sink,
            config,
            restore_token: None,
            status: SaveStatus::Idle,
        }
    }

    /// Reads the stored project and restores it onto the surface.
    ///
    /// With nothing stored, or a stored value that does not parse, the
    /// new-project default is restored and saved immediately. A failure to
    /// read or write the store leaves the default on the surface, reports
    /// `error` and is returned.
    pub fn load_or_init(&mut self) -> ToolkitResult<LoadOutcome> {
        let stored = match self.store.read(&self.config.storage_key) {
            Ok(stored) => stored,
            Err(err) => {
                self.codec.restore(&ProjectSnapshot::new_project());
                return Err(self.fail("failed to read stored project", err));
            }
        };

        let outcome = match stored {
            Some(json) => match ProjectSnapshot::from_json(&json) {
                Ok(snapshot) => {
                    self.codec.restore(&snapshot);
                    self.report(SaveStatus::Saved);
                    info!(
                        key = %self.config.storage_key,
                        panels = snapshot.storyboard_panels.len(),
                        shots = snapshot.shot_list.len(),
                        "project restored"
                    );
                    return Ok(LoadOutcome::Restored);
                }
                Err(err) => {
                    warn!(error = %err, "stored project unreadable, starting a new one");
                    self.report(SaveStatus::Error);
                    LoadOutcome::Recovered
                }
            },
            None => LoadOutcome::Created,
        };

        self.codec.restore(&ProjectSnapshot::new_project());
        self.save_now()?;
        info!(key = %self.config.storage_key, ?outcome, "new project initialized");
        Ok(outcome)
    }

    /// Seeds history with the surface as it stands after loading.
    ///
    /// Returns false when history already holds that snapshot.
    pub fn initialize_history(&mut self) -> bool {
        let snapshot = self.codec.capture();
        self.history.record(snapshot)
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Direct surface access. Changes made here are not autosaved until
    /// [`notify_edit`](Self::notify_edit) is called.
    pub fn codec_mut(&mut self) -> &mut C {
        &mut self.codec
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn status_sink(&self) -> &K {
        &self.status_sink
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The autosave waiting on its quiet period, if any.
    pub fn pending_save(&self) -> Option<SaveTicket> {
        self.scheduler.pending()
    }

    // =========================================================================
    // EDITING AND AUTOSAVE
    // =========================================================================

    /// Applies `f` to the surface and notifies the autosave.
    pub fn edit<R>(&mut self, now_ms: u64, f: impl FnOnce(&mut C) -> R) -> R {
        let result = f(&mut self.codec);
        self.notify_edit(now_ms);
        result
    }

    /// Reports `saving` and restarts the quiet period from `now_ms`.
    pub fn notify_edit(&mut self, now_ms: u64) -> SaveTicket {
        self.report(SaveStatus::Saving);
        self.scheduler.arm(now_ms)
    }

    /// Runs the pending save if its quiet period has elapsed by `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> ToolkitResult<Option<SaveOutcome>> {
        match self.scheduler.take_due(now_ms) {
            Some(ticket) => {
                debug!(token = ticket.token.id(), now_ms, "autosave due");
                self.run_save().map(Some)
            }
            None => Ok(None),
        }
    }

    /// Runs the save armed with `token`. A token that has since been
    /// replaced or cancelled does nothing.
    pub fn fire(&mut self, token: SaveToken) -> ToolkitResult<SaveOutcome> {
        match self.scheduler.claim(token) {
            Some(_) => self.run_save(),
            None => Ok(SaveOutcome::Stale),
        }
    }

    /// Runs the pending save now, if there is one.
    pub fn flush(&mut self) -> ToolkitResult<Option<SaveOutcome>> {
        match self.scheduler.take_pending() {
            Some(_) => self.run_save().map(Some),
            None => Ok(None),
        }
    }

    /// Cancels any pending autosave and saves immediately.
    pub fn save_now(&mut self) -> ToolkitResult<SaveOutcome> {
        self.scheduler.cancel();
        self.run_save()
    }

    /// Reports that the host has lost its storage backend.
    pub fn mark_offline(&mut self) {
        warn!("session marked offline");
        self.report(SaveStatus::Offline);
    }

    fn run_save(&mut self) -> ToolkitResult<SaveOutcome> {
        let snapshot = self.codec.capture();
        let restored = self.restore_token.take();

        let json = match snapshot.to_json() {
            Ok(json) => json,
            Err(err) => return Err(self.fail("failed to serialize project", err)),
        };
        if let Err(err) = self.store.write(&self.config.storage_key, &json) {
            return Err(self.fail("failed to save project", err));
        }
        self.report(SaveStatus::Saved);

        if restored.is_some_and(|token| token.snapshot == snapshot) {
            debug!("save matches restored snapshot, history untouched");
            return Ok(SaveOutcome::RestoreEcho);
        }
        if self.history.record(snapshot) {
            Ok(SaveOutcome::Recorded)
        } else {
            Ok(SaveOutcome::Unchanged)
        }
    }

    // =========================================================================
    // UNDO / REDO
    // =========================================================================

    /// Restores the previous history entry. Returns false at the oldest entry.
    ///
    /// A pending autosave runs first so the edit it carries is not lost.
    pub fn undo(&mut self) -> bool {
        self.flush_before_travel();
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore_from_history(snapshot);
        true
    }

    /// Restores the next history entry. Returns false at the newest entry.
    pub fn redo(&mut self) -> bool {
        self.flush_before_travel();
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore_from_history(snapshot);
        true
    }

    fn flush_before_travel(&mut self) {
        // Already reported to the sink and logged.
        if let Err(err) = self.flush() {
            debug!(error = %err, "pending save failed before history step");
        }
    }

    fn restore_from_history(&mut self, snapshot: ProjectSnapshot) {
        self.codec.restore(&snapshot);
        // The surface may not show the entry verbatim (empty script fallback).
        let shown = self.codec.capture();
        if shown != snapshot {
            debug!("restored surface differs from history entry");
        }
        self.restore_token = Some(RestoreToken { snapshot: shown });
    }

    // =========================================================================
    // IMPORT / EXPORT
    // =========================================================================

    /// Replaces the project with a user-supplied project file and saves it.
    ///
    /// A payload that does not parse, or lacks `scriptContent`, reports
    /// `error` and leaves the surface, store and history untouched.
    pub fn import_json(&mut self, payload: &str) -> ToolkitResult<()> {
        let snapshot = match ProjectSnapshot::parse_import(payload) {
            Ok(snapshot) => snapshot,
            Err(err) => return Err(self.fail("import rejected", err)),
        };

        self.scheduler.cancel();
        self.restore_token = None;
        self.codec.restore(&snapshot);
        self.report(SaveStatus::Imported);
        info!(
            panels = snapshot.storyboard_panels.len(),
            shots = snapshot.shot_list.len(),
            "project imported"
        );
        self.run_save().map(|_| ())
    }

    /// The current project as pretty-printed JSON.
    pub fn export_json(&mut self) -> ToolkitResult<String> {
        self.codec.capture().to_pretty_json()
    }

    /// The current script as a plain-text screenplay.
    pub fn export_text(&mut self) -> String {
        export_plain_text(&self.codec.capture())
    }

    // =========================================================================
    // INTERNAL HELPERS
    // =========================================================================

    fn report(&mut self, status: SaveStatus) {
        self.status = status;
        self.status_sink.report(status);
    }

    fn fail(&mut self, context: &str, err: ToolkitError) -> ToolkitError {
        error!(error = %err, "{}", context);
        self.report(SaveStatus::Error);
        err
    }
}

// =============================================================================
// TESTS
// =============================================================================
