//! Prodkit - project document, undo/redo history and debounced autosave for a
//! short-form film pre-production toolkit.
//!
//! A project is one document holding a screenplay body, storyboard panels and
//! a shot list. The crate keeps the editable surface behind the
//! [`SnapshotCodec`] boundary, so everything here runs without a browser:
//!
//! - **Autosave**: edits are coalesced into one store write per quiet period
//! - **History**: every successful save becomes an undo step, up to a fixed bound
//! - **Import/export**: project JSON files and a plain-text screenplay layout
//!
//! # Example
//!
//! ```rust
//! use prodkit::{EditorSurface, MemoryStore, ProjectSession, SaveStatus, StatusLog};
//!
//! let mut session =
//!     ProjectSession::new(EditorSurface::new(), MemoryStore::new(), StatusLog::new());
//! session.load_or_init().unwrap();
//! session.initialize_history();
//!
//! // The host notifies every edit with the current time in milliseconds.
//! let id = session.edit(0, |surface| surface.add_panel());
//! session.edit(400, |surface| surface.set_panel_notes(id, "Wide on the diner").unwrap());
//!
//! // Nothing is written until the 1500ms quiet period has elapsed.
//! assert!(session.poll(1_000).unwrap().is_none());
//! assert!(session.poll(1_900).unwrap().is_some());
//! assert_eq!(session.status(), SaveStatus::Saved);
//!
//! assert!(session.undo());
//! assert!(session.codec().panels().is_empty());
//! ```

pub mod error;

pub mod project;
pub mod script;
pub mod session;
pub mod store;

// Re-exports for convenience
pub use error::{ToolkitError, ToolkitResult};
pub use project::{
    EditorSurface, ProjectSnapshot, ShotRow, SnapshotCodec, StoryboardPanel, SurfacePanel,
    SurfaceShot,
};
pub use script::{export_plain_text, ElementKind, ScriptElement};
pub use session::{
    History, LoadOutcome, ProjectSession, SaveOutcome, SaveStatus, SessionConfig, StatusLog,
    StatusSink,
};
pub use store::{FileStore, MemoryStore, PersistenceStore};

#[cfg(feature = "wasm")]
pub use session::JsProjectSession;
