//! Boundary between the editable surface and the project document.

use super::model::ProjectSnapshot;

/// Converts the live editable surface into snapshots and back.
///
/// The session core never touches the surface directly; everything it knows
/// about the document passes through these two calls.
pub trait SnapshotCodec {
    /// Reads the surface into a fresh snapshot.
    ///
    /// Assigns an id to any panel or shot lacking one, keeps a panel image only
    /// when it is an embedded-image data URI, and numbers panels and shots by
    /// position. Never fails; missing fields degrade to empty values.
    fn capture(&mut self) -> ProjectSnapshot;

    /// Replaces the whole surface with `snapshot`.
    ///
    /// An empty script body is replaced by a default scene heading plus an
    /// empty action line. Prior panel and shot state is discarded entirely.
    fn restore(&mut self, snapshot: &ProjectSnapshot);
}

impl<C: SnapshotCodec + ?Sized> SnapshotCodec for Box<C> {
    fn capture(&mut self) -> ProjectSnapshot {
        (**self).capture()
    }

    fn restore(&mut self, snapshot: &ProjectSnapshot) {
        (**self).restore(snapshot)
    }
}
