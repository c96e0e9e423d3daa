//! Project document module.
//!
//! This module provides:
//! - `model`: The `ProjectSnapshot` value (script body, storyboard panels, shot list)
//! - `codec`: The `SnapshotCodec` boundary between an editable surface and snapshots
//! - `surface`: `EditorSurface`, an in-memory editable surface implementing the codec

pub mod codec;
pub mod model;
pub mod surface;

pub use codec::SnapshotCodec;
pub use model::*;
pub use surface::{EditorSurface, SurfacePanel, SurfaceShot};
