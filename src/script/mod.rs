//! Screenplay script body.
//!
//! This module provides:
//! - `element`: Element kinds and the Enter/Tab transitions between them
//! - `markup`: Reader/writer for the script-body markup
//! - `export`: Fixed-indentation plain-text screenplay export
//! - `suggest`: Autocomplete for character cues and scene headings

pub mod element;
pub mod export;
pub mod markup;
pub mod suggest;

pub use element::{ElementKind, ScriptElement};
pub use export::{export_plain_text, EXPORT_TEXT_FILE_NAME};
pub use markup::{parse_markup, parse_spans, render_markup, render_open_tag, ElementSpan};
