//! WASM bindings for the project session.
//!
//! The browser supplies three collaborators as plain JS values:
//! - a surface object with `capture()` returning a project object and
//!   `restore(project)`. Panels and shots captured without an id are given
//!   one, and the surface is restored once so it keeps those ids.
//! - a store object with `read(key)` returning a string or null, and
//!   `write(key, value)` which throws on failure
//! - a status callback receiving one of `idle`, `saving`, `saved`,
//!   `imported`, `error` or `offline`

use js_sys::{Array, Function, Reflect};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::config::SessionConfig;
use super::manager::{LoadOutcome, ProjectSession, SaveOutcome};
use super::status::{SaveStatus, StatusSink};
use crate::error::{ToolkitError, ToolkitResult};
use crate::project::{ProjectSnapshot, SnapshotCodec, EXPORT_JSON_FILE_NAME};
use crate::script::{self, suggest, ElementKind, EXPORT_TEXT_FILE_NAME};
use crate::session::autosave::SaveToken;
use crate::store::PersistenceStore;

fn to_js_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&Serializer::new().serialize_maps_as_objects(true))
}

fn js_error_message(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// Looks up `name` on `target` as a callable.
fn method(target: &JsValue, name: &str) -> Result<Function, JsValue> {
    Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into::<Function>()
        .map_err(|_| JsValue::from_str(&format!("`{name}` is not a function")))
}

// =============================================================================
// ERROR CONVERSION
// =============================================================================

impl From<ToolkitError> for JsValue {
    fn from(err: ToolkitError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}

/// Helper macro for Result conversion
macro_rules! js_result {
    ($expr:expr) => {
        $expr.map_err(|e: ToolkitError| JsValue::from(e))
    };
}

// =============================================================================
// JS COLLABORATORS
// =============================================================================

/// Surface implemented in JavaScript.
///
/// A capture that throws or returns something that is not a project falls
/// back to the last good capture, so capturing never fails.
struct JsCodec {
    target: JsValue,
    capture_fn: Function,
    restore_fn: Function,
    last_capture: ProjectSnapshot,
}

impl JsCodec {
    fn new(target: JsValue) -> Result<Self, JsValue> {
        Ok(Self {
            capture_fn: method(&target, "capture")?,
            restore_fn: method(&target, "restore")?,
            target,
            last_capture: ProjectSnapshot::default(),
        })
    }

    /// Calls the JS `capture` and reports whether any entity lacked an id.
    fn capture_js(&self) -> Result<(ProjectSnapshot, bool), String> {
        let value = self
            .capture_fn
            .call0(&self.target)
            .map_err(|e| js_error_message(&e))?;
        let value: serde_json::Value = from_value(value).map_err(|e| e.to_string())?;
        ProjectSnapshot::from_capture_value(value).map_err(|e| e.to_string())
    }
}

impl SnapshotCodec for JsCodec {
    fn capture(&mut self) -> ProjectSnapshot {
        match self.capture_js() {
            Ok((mut snapshot, ids_missing)) => {
                snapshot.normalize();
                if ids_missing {
                    debug!("captured entities without ids, writing ids back to the surface");
                    self.restore(&snapshot);
                }
                self.last_capture = snapshot.clone();
                snapshot
            }
            Err(message) => {
                warn!(error = %message, "surface capture failed, reusing last capture");
                self.last_capture.clone()
            }
        }
    }

    fn restore(&mut self, snapshot: &ProjectSnapshot) {
        let result = to_js_value(snapshot)
            .map_err(|e| e.to_string())
            .and_then(|value| {
                self.restore_fn
                    .call1(&self.target, &value)
                    .map_err(|e| js_error_message(&e))
            });
        match result {
            Ok(_) => self.last_capture = snapshot.clone(),
            Err(message) => warn!(error = %message, "surface restore failed"),
        }
    }
}

/// Key-value store implemented in JavaScript, usually over `localStorage`.
struct JsStore {
    target: JsValue,
    read_fn: Function,
    write_fn: Function,
}

impl JsStore {
    fn new(target: JsValue) -> Result<Self, JsValue> {
        Ok(Self {
            read_fn: method(&target, "read")?,
            write_fn: method(&target, "write")?,
            target,
        })
    }
}

impl PersistenceStore for JsStore {
    fn read(&self, key: &str) -> ToolkitResult<Option<String>> {
        let value = self
            .read_fn
            .call1(&self.target, &JsValue::from_str(key))
            .map_err(|e| ToolkitError::store_unavailable(js_error_message(&e)))?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        value
            .as_string()
            .map(Some)
            .ok_or_else(|| ToolkitError::store_unavailable("store returned a non-string value"))
    }

    fn write(&mut self, key: &str, value: &str) -> ToolkitResult<()> {
        self.write_fn
            .call2(&self.target, &JsValue::from_str(key), &JsValue::from_str(value))
            .map(|_| ())
            .map_err(|e| ToolkitError::store_unavailable(js_error_message(&e)))
    }
}

struct JsStatusSink {
    callback: Function,
}

impl StatusSink for JsStatusSink {
    fn report(&mut self, status: SaveStatus) {
        if let Err(err) = self
            .callback
            .call1(&JsValue::NULL, &JsValue::from_str(status.as_str()))
        {
            warn!(error = %js_error_message(&err), "status callback threw");
        }
    }
}

fn load_outcome_str(outcome: LoadOutcome) -> &'static str {
    match outcome {
        LoadOutcome::Restored => "restored",
        LoadOutcome::Created => "created",
        LoadOutcome::Recovered => "recovered",
    }
}

fn save_outcome_str(outcome: SaveOutcome) -> &'static str {
    match outcome {
        SaveOutcome::Recorded => "recorded",
        SaveOutcome::Unchanged => "unchanged",
        SaveOutcome::RestoreEcho => "restore-echo",
        SaveOutcome::Stale => "stale",
    }
}

// =============================================================================
// MAIN WRAPPER TYPE
// =============================================================================

/// JavaScript-friendly wrapper around ProjectSession.
///
/// # Example (JavaScript)
/// ```js
/// const session = new JsProjectSession(surface, {
///   read: (key) => localStorage.getItem(key),
///   write: (key, value) => localStorage.setItem(key, value),
/// }, (status) => badge.dataset.status = status);
/// session.loadOrInit();
/// requestAnimationFrame(() => session.initializeHistory());
///
/// editor.addEventListener('input', () => {
///   const token = session.notifyEdit(Date.now());
///   setTimeout(() => session.fire(token), session.autosaveDelayMs());
/// });
/// ```
#[wasm_bindgen]
pub struct JsProjectSession {
    inner: ProjectSession<JsCodec, JsStore, JsStatusSink>,
}

#[wasm_bindgen]
impl JsProjectSession {
    /// Creates a session with the default key, delay and history limit.
    #[wasm_bindgen(constructor)]
    pub fn new(
        surface: JsValue,
        store: JsValue,
        on_status: Function,
    ) -> Result<JsProjectSession, JsValue> {
        Ok(JsProjectSession {
            inner: ProjectSession::new(
                JsCodec::new(surface)?,
                JsStore::new(store)?,
                JsStatusSink { callback: on_status },
            ),
        })
    }

    /// Creates a session from a config object such as
    /// `{ storage_key: "...", autosave_delay_ms: 1500, history_limit: 50 }`.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(
        config: JsValue,
        surface: JsValue,
        store: JsValue,
        on_status: Function,
    ) -> Result<JsProjectSession, JsValue> {
        let config: SessionConfig = from_value(config)?;
        let inner = js_result!(ProjectSession::with_config(
            config,
            JsCodec::new(surface)?,
            JsStore::new(store)?,
            JsStatusSink { callback: on_status },
        ))?;
        Ok(JsProjectSession { inner })
    }

    /// Loads the stored project onto the surface. Returns `restored`,
    /// `created` or `recovered`.
    #[wasm_bindgen(js_name = loadOrInit)]
    pub fn load_or_init(&mut self) -> Result<String, JsValue> {
        let outcome = js_result!(self.inner.load_or_init())?;
        Ok(load_outcome_str(outcome).to_string())
    }

    #[wasm_bindgen(js_name = initializeHistory)]
    pub fn initialize_history(&mut self) -> bool {
        self.inner.initialize_history()
    }

    /// Reports `saving` and re-arms the autosave. Returns the token to pass
    /// to `fire` once the delay elapses.
    #[wasm_bindgen(js_name = notifyEdit)]
    pub fn notify_edit(&mut self, now_ms: f64) -> f64 {
        self.inner.notify_edit(now_ms as u64).token.id() as f64
    }

    #[wasm_bindgen(js_name = autosaveDelayMs)]
    pub fn autosave_delay_ms(&self) -> f64 {
        self.inner.config().autosave_delay_ms as f64
    }

    /// Runs the save armed with `token`; stale tokens return `stale`.
    pub fn fire(&mut self, token: f64) -> Result<String, JsValue> {
        let outcome = js_result!(self.inner.fire(SaveToken::from_id(token as u64)))?;
        Ok(save_outcome_str(outcome).to_string())
    }

    /// Runs the pending save if it is due at `now_ms`.
    pub fn poll(&mut self, now_ms: f64) -> Result<Option<String>, JsValue> {
        let outcome = js_result!(self.inner.poll(now_ms as u64))?;
        Ok(outcome.map(|o| save_outcome_str(o).to_string()))
    }

    #[wasm_bindgen(js_name = saveNow)]
    pub fn save_now(&mut self) -> Result<String, JsValue> {
        let outcome = js_result!(self.inner.save_now())?;
        Ok(save_outcome_str(outcome).to_string())
    }

    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    #[wasm_bindgen(js_name = historyLength)]
    pub fn history_length(&self) -> usize {
        self.inner.history().len()
    }

    /// Cursor into history, -1 while empty.
    #[wasm_bindgen(js_name = historyCursor)]
    pub fn history_cursor(&self) -> i32 {
        self.inner
            .history()
            .cursor()
            .map_or(-1, |cursor| cursor as i32)
    }

    pub fn status(&self) -> String {
        self.inner.status().as_str().to_string()
    }

    #[wasm_bindgen(js_name = markOffline)]
    pub fn mark_offline(&mut self) {
        self.inner.mark_offline()
    }

    /// Replaces the project with the contents of a project file.
    #[wasm_bindgen(js_name = importJson)]
    pub fn import_json(&mut self, payload: &str) -> Result<(), JsValue> {
        js_result!(self.inner.import_json(payload))
    }

    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&mut self) -> Result<String, JsValue> {
        js_result!(self.inner.export_json())
    }

    #[wasm_bindgen(js_name = exportText)]
    pub fn export_text(&mut self) -> String {
        self.inner.export_text()
    }
}

// =============================================================================
// SCRIPT HELPERS
// =============================================================================

/// Class name of the element Enter creates after an element with `class_attr`.
#[wasm_bindgen(js_name = nextKindOnEnter)]
pub fn next_kind_on_enter(class_attr: &str) -> String {
    ElementKind::next_on_enter(ElementKind::from_class_attr(class_attr))
        .class_name()
        .to_string()
}

/// Class name Tab switches an empty element with `class_attr` to.
#[wasm_bindgen(js_name = nextKindInCycle)]
pub fn next_kind_in_cycle(class_attr: &str) -> String {
    ElementKind::next_in_cycle(ElementKind::from_class_attr(class_attr))
        .class_name()
        .to_string()
}

/// Autocomplete values for `text` typed into an element with `class_attr`.
#[wasm_bindgen(js_name = scriptSuggestions)]
pub fn script_suggestions(script_markup: &str, class_attr: &str, text: &str) -> Array {
    let Some(kind) = ElementKind::from_class_attr(class_attr)
        .filter(|&kind| suggest::supports_autocomplete(Some(kind)))
    else {
        return Array::new();
    };
    let elements = script::parse_markup(script_markup);
    suggest::suggestions(&elements, kind, text)
        .into_iter()
        .map(JsValue::from)
        .collect()
}

#[wasm_bindgen(js_name = exportJsonFileName)]
pub fn export_json_file_name() -> String {
    EXPORT_JSON_FILE_NAME.to_string()
}

#[wasm_bindgen(js_name = exportTextFileName)]
pub fn export_text_file_name() -> String {
    EXPORT_TEXT_FILE_NAME.to_string()
}
