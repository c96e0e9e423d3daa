//! Data models for the project document.
//!
//! A `ProjectSnapshot` is the unit stored by the history engine and the
//! persistence store. Field names serialize to the camelCase layout used by
//! the browser and by exported project files.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{ToolkitError, ToolkitResult};

/// Script body of a freshly created project.
pub const NEW_PROJECT_SCRIPT: &str =
    "<div class=\"script-scene-heading\">INT. NEW PROJECT - DAY</div>\
     <div class=\"script-action\">Start writing here...</div>";

/// Script body substituted when a snapshot with an empty script is restored.
pub const EMPTY_SCRIPT_FALLBACK: &str =
    "<div class=\"script-scene-heading\">SCENE 1</div><div class=\"script-action\"></div>";

/// File name offered for JSON project exports.
pub const EXPORT_JSON_FILE_NAME: &str = "production-project.json";

/// Key a payload must carry to be accepted as a project file.
const SCRIPT_CONTENT_KEY: &str = "scriptContent";

/// Treats an explicit JSON `null` like a missing value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Returns true if `value` is a well-formed embedded-image data URI
/// (`data:image/<subtype>[;params],<payload>`).
pub fn is_image_data_uri(value: &str) -> bool {
    let Some(rest) = value.strip_prefix("data:image/") else {
        return false;
    };
    let Some((header, _payload)) = rest.split_once(',') else {
        return false;
    };
    let subtype = header.split(';').next().unwrap_or_default();
    !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

// =============================================================================
// DOCUMENT ROOT
// =============================================================================

/// Full document state at one instant: script body, storyboard, shot list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    /// Serialized rich-text markup of the script body. Required in project files.
    #[serde(deserialize_with = "null_as_default")]
    pub script_content: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub storyboard_panels: Vec<StoryboardPanel>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub shot_list: Vec<ShotRow>,
}

impl ProjectSnapshot {
    /// Creates a snapshot with the given script body and no panels or shots.
    pub fn new(script_content: impl Into<String>) -> Self {
        Self {
            script_content: script_content.into(),
            ..Default::default()
        }
    }

    /// The document a brand-new project starts from.
    pub fn new_project() -> Self {
        Self::new(NEW_PROJECT_SCRIPT)
    }

    /// Builder: Append a storyboard panel.
    pub fn with_panel(mut self, panel: StoryboardPanel) -> Self {
        self.storyboard_panels.push(panel);
        self
    }

    /// Builder: Append a shot row.
    pub fn with_shot(mut self, shot: ShotRow) -> Self {
        self.shot_list.push(shot);
        self
    }

    /// Rewrites `panel_num` / `shot_num` as dense 1-based positions.
    pub fn renumber(&mut self) {
        for (index, panel) in self.storyboard_panels.iter_mut().enumerate() {
            panel.panel_num = index as u32 + 1;
        }
        for (index, shot) in self.shot_list.iter_mut().enumerate() {
            shot.shot_num = index as u32 + 1;
        }
    }

    /// Renumbers and blanks any panel image that is not an embedded-image
    /// data URI, bringing a snapshot from an outside source in line with what
    /// a capture produces.
    pub fn normalize(&mut self) {
        self.renumber();
        for panel in &mut self.storyboard_panels {
            if !is_image_data_uri(&panel.image_data_url) {
                panel.image_data_url.clear();
            }
        }
    }

    /// Compact JSON, the form written to the persistence store.
    pub fn to_json(&self) -> ToolkitResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Pretty-printed JSON, the form offered as an export file.
    pub fn to_pretty_json(&self) -> ToolkitResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a stored snapshot. Panels and shots without an id get a fresh one.
    pub fn from_json(json: &str) -> ToolkitResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a project captured from a foreign surface.
    ///
    /// Panels and shots whose `id` is missing, blank or not a string get a
    /// fresh one. The flag is true when any did, meaning the surface should be
    /// told the new ids.
    pub fn from_capture_value(mut value: serde_json::Value) -> ToolkitResult<(Self, bool)> {
        let mut assigned = false;
        for key in ["storyboardPanels", "shotList"] {
            let Some(items) = value.get_mut(key).and_then(serde_json::Value::as_array_mut) else {
                continue;
            };
            for item in items.iter_mut().filter_map(serde_json::Value::as_object_mut) {
                let missing = item
                    .get("id")
                    .and_then(serde_json::Value::as_str)
                    .map_or(true, str::is_empty);
                if missing {
                    item.remove("id");
                    assigned = true;
                }
            }
        }
        Ok((serde_json::from_value(value)?, assigned))
    }

    /// Parses a user-supplied project file.
    ///
    /// Malformed JSON is a `Parse` error; well-formed JSON without a
    /// `scriptContent` key (an empty string is fine) is `ImportFormatInvalid`.
    pub fn parse_import(payload: &str) -> ToolkitResult<Self> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        let has_script = value
            .as_object()
            .is_some_and(|map| map.contains_key(SCRIPT_CONTENT_KEY));
        if !has_script {
            return Err(ToolkitError::import_format_invalid(format!(
                "missing `{SCRIPT_CONTENT_KEY}`"
            )));
        }
        Ok(serde_json::from_value(value)?)
    }
}

// =============================================================================
// STORYBOARD PANEL
// =============================================================================

/// One storyboard panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardPanel {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// 1-based position, recomputed on every capture.
    #[serde(default)]
    pub panel_num: u32,
    /// Embedded image data URI, or empty.
    #[serde(rename = "imageDataURL", default, deserialize_with = "null_as_default")]
    pub image_data_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
}

impl StoryboardPanel {
    /// Creates an empty panel with a fresh id at the given position.
    pub fn new(panel_num: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            panel_num,
            image_data_url: String::new(),
            notes: String::new(),
        }
    }

    /// Builder: Set id.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Builder: Set image data URI.
    pub fn with_image(mut self, image_data_url: impl Into<String>) -> Self {
        self.image_data_url = image_data_url.into();
        self
    }

    /// Builder: Set notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

// =============================================================================
// SHOT ROW
// =============================================================================

/// One row of the shot list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShotRow {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// 1-based position, recomputed on every capture.
    #[serde(default)]
    pub shot_num: u32,
    /// Free-form scene label such as "1A".
    #[serde(default, deserialize_with = "null_as_default")]
    pub scene_num: String,
    /// Free-form shot type such as "MCU" or "WS".
    #[serde(default, deserialize_with = "null_as_default")]
    pub shot_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
}

impl ShotRow {
    /// Creates an empty shot row with a fresh id at the given position.
    pub fn new(shot_num: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            shot_num,
            scene_num: String::new(),
            shot_type: String::new(),
            description: String::new(),
            notes: String::new(),
        }
    }

    /// Builder: Set id.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Builder: Set scene number.
    pub fn with_scene(mut self, scene_num: impl Into<String>) -> Self {
        self.scene_num = scene_num.into();
        self
    }

    /// Builder: Set shot type.
    pub fn with_type(mut self, shot_type: impl Into<String>) -> Self {
        self.shot_type = shot_type.into();
        self
    }

    /// Builder: Set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: Set notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
