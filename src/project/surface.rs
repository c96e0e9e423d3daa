//! In-memory editable surface.
//!
//! `EditorSurface` holds what the user is editing: the script markup, the
//! storyboard panels and the shot rows. It implements `SnapshotCodec`, so a
//! session can drive it exactly as it would drive a browser surface.
//! Panels and shots carry no numbers; positions are derived at capture.

use uuid::Uuid;

use super::codec::SnapshotCodec;
use super::model::{
    is_image_data_uri, ProjectSnapshot, ShotRow, StoryboardPanel, EMPTY_SCRIPT_FALLBACK,
};
use crate::error::{ToolkitError, ToolkitResult};
use crate::script::{self, suggest, ElementKind, ElementSpan, ScriptElement};

/// A storyboard panel as shown on the surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfacePanel {
    /// Unset until the panel is first captured or explicitly created.
    pub id: Option<Uuid>,
    /// Whatever the image slot currently shows; only data URIs are captured.
    pub image_src: String,
    pub notes: String,
}

/// A shot-list row as shown on the surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceShot {
    pub id: Option<Uuid>,
    pub scene_num: String,
    pub shot_type: String,
    pub description: String,
    pub notes: String,
}

/// The editable surface of one project.
#[derive(Debug, Clone, Default)]
pub struct EditorSurface {
    script_markup: String,
    panels: Vec<SurfacePanel>,
    shots: Vec<SurfaceShot>,
}

impl EditorSurface {
    /// Creates an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // SCRIPT
    // =========================================================================

    pub fn script_markup(&self) -> &str {
        &self.script_markup
    }

    /// Replaces the script body markup wholesale.
    pub fn set_script_markup(&mut self, markup: impl Into<String>) {
        self.script_markup = markup.into();
    }

    /// The script body split into lines.
    pub fn script_elements(&self) -> Vec<ScriptElement> {
        script::parse_markup(&self.script_markup)
    }

    /// Replaces the script body with `elements`.
    pub fn set_script_elements(&mut self, elements: &[ScriptElement]) {
        self.script_markup = script::render_markup(elements);
    }

    /// The line at `index` with its position in the markup.
    fn element_span(&self, index: usize) -> ToolkitResult<ElementSpan> {
        let mut spans = script::parse_spans(&self.script_markup);
        let length = spans.len();
        if index >= length {
            return Err(ToolkitError::index_out_of_bounds(index, length));
        }
        Ok(spans.swap_remove(index))
    }

    /// Rewrites line `index` as plain `element`. Other lines keep their markup.
    fn replace_element(&mut self, index: usize, element: ScriptElement) -> ToolkitResult<()> {
        let span = self.element_span(index)?;
        let rendered = script::render_markup(std::slice::from_ref(&element));
        self.script_markup.replace_range(span.outer, &rendered);
        Ok(())
    }

    /// Inserts an empty line after `after` (or at the end when `None`), with
    /// the kind Enter produces. Returns the index of the new line.
    pub fn insert_element_after(&mut self, after: Option<usize>) -> ToolkitResult<usize> {
        let (index, at, kind) = match after {
            Some(i) => {
                let span = self.element_span(i)?;
                (i + 1, span.outer.end, ElementKind::next_on_enter(span.element.kind()))
            }
            None => {
                let count = script::parse_spans(&self.script_markup).len();
                (count, self.script_markup.len(), ElementKind::next_on_enter(None))
            }
        };
        let rendered = script::render_markup(&[ScriptElement::new(kind, "")]);
        self.script_markup.insert_str(at, &rendered);
        Ok(index)
    }

    /// Tab on a line: cycles the kind of a blank line. Lines with text are
    /// left alone. Returns whether the kind changed.
    pub fn cycle_element_kind(&mut self, index: usize) -> ToolkitResult<bool> {
        let span = self.element_span(index)?;
        if !span.element.is_blank() {
            return Ok(false);
        }
        self.set_element_kind(index, ElementKind::next_in_cycle(span.element.kind()))?;
        Ok(true)
    }

    /// Sets the kind of one line regardless of its content. The line's inner
    /// markup is kept.
    pub fn set_element_kind(&mut self, index: usize, kind: ElementKind) -> ToolkitResult<()> {
        let span = self.element_span(index)?;
        let mut element = span.element;
        element.set_kind(kind);
        let rendered = format!(
            "{}{}</div>",
            script::render_open_tag(&element.class_name),
            &self.script_markup[span.inner]
        );
        self.script_markup.replace_range(span.outer, &rendered);
        Ok(())
    }

    /// Replaces the text of one line.
    pub fn set_element_text(&mut self, index: usize, text: impl Into<String>) -> ToolkitResult<()> {
        let mut element = self.element_span(index)?.element;
        element.text = text.into();
        self.replace_element(index, element)
    }

    /// Autocomplete candidates for the word being typed on line `index`.
    pub fn suggestions_for(&self, index: usize) -> ToolkitResult<Vec<String>> {
        let elements = self.script_elements();
        let element = elements
            .get(index)
            .ok_or_else(|| ToolkitError::index_out_of_bounds(index, elements.len()))?;
        match element.kind() {
            Some(kind) if suggest::supports_autocomplete(Some(kind)) => {
                Ok(suggest::suggestions(&elements, kind, &element.text))
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Completes the word being typed on line `index` with `value`.
    pub fn accept_suggestion(&mut self, index: usize, value: &str) -> ToolkitResult<()> {
        let mut element = self.element_span(index)?.element;
        let word = suggest::current_word(&element.text).to_string();
        element.text = suggest::apply_suggestion(&element.text, &word, value);
        self.replace_element(index, element)
    }

    // =========================================================================
    // STORYBOARD PANELS
    // =========================================================================

    pub fn panels(&self) -> &[SurfacePanel] {
        &self.panels
    }

    /// Appends an empty panel with a fresh id.
    pub fn add_panel(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        self.panels.push(SurfacePanel {
            id: Some(id),
            ..Default::default()
        });
        id
    }

    /// Appends a panel as-is, including one without an id.
    pub fn push_panel(&mut self, panel: SurfacePanel) {
        self.panels.push(panel);
    }

    pub fn delete_panel(&mut self, id: Uuid) -> ToolkitResult<()> {
        let index = self.panel_index(id)?;
        self.panels.remove(index);
        Ok(())
    }

    /// Moves a panel from one position to another (drag reorder).
    pub fn move_panel(&mut self, from: usize, to: usize) -> ToolkitResult<()> {
        move_item(&mut self.panels, from, to)
    }

    pub fn set_panel_notes(&mut self, id: Uuid, notes: impl Into<String>) -> ToolkitResult<()> {
        let index = self.panel_index(id)?;
        self.panels[index].notes = notes.into();
        Ok(())
    }

    pub fn set_panel_image(&mut self, id: Uuid, image_src: impl Into<String>) -> ToolkitResult<()> {
        let index = self.panel_index(id)?;
        self.panels[index].image_src = image_src.into();
        Ok(())
    }

    pub fn clear_panel_image(&mut self, id: Uuid) -> ToolkitResult<()> {
        self.set_panel_image(id, String::new())
    }

    fn panel_index(&self, id: Uuid) -> ToolkitResult<usize> {
        self.panels
            .iter()
            .position(|panel| panel.id == Some(id))
            .ok_or(ToolkitError::EntityNotFound(id))
    }

    // =========================================================================
    // SHOT LIST
    // =========================================================================

    pub fn shots(&self) -> &[SurfaceShot] {
        &self.shots
    }

    /// Appends an empty shot row with a fresh id.
    pub fn add_shot(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        self.shots.push(SurfaceShot {
            id: Some(id),
            ..Default::default()
        });
        id
    }

    /// Appends a shot row as-is, including one without an id.
    pub fn push_shot(&mut self, shot: SurfaceShot) {
        self.shots.push(shot);
    }

    pub fn delete_shot(&mut self, id: Uuid) -> ToolkitResult<()> {
        let index = self.shot_index(id)?;
        self.shots.remove(index);
        Ok(())
    }

    /// Moves a shot row from one position to another (drag reorder).
    pub fn move_shot(&mut self, from: usize, to: usize) -> ToolkitResult<()> {
        move_item(&mut self.shots, from, to)
    }

    /// Edits the fields of one shot row.
    pub fn update_shot<F>(&mut self, id: Uuid, f: F) -> ToolkitResult<()>
    where
        F: FnOnce(&mut SurfaceShot),
    {
        let index = self.shot_index(id)?;
        f(&mut self.shots[index]);
        Ok(())
    }

    fn shot_index(&self, id: Uuid) -> ToolkitResult<usize> {
        self.shots
            .iter()
            .position(|shot| shot.id == Some(id))
            .ok_or(ToolkitError::EntityNotFound(id))
    }
}

/// Moves `items[from]` so it lands before the item currently at `to`
/// (`to == len` appends).
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> ToolkitResult<()> {
    let len = items.len();
    if from >= len {
        return Err(ToolkitError::index_out_of_bounds(from, len));
    }
    if to > len {
        return Err(ToolkitError::index_out_of_bounds(to, len));
    }
    if from != to {
        let item = items.remove(from);
        let adjusted_to = if from < to { to - 1 } else { to };
        items.insert(adjusted_to, item);
    }
    Ok(())
}

impl SnapshotCodec for EditorSurface {
    fn capture(&mut self) -> ProjectSnapshot {
        let storyboard_panels = self
            .panels
            .iter_mut()
            .enumerate()
            .map(|(index, panel)| StoryboardPanel {
                id: *panel.id.get_or_insert_with(Uuid::new_v4),
                panel_num: index as u32 + 1,
                image_data_url: if is_image_data_uri(&panel.image_src) {
                    panel.image_src.clone()
                } else {
                    String::new()
                },
                notes: panel.notes.clone(),
            })
            .collect();

        let shot_list = self
            .shots
            .iter_mut()
            .enumerate()
            .map(|(index, shot)| ShotRow {
                id: *shot.id.get_or_insert_with(Uuid::new_v4),
                shot_num: index as u32 + 1,
                scene_num: shot.scene_num.clone(),
                shot_type: shot.shot_type.clone(),
                description: shot.description.clone(),
                notes: shot.notes.clone(),
            })
            .collect();

        ProjectSnapshot {
            script_content: self.script_markup.clone(),
            storyboard_panels,
            shot_list,
        }
    }

    fn restore(&mut self, snapshot: &ProjectSnapshot) {
        self.script_markup = if snapshot.script_content.is_empty() {
            EMPTY_SCRIPT_FALLBACK.to_string()
        } else {
            snapshot.script_content.clone()
        };

        self.panels = snapshot
            .storyboard_panels
            .iter()
            .map(|panel| SurfacePanel {
                id: Some(panel.id),
                image_src: panel.image_data_url.clone(),
                notes: panel.notes.clone(),
            })
            .collect();

        self.shots = snapshot
            .shot_list
            .iter()
            .map(|shot| SurfaceShot {
                id: Some(shot.id),
                scene_num: shot.scene_num.clone(),
                shot_type: shot.shot_type.clone(),
                description: shot.description.clone(),
                notes: shot.notes.clone(),
            })
            .collect();
    }
}
