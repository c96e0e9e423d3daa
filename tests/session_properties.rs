//! End-to-end behavior of a project session over an in-memory store.

use prodkit::project::{ShotRow, StoryboardPanel, SurfacePanel, SurfaceShot};
use prodkit::script::parse_markup;
use prodkit::session::{SaveOutcome, DEFAULT_STORAGE_KEY};
use prodkit::{
    EditorSurface, ElementKind, FileStore, History, LoadOutcome, MemoryStore, PersistenceStore,
    ProjectSession, ProjectSnapshot, SaveStatus, SnapshotCodec, StatusLog, ToolkitError,
};
use uuid::Uuid;

type Session = ProjectSession<EditorSurface, MemoryStore, StatusLog>;

fn loaded_session() -> Session {
    let mut session =
        ProjectSession::new(EditorSurface::new(), MemoryStore::new(), StatusLog::new());
    session.load_or_init().unwrap();
    session.initialize_history();
    session
}

fn stored(session: &Session) -> ProjectSnapshot {
    ProjectSnapshot::from_json(session.store().get(DEFAULT_STORAGE_KEY).unwrap()).unwrap()
}

fn labelled(label: &str) -> ProjectSnapshot {
    ProjectSnapshot::new(format!("<div class=\"script-action\">{label}</div>"))
}

#[test]
fn test_burst_of_edits_writes_once_after_last_delay() {
    let mut session = loaded_session();
    let writes = session.store().write_count();

    let mut last = 0;
    for i in 0..10u64 {
        last = i * 140;
        session.edit(last, |surface| {
            surface.add_shot();
        });
    }

    for now in (last..last + 1_500).step_by(100) {
        assert_eq!(session.poll(now).unwrap(), None);
    }
    assert_eq!(session.store().write_count(), writes);

    assert_eq!(session.poll(last + 1_500).unwrap(), Some(SaveOutcome::Recorded));
    assert_eq!(session.store().write_count(), writes + 1);
    assert_eq!(stored(&session).shot_list.len(), 10);
}

#[test]
fn test_undo_does_not_record_after_idle_timer() {
    let mut session = loaded_session();
    session.edit(0, |surface| surface.set_script_markup("<div class=\"script-action\">one</div>"));
    session.poll(1_500).unwrap();
    session.edit(2_000, |surface| {
        surface.set_script_markup("<div class=\"script-action\">two</div>")
    });
    session.poll(3_500).unwrap();

    assert!(session.undo());
    let len = session.history().len();
    let cursor = session.history().cursor();

    // The surface change from the restore reaches the host as an edit.
    session.notify_edit(4_000);
    assert_eq!(session.poll(6_000).unwrap(), Some(SaveOutcome::RestoreEcho));

    assert_eq!(session.history().len(), len);
    assert_eq!(session.history().cursor(), cursor);
    assert!(session.can_redo());
    assert!(stored(&session).script_content.contains("one"));
}

#[test]
fn test_undo_to_entry_the_surface_rewrites_keeps_redo() {
    let mut session = loaded_session();
    session.edit(0, |surface| surface.set_script_markup(""));
    session.poll(1_500).unwrap();
    session.edit(2_000, |surface| {
        surface.set_script_markup("<div class=\"script-action\">two</div>")
    });
    session.poll(3_500).unwrap();

    assert!(session.undo());
    // Restoring an empty script shows the fallback lines instead.
    let shown = session.codec_mut().capture();
    assert_ne!(session.history().current(), Some(&shown));

    session.notify_edit(4_000);
    assert_eq!(session.poll(6_000).unwrap(), Some(SaveOutcome::RestoreEcho));
    assert_eq!(session.history().len(), 3);
    assert_eq!(session.history().cursor(), Some(1));
    assert!(session.can_redo());

    // A real edit afterwards is recorded and drops the redo entry.
    session.edit(7_000, |surface| {
        surface.add_panel();
    });
    assert_eq!(session.poll(8_500).unwrap(), Some(SaveOutcome::Recorded));
    assert_eq!(session.history().len(), 3);
    assert!(!session.can_redo());
}

#[test]
fn test_linear_history_prunes_redo_branch() {
    let mut history = History::default();
    history.record(labelled("A"));
    history.record(labelled("B"));
    history.record(labelled("C"));
    assert_eq!(history.cursor(), Some(2));

    history.undo();
    history.undo();
    assert_eq!(history.cursor(), Some(0));

    history.record(labelled("D"));
    let entries: Vec<_> = history.entries().cloned().collect();
    assert_eq!(entries, vec![labelled("A"), labelled("D")]);
    assert_eq!(history.cursor(), Some(1));
    assert!(!history.can_redo());
    assert!(history.redo().is_none());
}

#[test]
fn test_history_is_bounded_to_fifty() {
    let mut history = History::default();
    let recorded: Vec<_> = (0..60).map(|i| labelled(&format!("edit {i}"))).collect();
    for snapshot in &recorded {
        history.record(snapshot.clone());
    }

    assert_eq!(history.len(), 50);
    assert_eq!(history.entries().next(), Some(&recorded[10]));
    assert_eq!(history.cursor(), Some(49));
}

#[test]
fn test_duplicate_record_is_suppressed() {
    let mut history = History::default();
    let x = labelled("X");
    assert!(history.record(x.clone()));
    assert!(!history.record(x));
    assert_eq!(history.len(), 1);
    assert_eq!(history.cursor(), Some(0));
}

#[test]
fn test_capture_after_restore_round_trips() {
    let snapshot = ProjectSnapshot::new(
        "<div class=\"script-scene-heading\">EXT. PIER - NIGHT</div>\
         <div class=\"script-action\">Fog.</div>",
    )
    .with_panel(
        StoryboardPanel::new(1)
            .with_id(Uuid::new_v4())
            .with_image("data:image/jpeg;base64,/9j/4AAQ")
            .with_notes("High angle"),
    )
    .with_panel(StoryboardPanel::new(2).with_id(Uuid::new_v4()))
    .with_shot(
        ShotRow::new(1)
            .with_id(Uuid::new_v4())
            .with_scene("3")
            .with_type("CU")
            .with_description("Rope")
            .with_notes("Handheld"),
    );

    let mut surface = EditorSurface::new();
    surface.restore(&snapshot);
    assert_eq!(surface.capture(), snapshot);

    // Restoring again discards whatever the surface held before.
    surface.push_panel(SurfacePanel::default());
    surface.push_shot(SurfaceShot::default());
    surface.restore(&snapshot);
    assert_eq!(surface.capture(), snapshot);
}

#[test]
fn test_capture_assigns_ids_once() {
    let mut surface = EditorSurface::new();
    surface.push_panel(SurfacePanel {
        image_src: "https://example.com/frame.png".to_string(),
        ..Default::default()
    });

    let first = surface.capture();
    let second = surface.capture();
    assert_eq!(first, second);
    assert_eq!(first.storyboard_panels[0].panel_num, 1);
    assert!(first.storyboard_panels[0].image_data_url.is_empty());
}

#[test]
fn test_import_without_script_content_changes_nothing() {
    let mut session = loaded_session();
    session.edit(0, |surface| {
        surface.add_panel();
    });
    session.poll(1_500).unwrap();

    let surface_before = session.codec_mut().capture();
    let store_before = session.store().get(DEFAULT_STORAGE_KEY).map(str::to_string);
    let history_before: Vec<_> = session.history().entries().cloned().collect();
    let cursor_before = session.history().cursor();

    let payload = r#"{"storyboardPanels":[],"shotList":[]}"#;
    let err = session.import_json(payload).unwrap_err();
    assert!(matches!(err, ToolkitError::ImportFormatInvalid(_)));

    assert_eq!(session.status(), SaveStatus::Error);
    assert_eq!(session.codec_mut().capture(), surface_before);
    assert_eq!(session.store().get(DEFAULT_STORAGE_KEY).map(str::to_string), store_before);
    assert_eq!(session.history().entries().cloned().collect::<Vec<_>>(), history_before);
    assert_eq!(session.history().cursor(), cursor_before);
}

#[test]
fn test_first_load_writes_default_project() {
    let mut session =
        ProjectSession::new(EditorSurface::new(), MemoryStore::new(), StatusLog::new());
    assert_eq!(session.load_or_init().unwrap(), LoadOutcome::Created);

    let elements = parse_markup(session.codec().script_markup());
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].kind(), Some(ElementKind::SceneHeading));
    assert_eq!(elements[1].kind(), Some(ElementKind::Action));
    assert!(session.codec().panels().is_empty());
    assert!(session.codec().shots().is_empty());
    assert_eq!(session.status(), SaveStatus::Saved);

    let current = session.codec_mut().capture();
    assert_eq!(stored(&session), current);
}

#[test]
fn test_session_survives_reload_from_file_store() {
    let dir = tempfile::tempdir().unwrap();

    let mut session =
        ProjectSession::new(EditorSurface::new(), FileStore::new(dir.path()), StatusLog::new());
    session.load_or_init().unwrap();
    session.initialize_history();
    let id = session.edit(0, |surface| surface.add_shot());
    session
        .edit(100, |surface| {
            surface.update_shot(id, |shot| shot.description = "Crane up".to_string())
        })
        .unwrap();
    session.poll(1_600).unwrap();

    let raw = FileStore::new(dir.path()).read(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    assert!(raw.contains("\"description\":\"Crane up\""));

    let mut reopened =
        ProjectSession::new(EditorSurface::new(), FileStore::new(dir.path()), StatusLog::new());
    assert_eq!(reopened.load_or_init().unwrap(), LoadOutcome::Restored);
    assert_eq!(reopened.codec().shots()[0].id, Some(id));
    assert_eq!(reopened.codec().shots()[0].description, "Crane up");
}
