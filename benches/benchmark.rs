//! Benchmarks for history, capture/restore and the save path.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use prodkit::project::{ShotRow, StoryboardPanel};
use prodkit::{
    export_plain_text, EditorSurface, History, MemoryStore, ProjectSession, ProjectSnapshot,
    SnapshotCodec, StatusLog,
};

fn project(panels: usize, shots: usize, lines: usize) -> ProjectSnapshot {
    let mut script = String::new();
    for i in 0..lines {
        match i % 4 {
            0 => script.push_str(&format!(
                "<div class=\"script-scene-heading\">INT. ROOM {i} - DAY</div>"
            )),
            1 => script.push_str("<div class=\"script-character\">MARA</div>"),
            2 => script.push_str("<div class=\"script-dialog\">We should go.</div>"),
            _ => script.push_str("<div class=\"script-action\">Rain on the window.</div>"),
        }
    }

    let mut snapshot = ProjectSnapshot::new(script);
    for i in 0..panels {
        snapshot = snapshot.with_panel(
            StoryboardPanel::new(i as u32 + 1)
                .with_image("data:image/png;base64,iVBORw0KGgo=")
                .with_notes("Close on hands"),
        );
    }
    for i in 0..shots {
        snapshot = snapshot.with_shot(
            ShotRow::new(i as u32 + 1)
                .with_scene("1")
                .with_type("WIDE")
                .with_description("Establishing"),
        );
    }
    snapshot
}

fn bench_history_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("history_record");

    for size in [0usize, 10, 50].iter() {
        let snapshots: Vec<ProjectSnapshot> =
            (0..100).map(|i| project(*size, *size, i % 7 + 1)).collect();

        group.bench_with_input(BenchmarkId::new("entities", size), size, |b, _| {
            b.iter(|| {
                let mut history = History::default();
                for snapshot in &snapshots {
                    history.record(black_box(snapshot.clone()));
                }
                black_box(history.len())
            })
        });
    }

    group.finish();
}

fn bench_undo_redo(c: &mut Criterion) {
    c.bench_function("undo_redo_full_stack", |b| {
        let mut history = History::default();
        for i in 0..50 {
            history.record(project(1, 1, i + 1));
        }
        b.iter(|| {
            while history.undo().is_some() {}
            while history.redo().is_some() {}
        })
    });
}

fn bench_capture_restore(c: &mut Criterion) {
    let mut group = c.benchmark_group("capture_restore");

    for size in [1usize, 20, 100].iter() {
        let snapshot = project(*size, *size, *size);
        let mut surface = EditorSurface::new();

        group.bench_with_input(BenchmarkId::new("entities", size), size, |b, _| {
            b.iter(|| {
                surface.restore(black_box(&snapshot));
                black_box(surface.capture())
            })
        });
    }

    group.finish();
}

fn bench_save(c: &mut Criterion) {
    c.bench_function("save_now", |b| {
        let mut session =
            ProjectSession::new(EditorSurface::new(), MemoryStore::new(), StatusLog::new());
        session.codec_mut().restore(&project(20, 20, 40));
        b.iter(|| {
            session.notify_edit(0);
            black_box(session.save_now().unwrap())
        })
    });
}

fn bench_export_text(c: &mut Criterion) {
    let snapshot = project(0, 0, 400);
    c.bench_function("export_plain_text", |b| {
        b.iter(|| black_box(export_plain_text(black_box(&snapshot))))
    });
}

criterion_group!(
    benches,
    bench_history_record,
    bench_undo_redo,
    bench_capture_restore,
    bench_save,
    bench_export_text,
);
criterion_main!(benches);
