//! Command handlers.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use prodkit::project::EXPORT_JSON_FILE_NAME;
use prodkit::script::EXPORT_TEXT_FILE_NAME;
use prodkit::{
    EditorSurface, FileStore, LoadOutcome, ProjectSession, SaveStatus, SessionConfig,
};

pub type CliSession = ProjectSession<EditorSurface, FileStore, fn(SaveStatus)>;

fn log_status(status: SaveStatus) {
    info!(%status, "status");
}

pub fn open_session(config: SessionConfig, store_dir: &Path) -> Result<CliSession> {
    let session = ProjectSession::with_config(
        config,
        EditorSurface::new(),
        FileStore::new(store_dir),
        log_status as fn(SaveStatus),
    )
    .context("Invalid session config")?;
    Ok(session)
}

fn load(session: &mut CliSession) -> Result<LoadOutcome> {
    let outcome = session
        .load_or_init()
        .context("Failed to load stored project")?;
    session.initialize_history();
    Ok(outcome)
}

pub fn init(session: &mut CliSession) -> Result<()> {
    let outcome = load(session)?;
    let path = session.store().path_for(&session.config().storage_key);
    match outcome {
        LoadOutcome::Restored => println!("Existing project at {}", path.display()),
        LoadOutcome::Created => println!("Created new project at {}", path.display()),
        LoadOutcome::Recovered => println!(
            "Stored project was unreadable; replaced with a new one at {}",
            path.display()
        ),
    }
    Ok(())
}

pub fn show(session: &mut CliSession, json: bool) -> Result<()> {
    load(session)?;
    if json {
        println!("{}", session.export_json()?);
        return Ok(());
    }

    let surface = session.codec();
    let elements = surface.script_elements();
    println!("Script lines:      {}", elements.len());
    println!("Storyboard panels: {}", surface.panels().len());
    println!("Shots:             {}", surface.shots().len());
    if let Some(heading) = elements
        .iter()
        .find(|e| e.kind() == Some(prodkit::ElementKind::SceneHeading))
    {
        println!("First scene:       {}", heading.text.trim());
    }
    Ok(())
}

pub fn import(session: &mut CliSession, file: &Path) -> Result<()> {
    let payload = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    load(session)?;
    session
        .import_json(&payload)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    println!("Imported {}", file.display());
    Ok(())
}

pub fn export_json(session: &mut CliSession, output: Option<PathBuf>) -> Result<()> {
    load(session)?;
    let output = output.unwrap_or_else(|| PathBuf::from(EXPORT_JSON_FILE_NAME));
    let json = session.export_json()?;
    std::fs::write(&output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}

pub fn export_text(session: &mut CliSession, output: Option<PathBuf>) -> Result<()> {
    load(session)?;
    let output = output.unwrap_or_else(|| PathBuf::from(EXPORT_TEXT_FILE_NAME));
    std::fs::write(&output, session.export_text())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}
