//! CLI tool for inspecting and moving projects in a file-backed store.
//!
//! Usage:
//!   prodkit [--store-dir DIR] [--config FILE] <init|show|import|export|export-txt>

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;

use prodkit::SessionConfig;

#[derive(Parser, Debug)]
#[command(
    name = "prodkit",
    about = "Manage a pre-production project stored on disk",
    version
)]
struct Args {
    /// Directory holding the stored project (defaults to the user data dir)
    #[arg(long, env = "PRODKIT_STORE_DIR")]
    store_dir: Option<PathBuf>,

    /// TOML file with session settings
    #[arg(long, env = "PRODKIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the stored project, creating a new one if none exists
    Init,
    /// Print a summary of the stored project
    Show {
        /// Print the full project JSON instead of a summary
        #[arg(long, default_value = "false")]
        json: bool,
    },
    /// Replace the stored project with a project file
    Import {
        /// Project JSON file to import
        file: PathBuf,
    },
    /// Write the project as a JSON file
    Export {
        /// Output path (defaults to production-project.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the script as a plain-text screenplay
    ExportTxt {
        /// Output path (defaults to script.txt)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            SessionConfig::from_toml_str(&source).context("Failed to parse config file")?
        }
        None => SessionConfig::default(),
    };

    let store_dir = match args.store_dir {
        Some(dir) => dir,
        None => default_store_dir()?,
    };

    let mut session = commands::open_session(config, &store_dir)?;

    match args.command {
        Command::Init => commands::init(&mut session),
        Command::Show { json } => commands::show(&mut session, json),
        Command::Import { file } => commands::import(&mut session, &file),
        Command::Export { output } => commands::export_json(&mut session, output),
        Command::ExportTxt { output } => commands::export_text(&mut session, output),
    }
}

fn default_store_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "prodkit", "prodkit")
        .context("Could not determine data directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
