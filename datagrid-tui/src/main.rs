mod app;
mod config;
mod controls;
mod error;
mod event_loop;
mod input;
mod paths;
mod render;
mod terminal;

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use datagrid_lib::model::Dataset;
use datagrid_lib::store::{MemoryStore, SessionStore, Snapshot};
use log::{error, info};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::app::GridApp;
use crate::config::{ConfigFile, GridConfig};
use crate::error::AppError;
use crate::terminal::TerminalGuard;

/// Browse, search, sort and edit a JSON dataset in the terminal.
#[derive(Parser, Debug)]
#[command(name = "datagrid", version)]
struct Args {
    /// Dataset file: {"columns": [...], "data": [...]}
    dataset: PathBuf,

    /// Config file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level written to the log file
    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,

    /// Rows shown before scrolling reveals more
    #[arg(long)]
    initial_reveal: Option<usize>,

    /// Rows revealed each time the body nears its end
    #[arg(long)]
    reveal_step: Option<usize>,

    /// Rows from the end that count as near it
    #[arg(long)]
    scroll_threshold: Option<usize>,

    /// Width for columns that declare none
    #[arg(long)]
    column_width: Option<u16>,

    /// Write the last saved view state to this file on exit
    #[arg(long, value_name = "PATH")]
    dump_snapshot: Option<PathBuf>,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("unknown log level '{}' (off, error, warn, info, debug, trace)", s))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    init_logging(args.log_level)?;

    let config = load_config(&args)?;
    let dataset = Dataset::load(&args.dataset)?;
    let store = Arc::new(MemoryStore::new());
    let mut app = GridApp::new(dataset, store, config);

    {
        let mut terminal = TerminalGuard::new()?;
        event_loop::run(&mut app, &mut terminal).await?;
    }

    if let Some(path) = &args.dump_snapshot {
        dump_snapshot(app.store(), path)?;
    }
    Ok(())
}

/// Logs go to `latest.log` in the cache directory; the terminal belongs to
/// the UI.
fn init_logging(level: LevelFilter) -> Result<(), AppError> {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return Ok(());
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| AppError::LogFile {
            path: path.clone(),
            source,
        })?;
    }
    let file = File::create(&path).map_err(|source| AppError::LogFile {
        path: path.clone(),
        source,
    })?;
    WriteLogger::init(level, Config::default(), file)?;
    info!("Logging to {}", path.display());
    Ok(())
}

/// Defaults, then the config file, then command-line flags.
fn load_config(args: &Args) -> Result<GridConfig, AppError> {
    let mut config = GridConfig::default();

    let file = match &args.config {
        Some(path) => ConfigFile::load(path, true)?,
        None => match paths::config_file() {
            Some(path) => ConfigFile::load(&path, false)?,
            None => None,
        },
    };
    if let Some(file) = file {
        config = config.merge(file);
    }

    if let Some(rows) = args.initial_reveal {
        config = config.with_initial_reveal(rows);
    }
    if let Some(rows) = args.reveal_step {
        config = config.with_reveal_step(rows);
    }
    if let Some(rows) = args.scroll_threshold {
        config = config.with_scroll_threshold(rows);
    }
    if let Some(width) = args.column_width {
        config = config.with_default_column_width(width);
    }

    info!("Config: {:?}", config);
    Ok(config)
}

fn dump_snapshot(store: &dyn SessionStore, path: &Path) -> Result<(), AppError> {
    let Some(snapshot) = Snapshot::load(store)? else {
        info!("No view state saved, not writing {}", path.display());
        return Ok(());
    };

    fs::write(path, snapshot.to_pretty_json()?).map_err(|source| AppError::Dump {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote view state to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagrid_lib::view::ViewState;
    use tempfile::TempDir;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "datagrid",
            "table-data.json",
            "--reveal-step",
            "5",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.dataset, PathBuf::from("table-data.json"));
        assert_eq!(args.reveal_step, Some(5));
        assert_eq!(args.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, r#"{"revealStep": 50, "scrollThreshold": 4}"#).unwrap();

        let args = Args::try_parse_from([
            "datagrid",
            "data.json",
            "--config",
            config_path.to_str().unwrap(),
            "--reveal-step",
            "7",
        ])
        .unwrap();
        let config = load_config(&args).unwrap();

        assert_eq!(config.reveal_step, 7);
        assert_eq!(config.scroll_threshold, 4);
        assert_eq!(config.initial_reveal, 20);
    }

    #[test]
    fn test_dump_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let store = MemoryStore::new();

        dump_snapshot(&store, &path).unwrap();
        assert!(!path.exists());

        let mut state = ViewState::new(["name"]);
        state.set_search_query("bo");
        state.snapshot(&store).unwrap();
        dump_snapshot(&store, &path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["searchQuery"], "bo");
        assert_eq!(written["visibleColumns"], serde_json::json!(["name"]));
    }
}
