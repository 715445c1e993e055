//! set-state: CLI for updating the Star Office activity state.
//!
//! Writes the single activity record that the office UI polls. The state name
//! is checked before anything touches the state file, so a typo never
//! clobbers the current record.
//!
//! ## Exit Codes
//!
//! - `0`: state written
//! - `1`: invalid arguments, unknown state name, or the write failed

mod logging;

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;

use office_core::{ActivityState, StateStore, StateUpdate, StorageConfig};

const EXAMPLES: &str = "\
Examples:
  set-state idle
  set-state researching \"在查 Godot MCP...\"
  set-state writing \"在写热点日报模板...\" --progress 40";

#[derive(Parser, Debug)]
#[command(name = "set-state")]
#[command(about = "Update the Star Office activity state")]
#[command(version)]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// One of: idle, writing, researching, executing, syncing, error
    #[arg(value_name = "STATE")]
    state: String,

    /// Text shown next to the state in the office UI
    #[arg(value_name = "DETAIL")]
    detail: Option<String>,

    /// Progress percentage (kept from the previous record when omitted)
    #[arg(long, allow_negative_numbers = true)]
    progress: Option<i64>,

    /// Seconds a working state stays valid without a refresh (default 25)
    #[arg(long = "ttl", value_name = "SECS", allow_negative_numbers = true)]
    ttl_seconds: Option<i64>,

    /// State file to write (default: <root>/state.json)
    #[arg(long, value_name = "PATH")]
    state_file: Option<PathBuf>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                err.exit();
            }
            err.print().ok();
            eprintln!("\nValid states: {}", ActivityState::options());
            process::exit(1);
        }
    };

    let state = match cli.state.parse::<ActivityState>() {
        Ok(state) => state,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Valid options: {}", ActivityState::options());
            process::exit(1);
        }
    };

    let storage = StorageConfig::resolve();
    let _logging_guard = storage
        .as_ref()
        .ok()
        .and_then(|storage| logging::init(&storage.logs_dir()));

    let state_file = match (cli.state_file, storage) {
        (Some(path), _) => path,
        (None, Ok(storage)) => storage.state_file(),
        (None, Err(err)) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    let update = StateUpdate::new(state, cli.detail.unwrap_or_default())
        .with_progress(cli.progress)
        .with_ttl_seconds(cli.ttl_seconds);

    match StateStore::new(&state_file).write_state(update) {
        Ok(record) => {
            tracing::info!(
                state = %record.state,
                path = %state_file.display(),
                "State updated"
            );
            println!("State updated: {} - {}", record.state, record.detail);
        }
        Err(err) => {
            tracing::error!(error = %err, "set-state write failed");
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
