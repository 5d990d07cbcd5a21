//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `quicknote_core` linkage without the Flutter runtime.
//! - Optionally report what a board database currently holds, without
//!   writing to it.
//!
//! Usage: `quicknote_cli [DB_PATH]`

use quicknote_core::service::card::project_cards;
use quicknote_core::{
    KeyValueStorage, PersistenceAdapter, PersistenceError, SqliteStorage, ViewMode,
};
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("quicknote_core ping={}", quicknote_core::ping());
    println!("quicknote_core version={}", quicknote_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let adapter = match SqliteStorage::open(&db_path) {
        Ok(storage) => PersistenceAdapter::new(storage),
        Err(err) => {
            eprintln!("quicknote_cli: failed to open `{db_path}`: {err}");
            return ExitCode::FAILURE;
        }
    };

    match report(&adapter, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("quicknote_cli: failed to read `{db_path}`: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Prints the slot contents. A corrupt slot is reported, never backed up or
/// replaced.
fn report<S: KeyValueStorage>(
    adapter: &PersistenceAdapter<S>,
    out: &mut impl Write,
) -> Result<(), String> {
    let written = match adapter.load() {
        Ok(notes) => {
            writeln!(out, "notes={}", notes.len()).and_then(|()| {
                project_cards(&notes, ViewMode::Markdown)
                    .into_iter()
                    .try_for_each(|card| {
                        writeln!(
                            out,
                            "{} updated_at={} edited={}",
                            card.id, card.updated_at, card.edited
                        )
                    })
            })
        }
        Err(PersistenceError::CorruptState(reason)) if !reason.has_payload() => {
            writeln!(out, "notes=0 slot=empty")
        }
        Err(PersistenceError::CorruptState(reason)) => {
            writeln!(out, "notes=0 slot=corrupt reason=\"{reason}\"")
        }
        Err(err) => return Err(err.to_string()),
    };
    written.map_err(|err| err.to_string())
}
