//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `notekeep_core` linkage.
//! - Print the dashboard of an existing database for quick local checks.
//!
//! Usage: `notekeep_cli [db_path] [width]`

use chrono::Local;
use notekeep_core::db::open_db;
use notekeep_core::view::flow::load_dashboard;
use notekeep_core::{NoteRepository, NoteService, SqliteKeyValueStore};
use std::process::ExitCode;

const DEFAULT_WIDTH: f64 = 390.0;

fn main() -> ExitCode {
    println!("notekeep_core ping={}", notekeep_core::ping());
    println!("notekeep_core version={}", notekeep_core::core_version());

    let mut args = std::env::args().skip(1);
    let Some(db_path) = args.next() else {
        return ExitCode::SUCCESS;
    };
    let width = match args.next().map(|raw| raw.parse::<f64>()) {
        None => DEFAULT_WIDTH,
        Some(Ok(width)) if width >= 0.0 => width,
        Some(_) => {
            eprintln!("width must be a non-negative number");
            return ExitCode::FAILURE;
        }
    };

    match print_dashboard(db_path.as_str(), width) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn print_dashboard(db_path: &str, width: f64) -> Result<(), String> {
    let conn = open_db(db_path).map_err(|err| format!("failed to open `{db_path}`: {err}"))?;
    let store = SqliteKeyValueStore::try_new(&conn).map_err(|err| err.to_string())?;
    let mut service = NoteService::new(NoteRepository::new(store));
    let view = load_dashboard(&mut service, width, &Local)
        .map_err(|alert| alert.message.to_string())?;

    println!("{} (columns={})", view.heading, view.layout.columns);
    if let Some(message) = view.empty_message {
        println!("{message}");
        return Ok(());
    }
    for card in &view.cards {
        println!(
            "[{}] {} ({}) {} {}",
            card.id,
            card.title,
            card.importance_label,
            card.date.as_deref().unwrap_or("-"),
            card.time.as_deref().unwrap_or("-"),
        );
        if !card.preview.is_empty() {
            println!("    {}", card.preview);
        }
    }
    Ok(())
}
