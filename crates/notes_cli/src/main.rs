//! Menu-driven notes CLI.
//!
//! # Responsibility
//! - Wire config, logging, storage and the interactive session together.
//! - Map the session outcome to the process exit status.

mod config;
mod session;

use config::CliConfig;
use log::{error, info};
use notes_core::db::open_db;
use notes_core::{init_logging, NoteService, SqliteNoteRepository};
use session::{Session, SessionOutcome};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match CliConfig::resolve() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("notes: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("notes: file logging disabled: {err}");
    }

    // The connection outlives the session and closes when `main` returns.
    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!(
                "notes: cannot open database `{}`: {err}",
                config.db_path.display()
            );
            return ExitCode::FAILURE;
        }
    };
    let repo = match SqliteNoteRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("notes: {err}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock(), NoteService::new(repo));

    match session.run() {
        Ok(SessionOutcome::Exited) => {
            info!("event=app_exit module=cli status=ok");
            ExitCode::SUCCESS
        }
        Ok(outcome) => {
            error!("event=app_exit module=cli status=error outcome={outcome:?}");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("event=app_exit module=cli status=error error={err}");
            eprintln!("notes: {err}");
            ExitCode::FAILURE
        }
    }
}
