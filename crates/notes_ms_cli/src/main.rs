//! Notes process entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging, open the store and construct
//!   the notes service once.
//! - Run one subcommand and print its JSON result on stdout.
//!
//! # Invariants
//! - Exit code is 0 on success and 1 on any failure; error text goes to
//!   stderr.

mod cli;
mod config;

use clap::ArgMatches;
use config::{ConfigError, ServiceConfig, StoreLocation};
use log::info;
use notes_ms_core::db::{open_db, open_db_in_memory, DbError};
use notes_ms_core::{init_logging, Note, NoteService, RepoError, SqliteNoteRepository};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::process::ExitCode;

#[derive(Debug)]
enum CliError {
    Config(ConfigError),
    Logging(String),
    Db(DbError),
    Repo(RepoError),
    Encode(serde_json::Error),
    MissingArgument(&'static str),
    UnknownCommand(String),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Logging(message) => write!(f, "logging init failed: {message}"),
            Self::Db(err) => write!(f, "failed to open notes store: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode output: {err}"),
            Self::MissingArgument(name) => write!(f, "missing required argument `--{name}`"),
            Self::UnknownCommand(name) => write!(f, "unknown command `{name}`"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

fn main() -> ExitCode {
    let matches = cli::build_clap_command().get_matches();
    match run(&matches) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("notes-ms: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(matches: &ArgMatches) -> Result<String, CliError> {
    let config = ServiceConfig::from_matches(matches)?;

    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, &log_dir.to_string_lossy()).map_err(CliError::Logging)?;
    }

    let Some((command, args)) = matches.subcommand() else {
        return Err(CliError::UnknownCommand(String::new()));
    };

    if command == "ping" {
        return Ok(format!(
            "notes_ms_core ping={} version={}",
            notes_ms_core::ping(),
            notes_ms_core::core_version()
        ));
    }

    info!(
        "event=service_start module=cli status=ok service={} store={} command={command}",
        config.service_name,
        config.store_label()
    );

    let mut conn = match &config.store {
        StoreLocation::File(path) => open_db(path)?,
        StoreLocation::InMemory => open_db_in_memory()?,
    };
    let repo = SqliteNoteRepository::try_new(&mut conn)?;
    let mut service = NoteService::new(repo);

    match command {
        "create" => {
            let note = Note::new(
                required(args, cli::ARG_PATIENT_ID)?,
                required(args, cli::ARG_CONTENT)?,
            );
            service.create(&note)?;
            render(&note, config.compact_output)
        }
        "get" => {
            let note = service.get(required(args, cli::ARG_PATIENT_ID)?)?;
            render(&note, config.compact_output)
        }
        "list" => {
            let notes = service.get_all(required(args, cli::ARG_PATIENT_ID)?)?;
            render(&notes, config.compact_output)
        }
        other => Err(CliError::UnknownCommand(other.to_string())),
    }
}

fn required<'a>(args: &'a ArgMatches, name: &'static str) -> Result<&'a str, CliError> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .ok_or(CliError::MissingArgument(name))
}

fn render<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<String, CliError> {
    let output = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(output)
}
