//! Command-line surface for the notes process.

use clap::builder::ArgAction;
use clap::{Arg, Command};

pub const ARG_DB_PATH: &str = "db-path";
pub const ARG_LOG_LEVEL: &str = "log-level";
pub const ARG_LOG_DIR: &str = "log-dir";
pub const ARG_SERVICE_NAME: &str = "service-name";
pub const ARG_PATIENT_ID: &str = "patient-id";
pub const ARG_CONTENT: &str = "content";

pub const DEFAULT_DB_PATH: &str = "notes_ms.sqlite3";
pub const DEFAULT_SERVICE_NAME: &str = "notes-ms";

pub fn build_clap_command() -> Command {
    Command::new("notes-ms")
        .about("Create and read patient notes")
        .version(notes_ms_core::core_version())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_DB_PATH)
                .long(ARG_DB_PATH)
                .value_name("path")
                .env("NOTES_MS_DB_PATH")
                .default_value(DEFAULT_DB_PATH)
                .help("SQLite database file, or `:memory:` for a throwaway store")
                .global(true),
        )
        .arg(
            Arg::new(ARG_LOG_LEVEL)
                .long(ARG_LOG_LEVEL)
                .value_name("level")
                .env("NOTES_MS_LOG_LEVEL")
                .help("trace|debug|info|warn|error (default depends on build mode)")
                .global(true),
        )
        .arg(
            Arg::new(ARG_LOG_DIR)
                .long(ARG_LOG_DIR)
                .value_name("dir")
                .env("NOTES_MS_LOG_DIR")
                .help("Absolute directory for rolling log files; logging is off when unset")
                .global(true),
        )
        .arg(
            Arg::new(ARG_SERVICE_NAME)
                .long(ARG_SERVICE_NAME)
                .value_name("name")
                .env("NOTES_MS_SERVICE_NAME")
                .default_value(DEFAULT_SERVICE_NAME)
                .help("Instance name reported in startup logs")
                .global(true),
        )
        .subcommand(
            Command::new("create")
                .about("Persist one note and print it as JSON")
                .arg(patient_id_arg())
                .arg(
                    Arg::new(ARG_CONTENT)
                        .long(ARG_CONTENT)
                        .value_name("text")
                        .required(true)
                        .allow_hyphen_values(true)
                        .help("Note body, stored verbatim"),
                ),
        )
        .subcommand(
            Command::new("get")
                .about("Print one note for the patient as JSON, or null")
                .arg(patient_id_arg()),
        )
        .subcommand(
            Command::new("list")
                .about("Print all notes for the patient as a JSON array")
                .arg(patient_id_arg()),
        )
        .subcommand(Command::new("ping").about("Print core health and version"))
        .arg(
            Arg::new("compact")
                .long("compact")
                .help("Print single-line JSON")
                .action(ArgAction::SetTrue)
                .global(true),
        )
}

fn patient_id_arg() -> Arg {
    Arg::new(ARG_PATIENT_ID)
        .long(ARG_PATIENT_ID)
        .value_name("id")
        .required(true)
        .allow_hyphen_values(true)
        .help("Patient identifier")
}

#[cfg(test)]
mod tests {
    use super::{build_clap_command, ARG_CONTENT, ARG_PATIENT_ID};

    #[test]
    fn command_definition_is_consistent() {
        build_clap_command().debug_assert();
    }

    #[test]
    fn create_requires_content() {
        let result =
            build_clap_command().try_get_matches_from(["notes-ms", "create", "--patient-id", "42"]);
        assert!(result.is_err());
    }

    #[test]
    fn create_parses_patient_and_content() {
        let matches = build_clap_command()
            .try_get_matches_from([
                "notes-ms",
                "create",
                "--patient-id",
                "42",
                "--content",
                "follow-up",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "create");
        assert_eq!(sub.get_one::<String>(ARG_PATIENT_ID).unwrap(), "42");
        assert_eq!(sub.get_one::<String>(ARG_CONTENT).unwrap(), "follow-up");
    }

    #[test]
    fn values_starting_with_hyphen_are_kept_verbatim() {
        let matches = build_clap_command()
            .try_get_matches_from([
                "notes-ms",
                "create",
                "--patient-id",
                "-1",
                "--content",
                "-follow-up",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<String>(ARG_PATIENT_ID).unwrap(), "-1");
        assert_eq!(sub.get_one::<String>(ARG_CONTENT).unwrap(), "-follow-up");

        let matches = build_clap_command()
            .try_get_matches_from(["notes-ms", "get", "--patient-id", "-1"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<String>(ARG_PATIENT_ID).unwrap(), "-1");
    }

    #[test]
    fn missing_subcommand_is_rejected() {
        assert!(build_clap_command()
            .try_get_matches_from(["notes-ms"])
            .is_err());
    }
}
