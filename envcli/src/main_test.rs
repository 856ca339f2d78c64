use std::fs;

use clap::Parser;
use uuid::Uuid;

use super::*;

#[test]
fn parses_set_with_inline_value() {
    let cli = Cli::try_parse_from(["envcli", "set", "PORT", "8080"]).unwrap();
    assert_eq!(cli.file, PathBuf::from(".env"));
    match cli.command {
        Command::Set { key, value, stdin } => {
            assert_eq!(key, "PORT");
            assert_eq!(value.as_deref(), Some("8080"));
            assert!(!stdin);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn file_flag_is_accepted_after_the_subcommand() {
    let cli = Cli::try_parse_from(["envcli", "get", "PORT", "--file", "/etc/app/.env"]).unwrap();
    assert_eq!(cli.file, PathBuf::from("/etc/app/.env"));
}

#[test]
fn parses_list_filters_and_delete_force() {
    let cli = Cli::try_parse_from(["envcli", "list", "--show-values", "--grep", "db"]).unwrap();
    match cli.command {
        Command::List { show_values, grep } => {
            assert!(show_values);
            assert_eq!(grep.as_deref(), Some("db"));
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = Cli::try_parse_from(["envcli", "delete", "OLD_KEY", "-y"]).unwrap();
    match cli.command {
        Command::Delete { key, force } => {
            assert_eq!(key, "OLD_KEY");
            assert!(force);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn sensitive_values_are_masked_by_default() {
    assert_eq!(
        render_pair("DB_PASSWORD", "hunter2", false),
        "DB_PASSWORD=******** (masked)"
    );
    assert_eq!(render_pair("DB_PASSWORD", "hunter2", true), "DB_PASSWORD=hunter2");
    assert_eq!(render_pair("PORT", "3000", false), "PORT=3000");
}

#[test]
fn error_messages_are_human_readable() {
    let error = CliError::FileNotFound(PathBuf::from("/tmp/missing/.env"));
    assert_eq!(
        error.to_string(),
        "configuration file /tmp/missing/.env not found"
    );

    let error = CliError::KeyNotFound {
        key: "PORT".to_owned(),
        file: PathBuf::from(".env"),
    };
    assert_eq!(error.to_string(), "key 'PORT' not found in .env");

    assert_eq!(
        CliError::MissingValue.to_string(),
        "VALUE is required unless --stdin is used"
    );
}

#[test]
fn set_without_value_or_stdin_is_an_error() {
    let result = run_set(Path::new(".env.irrelevant"), "KEY", None, false);
    assert!(matches!(result, Err(CliError::MissingValue)));
}

#[test]
fn get_from_a_missing_file_is_an_error() {
    let path = std::env::temp_dir().join(format!("envcli-absent-{}.env", Uuid::new_v4()));
    let result = run_get(&path, "PORT", false);
    assert!(matches!(result, Err(CliError::FileNotFound(_))));
}

#[test]
fn set_then_delete_round_trip_on_disk() {
    let dir = std::env::temp_dir().join(format!("envcli-main-test-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(".env");

    run_set(&path, "APP_SECRET", Some("s3cret value".to_owned()), false).unwrap();
    let env = EnvFile::load(&path).unwrap();
    assert_eq!(env.get("APP_SECRET"), Some("s3cret value"));

    run_delete(&path, "APP_SECRET", true).unwrap();
    let env = EnvFile::load(&path).unwrap();
    assert_eq!(env.get("APP_SECRET"), None);

    fs::remove_dir_all(&dir).unwrap();
}
