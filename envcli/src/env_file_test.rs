use std::fs;
use std::path::PathBuf;

use uuid::Uuid;

use super::*;

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("envcli-test-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn parse_classifies_lines() {
    let env = EnvFile::parse("# header\n\nAPP_NAME=ledgerbank\nnot a pair\n");
    assert_eq!(env.lines.len(), 4);
    assert_eq!(env.lines[0], Line::Comment("# header".to_owned()));
    assert_eq!(env.lines[1], Line::Blank);
    assert_eq!(
        env.lines[2],
        Line::Entry {
            key: "APP_NAME".to_owned(),
            value: "ledgerbank".to_owned(),
        }
    );
    assert_eq!(env.lines[3], Line::Other("not a pair".to_owned()));
}

#[test]
fn quoted_values_are_unquoted() {
    let env = EnvFile::parse(
        "A=\"hello world\"\nB='single quoted'\nC=\"say \\\"hi\\\"\"\nD=  padded  \n",
    );
    assert_eq!(env.get("A"), Some("hello world"));
    assert_eq!(env.get("B"), Some("single quoted"));
    assert_eq!(env.get("C"), Some("say \"hi\""));
    assert_eq!(env.get("D"), Some("padded"));
}

#[test]
fn keys_and_values_are_trimmed() {
    let env = EnvFile::parse("  SPACED_KEY  =  spaced value  \n");
    assert_eq!(env.get("SPACED_KEY"), Some("spaced value"));
}

#[test]
fn values_are_quoted_only_when_needed() {
    assert_eq!(quote("plain"), "plain");
    assert_eq!(quote("postgres://u:p@host/db"), "postgres://u:p@host/db");
    assert_eq!(quote("two words"), "\"two words\"");
    assert_eq!(quote("has#hash"), "\"has#hash\"");
    assert_eq!(quote("a=b"), "\"a=b\"");
    assert_eq!(quote(""), "\"\"");
    assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
}

#[test]
fn render_preserves_non_entry_lines() {
    let source = "# generated\n\nAPP_NAME=ledgerbank\nbroken line\nGREETING=\"hello world\"\n";
    let env = EnvFile::parse(source);
    assert_eq!(env.render(), source);
}

#[test]
fn render_parse_round_trip_is_stable() {
    let mut env = EnvFile::default();
    env.set("MOTD", "say \"hi\" # loudly");
    let rendered = env.render();
    let reparsed = EnvFile::parse(&rendered);
    assert_eq!(reparsed.get("MOTD"), Some("say \"hi\" # loudly"));
    assert_eq!(reparsed.render(), rendered);
}

#[test]
fn set_updates_in_place_and_appends_new_keys() {
    let mut env = EnvFile::parse("# config\nPORT=3000\nDEBUG=false\n");
    assert!(env.set("PORT", "8080"));
    assert!(!env.set("LOG_LEVEL", "info"));
    assert_eq!(
        env.render(),
        "# config\nPORT=8080\nDEBUG=false\nLOG_LEVEL=info\n"
    );
}

#[test]
fn remove_drops_every_matching_entry() {
    let mut env = EnvFile::parse("A=1\nB=2\nA=3\n");
    assert!(env.remove("A"));
    assert!(!env.remove("A"));
    assert_eq!(env.render(), "B=2\n");
}

#[test]
fn sensitive_keys_are_detected_case_insensitively() {
    assert!(is_sensitive_key("DATABASE_PASSWORD"));
    assert!(is_sensitive_key("stripe_secret_key"));
    assert!(is_sensitive_key("Github_Token"));
    assert!(is_sensitive_key("AWS_API_KEY"));
    assert!(is_sensitive_key("TLS_PRIVATE_KEY"));
    assert!(is_sensitive_key("AZURE_CONNECTION_STRING"));
    assert!(!is_sensitive_key("PORT"));
    assert!(!is_sensitive_key("APP_NAME"));
}

#[test]
fn missing_file_loads_as_empty() {
    let dir = scratch_dir();
    let env = EnvFile::load(&dir.join(".env")).unwrap();
    assert_eq!(env.entries().count(), 0);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn save_creates_the_file_and_backs_up_the_previous_version() {
    let dir = scratch_dir();
    let path = dir.join(".env");

    let mut env = EnvFile::default();
    env.set("PORT", "3000");
    env.save(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "PORT=3000\n");
    assert!(!dir.join(".env.bak").exists());

    env.set("PORT", "8080");
    env.save(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "PORT=8080\n");
    assert_eq!(
        fs::read_to_string(dir.join(".env.bak")).unwrap(),
        "PORT=3000\n"
    );

    let leftover_temps = fs::read_dir(&dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(leftover_temps, 0);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn edits_preserve_comments_on_disk() {
    let dir = scratch_dir();
    let path = dir.join(".env");
    fs::write(
        &path,
        "# database\nDATABASE_URL=postgres://localhost/app\n\n# http\nPORT=3000\n",
    )
    .unwrap();

    let mut env = EnvFile::load(&path).unwrap();
    env.set("PORT", "8080");
    env.save(&path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# database\nDATABASE_URL=postgres://localhost/app\n\n# http\nPORT=8080\n"
    );
    fs::remove_dir_all(&dir).unwrap();
}

#[cfg(unix)]
#[test]
fn save_keeps_the_original_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = scratch_dir();
    let path = dir.join(".env");
    fs::write(&path, "API_TOKEN=abc123\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

    let mut env = EnvFile::load(&path).unwrap();
    env.set("API_TOKEN", "def456");
    env.save(&path).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o600);
    fs::remove_dir_all(&dir).unwrap();
}
