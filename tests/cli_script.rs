use assert_cmd::Command;
use assert_fs::{prelude::*, TempDir};
use predicates::prelude::*;
use predicates::str::contains;
use regex::Regex;
use tempfile::NamedTempFile;

const IDENTIFY: &str = "set stammdaten.geschlecht w
set stammdaten.alter 41
set stammdaten.chiffre K-41
set stammdaten.datum 2024-06-01
";

fn shell(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("intake_core_cli").unwrap();
    cmd.env("INTAKE_CORE_CLI_SCRIPT", "1")
        .env("INTAKE_CORE_HOME", home.path())
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn script_mode_fills_the_form_and_exports_it() {
    let home = TempDir::new().unwrap();
    let tmp = NamedTempFile::new().unwrap();
    let input = format!(
        "{IDENTIFY}# comments are skipped\nentry medikation add praeparat=Sertralin dosierung=\"50 mg\"\nexport {}\nexit\n",
        tmp.path().display()
    );

    let output = shell(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Answers written to"))
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    let added = Regex::new(r"Added medikation entry \[([0-9a-f]{8})\]: Sertralin · 50 mg").unwrap();
    assert!(added.is_match(&stdout), "unexpected output: {}", stdout);

    let json = std::fs::read_to_string(tmp.path()).unwrap();
    assert!(json.contains("\"Sertralin\""));
    assert!(json.contains("\"K-41\""));
}

#[test]
fn blocked_step_lists_missing_fields() {
    let home = TempDir::new().unwrap();
    shell(&home)
        .write_stdin("set stammdaten.alter 30\nnext\nstatus\n")
        .assert()
        .success()
        .stderr(contains("Missing: stammdaten.geschlecht, stammdaten.chiffre"))
        .stdout(contains("Schritt 1/8: Stammdaten"));
}

#[test]
fn submit_at_review_produces_a_report() {
    let home = TempDir::new().unwrap();
    let input = format!("{IDENTIFY}{}submit\nresult\n", "next\n".repeat(7));
    let answers = predicates::str::is_match(r"alter: 41\s+chiffre: K-41").unwrap();

    shell(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Report generated"))
        .stdout(answers.and(contains("Stammdaten")));
}

#[test]
fn unknown_path_suggests_the_closest_name() {
    let home = TempDir::new().unwrap();
    shell(&home)
        .write_stdin("set stammdaten.alterr 30\nshow stammdaten.alter\n")
        .assert()
        .success()
        .stderr(contains("Unresolvable path `stammdaten.alterr`"))
        .stdout(contains("Did you mean `stammdaten.alter`?"))
        .stdout(contains("stammdaten.alter = -"));
}

#[test]
fn config_changes_are_persisted_under_the_home_directory() {
    let home = TempDir::new().unwrap();
    shell(&home)
        .write_stdin("config set screen_reader_mode on\nsuizid gedanken\n")
        .assert()
        .success()
        .stdout(contains("SUCCESS: befund.suizidalitaet = gedanken"));

    home.child("config.json")
        .assert(predicate::str::contains("\"screen_reader_mode\": true"));
}

#[test]
fn oversized_child_count_is_reported_and_the_shell_continues() {
    let home = TempDir::new().unwrap();
    shell(&home)
        .write_stdin("kinder 18446744073709551615
kinder 2
show familie.kinder
")
        .assert()
        .success()
        .stderr(contains("expected a child count between 0 and 20"))
        .stdout(contains("SUCCESS: familie.kinder = "));
}
