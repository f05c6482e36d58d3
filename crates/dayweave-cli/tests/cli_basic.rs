//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against an isolated config
//! directory and verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command against `config_home` and return (stdout, stderr, code).
fn run_cli(config_home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "dayweave-cli", "--"])
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["--help"]);
    assert_eq!(code, 0);
    for command in ["memo", "suggest", "plan", "react", "rollover", "config"] {
        assert!(stdout.contains(command), "missing '{command}' in help");
    }
}

#[test]
fn memo_add_show_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &["memo", "add", "Sort photos", "--kind", "backlog"],
    );
    assert_eq!(code, 0, "memo add failed: {stderr}");
    assert!(stdout.contains("Memo created:"));

    let id = stdout
        .lines()
        .next()
        .and_then(|l| l.strip_prefix("Memo created: "))
        .expect("id line")
        .to_string();

    let (stdout, _, code) = run_cli(dir.path(), &["memo", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Sort photos"));

    let (stdout, _, code) = run_cli(dir.path(), &["memo", "show", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("\"backlog\""));

    let (stdout, _, code) = run_cli(dir.path(), &["memo", "delete", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Memo deleted"));
}

#[test]
fn deadline_memo_requires_deadline_flag() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["memo", "add", "Report", "--kind", "deadline"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("--deadline"));
}

#[test]
fn suggest_runs_on_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(dir.path(), &["suggest"]);
    assert_eq!(code, 0, "suggest failed: {stderr}");
    assert!(stdout.contains("Nothing needs your attention"));
}

#[test]
fn deadline_memo_shows_up_in_suggestions() {
    let dir = tempfile::tempdir().unwrap();
    let deadline = (chrono::Utc::now().date_naive() + chrono::Duration::days(2)).to_string();
    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &[
            "memo", "add", "Ship report", "--kind", "deadline", "--deadline", &deadline,
        ],
    );
    assert_eq!(code, 0, "memo add failed: {stderr}");
    let id = stdout
        .lines()
        .next()
        .and_then(|l| l.strip_prefix("Memo created: "))
        .expect("id line")
        .to_string();

    let (stdout, _, code) = run_cli(dir.path(), &["suggest"]);
    assert_eq!(code, 0);
    assert!(stdout.contains(&id));
}

#[test]
fn plan_places_a_memo_into_a_gap() {
    let dir = tempfile::tempdir().unwrap();
    let deadline = (chrono::Utc::now().date_naive() + chrono::Duration::days(1)).to_string();
    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &[
            "memo", "add", "Ship report", "--kind", "deadline", "--deadline", &deadline,
            "--session", "30", "--total", "30",
        ],
    );
    assert_eq!(code, 0, "memo add failed: {stderr}");
    let id = stdout
        .lines()
        .next()
        .and_then(|l| l.strip_prefix("Memo created: "))
        .expect("id line")
        .to_string();

    let gaps_path = dir.path().join("gaps.json");
    std::fs::write(
        &gaps_path,
        r#"[{"id":"g-1","start":"09:00:00","end":"10:00:00","location":"home"}]"#,
    )
    .unwrap();

    let (stdout, stderr, code) = run_cli(
        dir.path(),
        &["plan", "--gaps", gaps_path.to_str().unwrap()],
    );
    assert_eq!(code, 0, "plan failed: {stderr}");
    assert!(stdout.contains(&format!("{id} -> g-1")), "got: {stdout}");
}

#[test]
fn react_to_unknown_memo_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["react", "reject", "ghost"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("no longer exists"));
}

#[test]
fn rollover_is_safe_to_repeat() {
    let dir = tempfile::tempdir().unwrap();
    for _ in 0..2 {
        let (stdout, _, code) = run_cli(dir.path(), &["rollover"]);
        assert_eq!(code, 0);
        assert!(stdout.contains("Rolled over"));
    }
}

#[test]
fn config_show_prints_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("hidden_threshold"));
    assert!(stdout.contains("mandatory_threshold"));
}
