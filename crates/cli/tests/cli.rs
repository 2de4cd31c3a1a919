// Binary-level tests for host-triage

use assert_cmd::Command;
use predicates::prelude::*;

fn host_triage() -> Command {
    let mut cmd = Command::cargo_bin("host-triage").unwrap();
    cmd.env_remove("TRIAGE_CONFIG")
        .env_remove("TRIAGE_OUTPUT_PATH")
        .env("TRIAGE_LOG", "warn");
    cmd
}

#[test]
fn test_catalog_check_passes() {
    host_triage()
        .args(["catalog", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SSH KEYS"))
        .stdout(predicate::str::contains("Catalog check passed"));
}

#[test]
fn test_catalog_lists_every_section() {
    let assert = host_triage().arg("catalog").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    for section in ["SYSTEM", "AUTH LOGS", "NETWORK", "PROCESSES", "PERSISTENCE", "SERVICES"] {
        assert!(stdout.contains(section), "missing section {}", section);
    }
}

#[test]
fn test_unwritable_destination_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let not_a_dir = dir.path().join("plain-file");
    std::fs::write(&not_a_dir, "").unwrap();

    host_triage()
        .arg("run")
        .arg("--output")
        .arg(not_a_dir.join("report.txt"))
        .args(["--mirror", "always"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot write report artifact"));
}

#[test]
fn test_invalid_settings_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("triage.toml");
    std::fs::write(&config, "mirror = \"sometimes\"\n").unwrap();

    host_triage()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid settings"));
}

#[test]
fn test_unknown_mirror_flag_rejected() {
    host_triage()
        .args(["run", "--mirror", "sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sometimes"));
}

#[test]
fn test_run_succeeds_when_every_probe_fails() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.txt");

    // `false -c <command>` exits 1 without output for every built-in probe
    host_triage()
        .env("TRIAGE_SHELL", "false")
        .arg("run")
        .arg("--output")
        .arg(&report)
        .args(["--mirror", "never"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = std::fs::read_to_string(&report).unwrap();
    for section in ["SYSTEM", "AUTH LOGS", "SSH KEYS", "NETWORK", "PROCESSES", "PERSISTENCE", "SERVICES"] {
        assert!(text.contains(&format!("\n\n===== {} =====\n", section)), "missing {}", section);
    }
    assert!(text.contains("\n+ uname -a\nexit_code=1\n"));
    assert!(text.contains("no login-failure database on this host\nexit_code=1\n"));
    assert!(!text.contains("exit_code=0\n"));
    assert!(text.ends_with(&format!(
        "\n\n===== DONE =====\nreport written to {}\n",
        report.display()
    )));
}
