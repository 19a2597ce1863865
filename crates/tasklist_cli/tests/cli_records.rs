use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tasklist-{nanos}-{file_name}"))
}

#[test]
fn add_command_appends_one_record_per_line() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let store_path = temp_path("cli-records-add.txt");

    for message in ["buy milk", "pay bills"] {
        let output = Command::new(exe)
            .args(["add", message, "--format", "records"])
            .env("TASKLIST_STORE_PATH", &store_path)
            .output()
            .expect("failed to run add command");
        assert!(output.status.success());
    }

    let content = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("1,buy milk,"));
    assert!(lines[1].starts_with("2,pay bills,"));
    assert!(lines[0].ends_with(",false,"));
}

#[test]
fn add_command_appends_without_rewriting_earlier_records() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let store_path = temp_path("cli-records-append.txt");

    let first = Command::new(exe)
        .args(["add", "buy milk", "--format", "records"])
        .env("TASKLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run add command");
    assert!(first.status.success());
    let before = std::fs::read(&store_path).unwrap();

    let second = Command::new(exe)
        .args(["add", "pay bills", "--format", "records"])
        .env("TASKLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run add command");
    let after = std::fs::read(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(second.status.success());
    assert_eq!(&after[..before.len()], &before[..]);
}

#[test]
fn toggle_and_delete_work_against_record_store() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let store_path = temp_path("cli-records-mutate.txt");

    for message in ["buy milk", "pay bills"] {
        let output = Command::new(exe)
            .args(["add", message, "--format", "records"])
            .env("TASKLIST_STORE_PATH", &store_path)
            .output()
            .expect("failed to run add command");
        assert!(output.status.success());
    }

    let toggle = Command::new(exe)
        .args(["toggle", "1", "--format", "records"])
        .env("TASKLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run toggle command");
    assert!(toggle.status.success());

    let delete = Command::new(exe)
        .args(["delete", "2", "--format", "records"])
        .env("TASKLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run delete command");
    assert!(delete.status.success());

    let content = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("1,buy milk,"));
    assert!(lines[0].contains(",true,"));
}

#[test]
fn semicolon_delimiter_round_trips_comma_messages() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let store_path = temp_path("cli-records-semicolon.txt");

    let add = Command::new(exe)
        .args([
            "add",
            "milk, eggs, bread",
            "--format",
            "records",
            "--delimiter",
            ";",
        ])
        .env("TASKLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run add command");
    assert!(add.status.success());

    let list = Command::new(exe)
        .args(["list", "--format", "records", "--delimiter", ";", "--json"])
        .env("TASKLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");
    std::fs::remove_file(&store_path).ok();

    assert!(list.status.success());
    let payload: serde_json::Value =
        serde_json::from_slice(&list.stdout).expect("stdout is json");
    assert_eq!(payload[0]["message"], "milk, eggs, bread");
}

#[test]
fn unsupported_delimiter_is_rejected() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let store_path = temp_path("cli-records-bad-delim.txt");

    let output = Command::new(exe)
        .args(["list", "--format", "records", "--delimiter", "|"])
        .env("TASKLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid_input"));
}

#[test]
fn malformed_record_aborts_with_line_number() {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let store_path = temp_path("cli-records-bad.txt");
    std::fs::write(
        &store_path,
        "1,buy milk,2026-08-30T12:00:00Z,false,\n2,pay bills,not-a-date,false,\n",
    )
    .unwrap();

    let output = Command::new(exe)
        .args(["list", "--format", "records"])
        .env("TASKLIST_STORE_PATH", &store_path)
        .output()
        .expect("failed to run list command");
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid_data"));
    assert!(stderr.contains("line 2"));
}
