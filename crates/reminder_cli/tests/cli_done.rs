use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("reminder-{nanos}-{file_name}"))
}

fn write_store(path: &Path, tasks: serde_json::Value) {
    let content = serde_json::json!({ "schema_version": 1, "tasks": tasks });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn reminder(store_path: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_reminder"))
        .args(args)
        .env("REMINDER_STORE_PATH", store_path)
        .env("REMINDER_DISABLE_SPEECH", "1")
        .env("REMINDER_CONFIG_PATH", store_path.with_extension("config.json"))
        .output()
        .expect("failed to run reminder")
}

fn two_tasks() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 1,
            "name": "Standup",
            "time": "09:00:00 AM",
            "priority": "high",
            "completed": false,
            "delay_count": 4,
            "last_spoken_time": 0
        },
        {
            "id": 2,
            "name": "Lunch",
            "time": "01:00:00 PM",
            "completed": false,
            "delay_count": 0,
            "last_spoken_time": 0
        }
    ])
}

#[test]
fn done_marks_task_completed_and_resets_delay() {
    let store_path = temp_path("cli-done.json");
    write_store(&store_path, two_tasks());

    let output = reminder(&store_path, &["done", "1"]);

    let stored = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Completed task: Standup (1)"));

    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    let tasks = stored["tasks"].as_array().unwrap();
    assert_eq!(tasks[0]["id"], 2);
    assert_eq!(tasks[1]["id"], 1);
    assert_eq!(tasks[1]["completed"], true);
    assert_eq!(tasks[1]["delay_count"], 0);
    assert_eq!(tasks[0]["priority"], "medium");
}

#[test]
fn toggle_alias_reopens_completed_task() {
    let store_path = temp_path("cli-toggle.json");
    let mut tasks = two_tasks();
    tasks[1]["completed"] = serde_json::Value::Bool(true);
    write_store(&store_path, tasks);

    let output = reminder(&store_path, &["--json", "toggle", "2"]);

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let task: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(task["id"], 2);
    assert_eq!(task["completed"], false);
}

#[test]
fn done_unknown_id_fails() {
    let store_path = temp_path("cli-done-missing.json");
    write_store(&store_path, two_tasks());

    let output = reminder(&store_path, &["done", "99"]);

    std::fs::remove_file(&store_path).ok();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - task not found"));
}
