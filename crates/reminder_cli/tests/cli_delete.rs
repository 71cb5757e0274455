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

#[test]
fn delete_removes_task_from_store() {
    let store_path = temp_path("cli-delete.json");
    write_store(
        &store_path,
        serde_json::json!([
            {
                "id": 10,
                "name": "Call home",
                "time": "07:00:00 PM",
                "priority": "low",
                "completed": false,
                "delay_count": 0,
                "last_spoken_time": 0
            },
            {
                "id": 11,
                "name": "Read",
                "time": "09:00:00 PM",
                "priority": "medium",
                "completed": false,
                "delay_count": 0,
                "last_spoken_time": 0
            }
        ]),
    );

    let output = reminder(&store_path, &["delete", "10"]);

    let stored = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Deleted task: Call home (10)"));

    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    let tasks = stored["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["name"], "Read");
}

#[test]
fn delete_from_empty_store_fails() {
    let store_path = temp_path("cli-delete-empty.json");

    let output = reminder(&store_path, &["delete", "1"]);

    std::fs::remove_file(&store_path).ok();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("task not found"));
}
