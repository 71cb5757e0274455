use crate::config::app_dir;
use crate::error::AppError;
use crate::model::Task;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "tasks.json";
const STORE_ENV_VAR: &str = "REMINDER_STORE_PATH";

#[derive(Debug, Serialize, Deserialize)]
struct StoredTasks {
    schema_version: u32,
    tasks: Vec<Task>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    Ok(app_dir()?.join(STORE_FILE_NAME))
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let stored: StoredTasks = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;

    if stored.schema_version != SCHEMA_VERSION {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }

    Ok(stored.tasks)
}

pub fn load_tasks_or_empty(path: &Path) -> Vec<Task> {
    match load_tasks(path) {
        Ok(tasks) => {
            debug!(count = tasks.len(), path = %path.display(), "tasks loaded");
            tasks
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable task store");
            Vec::new()
        }
    }
}

pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let stored = StoredTasks {
        schema_version: SCHEMA_VERSION,
        tasks: tasks.to_vec(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    std::fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)?;
    }

    Ok(())
}
