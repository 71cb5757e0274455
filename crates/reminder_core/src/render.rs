use crate::clock::offset_seconds;
use crate::model::Task;
use crate::task_api::current_task_index;
use serde::Serialize;
use time::Time;

const SOON_WINDOW_SECS: i64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Done,
    Overdue,
    Soon,
    Pending,
}

impl DisplayStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Overdue => "overdue",
            Self::Soon => "soon",
            Self::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub id: i64,
    pub name: String,
    pub time: String,
    pub priority: String,
    pub status: DisplayStatus,
    pub current: bool,
}

pub fn display_status(task: &Task, now: Time) -> DisplayStatus {
    if task.completed {
        return DisplayStatus::Done;
    }

    match offset_seconds(&task.time, now) {
        Some(offset) if offset < 0 => DisplayStatus::Overdue,
        Some(offset) if offset < SOON_WINDOW_SECS => DisplayStatus::Soon,
        _ => DisplayStatus::Pending,
    }
}

pub fn task_rows(tasks: &[Task], now: Time) -> Vec<TaskRow> {
    let current = current_task_index(tasks);
    tasks
        .iter()
        .enumerate()
        .map(|(index, task)| TaskRow {
            id: task.id,
            name: task.name.clone(),
            time: task.time.chars().take(8).collect(),
            priority: task.priority.as_str().to_ascii_uppercase(),
            status: display_status(task, now),
            current: current == Some(index),
        })
        .collect()
}
