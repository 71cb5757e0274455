use crate::clock::{normalize_form_time, parse_task_time, second_of_day};
use crate::error::AppError;
use crate::model::{Priority, Task};
use std::cmp::Reverse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub time: String,
    pub priority: Priority,
}

pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| {
        let second = parse_task_time(&task.time).map(second_of_day);
        (task.completed, Reverse(second.is_some()), second)
    });
}

pub fn current_task_index(tasks: &[Task]) -> Option<usize> {
    tasks.iter().position(|task| !task.completed)
}

pub fn current_task(tasks: &[Task]) -> Option<&Task> {
    current_task_index(tasks).map(|index| &tasks[index])
}

pub fn next_task_id(tasks: &[Task], created_at_millis: i64) -> i64 {
    match tasks.iter().map(|task| task.id).max() {
        Some(max) if max >= created_at_millis => max + 1,
        _ => created_at_millis,
    }
}

pub fn find_task(tasks: &[Task], id: i64) -> Result<&Task, AppError> {
    tasks
        .iter()
        .find(|task| task.id == id)
        .ok_or_else(|| AppError::invalid_input("task not found"))
}

pub fn add_task(
    tasks: &mut Vec<Task>,
    draft: &TaskDraft,
    created_at_millis: i64,
) -> Result<Task, AppError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(AppError::invalid_input("name is required"));
    }
    let time = normalize_form_time(&draft.time)?;

    let task = Task {
        id: next_task_id(tasks, created_at_millis),
        name: name.to_string(),
        time,
        priority: draft.priority,
        completed: false,
        delay_count: 0,
        last_spoken_time: 0,
    };

    tasks.push(task.clone());
    sort_tasks(tasks);
    Ok(task)
}

pub fn toggle_task(tasks: &mut [Task], id: i64) -> Result<Task, AppError> {
    let task = tasks
        .iter_mut()
        .find(|task| task.id == id)
        .ok_or_else(|| AppError::invalid_input("task not found"))?;

    task.completed = !task.completed;
    task.delay_count = 0;
    let updated = task.clone();

    sort_tasks(tasks);
    Ok(updated)
}

pub fn delete_task(tasks: &mut Vec<Task>, id: i64) -> Result<Task, AppError> {
    let index = tasks
        .iter()
        .position(|task| task.id == id)
        .ok_or_else(|| AppError::invalid_input("task not found"))?;
    Ok(tasks.remove(index))
}
