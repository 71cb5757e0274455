use crate::announce;
use crate::clock::{Moment, offset_seconds};
use crate::error::AppError;
use crate::model::Task;
use crate::motivation::{self, MotivationClock, RandomSource};
use crate::render::{TaskRow, task_rows};
use crate::speech::Speaker;
use crate::storage::json_store;
use crate::task_api::{self, TaskDraft};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub motivation: MotivationClock,
}

impl AppState {
    pub fn new(mut tasks: Vec<Task>) -> Self {
        task_api::sort_tasks(&mut tasks);
        Self {
            tasks,
            motivation: MotivationClock::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub current_task_id: Option<i64>,
    pub offset: Option<i64>,
    pub spoken: Vec<String>,
    pub persisted: bool,
}

pub struct Assistant {
    store_path: PathBuf,
    state: AppState,
    speaker: Box<dyn Speaker>,
    random: Box<dyn RandomSource>,
}

impl Assistant {
    pub fn load(
        store_path: PathBuf,
        speaker: Box<dyn Speaker>,
        random: Box<dyn RandomSource>,
    ) -> Self {
        let tasks = json_store::load_tasks_or_empty(&store_path);
        Self::with_state(store_path, AppState::new(tasks), speaker, random)
    }

    pub fn with_state(
        store_path: PathBuf,
        state: AppState,
        speaker: Box<dyn Speaker>,
        random: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            store_path,
            state,
            speaker,
            random,
        }
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn current_task(&self) -> Option<&Task> {
        task_api::current_task(&self.state.tasks)
    }

    pub fn rows(&self, now: Moment) -> Vec<TaskRow> {
        task_rows(&self.state.tasks, now.time_of_day)
    }

    pub fn greet(&self) -> String {
        let greeting = announce::GREETING.to_string();
        self.say(&greeting);
        greeting
    }

    /// Picks up changes written by other processes sharing the store.
    /// A missing or unreadable file keeps the in-memory list.
    pub fn reload(&mut self) {
        if !self.store_path.exists() {
            return;
        }

        match json_store::load_tasks(&self.store_path) {
            Ok(mut tasks) => {
                task_api::sort_tasks(&mut tasks);
                self.state.tasks = tasks;
            }
            Err(err) => debug!(error = %err, "keeping in-memory tasks"),
        }
    }

    pub fn tick(&mut self, now: Moment) -> TickReport {
        self.reload();
        let mut report = TickReport::default();
        let Some(index) = task_api::current_task_index(&self.state.tasks) else {
            return report;
        };

        let now_second = now.epoch_second();
        let state = &mut self.state;
        let task = &mut state.tasks[index];
        report.current_task_id = Some(task.id);

        let Some(offset) = offset_seconds(&task.time, now.time_of_day) else {
            debug!(task_id = task.id, time = %task.time, "unschedulable task time, skipping tick");
            return report;
        };
        report.offset = Some(offset);

        let mut dirty = false;
        if let Some(text) = announce::announce_milestone(task, offset, now_second) {
            report.spoken.push(text);
            dirty = true;
        }

        if let Some(nudge) = motivation::motivate(
            task,
            offset,
            now_second,
            &mut state.motivation,
            self.random.as_mut(),
        ) {
            dirty |= nudge.mutates_task();
            report.spoken.push(nudge.text().to_string());
        }

        for text in &report.spoken {
            self.say(text);
        }

        if dirty {
            match self.persist() {
                Ok(()) => report.persisted = true,
                Err(err) => warn!(error = %err, "failed to persist tasks after tick"),
            }
        }

        report
    }

    pub fn add_task(&mut self, draft: &TaskDraft, now: Moment) -> Result<Task, AppError> {
        self.reload();
        let task = task_api::add_task(&mut self.state.tasks, draft, now.epoch_millis)?;
        self.persist()?;
        info!(task_id = task.id, name = %task.name, time = %task.time, "task added");

        self.say(&announce::task_added(&task.name, &task.time));
        Ok(task)
    }

    pub fn toggle_task(&mut self, id: i64, now: Moment) -> Result<Task, AppError> {
        self.reload();
        let task = task_api::toggle_task(&mut self.state.tasks, id)?;
        self.persist()?;
        info!(task_id = task.id, completed = task.completed, "task toggled");

        let message = if task.completed {
            let follow_up = match self.current_task() {
                Some(next) => announce::next_task_briefing(
                    &next.name,
                    offset_seconds(&next.time, now.time_of_day),
                ),
                None => announce::all_tasks_done(),
            };
            format!("{} {}", announce::task_completed(&task.name), follow_up)
        } else {
            announce::task_reopened(&task.name)
        };
        self.say(&message);

        Ok(task)
    }

    pub fn delete_task(&mut self, id: i64) -> Result<Task, AppError> {
        self.reload();
        let task = task_api::delete_task(&mut self.state.tasks, id)?;
        self.persist()?;
        info!(task_id = task.id, "task deleted");

        self.say(&announce::task_deleted(&task.name));
        Ok(task)
    }

    fn persist(&self) -> Result<(), AppError> {
        json_store::save_tasks(&self.store_path, &self.state.tasks)
    }

    fn say(&self, text: &str) {
        debug!(text, "speaking");
        if let Err(err) = self.speaker.speak(text) {
            warn!(error = %err, "announcement dropped");
        }
    }
}
