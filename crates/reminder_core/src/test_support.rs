use crate::error::AppError;
use crate::model::{Priority, Task};
use crate::motivation::RandomSource;
use crate::speech::Speaker;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("reminder-{nanos}-{file_name}"))
}

pub fn pending_task(id: i64, name: &str, time: &str) -> Task {
    Task {
        id,
        name: name.to_string(),
        time: time.to_string(),
        priority: Priority::Medium,
        completed: false,
        delay_count: 0,
        last_spoken_time: 0,
    }
}

#[derive(Clone, Default)]
pub struct RecordingSpeaker {
    spoken: Rc<RefCell<Vec<String>>>,
}

impl RecordingSpeaker {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.borrow().clone()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str) -> Result<(), AppError> {
        self.spoken.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// Replays fixed answers; an exhausted script answers `false` / `0`.
pub struct ScriptedRandom {
    chances: VecDeque<bool>,
    indices: VecDeque<usize>,
    chance_calls: usize,
    index_calls: Vec<usize>,
}

impl ScriptedRandom {
    pub fn new(chances: Vec<bool>, indices: Vec<usize>) -> Self {
        Self {
            chances: chances.into(),
            indices: indices.into(),
            chance_calls: 0,
            index_calls: Vec::new(),
        }
    }

    pub fn chance_calls(&self) -> usize {
        self.chance_calls
    }

    pub fn index_calls(&self) -> Vec<usize> {
        self.index_calls.clone()
    }
}

impl RandomSource for ScriptedRandom {
    fn chance(&mut self, _probability: f64) -> bool {
        self.chance_calls += 1;
        self.chances.pop_front().unwrap_or(false)
    }

    fn index(&mut self, len: usize) -> usize {
        self.index_calls.push(len);
        self.indices.pop_front().unwrap_or(0) % len
    }
}
