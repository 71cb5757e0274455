use crate::model::Task;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

pub const MOTIVATIONAL_PHRASES: [&str; 4] = [
    "Jaldi karien! Waqt nikal raha hai, apna kaam shuru karien.",
    "Aap schedule se peeche hain! Abhi focus karien!",
    "Har aik second qeemti hai, aagay barhiye!",
    "Bas thora sa josh, yeh kaam khatam karien.",
];

/// Escalation draws only from the urgent head of the phrase list.
const URGENT_PHRASE_COUNT: usize = 3;
const ESCALATION_COOLDOWN_SECS: i64 = 10;
pub const MOTIVATION_WINDOW_SECS: i64 = 60;
pub const MOTIVATION_CHANCE: f64 = 0.20;

pub trait RandomSource {
    fn chance(&mut self, probability: f64) -> bool;

    fn index(&mut self, len: usize) -> usize;
}

pub struct SystemRandom {
    rng: StdRng,
}

impl SystemRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SystemRandom {
    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotivationClock {
    pub last_motivation_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Motivation {
    Escalation(String),
    Encouragement(String),
}

impl Motivation {
    pub fn text(&self) -> &str {
        match self {
            Self::Escalation(text) | Self::Encouragement(text) => text,
        }
    }

    pub fn mutates_task(&self) -> bool {
        matches!(self, Self::Escalation(_))
    }
}

pub fn escalation_interval(delay_count: u32) -> Option<i64> {
    match delay_count {
        count if count >= 10 => Some(15),
        count if count >= 5 => Some(30),
        _ => None,
    }
}

pub fn motivate(
    task: &mut Task,
    offset: i64,
    now_second: i64,
    clock: &mut MotivationClock,
    random: &mut dyn RandomSource,
) -> Option<Motivation> {
    let seconds_late = offset.abs();

    if offset < 0
        && task.delay_count > 0
        && now_second > task.last_spoken_time + ESCALATION_COOLDOWN_SECS
        && let Some(interval) = escalation_interval(task.delay_count)
        && seconds_late % interval == 0
    {
        let phrase = MOTIVATIONAL_PHRASES[random.index(URGENT_PHRASE_COUNT)];
        task.last_spoken_time = now_second;
        debug!(task_id = task.id, delay_count = task.delay_count, "delay escalation");
        return Some(Motivation::Escalation(format!("Khayal karien! {phrase}")));
    }

    if now_second <= clock.last_motivation_time + MOTIVATION_WINDOW_SECS {
        return None;
    }

    clock.last_motivation_time = now_second;
    if task.completed || !random.chance(MOTIVATION_CHANCE) {
        return None;
    }

    let phrase = MOTIVATIONAL_PHRASES[random.index(MOTIVATIONAL_PHRASES.len())];
    Some(Motivation::Encouragement(format!(
        "Aapke liye aik chota message: {phrase}"
    )))
}
