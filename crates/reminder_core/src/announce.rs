use crate::model::Task;
use tracing::debug;

pub const GREETING: &str =
    "Salam! Main aapka Smart Assistant hoon. Aap apna schedule shuru karien.";

const LATE_AFTER_SECS: i64 = 60;
const COUNTDOWN_WINDOW_SECS: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    StartsNow,
    OneMinuteLeft,
    SecondsLeft(i64),
    MinutesLeft(i64),
    Late,
}

impl Milestone {
    pub fn message(&self, task_name: &str) -> String {
        match self {
            Self::StartsNow => format!("Aapka task {task_name} start ho gaya hai!"),
            Self::OneMinuteLeft => format!(
                "Aapka task {task_name} bas 1 minute mein shuru hone wala hai! Tayyar ho jaiye!"
            ),
            Self::SecondsLeft(seconds) => {
                format!("{task_name} shuru honay mein sirf {seconds} second baaqi hain.")
            }
            Self::MinutesLeft(minutes) => {
                format!("{task_name} shuru honay mein {minutes} minute baaqi hain.")
            }
            Self::Late => format!(
                "Aap {task_name} ke liye late ho chukay hain! Fauran isko poora karien!"
            ),
        }
    }
}

/// The late check runs after the countdown rules and wins when both match.
pub fn milestone_for_offset(offset: i64) -> Option<Milestone> {
    let mut milestone = if offset == 0 {
        Some(Milestone::StartsNow)
    } else if offset == 60 {
        Some(Milestone::OneMinuteLeft)
    } else if offset > 0 && offset < 60 && offset % 10 == 0 {
        Some(Milestone::SecondsLeft(offset))
    } else if offset > 60 && offset <= COUNTDOWN_WINDOW_SECS && offset % 60 == 0 {
        Some(Milestone::MinutesLeft(offset / 60))
    } else {
        None
    };

    let seconds_late = offset.abs();
    if offset < 0 && seconds_late >= LATE_AFTER_SECS && seconds_late % 60 < 2 {
        milestone = Some(Milestone::Late);
    }

    milestone
}

pub fn announce_milestone(task: &mut Task, offset: i64, now_second: i64) -> Option<String> {
    if now_second <= task.last_spoken_time {
        return None;
    }

    let milestone = milestone_for_offset(offset)?;
    if milestone == Milestone::Late {
        task.delay_count += 1;
    }
    task.last_spoken_time = now_second;
    debug!(task_id = task.id, offset, ?milestone, "milestone reached");

    Some(milestone.message(&task.name))
}

pub fn task_added(name: &str, time: &str) -> String {
    format!("Naya kaam daal diya gaya hai: {name} time {time} par.")
}

pub fn task_completed(name: &str) -> String {
    format!("{name} poora ho gaya. Bahut accha kiya!")
}

pub fn task_reopened(name: &str) -> String {
    format!("Task {name} wapas pending list mein hai.")
}

pub fn task_deleted(name: &str) -> String {
    format!("Kaam {name} khatam kar diya gaya hai.")
}

pub fn all_tasks_done() -> String {
    "Aapke saare kaam poore ho chuke hain! Bahut umda!".to_string()
}

pub fn next_task_briefing(name: &str, offset: Option<i64>) -> String {
    let mut message = format!("Agla kaam {name} hai.");
    match offset {
        Some(seconds) if seconds > 0 => {
            let minutes_left = ceil_minutes(seconds);
            message.push_str(&format!(
                " Ismein abhi takriban {minutes_left} minute baaqi hain."
            ));
        }
        Some(seconds) if seconds < 0 => {
            let minutes_late = ceil_minutes(seconds.abs());
            message.push_str(&format!(
                " Ye kaam shuru ho chuka hai aur aap {minutes_late} minute late hain."
            ));
        }
        Some(_) => message.push_str(" Aur iska waqt bilkul abhi hai."),
        None => {}
    }
    message
}

fn ceil_minutes(seconds: i64) -> i64 {
    (seconds + 59) / 60
}

#[cfg(test)]
mod tests {
    use super::{Milestone, announce_milestone, milestone_for_offset, next_task_briefing};
    use crate::test_support::pending_task;

    #[test]
    fn countdown_from_sixty_five_fires_on_exact_marks() {
        let fired: Vec<i64> = (0..=65)
            .rev()
            .filter(|offset| milestone_for_offset(*offset).is_some())
            .collect();
        assert_eq!(fired, vec![60, 50, 40, 30, 20, 10, 0]);
    }

    #[test]
    fn minute_marks_fire_up_to_five_minutes_out() {
        let fired: Vec<i64> = (61..=400)
            .rev()
            .filter(|offset| milestone_for_offset(*offset).is_some())
            .collect();
        assert_eq!(fired, vec![300, 240, 180, 120]);
        assert_eq!(milestone_for_offset(180), Some(Milestone::MinutesLeft(3)));
    }

    #[test]
    fn late_fires_on_first_two_seconds_of_each_minute() {
        let fired: Vec<i64> = (-185..0)
            .rev()
            .filter(|offset| milestone_for_offset(*offset).is_some())
            .collect();
        assert_eq!(fired, vec![-60, -61, -120, -121, -180, -181]);
        assert_eq!(milestone_for_offset(-59), None);
    }

    #[test]
    fn announce_updates_last_spoken_and_blocks_same_second() {
        let mut task = pending_task(1, "Standup", "02:00:00 PM");

        let first = announce_milestone(&mut task, 60, 1_000);
        assert_eq!(
            first.as_deref(),
            Some("Aapka task Standup bas 1 minute mein shuru hone wala hai! Tayyar ho jaiye!")
        );
        assert_eq!(task.last_spoken_time, 1_000);

        assert_eq!(announce_milestone(&mut task, 60, 1_000), None);
        assert_eq!(task.last_spoken_time, 1_000);
    }

    #[test]
    fn announce_counts_late_escalations() {
        let mut task = pending_task(1, "Gym", "07:00:00 AM");

        assert!(announce_milestone(&mut task, -60, 100).is_some());
        assert!(announce_milestone(&mut task, -61, 101).is_some());
        assert!(announce_milestone(&mut task, -62, 102).is_none());
        assert!(announce_milestone(&mut task, -120, 160).is_some());

        assert_eq!(task.delay_count, 3);
        assert_eq!(task.last_spoken_time, 160);
    }

    #[test]
    fn quiet_offsets_leave_task_untouched() {
        let mut task = pending_task(1, "Gym", "07:00:00 AM");
        let before = task.clone();
        assert_eq!(announce_milestone(&mut task, 45, 10), None);
        assert_eq!(task, before);
    }

    #[test]
    fn briefing_rounds_minutes_up() {
        assert_eq!(
            next_task_briefing("Lunch", Some(61)),
            "Agla kaam Lunch hai. Ismein abhi takriban 2 minute baaqi hain."
        );
        assert_eq!(
            next_task_briefing("Lunch", Some(-30)),
            "Agla kaam Lunch hai. Ye kaam shuru ho chuka hai aur aap 1 minute late hain."
        );
        assert_eq!(
            next_task_briefing("Lunch", Some(0)),
            "Agla kaam Lunch hai. Aur iska waqt bilkul abhi hai."
        );
        assert_eq!(next_task_briefing("Lunch", None), "Agla kaam Lunch hai.");
    }
}
