use crate::error::AppError;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, Time, UtcOffset};

const TWELVE_HOUR: &[BorrowedFormatItem<'_>] =
    format_description!("[hour repr:12]:[minute]:[second] [period]");
const TWENTY_FOUR_HOUR: &[BorrowedFormatItem<'_>] =
    format_description!("[hour]:[minute]:[second]");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub epoch_millis: i64,
    pub time_of_day: Time,
}

impl Moment {
    pub fn now(offset: UtcOffset) -> Self {
        Self::from_datetime(OffsetDateTime::now_utc().to_offset(offset))
    }

    pub fn from_datetime(datetime: OffsetDateTime) -> Self {
        Self {
            epoch_millis: (datetime.unix_timestamp_nanos() / 1_000_000) as i64,
            time_of_day: datetime.time(),
        }
    }

    pub fn epoch_second(&self) -> i64 {
        self.epoch_millis.div_euclid(1000)
    }
}

/// Must be called before any extra threads are spawned; on unix the
/// offset lookup refuses to run in a multi-threaded process.
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn second_of_day(time: Time) -> i64 {
    let (hour, minute, second) = time.as_hms();
    i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second)
}

pub fn parse_task_time(task_time: &str) -> Option<Time> {
    Time::parse(task_time.trim(), TWELVE_HOUR).ok()
}

pub fn offset_seconds(task_time: &str, now: Time) -> Option<i64> {
    let scheduled = parse_task_time(task_time)?;
    Some(second_of_day(scheduled) - second_of_day(now))
}

pub fn format_time_of_day(time: Time) -> Result<String, AppError> {
    time.format(TWELVE_HOUR)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn normalize_form_time(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("time is required"));
    }

    let mut full = trimmed.to_string();
    if full.len() == 5 {
        full.push_str(":00");
    }

    let parsed = Time::parse(&full, TWENTY_FOUR_HOUR)
        .or_else(|_| Time::parse(trimmed, TWELVE_HOUR))
        .map_err(|_| {
            AppError::invalid_input("time must be HH:MM, HH:MM:SS or hh:mm:ss AM/PM")
        })?;

    format_time_of_day(parsed)
}
