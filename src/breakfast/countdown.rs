use chrono::{DateTime, Days, LocalResult, NaiveDateTime, TimeZone, Timelike};

use crate::breakfast::model::ConfiguredTime;

pub const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ExactDuration {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub formatted: String,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RoundedDuration {
    pub hours: i64,
    pub minutes: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountdownResult<Tz: TimeZone> {
    pub exact: ExactDuration,
    pub rounded: RoundedDuration,
    pub total_seconds: i64,
    pub next_occurrence: DateTime<Tz>,
}

impl<Tz: TimeZone> CountdownResult<Tz> {
    /// Share of a full day already elapsed, for the progress bar.
    pub fn progress_fraction(&self) -> f64 {
        (1.0 - self.total_seconds as f64 / SECONDS_PER_DAY as f64).clamp(0.0, 1.0)
    }
}

pub trait DurationPhrase {
    fn describe(&self, hours: i64, minutes: i64) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChinesePhrase;

impl DurationPhrase for ChinesePhrase {
    fn describe(&self, hours: i64, minutes: i64) -> String {
        let mut text = String::new();
        if hours > 0 {
            text.push_str(&format!("{hours}小时"));
        }
        if minutes > 0 {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&format!("{minutes}分钟"));
        }
        if text.is_empty() {
            text.push_str("不到30分钟");
        }
        text
    }
}

pub fn compute_countdown<Tz>(target: ConfiguredTime, now: &DateTime<Tz>) -> CountdownResult<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    let now = now.with_nanosecond(0).unwrap_or(*now);
    let next = resolve_next_occurrence(target, &now);
    decompose(&now, &next)
}

pub fn resolve_next_occurrence<Tz>(target: ConfiguredTime, now: &DateTime<Tz>) -> DateTime<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    let timezone = now.timezone();
    let wall_time = target.as_naive_time();
    let today = now.date_naive();

    if let Some(candidate) = resolve_wall_clock(&timezone, today.and_time(wall_time))
        && candidate > *now
    {
        return candidate;
    }

    today
        .checked_add_days(Days::new(1))
        .and_then(|tomorrow| resolve_wall_clock(&timezone, tomorrow.and_time(wall_time)))
        .filter(|candidate| candidate > now)
        .unwrap_or_else(|| *now + chrono::Duration::days(1))
}

fn resolve_wall_clock<Tz>(timezone: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    match timezone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(first, _second) => Some(first),
        LocalResult::None => timezone
            .from_local_datetime(&(naive + chrono::Duration::hours(1)))
            .earliest(),
    }
}

pub fn decompose<Tz>(now: &DateTime<Tz>, target: &DateTime<Tz>) -> CountdownResult<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
{
    decompose_with(now, target, &ChinesePhrase)
}

pub fn decompose_with<Tz, P>(
    now: &DateTime<Tz>,
    target: &DateTime<Tz>,
    phrase: &P,
) -> CountdownResult<Tz>
where
    Tz: TimeZone,
    Tz::Offset: Copy,
    P: DurationPhrase + ?Sized,
{
    let diff_ms = target.timestamp_millis() - now.timestamp_millis();
    let total_seconds = diff_ms.div_euclid(1_000).max(0);

    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    let rounded_minutes = if minutes >= 30 { 30 } else { 0 };

    CountdownResult {
        exact: ExactDuration {
            hours,
            minutes,
            seconds,
            formatted: format!("{hours:02}:{minutes:02}:{seconds:02}"),
        },
        rounded: RoundedDuration {
            hours,
            minutes: rounded_minutes,
            text: phrase.describe(hours, rounded_minutes),
        },
        total_seconds,
        next_occurrence: *target,
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TimeDisplayMode {
    Hour24,
    Hour12,
}

pub fn format_breakfast_time(time: ConfiguredTime, mode: TimeDisplayMode) -> String {
    match mode {
        TimeDisplayMode::Hour24 => format!("{:02}:{:02}", time.hour(), time.minute()),
        TimeDisplayMode::Hour12 => {
            let period = if time.hour() >= 12 { "下午" } else { "上午" };
            let display_hour = match time.hour() {
                0 => 12,
                hour if hour > 12 => hour - 12,
                hour => hour,
            };
            format!("{period} {display_hour}:{:02}", time.minute())
        }
    }
}

pub fn format_next_occurrence<Tz>(
    next: &DateTime<Tz>,
    time: ConfiguredTime,
    mode: TimeDisplayMode,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{} at {}",
        next.format("%A, %B %-d"),
        format_breakfast_time(time, mode)
    )
}
