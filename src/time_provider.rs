use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

pub trait TimeProvider: Send + Sync {
    fn now(&self) -> Result<DateTime<Local>>;
}

pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> Result<DateTime<Local>> {
        Ok(Local::now())
    }
}

/// Starts at a fixed local datetime and then runs at wall-clock rate.
pub struct PinnedTimeProvider {
    anchor: DateTime<Local>,
    started: Instant,
}

impl PinnedTimeProvider {
    pub fn new(start: NaiveDateTime) -> Result<Self> {
        let anchor = Local
            .from_local_datetime(&start)
            .earliest()
            .ok_or_else(|| anyhow!("start time {start} does not exist in the local timezone"))?;
        Ok(Self {
            anchor,
            started: Instant::now(),
        })
    }
}

impl TimeProvider for PinnedTimeProvider {
    fn now(&self) -> Result<DateTime<Local>> {
        let elapsed = chrono::Duration::from_std(self.started.elapsed())
            .context("pinned clock elapsed time out of range")?;
        Ok(self.anchor + elapsed)
    }
}

pub struct SelectedTimeProvider {
    pub provider: Box<dyn TimeProvider>,
    pub label: &'static str,
}

pub fn select_provider(pinned_start: Option<NaiveDateTime>) -> Result<SelectedTimeProvider> {
    match pinned_start {
        Some(start) => Ok(SelectedTimeProvider {
            provider: Box::new(PinnedTimeProvider::new(start)?),
            label: "PINNED",
        }),
        None => Ok(SelectedTimeProvider {
            provider: Box::new(SystemTimeProvider),
            label: "SYSTEM",
        }),
    }
}

pub fn parse_local_datetime(input: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M"))
        .map_err(|_| anyhow!("invalid datetime '{input}', expected YYYY-MM-DDTHH:MM[:SS]"))
}
