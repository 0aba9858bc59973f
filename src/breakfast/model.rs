use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::breakfast::storage::KeyValueStorage;

pub const STORAGE_KEY: &str = "breakfast-time";
pub const DEFAULT_HOUR: u32 = 6;
pub const DEFAULT_MINUTE: u32 = 0;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ConfiguredTime {
    hour: u32,
    minute: u32,
}

impl ConfiguredTime {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self {
            hour: hour.min(23),
            minute: minute.min(59),
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        // Fields are clamped on construction, so the fallback is unreachable.
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl Default for ConfiguredTime {
    fn default() -> Self {
        Self {
            hour: DEFAULT_HOUR,
            minute: DEFAULT_MINUTE,
        }
    }
}

pub fn parse_configured_time_text(content: &str) -> ConfiguredTime {
    let value = match serde_json::from_str::<Value>(content) {
        Ok(value) => value,
        Err(err) => {
            debug!("stored breakfast time is not JSON ({err}); using default");
            return ConfiguredTime::default();
        }
    };
    let Some(fields) = value.as_object() else {
        debug!("stored breakfast time is not an object; using default");
        return ConfiguredTime::default();
    };

    ConfiguredTime {
        hour: clamped_field(fields, "hour", DEFAULT_HOUR, 23),
        minute: clamped_field(fields, "minute", DEFAULT_MINUTE, 59),
    }
}

fn clamped_field(fields: &Map<String, Value>, name: &str, default: u32, max: u32) -> u32 {
    match fields.get(name).and_then(Value::as_f64) {
        Some(raw) => raw.floor().clamp(0.0, f64::from(max)) as u32,
        None => default,
    }
}

#[derive(Debug, Serialize)]
struct StoredTime {
    hour: u32,
    minute: u32,
}

pub struct BreakfastTimeStore {
    storage: Box<dyn KeyValueStorage>,
}

impl BreakfastTimeStore {
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> ConfiguredTime {
        match self.storage.get_item(STORAGE_KEY) {
            Ok(Some(content)) => parse_configured_time_text(&content),
            Ok(None) => {
                debug!("no stored breakfast time; using default");
                ConfiguredTime::default()
            }
            Err(err) => {
                warn!("breakfast time storage unavailable, using default: {err}");
                ConfiguredTime::default()
            }
        }
    }

    pub fn save(&mut self, hour: u32, minute: u32) {
        if let Err(err) = self.try_save(hour, minute) {
            warn!("breakfast time was not saved: {err:#}");
        }
    }

    pub fn try_save(&mut self, hour: u32, minute: u32) -> Result<()> {
        let text = serde_json::to_string(&StoredTime { hour, minute })?;
        self.storage
            .set_item(STORAGE_KEY, &text)
            .context("unable to persist breakfast time")?;
        info!("saved breakfast time {hour:02}:{minute:02}");
        Ok(())
    }
}
