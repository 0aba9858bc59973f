use crate::breakfast::model::{BreakfastTimeStore, ConfiguredTime};

/// Pending edits in the breakfast-time dialog; nothing is persisted until
/// `save`.
#[derive(Debug, Clone)]
pub struct SettingsDraft {
    open: bool,
    pub hour: u32,
    pub minute: u32,
}

impl SettingsDraft {
    pub fn new(current: ConfiguredTime) -> Self {
        Self {
            open: false,
            hour: current.hour(),
            minute: current.minute(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self, current: ConfiguredTime) {
        self.hour = current.hour();
        self.minute = current.minute();
        self.open = true;
    }

    pub fn cancel(&mut self, current: ConfiguredTime) {
        self.hour = current.hour();
        self.minute = current.minute();
        self.open = false;
    }

    pub fn preview(&self) -> ConfiguredTime {
        ConfiguredTime::new(self.hour, self.minute)
    }

    pub fn save(&mut self, store: &mut BreakfastTimeStore) -> ConfiguredTime {
        store.save(self.hour, self.minute);
        self.open = false;
        self.preview()
    }
}

pub fn hour_option_label(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        1..=11 => format!("{hour} AM"),
        12 => "12 PM".to_string(),
        _ => format!("{} PM", hour - 12),
    }
}

pub fn minute_option_label(minute: u32) -> String {
    format!("{minute:02}")
}
