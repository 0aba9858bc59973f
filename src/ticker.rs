use std::time::{Duration, Instant};

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(1);
pub const PULSE_INTERVAL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: Duration,
    next_due: Instant,
}

impl IntervalTimer {
    pub fn new(period: Duration, first_due: Instant) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next_due: first_due,
        }
    }

    /// Fires at most once per call; periods missed while the caller was
    /// asleep are dropped rather than replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        while self.next_due <= now {
            self.next_due += self.period;
        }
        true
    }

    pub fn reset(&mut self, now: Instant) {
        self.next_due = now;
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ScheduleEvents {
    pub refresh: bool,
    pub pulse_toggled: bool,
}

/// Countdown refresh (due immediately) plus the slower cosmetic pulse.
#[derive(Debug, Clone)]
pub struct DisplaySchedule {
    refresh: IntervalTimer,
    pulse: IntervalTimer,
    pulse_on: bool,
}

impl DisplaySchedule {
    pub fn new(now: Instant) -> Self {
        Self {
            refresh: IntervalTimer::new(REFRESH_INTERVAL, now),
            pulse: IntervalTimer::new(PULSE_INTERVAL, now + PULSE_INTERVAL),
            pulse_on: true,
        }
    }

    pub fn poll(&mut self, now: Instant) -> ScheduleEvents {
        let refresh = self.refresh.poll(now);
        let pulse_toggled = self.pulse.poll(now);
        if pulse_toggled {
            self.pulse_on = !self.pulse_on;
        }
        ScheduleEvents {
            refresh,
            pulse_toggled,
        }
    }

    pub fn refresh_now(&mut self, now: Instant) {
        self.refresh.reset(now);
    }

    pub fn pulse_on(&self) -> bool {
        self.pulse_on
    }

    pub fn next_wake(&self, now: Instant) -> Duration {
        self.refresh
            .time_until_due(now)
            .min(self.pulse.time_until_due(now))
    }
}

pub fn sleep_until(deadline: Instant) {
    let now = Instant::now();
    if now >= deadline {
        return;
    }
    std::thread::sleep(deadline.saturating_duration_since(now));
}
