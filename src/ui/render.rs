use chrono::{DateTime, Local};

use crate::breakfast::countdown::{
    CountdownResult, TimeDisplayMode, format_breakfast_time, format_next_occurrence,
};
use crate::breakfast::model::ConfiguredTime;

pub const PROGRESS_BAR_WIDTH: usize = 32;

pub struct UiSnapshot<'a> {
    pub countdown: &'a CountdownResult<Local>,
    pub configured: ConfiguredTime,
    pub local_now: DateTime<Local>,
    pub mode: TimeDisplayMode,
}

pub fn render_lines(snapshot: &UiSnapshot<'_>) -> Vec<String> {
    let countdown = snapshot.countdown;
    let fraction = countdown.progress_fraction();
    vec![
        format!("Time to Cook  [{}]", snapshot.local_now.format("%H:%M:%S")),
        format!("  {}", countdown.rounded.text),
        format!("  {}", countdown.exact.formatted),
        format!(
            "  {} {:>3.0}%",
            progress_bar(fraction, PROGRESS_BAR_WIDTH),
            fraction * 100.0
        ),
        format!(
            "Time until breakfast at {}",
            format_breakfast_time(snapshot.configured, snapshot.mode)
        ),
        format!(
            "Next breakfast scheduled for {}",
            format_next_occurrence(&countdown.next_occurrence, snapshot.configured, snapshot.mode)
        ),
    ]
}

pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::breakfast::countdown::compute_countdown;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 4), "[----]");
        assert_eq!(progress_bar(0.5, 4), "[##--]");
        assert_eq!(progress_bar(1.7, 4), "[####]");
    }

    #[test]
    fn snapshot_lines_include_both_durations_and_target() {
        let now = Local
            .with_ymd_and_hms(2026, 1, 15, 5, 0, 0)
            .earliest()
            .expect("valid local time");
        let configured = ConfiguredTime::new(6, 0);
        let countdown = compute_countdown(configured, &now);
        let lines = render_lines(&UiSnapshot {
            countdown: &countdown,
            configured,
            local_now: now,
            mode: TimeDisplayMode::Hour12,
        });

        assert_eq!(lines[1].trim(), "1小时");
        assert_eq!(lines[2].trim(), "01:00:00");
        assert_eq!(lines[4], "Time until breakfast at 上午 6:00");
        assert_eq!(
            lines[5],
            "Next breakfast scheduled for Thursday, January 15 at 上午 6:00"
        );
    }
}
