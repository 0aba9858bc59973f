mod breakfast;
mod ticker;
mod time_provider;
mod ui;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveTime, Timelike};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::breakfast::countdown::{TimeDisplayMode, compute_countdown, format_breakfast_time};
use crate::breakfast::model::{BreakfastTimeStore, ConfiguredTime};
use crate::breakfast::storage::{FileStorage, KeyValueStorage, MemoryStorage};
use crate::ticker::{IntervalTimer, REFRESH_INTERVAL, sleep_until};
use crate::time_provider::{SelectedTimeProvider, parse_local_datetime, select_provider};
use crate::ui::render::{UiSnapshot, render_lines};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliTimeFormat {
    #[value(name = "12h")]
    Hour12,
    #[value(name = "24h")]
    Hour24,
}

impl From<CliTimeFormat> for TimeDisplayMode {
    fn from(value: CliTimeFormat) -> Self {
        match value {
            CliTimeFormat::Hour12 => TimeDisplayMode::Hour12,
            CliTimeFormat::Hour24 => TimeDisplayMode::Hour24,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "timetocook",
    version,
    about = "Countdown to your next breakfast"
)]
struct Cli {
    /// JSON file holding the saved breakfast time
    #[arg(long, default_value = "timetocook.json")]
    storage: PathBuf,

    /// Keep the breakfast time in memory only
    #[arg(long, conflicts_with = "storage")]
    ephemeral: bool,

    /// Count down to this hour for this run without saving it
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=23))]
    hour: Option<u32>,

    /// Count down to this minute for this run without saving it
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=59))]
    minute: Option<u32>,

    /// Save a new breakfast time (HH:MM) and exit
    #[arg(long, value_name = "HH:MM")]
    set: Option<String>,

    /// Print one countdown snapshot and exit
    #[arg(long, conflicts_with = "watch")]
    once: bool,

    /// Print a countdown snapshot every second in the terminal
    #[arg(long)]
    watch: bool,

    /// Stop watching after this many snapshots (0 runs until interrupted)
    #[arg(long, default_value_t = 0, requires = "watch")]
    ticks: u64,

    /// Start the clock at this local datetime instead of now
    #[arg(long, value_name = "YYYY-MM-DDTHH:MM:SS")]
    now: Option<String>,

    #[arg(long, value_enum, default_value_t = CliTimeFormat::Hour12)]
    time_format: CliTimeFormat,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    fn override_time(&self, stored: ConfiguredTime) -> Option<ConfiguredTime> {
        if self.hour.is_none() && self.minute.is_none() {
            return None;
        }
        Some(ConfiguredTime::new(
            self.hour.unwrap_or(stored.hour()),
            self.minute.unwrap_or(stored.minute()),
        ))
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("timetocook={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let storage: Box<dyn KeyValueStorage> = if cli.ephemeral {
        debug!("using in-memory storage");
        Box::new(MemoryStorage::new())
    } else {
        let file = FileStorage::new(&cli.storage);
        debug!("using storage file {}", file.path().display());
        Box::new(file)
    };
    let mut store = BreakfastTimeStore::new(storage);
    let mode = TimeDisplayMode::from(cli.time_format);

    if let Some(text) = cli.set.as_deref() {
        let time = parse_breakfast_time(text)?;
        store.try_save(time.hour(), time.minute())?;
        println!("Breakfast time saved: {}", format_breakfast_time(time, mode));
        return Ok(());
    }

    let pinned_start = cli
        .now
        .as_deref()
        .map(parse_local_datetime)
        .transpose()
        .context("invalid --now value")?;
    let selected = select_provider(pinned_start)?;
    let stored = store.load();
    let override_time = cli.override_time(stored);

    if cli.once || cli.watch {
        let configured = override_time.unwrap_or(stored);
        let limit = if cli.once { 1 } else { cli.ticks };
        return run_terminal(&selected, configured, mode, limit);
    }

    ui::app::run_gui(selected, store, override_time, mode)
}

fn run_terminal(
    selected: &SelectedTimeProvider,
    configured: ConfiguredTime,
    mode: TimeDisplayMode,
    limit: u64,
) -> Result<()> {
    info!(
        "counting down to {} using {} clock",
        format_breakfast_time(configured, mode),
        selected.label
    );
    let mut timer = IntervalTimer::new(REFRESH_INTERVAL, Instant::now());
    let mut printed = 0_u64;
    loop {
        if timer.poll(Instant::now()) {
            let local_now = selected.provider.now()?;
            let countdown = compute_countdown(configured, &local_now);
            let lines = render_lines(&UiSnapshot {
                countdown: &countdown,
                configured,
                local_now,
                mode,
            });
            if printed > 0 {
                println!();
            }
            for line in lines {
                println!("{line}");
            }
            printed += 1;
            if limit > 0 && printed >= limit {
                return Ok(());
            }
        }
        sleep_until(timer.next_due());
    }
}

fn parse_breakfast_time(input: &str) -> Result<ConfiguredTime> {
    let time = NaiveTime::parse_from_str(input, "%H:%M")
        .map_err(|_| anyhow!("invalid time '{input}', expected HH:MM"))?;
    Ok(ConfiguredTime::new(time.hour(), time.minute()))
}
