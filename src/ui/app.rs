use std::fs;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Color32, Layout, RichText, TopBottomPanel, Ui};
use tracing::{debug, info, warn};

use crate::breakfast::countdown::{
    CountdownResult, TimeDisplayMode, compute_countdown, format_breakfast_time,
    format_next_occurrence,
};
use crate::breakfast::model::{BreakfastTimeStore, ConfiguredTime};
use crate::ticker::DisplaySchedule;
use crate::time_provider::SelectedTimeProvider;
use crate::ui::settings::{SettingsDraft, hour_option_label, minute_option_label};

const CJK_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/wenquanyi/wqy-microhei/wqy-microhei.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Light.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\simhei.ttf",
];

const TITLE: Color32 = Color32::from_rgb(226, 234, 246);
const MUTED: Color32 = Color32::from_rgb(150, 171, 191);
const ACCENT: Color32 = Color32::from_rgb(129, 140, 248);
const EXACT: Color32 = Color32::from_rgb(169, 188, 209);

pub fn run_gui(
    selected_provider: SelectedTimeProvider,
    store: BreakfastTimeStore,
    override_time: Option<ConfiguredTime>,
    mode: TimeDisplayMode,
) -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Time to Cook")
            .with_inner_size([900.0, 680.0])
            .with_min_inner_size([560.0, 480.0]),
        ..Default::default()
    };

    let app = CountdownApp::new(selected_provider, store, override_time, mode)?;

    eframe::run_native(
        "Time to Cook",
        native_options,
        Box::new(move |cc| {
            configure_theme(&cc.egui_ctx);
            install_cjk_font(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to launch Time to Cook window: {err}"))?;

    Ok(())
}

fn configure_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.override_text_color = Some(TITLE);
    visuals.panel_fill = Color32::from_rgb(12, 14, 24);
    visuals.window_fill = Color32::from_rgb(20, 22, 36);
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(28, 30, 48);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(44, 46, 74);
    visuals.widgets.active.bg_fill = Color32::from_rgb(64, 58, 110);
    visuals.selection.bg_fill = Color32::from_rgb(99, 102, 241);
    ctx.set_visuals(visuals);
}

fn install_cjk_font(ctx: &egui::Context) {
    let Some((path, bytes)) = CJK_FONT_CANDIDATES
        .iter()
        .find_map(|path| fs::read(path).ok().map(|bytes| (*path, bytes)))
    else {
        warn!("no CJK font found; countdown text may not render");
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        "cjk".to_string(),
        Arc::new(egui::FontData::from_owned(bytes)),
    );
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push("cjk".to_string());
    }
    ctx.set_fonts(fonts);
    debug!("loaded CJK fallback font from {path}");
}

struct CountdownApp {
    selected_provider: SelectedTimeProvider,
    store: BreakfastTimeStore,
    configured: ConfiguredTime,
    mode: TimeDisplayMode,
    latest_now_local: DateTime<Local>,
    countdown: CountdownResult<Local>,
    schedule: DisplaySchedule,
    draft: SettingsDraft,
    status_message: Option<String>,
}

impl CountdownApp {
    fn new(
        selected_provider: SelectedTimeProvider,
        store: BreakfastTimeStore,
        override_time: Option<ConfiguredTime>,
        mode: TimeDisplayMode,
    ) -> Result<Self> {
        let configured = override_time.unwrap_or_else(|| store.load());
        let now_local = selected_provider.provider.now()?;
        let countdown = compute_countdown(configured, &now_local);
        info!(
            "counting down to {:02}:{:02} using {} clock",
            configured.hour(),
            configured.minute(),
            selected_provider.label
        );
        Ok(Self {
            selected_provider,
            store,
            configured,
            mode,
            latest_now_local: now_local,
            countdown,
            schedule: DisplaySchedule::new(Instant::now()),
            draft: SettingsDraft::new(configured),
            status_message: None,
        })
    }

    fn refresh_countdown(&mut self) -> Result<()> {
        self.latest_now_local = self.selected_provider.provider.now()?;
        self.countdown = compute_countdown(self.configured, &self.latest_now_local);
        Ok(())
    }

    fn show_header(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(self.latest_now_local.format("%A, %B %-d %Y").to_string())
                    .color(MUTED),
            );
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button(RichText::new("Settings").strong()).clicked() {
                    self.draft.open(self.configured);
                }
                if ui
                    .button(match self.mode {
                        TimeDisplayMode::Hour12 => "Switch to 24h",
                        TimeDisplayMode::Hour24 => "Switch to 12h",
                    })
                    .clicked()
                {
                    self.mode = match self.mode {
                        TimeDisplayMode::Hour12 => TimeDisplayMode::Hour24,
                        TimeDisplayMode::Hour24 => TimeDisplayMode::Hour12,
                    };
                }
            });
        });
    }

    fn show_countdown(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.label(RichText::new("Time to Cook").size(44.0).strong());
            ui.label(
                RichText::new("Your elegant countdown to the next delicious meal")
                    .size(18.0)
                    .color(MUTED),
            );
            ui.add_space(32.0);

            egui::Frame::group(ui.style())
                .inner_margin(32.0)
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        let (size, color) = if self.schedule.pulse_on() {
                            (72.0, TITLE)
                        } else {
                            (70.5, TITLE.gamma_multiply(0.9))
                        };
                        ui.label(
                            RichText::new(&self.countdown.rounded.text)
                                .size(size)
                                .color(color)
                                .strong(),
                        );
                        ui.add_space(12.0);
                        ui.label(
                            RichText::new(format!("● {} ●", self.countdown.exact.formatted))
                                .size(22.0)
                                .monospace()
                                .color(EXACT),
                        );
                        ui.add_space(12.0);
                        ui.add(
                            egui::ProgressBar::new(self.countdown.progress_fraction() as f32)
                                .desired_width(360.0)
                                .fill(ACCENT),
                        );
                    });
                });

            ui.add_space(16.0);
            ui.label(RichText::new("Time until breakfast at").color(MUTED));
            ui.label(
                RichText::new(format_breakfast_time(self.configured, self.mode))
                    .size(20.0)
                    .strong(),
            );
        });
    }

    fn show_settings_window(&mut self, ctx: &egui::Context) {
        if !self.draft.is_open() {
            return;
        }
        if ctx.input(|input| input.key_pressed(egui::Key::Escape)) {
            self.draft.cancel(self.configured);
            return;
        }

        let mut save_clicked = false;
        let mut cancel_clicked = false;
        egui::Window::new("Breakfast Time")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new("Set your ideal breakfast time").color(MUTED));
                ui.add_space(8.0);
                ui.label("Current setting");
                ui.label(
                    RichText::new(format_breakfast_time(self.configured, self.mode)).strong(),
                );
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    ui.label("Hour");
                    egui::ComboBox::from_id_salt("breakfast_hour")
                        .selected_text(hour_option_label(self.draft.hour))
                        .show_ui(ui, |ui| {
                            for hour in 0..24 {
                                ui.selectable_value(
                                    &mut self.draft.hour,
                                    hour,
                                    hour_option_label(hour),
                                );
                            }
                        });
                    ui.label("Minute");
                    egui::ComboBox::from_id_salt("breakfast_minute")
                        .selected_text(minute_option_label(self.draft.minute))
                        .show_ui(ui, |ui| {
                            for minute in 0..60 {
                                ui.selectable_value(
                                    &mut self.draft.minute,
                                    minute,
                                    minute_option_label(minute),
                                );
                            }
                        });
                });

                ui.add_space(8.0);
                ui.label(RichText::new("Preview").color(ACCENT));
                ui.label(
                    RichText::new(format_breakfast_time(self.draft.preview(), self.mode))
                        .size(18.0)
                        .strong(),
                );
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    cancel_clicked = ui.button("Cancel").clicked();
                    save_clicked = ui.button(RichText::new("Save").strong()).clicked();
                });
            });

        if cancel_clicked {
            self.draft.cancel(self.configured);
        } else if save_clicked {
            self.configured = self.draft.save(&mut self.store);
            self.schedule.refresh_now(Instant::now());
            self.status_message = Some(format!(
                "Breakfast time set to {}",
                format_breakfast_time(self.configured, self.mode)
            ));
        }
    }
}

impl eframe::App for CountdownApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let events = self.schedule.poll(Instant::now());
        if events.refresh
            && let Err(err) = self.refresh_countdown()
        {
            self.status_message = Some(format!("Clock error: {err}"));
        }

        TopBottomPanel::top("header")
            .resizable(false)
            .show(ctx, |ui| self.show_header(ui));

        TopBottomPanel::bottom("footer")
            .resizable(false)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("Next breakfast scheduled for").color(MUTED));
                    ui.label(
                        RichText::new(format_next_occurrence(
                            &self.countdown.next_occurrence,
                            self.configured,
                            self.mode,
                        ))
                        .strong(),
                    );
                    if let Some(msg) = &self.status_message {
                        ui.label(RichText::new(msg).color(ACCENT));
                    }
                    ui.label(
                        RichText::new("Click the settings button to customize your breakfast time")
                            .size(11.0)
                            .color(MUTED),
                    );
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| self.show_countdown(ui));

        self.show_settings_window(ctx);

        ctx.request_repaint_after(self.schedule.next_wake(Instant::now()));
    }
}
