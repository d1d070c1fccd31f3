use super::{Widget, WidgetAction, WidgetContext};
use chrono::{Local, NaiveDateTime, Timelike};
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockConfig {}

/// Local time and long date.
#[derive(Default)]
pub struct ClockWidget;

impl ClockWidget {
    pub fn new(_cfg: ClockConfig) -> Self {
        Self
    }
}

/// `("14:05", "Monday, January 1, 2024")`.
pub fn clock_lines(now: NaiveDateTime) -> (String, String) {
    (
        now.format("%H:%M").to_string(),
        now.format("%A, %B %-d, %Y").to_string(),
    )
}

impl Widget for ClockWidget {
    fn render(&mut self, ui: &mut egui::Ui, _ctx: &WidgetContext<'_>) -> Option<WidgetAction> {
        let now = Local::now().naive_local();
        let (time, date) = clock_lines(now);
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new(time).size(56.0).strong());
            ui.label(egui::RichText::new(date).size(16.0).weak());
        });
        let until_next_second = 1000u64.saturating_sub(u64::from(now.nanosecond() / 1_000_000));
        ui.ctx()
            .request_repaint_after(Duration::from_millis(until_next_second.max(1)));
        None
    }
}
