use super::{Widget, WidgetAction, WidgetContext};
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime};
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountdownConfig {}

/// Time left until the end of the local day.
#[derive(Default)]
pub struct CountdownWidget;

impl CountdownWidget {
    pub fn new(_cfg: CountdownConfig) -> Self {
        Self
    }
}

/// Remaining time until 23:59:59.999 of `now`'s day, never negative.
pub fn time_until_end_of_day(now: NaiveDateTime) -> ChronoDuration {
    now.date()
        .and_hms_milli_opt(23, 59, 59, 999)
        .map(|end| (end - now).max(ChronoDuration::zero()))
        .unwrap_or_else(ChronoDuration::zero)
}

/// `HH:MM:SS` with whole seconds rounded down.
pub fn format_countdown(left: ChronoDuration) -> String {
    let secs = left.num_seconds().max(0);
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60
    )
}

impl Widget for CountdownWidget {
    fn render(&mut self, ui: &mut egui::Ui, _ctx: &WidgetContext<'_>) -> Option<WidgetAction> {
        let left = time_until_end_of_day(Local::now().naive_local());
        ui.vertical_centered(|ui| {
            ui.label(egui::RichText::new("Until Day End").size(16.0).weak());
            ui.label(
                egui::RichText::new(format_countdown(left))
                    .size(48.0)
                    .monospace()
                    .strong(),
            );
        });
        ui.ctx().request_repaint_after(Duration::from_secs(1));
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
    }

    #[test]
    fn counts_down_with_floor_seconds() {
        assert_eq!(format_countdown(time_until_end_of_day(at(23, 0, 0, 0))), "00:59:59");
        assert_eq!(format_countdown(time_until_end_of_day(at(0, 0, 0, 0))), "23:59:59");
        assert_eq!(format_countdown(time_until_end_of_day(at(12, 30, 15, 500))), "11:29:44");
    }

    #[test]
    fn end_of_day_reads_zero() {
        assert_eq!(format_countdown(time_until_end_of_day(at(23, 59, 59, 999))), "00:00:00");
        assert_eq!(format_countdown(ChronoDuration::seconds(-5)), "00:00:00");
    }
}
