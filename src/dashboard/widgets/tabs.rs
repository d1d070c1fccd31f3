use super::{typed_data, Widget, WidgetAction, WidgetContext};
use crate::dashboard::model::TabsData;
use eframe::egui;
use serde_json::Value;

/// Grid of quick-launch buttons.
#[derive(Default)]
pub struct TabsWidget {
    data: TabsData,
}

impl TabsWidget {
    pub fn new(data: TabsData) -> Self {
        Self { data }
    }
}

impl Widget for TabsWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &WidgetContext<'_>) -> Option<WidgetAction> {
        if self.data.tabs.is_empty() {
            ui.weak("No tabs configured.");
            return None;
        }
        let mut out = None;
        let spacing = ui.spacing().item_spacing.x;
        let button_width = ((ui.available_width() - spacing) / 2.0).max(60.0);
        egui::Grid::new(ctx.ui_id("tabs-grid"))
            .num_columns(2)
            .spacing([spacing, spacing])
            .show(ui, |ui| {
                for (i, tab) in self.data.tabs.iter().enumerate() {
                    let button = egui::Button::new(&tab.name).min_size(egui::vec2(button_width, 36.0));
                    if ui.add(button).on_hover_text(&tab.url).clicked() {
                        out = Some(WidgetAction::OpenUrl(tab.url.clone()));
                    }
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
        out
    }

    fn on_data_updated(&mut self, data: &Value) {
        self.data = typed_data(data);
    }
}
