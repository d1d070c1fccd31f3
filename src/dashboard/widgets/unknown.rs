use super::{Widget, WidgetAction, WidgetContext};
use eframe::egui;

/// Placeholder for a kind with no registered body.
pub struct UnknownWidget {
    tag: String,
}

impl UnknownWidget {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl Widget for UnknownWidget {
    fn render(&mut self, ui: &mut egui::Ui, _ctx: &WidgetContext<'_>) -> Option<WidgetAction> {
        ui.vertical_centered(|ui| {
            ui.label("Unknown Widget");
            ui.weak(&self.tag);
        });
        None
    }
}
