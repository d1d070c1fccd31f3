use super::{typed_data, Widget, WidgetAction, WidgetContext};
use crate::dashboard::model::LinkData;
use eframe::egui;
use serde_json::{json, Value};

/// Add `https://` when no http(s) scheme is present and check the result
/// parses as a URL with a host.
pub fn normalize_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let lower = raw.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    let parsed = url::Url::parse(&candidate).ok()?;
    parsed.host_str()?;
    Some(candidate)
}

/// Single bookmark with an inline editor.
pub struct LinkWidget {
    data: LinkData,
    editing: bool,
    title: String,
    url: String,
    error: Option<String>,
}

impl Default for LinkWidget {
    fn default() -> Self {
        Self::new(LinkData::default())
    }
}

impl LinkWidget {
    pub fn new(data: LinkData) -> Self {
        Self {
            editing: data.url.is_empty(),
            title: data.title.clone(),
            url: data.url.clone(),
            data,
            error: None,
        }
    }

    fn start_editing(&mut self) {
        self.title = self.data.title.clone();
        self.url = self.data.url.clone();
        self.error = None;
        self.editing = true;
    }

    fn save(&mut self) -> Option<WidgetAction> {
        let title = self.title.trim();
        if title.is_empty() || self.url.trim().is_empty() {
            self.error = Some("Title and URL are required.".into());
            return None;
        }
        let Some(url) = normalize_url(&self.url) else {
            self.error = Some("Enter a valid URL.".into());
            return None;
        };
        self.data = LinkData {
            title: title.to_string(),
            url: url.clone(),
        };
        self.url = url;
        self.error = None;
        self.editing = false;
        Some(WidgetAction::UpdateData(json!({
            "title": self.data.title,
            "url": self.data.url,
        })))
    }

    fn editor_ui(&mut self, ui: &mut egui::Ui, ctx: &WidgetContext<'_>) -> Option<WidgetAction> {
        let mut out = None;
        egui::Grid::new(ctx.ui_id("link-editor"))
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Title");
                ui.add(egui::TextEdit::singleline(&mut self.title).hint_text("e.g. Rust Docs"));
                ui.end_row();
                ui.label("URL");
                ui.add(egui::TextEdit::singleline(&mut self.url).hint_text("docs.rs"));
                ui.end_row();
            });
        if let Some(err) = &self.error {
            ui.colored_label(egui::Color32::RED, err);
        }
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                out = self.save();
            }
            if !self.data.url.is_empty() && ui.button("Cancel").clicked() {
                self.editing = false;
                self.error = None;
            }
        });
        out
    }
}

impl Widget for LinkWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &WidgetContext<'_>) -> Option<WidgetAction> {
        if self.editing {
            return self.editor_ui(ui, ctx);
        }
        let mut out = None;
        ui.horizontal(|ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                if ui.small_button("⚙").on_hover_text("Edit link").clicked() {
                    self.start_editing();
                }
            });
        });
        if !self.editing {
            ui.vertical_centered(|ui| {
                let title = if self.data.title.is_empty() {
                    self.data.url.as_str()
                } else {
                    self.data.title.as_str()
                };
                let resp = ui
                    .add(
                        egui::Label::new(egui::RichText::new(title).size(22.0).strong())
                            .sense(egui::Sense::click()),
                    )
                    .on_hover_text(&self.data.url);
                if resp.clicked() {
                    out = Some(WidgetAction::OpenUrl(self.data.url.clone()));
                }
                ui.weak(&self.data.url);
            });
        }
        out
    }

    fn on_data_updated(&mut self, data: &Value) {
        self.data = typed_data(data);
        if !self.editing {
            self.title = self.data.title.clone();
            self.url = self.data.url.clone();
        }
        if self.data.url.is_empty() {
            self.editing = true;
        }
    }
}
