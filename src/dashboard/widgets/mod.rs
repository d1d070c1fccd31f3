use crate::ai::AiWorker;
use crate::dashboard::model::WidgetId;
use eframe::egui;
use serde_json::Value;

mod clock;
mod countdown;
mod link;
mod search;
mod tabs;
mod tasks;
mod unknown;

pub use clock::ClockWidget;
pub use countdown::CountdownWidget;
pub use link::{normalize_url, LinkWidget};
pub use search::{search_url, SearchWidget};
pub use tabs::TabsWidget;
pub use tasks::TasksWidget;
pub use unknown::UnknownWidget;

/// Something a widget asks its host to do after rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetAction {
    /// Open the URL in the system browser.
    OpenUrl(String),
    /// Merge the object into the widget's stored `data`.
    UpdateData(Value),
}

/// Per-frame context handed to a widget body.
#[derive(Clone, Copy)]
pub struct WidgetContext<'a> {
    pub id: &'a WidgetId,
    pub ai: Option<&'a AiWorker>,
}

impl<'a> WidgetContext<'a> {
    pub fn new(id: &'a WidgetId) -> Self {
        Self { id, ai: None }
    }

    pub fn with_ai(mut self, ai: &'a AiWorker) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Stable egui id scoped to this widget instance.
    pub fn ui_id(&self, salt: &str) -> egui::Id {
        egui::Id::new(("dashboard-widget", self.id.as_str(), salt))
    }
}

/// Widget trait implemented by all dashboard widget bodies.
pub trait Widget: Send {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &WidgetContext<'_>) -> Option<WidgetAction>;

    /// Called when the instance's stored `data` changed outside the widget.
    fn on_data_updated(&mut self, _data: &Value) {}
}

/// Shallow merge of `updates` into `base`. A non-object base counts as `{}`;
/// non-object updates leave `base` as it is.
pub(crate) fn merge_json(base: &Value, updates: &Value) -> Value {
    let Value::Object(b) = updates else {
        return base.clone();
    };
    let mut merged = base.as_object().cloned().unwrap_or_default();
    for (k, v) in b {
        merged.insert(k.clone(), v.clone());
    }
    Value::Object(merged)
}

/// Read a typed view of `data`, falling back to the default on any mismatch.
pub(crate) fn typed_data<C: serde::de::DeserializeOwned + Default>(data: &Value) -> C {
    serde_json::from_value(data.clone()).unwrap_or_default()
}
