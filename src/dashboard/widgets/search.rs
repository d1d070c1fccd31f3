use super::{typed_data, Widget, WidgetAction, WidgetContext};
use crate::ai::SearchReply;
use crate::dashboard::model::SearchData;
use eframe::egui;
use serde_json::Value;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

/// Quiet period after the last keystroke before suggestions are requested.
pub const SUGGESTION_DEBOUNCE: Duration = Duration::from_millis(300);

/// Web search URL for `query`, or `None` when the query is blank.
pub fn search_url(engine: &str, query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    Some(format!("{engine}?q={}", urlencoding::encode(query)))
}

/// Search box with debounced AI completions.
pub struct SearchWidget {
    data: SearchData,
    query: String,
    edited_at: Option<Instant>,
    requested: String,
    latest_request: u64,
    suggestions: Vec<String>,
    tx: Sender<SearchReply>,
    rx: Receiver<SearchReply>,
}

impl Default for SearchWidget {
    fn default() -> Self {
        Self::new(SearchData::default())
    }
}

impl SearchWidget {
    pub fn new(data: SearchData) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            data,
            query: String::new(),
            edited_at: None,
            requested: String::new(),
            latest_request: 0,
            suggestions: Vec::new(),
            tx,
            rx,
        }
    }

    /// Keep only the reply for the most recent request.
    fn drain_replies(&mut self) {
        while let Ok(reply) = self.rx.try_recv() {
            if reply.request_id == self.latest_request && reply.query == self.requested {
                self.suggestions = reply.suggestions;
            } else {
                tracing::trace!(request_id = reply.request_id, "dropping stale suggestions");
            }
        }
    }

    fn on_edit(&mut self, now: Instant) {
        self.edited_at = Some(now);
        if self.query.trim().is_empty() {
            self.suggestions.clear();
            self.requested.clear();
            self.latest_request += 1;
            self.edited_at = None;
        }
    }

    /// Fire a request once the debounce window has passed. Returns how long
    /// to wait otherwise.
    fn maybe_request(&mut self, ctx: &WidgetContext<'_>, now: Instant) -> Option<Duration> {
        let edited_at = self.edited_at?;
        let elapsed = now.saturating_duration_since(edited_at);
        if elapsed < SUGGESTION_DEBOUNCE {
            return Some(SUGGESTION_DEBOUNCE - elapsed);
        }
        self.edited_at = None;
        let query = self.query.trim().to_string();
        if query == self.requested {
            return None;
        }
        let ai = ctx.ai.filter(|ai| ai.is_available() && self.data.suggestions)?;
        self.latest_request += 1;
        self.requested = query.clone();
        ai.request_search(self.latest_request, query, self.tx.clone());
        None
    }

    fn submit(&mut self, query: &str) -> Option<WidgetAction> {
        let url = search_url(&self.data.engine, query)?;
        self.query.clear();
        self.suggestions.clear();
        self.requested.clear();
        self.edited_at = None;
        self.latest_request += 1;
        Some(WidgetAction::OpenUrl(url))
    }
}

impl Widget for SearchWidget {
    fn render(&mut self, ui: &mut egui::Ui, ctx: &WidgetContext<'_>) -> Option<WidgetAction> {
        self.drain_replies();
        let mut action = None;
        ui.horizontal(|ui| {
            let field_width = (ui.available_width() - 72.0).max(80.0);
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.query)
                    .id(ctx.ui_id("search-query"))
                    .hint_text("Search the web...")
                    .desired_width(field_width),
            );
            if resp.changed() {
                self.on_edit(Instant::now());
            }
            let enter = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Search").clicked() || enter {
                let query = self.query.clone();
                action = self.submit(&query);
            }
        });
        if action.is_none() && !self.suggestions.is_empty() {
            let mut picked = None;
            egui::ScrollArea::vertical()
                .id_source(ctx.ui_id("search-suggestions"))
                .show(ui, |ui| {
                    for suggestion in &self.suggestions {
                        if ui.selectable_label(false, suggestion).clicked() {
                            picked = Some(suggestion.clone());
                        }
                    }
                });
            if let Some(picked) = picked {
                action = self.submit(&picked);
            }
        }
        if let Some(wait) = self.maybe_request(ctx, Instant::now()) {
            ui.ctx().request_repaint_after(wait);
        }
        action
    }

    fn on_data_updated(&mut self, data: &Value) {
        self.data = typed_data(data);
    }
}
