use crate::ai::{AiWorker, ThemeError, THEME_FAILURE_MESSAGE};
use crate::dashboard::model::WidgetKind;
use crate::dashboard::registry::WidgetRegistry;
use eframe::egui;
use std::sync::mpsc::{Receiver, TryRecvError};

/// "AI Theme Assistant" form state.
#[derive(Default)]
pub struct ThemeAssistant {
    pub description: String,
    pending: Option<Receiver<Result<String, ThemeError>>>,
    suggestion: Option<String>,
    error: Option<String>,
}

impl ThemeAssistant {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a request. A blank description is rejected without a model call.
    pub fn submit(&mut self, ai: &AiWorker) {
        if self.description.trim().is_empty() {
            self.error = Some(ThemeError::EmptyDescription.to_string());
            self.suggestion = None;
            return;
        }
        self.error = None;
        self.pending = Some(ai.request_theme(self.description.clone()));
    }

    /// Collect a finished request, if any.
    pub fn poll(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(suggestion)) => {
                self.suggestion = Some(suggestion);
                self.error = None;
                self.pending = None;
            }
            Ok(Err(e)) => {
                self.suggestion = None;
                self.error = Some(e.to_string());
                self.pending = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                tracing::error!("theme worker exited without a result");
                self.suggestion = None;
                self.error = Some(THEME_FAILURE_MESSAGE.to_string());
                self.pending = None;
            }
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, ai: &AiWorker) {
        self.poll();
        ui.heading("AI Theme Assistant");
        ui.label("Describe the look you want and get a theme idea.");
        ui.add(
            egui::TextEdit::multiline(&mut self.description)
                .hint_text("e.g. a dark, moody theme with neon accents")
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        );
        let label = if self.is_pending() {
            "Generating..."
        } else {
            "Generate Theme Idea"
        };
        if ui
            .add_enabled(!self.is_pending(), egui::Button::new(label))
            .clicked()
        {
            self.submit(ai);
        }
        if let Some(err) = &self.error {
            ui.colored_label(egui::Color32::RED, err);
        }
        if let Some(suggestion) = &self.suggestion {
            ui.separator();
            ui.strong("Theme Suggestion");
            ui.label(suggestion);
        }
    }
}

/// Left-hand panel with the add-widget menu and the theme assistant.
#[derive(Default)]
pub struct Toolbar {
    open: bool,
    pub theme: ThemeAssistant,
}

impl Toolbar {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Top-left menu button.
    pub fn menu_button(&mut self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("dashboard-menu-button"))
            .anchor(egui::Align2::LEFT_TOP, [16.0, 16.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui
                    .button(egui::RichText::new("☰").size(20.0))
                    .on_hover_text("Add widgets")
                    .clicked()
                {
                    self.toggle();
                }
            });
    }

    /// Draw the side panel when open. Returns the kind the user picked.
    pub fn panel(
        &mut self,
        ctx: &egui::Context,
        registry: &WidgetRegistry,
        ai: &AiWorker,
    ) -> Option<WidgetKind> {
        if !self.open {
            return None;
        }
        let mut picked = None;
        egui::SidePanel::left("dashboard-toolbar")
            .resizable(false)
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.add_space(48.0);
                ui.heading("Add Widgets");
                for entry in registry.menu() {
                    let text = format!("{}  {}", entry.icon, entry.name);
                    if ui
                        .add_sized([ui.available_width(), 32.0], egui::Button::new(text))
                        .clicked()
                    {
                        picked = Some(entry.kind);
                    }
                }
                ui.separator();
                self.theme.ui(ui, ai);
            });
        picked
    }
}
