mod toolbar;

pub use toolbar::{ThemeAssistant, Toolbar};

use crate::ai::{model_from_settings, AiWorker, TextModel};
use crate::dashboard::persistence::{FileStore, LayoutSource, LayoutStore};
use crate::dashboard::{Board, Canvas, WidgetRegistry};
use crate::settings::Settings;
use crate::toast_log::append_toast_log;
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const SAVED_TITLE: &str = "Layout Saved";
pub const SAVED_BODY: &str = "Your widget layout has been saved.";

fn push_toast(toasts: &mut Toasts, log_path: &Path, toast: Toast) {
    append_toast_log(log_path, toast.text.text());
    toasts.add(toast);
}

/// The dashboard window: toolbar, canvas and save button around one [`Board`].
pub struct DashboardApp {
    board: Board,
    canvas: Canvas,
    toolbar: Toolbar,
    ai: AiWorker,
    toasts: Toasts,
    enable_toasts: bool,
    toast_duration: f32,
    toast_log_path: PathBuf,
}

impl DashboardApp {
    /// Open the layout store under `settings.layout_dir` and load the board.
    pub fn new(ctx: &egui::Context, settings: Settings) -> Self {
        let store = LayoutStore::new(FileStore::new(&settings.layout_dir));
        let board = Board::load(store);
        let model = model_from_settings(&settings.ai);
        Self::with_board(ctx, settings, board, model)
    }

    pub fn with_board(
        ctx: &egui::Context,
        settings: Settings,
        board: Board,
        model: Arc<dyn TextModel>,
    ) -> Self {
        let repaint_ctx = ctx.clone();
        let ai = AiWorker::new(model).with_repaint(move || repaint_ctx.request_repaint());
        let mut app = Self {
            board,
            canvas: Canvas::new(WidgetRegistry::with_defaults()),
            toolbar: Toolbar::default(),
            ai,
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]),
            enable_toasts: settings.enable_toasts,
            toast_duration: settings.toast_duration,
            toast_log_path: settings.toast_log_path,
        };
        if app.board.source() == LayoutSource::Recovered {
            app.add_toast(
                ToastKind::Warning,
                "Saved layout could not be read; showing the default layout.".into(),
            );
        }
        app
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    fn add_toast(&mut self, kind: ToastKind, text: String) {
        if !self.enable_toasts {
            return;
        }
        push_toast(
            &mut self.toasts,
            &self.toast_log_path,
            Toast {
                text: text.into(),
                kind,
                options: ToastOptions::default().duration_in_seconds(self.toast_duration as f64),
            },
        );
    }

    /// Persist the board and report the outcome. Returns whether the write
    /// succeeded.
    pub fn save_layout(&mut self) -> bool {
        match self.board.save_layout() {
            Ok(()) => {
                self.add_toast(ToastKind::Success, format!("{SAVED_TITLE} - {SAVED_BODY}"));
                true
            }
            Err(e) => {
                self.add_toast(ToastKind::Error, format!("Failed to save layout: {e:#}"));
                false
            }
        }
    }

    fn open_url(&mut self, url: &str) {
        tracing::debug!(%url, "opening link");
        if let Err(e) = open::that(url) {
            tracing::error!("failed to open {url}: {e}");
            self.add_toast(ToastKind::Error, format!("Failed to open {url}"));
        }
    }

    fn save_button(&mut self, ctx: &egui::Context) {
        let label = if self.board.is_dirty() {
            "💾 Save Layout •"
        } else {
            "💾 Save Layout"
        };
        let clicked = egui::Area::new(egui::Id::new("dashboard-save"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-24.0, -24.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.button(egui::RichText::new(label).size(16.0))
                    .on_hover_text("Save the current widget layout")
                    .clicked()
            })
            .inner;
        if clicked {
            self.save_layout();
        }
    }

    /// One frame of UI. Split from [`eframe::App::update`] so it can run
    /// against a bare [`egui::Context`].
    pub fn ui(&mut self, ctx: &egui::Context) {
        if self.enable_toasts {
            self.toasts.show(ctx);
        }

        self.toolbar.menu_button(ctx);
        if let Some(kind) = self.toolbar.panel(ctx, self.canvas.registry(), &self.ai) {
            let id = self.board.add_widget(kind);
            tracing::info!(id = %id, "widget added from toolbar");
        }

        let out = egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(ctx.style().visuals.panel_fill))
            .show(ctx, |ui| self.canvas.ui(ui, &mut self.board, Some(&self.ai)))
            .inner;
        for url in out.open_urls {
            self.open_url(&url);
        }

        self.save_button(ctx);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::DisabledModel;
    use crate::dashboard::model::WidgetKind;
    use crate::dashboard::persistence::MemoryStore;

    fn settings(dir: &Path) -> Settings {
        Settings {
            layout_dir: dir.to_path_buf(),
            toast_log_path: dir.join("toast.log"),
            ..Settings::default()
        }
    }

    fn app(dir: &Path, board: Board) -> DashboardApp {
        DashboardApp::with_board(
            &egui::Context::default(),
            settings(dir),
            board,
            Arc::new(DisabledModel::new("test")),
        )
    }

    #[test]
    fn save_reports_success_in_toast_log() {
        let dir = tempfile::tempdir().unwrap();
        let board = Board::with_widgets(LayoutStore::new(MemoryStore::new()), Vec::new());
        let mut app = app(dir.path(), board);
        app.board_mut().add_widget(WidgetKind::Clock);
        assert!(app.save_layout());
        assert!(!app.board().is_dirty());
        let log = std::fs::read_to_string(dir.path().join("toast.log")).unwrap();
        assert!(log.contains("Layout Saved - Your widget layout has been saved."));
    }

    #[test]
    fn save_failure_is_reported_distinctly() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let board = Board::with_widgets(LayoutStore::new(FileStore::new(blocker.join("sub"))), Vec::new());
        let mut app = app(dir.path(), board);
        app.board_mut().add_widget(WidgetKind::Clock);
        assert!(!app.save_layout());
        assert!(app.board().is_dirty());
        let log = std::fs::read_to_string(dir.path().join("toast.log")).unwrap();
        assert!(log.contains("Failed to save layout"));
        assert!(!log.contains(SAVED_TITLE));
    }

    #[test]
    fn recovered_layout_warns_on_start() {
        let dir = tempfile::tempdir().unwrap();
        let store = LayoutStore::new(MemoryStore::with_entry(
            crate::dashboard::persistence::LAYOUT_KEY,
            "{ not json",
        ));
        let _app = app(dir.path(), Board::load(store));
        let log = std::fs::read_to_string(dir.path().join("toast.log")).unwrap();
        assert!(log.contains("default layout"));
    }

    #[test]
    fn frame_renders_headless() {
        let dir = tempfile::tempdir().unwrap();
        let board = Board::load(LayoutStore::new(MemoryStore::new()));
        let mut app = app(dir.path(), board);
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| app.ui(ctx));
        assert_eq!(app.board().len(), 1);
        assert!(!app.board().is_dirty());
    }

    #[test]
    fn toasts_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let board = Board::with_widgets(LayoutStore::new(MemoryStore::new()), Vec::new());
        let mut app = DashboardApp::with_board(
            &egui::Context::default(),
            Settings {
                enable_toasts: false,
                ..settings(dir.path())
            },
            board,
            Arc::new(DisabledModel::new("test")),
        );
        assert!(app.save_layout());
        assert!(!dir.path().join("toast.log").exists());
    }
}
