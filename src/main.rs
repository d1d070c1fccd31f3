use dark_knight::gui::DashboardApp;
use dark_knight::logging;
use dark_knight::settings::Settings;

use eframe::egui;

fn main() -> anyhow::Result<()> {
    let settings_path = Settings::path_from_env();
    let (settings, settings_error) = match Settings::load(&settings_path) {
        Ok(s) => (s, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    logging::init(settings.debug_logging, settings.log_file.clone());
    if let Some(e) = settings_error {
        tracing::error!("failed to read {settings_path}: {e:#}; using defaults");
    }
    tracing::info!(layout_dir = %settings.layout_dir.display(), "starting dashboard");

    if let Err(e) = std::fs::create_dir_all(&settings.layout_dir) {
        tracing::warn!("could not create {}: {e}", settings.layout_dir.display());
    }

    let (w, h) = settings.window_size.unwrap_or((1280, 800));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Dark Knight")
            .with_inner_size([w as f32, h as f32])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dark Knight",
        native_options,
        Box::new(move |cc| Box::new(DashboardApp::new(&cc.egui_ctx, settings))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
