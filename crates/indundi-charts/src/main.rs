mod bootstrap;

use anyhow::Result;
use charts_core::settings::Settings;
use charts_runtime::dashboard::{Dashboard, Page};
use charts_runtime::data_manager::DataManager;
use charts_ui::app::App;
use charts_ui::report;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let log_file = match (&settings.log_file, settings.view.as_str()) {
        (Some(path), _) => Some(path.clone()),
        (None, "dashboard") => Some(bootstrap::default_log_file()),
        (None, _) => None,
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Indundi Charts v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Page: {}, View: {}, Theme: {}",
        settings.page,
        settings.view,
        settings.theme
    );

    let data = DataManager::from_settings(&settings)?;
    let source = bootstrap::snapshot_source(data.channels_path(), data.videos_path());
    let page = Page::from_name(&settings.page)?;
    let dashboard = Dashboard::new(data, page, settings.year)?;

    match settings.view.as_str() {
        "report" => {
            let view = dashboard.current()?;
            report::write_report(&mut std::io::stdout().lock(), &view, &source)?;
        }
        "dashboard" => {
            let app = App::new(&settings.theme, dashboard, source)?;

            // The loop exits on 'q' / Ctrl+C inside the TUI. The OS-level
            // Ctrl+C covers signals delivered outside raw mode.
            tokio::select! {
                result = app.run() => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                }
            }
        }
        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}
