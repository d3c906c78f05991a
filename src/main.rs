//! Stereopane - side-by-side stereo panel viewer
//!
//! Main entry point for the application.

mod app;
mod prefs;
mod render;
mod rig;
mod scene;
mod trace;
mod tracking;

use app::{load_document, AppOptions, StereopaneApp};
use std::path::PathBuf;
use tracking::DEFAULT_TRACKER_ADDR;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Starting Stereopane v{}", env!("CARGO_PKG_VERSION"));

    let options = parse_options();
    let source = load_document(options.panel_path.as_deref())?;

    // Configure native options
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Stereopane"),
        vsync: true,
        multisampling: 0,
        ..Default::default()
    };

    // Run the app
    eframe::run_native(
        "Stereopane",
        native_options,
        Box::new(move |cc| Box::new(StereopaneApp::new(cc, source, options))),
    )?;
    Ok(())
}

/// Options from the command line and environment: the first argument is
/// the panel source, STEREOPANE_TRACKER overrides the listen address
/// ("off" disables tracking).
fn parse_options() -> AppOptions {
    let panel_path = std::env::args().nth(1).map(PathBuf::from);
    let tracker_addr = match std::env::var("STEREOPANE_TRACKER") {
        Ok(value) if value == "off" => None,
        Ok(value) => Some(value),
        Err(_) => Some(DEFAULT_TRACKER_ADDR.to_string()),
    };
    AppOptions {
        panel_path,
        tracker_addr,
    }
}
