//! Application entry point for the swaying tree viewer.
//!
//! This binary sets up logging and eframe/egui and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod viewer;

use sway_core::GrowthConfig;
use tracing_subscriber::EnvFilter;
use viewer::Viewer;

/// Reads the growth configuration from the TOML file named by the first
/// command-line argument, if any.
///
/// A missing or unreadable file falls back to [`GrowthConfig::default`].
fn load_config() -> GrowthConfig {
    let Some(path) = std::env::args().nth(1) else {
        return GrowthConfig::default();
    };

    let parsed = std::fs::read_to_string(&path)
        .map_err(|err| err.to_string())
        .and_then(|source| GrowthConfig::from_toml_str(&source).map_err(|err| err.to_string()));

    match parsed {
        Ok(cfg) => {
            tracing::info!(%path, "loaded growth config");
            cfg
        }
        Err(err) => {
            tracing::error!(%path, %err, "using default growth config");
            GrowthConfig::default()
        }
    }
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = load_config();
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Tree",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new(cfg)))),
    )
}
