//! Bindery - drag-and-drop PDF merger
//!
//! A Rust-based desktop tool for combining multiple PDFs into one document.

mod app;
mod core;
mod ui;

use app::BinderyApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting Bindery...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([560.0, 680.0])
            .with_min_inner_size([420.0, 520.0])
            .with_title("Bindery"),
        ..Default::default()
    };

    eframe::run_native(
        "Bindery",
        native_options,
        Box::new(|cc| Ok(Box::new(BinderyApp::new(cc)))),
    )
}
