#![cfg_attr(
    all(target_os = "windows", feature = "windows_gui"),
    windows_subsystem = "windows"
)]

use screen_magnifier::capture::{PrimaryScreen, ScreenSource};
use screen_magnifier::gui::MagnifierApp;
use screen_magnifier::hotkey::{start_listener, HotkeyTrigger, RepaintHandle};
use screen_magnifier::logging;
use screen_magnifier::magnifier::Magnifier;
use screen_magnifier::settings::{Settings, SETTINGS_FILE};
use screen_magnifier::visibility::OFFSCREEN_POS;

use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let loaded = Settings::load(SETTINGS_FILE);
    let debug = loaded.as_ref().map(|s| s.debug_logging).unwrap_or(false);
    let log_file = loaded
        .as_ref()
        .ok()
        .and_then(|s| s.log_file.as_ref())
        .map(PathBuf::from);
    logging::init(debug, log_file);

    let settings = loaded.unwrap_or_else(|e| {
        tracing::error!("failed to read {SETTINGS_FILE}: {e}; using defaults");
        Settings::default()
    });

    let source = PrimaryScreen;
    let metrics = source.metrics().unwrap_or_else(|e| {
        tracing::warn!("failed to query display metrics: {e}; assuming 1920x1080");
        Default::default()
    });
    tracing::info!(?metrics, "display detected");

    let toggle_trigger = HotkeyTrigger::new(settings.toggle_hotkey());
    let exit_trigger = HotkeyTrigger::new(settings.exit_hotkey());
    let repaint: RepaintHandle = Arc::new(Mutex::new(None));
    start_listener(
        vec![toggle_trigger.clone(), exit_trigger.clone()],
        repaint.clone(),
    );

    let magnifier = Magnifier::new(settings, SETTINGS_FILE.into(), metrics, Instant::now());
    let size = magnifier.window_size_points();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Magnifier")
            .with_inner_size([size, size])
            .with_position(egui::pos2(OFFSCREEN_POS.0, OFFSCREEN_POS.1))
            .with_decorations(false)
            .with_resizable(false)
            .with_taskbar(false)
            .with_always_on_top(),
        ..Default::default()
    };

    eframe::run_native(
        "Screen Magnifier",
        native_options,
        Box::new(move |cc| {
            Box::new(MagnifierApp::new(
                &cc.egui_ctx,
                magnifier,
                Box::new(source),
                toggle_trigger,
                exit_trigger,
                repaint,
            ))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to run the overlay: {e}"))?;

    tracing::info!("overlay closed");
    Ok(())
}
