use crate::capture::{capture_or_placeholder, ScreenSource};
use crate::geometry::{DisplayMetrics, Geometry};
use crate::scheduler::FrameScheduler;
use crate::settings::Settings;
use crate::visibility::{apply_visibility, place_window, ViewportCtx};
use eframe::egui;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::time::Instant;

/// Change requested by the settings panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingsMessage {
    /// Offsets edited live while the panel is open.
    Offsets {
        capture: (i32, i32),
        window: (i32, i32),
    },
    /// Values confirmed when the panel closes; also persists the settings.
    Commit {
        zoom: f32,
        capture_size: u32,
        fps: u32,
    },
}

/// Owns the overlay state and produces magnified frames on a fixed interval.
pub struct Magnifier {
    settings: Settings,
    settings_path: String,
    metrics: DisplayMetrics,
    geometry: Geometry,
    scheduler: FrameScheduler,
    active: bool,
    last_toggle: Option<Instant>,
}

impl Magnifier {
    pub fn new(
        settings: Settings,
        settings_path: String,
        metrics: DisplayMetrics,
        now: Instant,
    ) -> Self {
        let geometry = Geometry::compute(&settings, &metrics);
        let scheduler = FrameScheduler::new(settings.fps, now);
        tracing::debug!(?metrics, ?geometry, "magnifier initialised");
        Self {
            settings,
            settings_path,
            metrics,
            geometry,
            scheduler,
            active: false,
            last_toggle: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Window origin converted from screen pixels to egui points.
    pub fn window_pos_points(&self) -> (f32, f32) {
        let (x, y) = self.geometry.window_pos;
        (x as f32 / self.metrics.scale, y as f32 / self.metrics.scale)
    }

    pub fn window_size_points(&self) -> f32 {
        self.geometry.window_size as f32 / self.metrics.scale
    }

    /// Flip between shown and hidden.
    pub fn toggle(&mut self, ctx: &dyn ViewportCtx) {
        self.active = !self.active;
        let now = Instant::now();
        let since = self.last_toggle.map(|t| now.duration_since(t));
        self.last_toggle = Some(now);
        tracing::debug!(active = self.active, ?since, "magnifier toggled");
        apply_visibility(self.active, self.window_pos_points(), ctx);
    }

    /// Read the source square, or a placeholder of the output size on failure.
    pub fn capture(&self, source: &dyn ScreenSource) -> RgbaImage {
        capture_or_placeholder(source, self.geometry.capture_rect, self.settings.capture_size)
    }

    fn render(&self, source: &dyn ScreenSource) -> anyhow::Result<RgbaImage> {
        let img = self.capture(source);
        if img.width() == 0 || img.height() == 0 {
            anyhow::bail!("captured frame is empty");
        }
        let size = self.settings.capture_size.max(1);
        Ok(imageops::resize(&img, size, size, FilterType::CatmullRom))
    }

    /// Run one tick of the render loop if it is due.
    ///
    /// Returns the magnified frame when the overlay is active and rendering
    /// succeeded. The next tick is scheduled either way.
    pub fn render_tick(&mut self, source: &dyn ScreenSource, now: Instant) -> Option<RgbaImage> {
        if !self.scheduler.is_due(now) {
            return None;
        }
        let frame = if self.active {
            match self.render(source) {
                Ok(img) => Some(img),
                Err(e) => {
                    tracing::warn!("frame skipped: {e}");
                    None
                }
            }
        } else {
            None
        };
        self.scheduler.reschedule(now);
        frame
    }

    /// Recompute derived geometry and move the window accordingly.
    pub fn recompute_geometry(&mut self, ctx: &dyn ViewportCtx) {
        self.geometry = Geometry::compute(&self.settings, &self.metrics);
        tracing::debug!(geometry = ?self.geometry, "geometry updated");
        if self.active {
            place_window(self.window_pos_points(), self.window_size_points(), ctx);
        } else {
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                self.window_size_points(),
                self.window_size_points(),
            )));
        }
    }

    pub fn apply(&mut self, msg: SettingsMessage, ctx: &dyn ViewportCtx) {
        match msg {
            SettingsMessage::Offsets { capture, window } => {
                self.settings.capture_offset_x = capture.0;
                self.settings.capture_offset_y = capture.1;
                self.settings.window_offset_x = window.0;
                self.settings.window_offset_y = window.1;
                self.recompute_geometry(ctx);
            }
            SettingsMessage::Commit {
                zoom,
                capture_size,
                fps,
            } => {
                self.settings.zoom = zoom;
                self.settings.capture_size = capture_size;
                self.settings.fps = fps;
                self.scheduler.set_fps(fps);
                self.recompute_geometry(ctx);
                match self.save() {
                    Ok(()) => tracing::info!("settings saved"),
                    Err(e) => tracing::error!("failed to save settings: {e}"),
                }
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.settings.save(&self.settings_path)
    }

    /// Persist the settings and close the overlay, ending the process.
    pub fn exit(&self, ctx: &dyn ViewportCtx) {
        if let Err(e) = self.save() {
            tracing::error!("failed to save settings on exit: {e}");
        }
        tracing::info!("exiting");
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}
