mod settings_panel;

pub use settings_panel::{FieldErrors, SettingsPanel};

use crate::capture::ScreenSource;
use crate::hotkey::{HotkeyTrigger, RepaintHandle};
use crate::magnifier::Magnifier;
use eframe::egui;
use image::RgbaImage;
use std::time::Instant;

/// Root viewport: the borderless overlay showing the magnified frame.
pub struct MagnifierApp {
    magnifier: Magnifier,
    source: Box<dyn ScreenSource>,
    toggle_trigger: HotkeyTrigger,
    exit_trigger: HotkeyTrigger,
    texture: Option<egui::TextureHandle>,
    settings_panel: SettingsPanel,
}

impl MagnifierApp {
    pub fn new(
        ctx: &egui::Context,
        magnifier: Magnifier,
        source: Box<dyn ScreenSource>,
        toggle_trigger: HotkeyTrigger,
        exit_trigger: HotkeyTrigger,
        repaint: RepaintHandle,
    ) -> Self {
        if let Ok(mut guard) = repaint.lock() {
            *guard = Some(ctx.clone());
        }
        Self {
            magnifier,
            source,
            toggle_trigger,
            exit_trigger,
            texture: None,
            settings_panel: SettingsPanel::default(),
        }
    }

    fn upload_frame(&mut self, ctx: &egui::Context, frame: RgbaImage) {
        let size = [frame.width() as usize, frame.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, frame.as_raw());
        match &mut self.texture {
            Some(tex) => tex.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("magnifier_frame", image, egui::TextureOptions::LINEAR));
            }
        }
    }
}

impl eframe::App for MagnifierApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.exit_trigger.take() {
            self.magnifier.exit(ctx);
            return;
        }
        if ctx.input(|i| i.viewport().close_requested()) {
            if let Err(e) = self.magnifier.save() {
                tracing::error!("failed to save settings on close: {e}");
            }
            return;
        }
        if self.toggle_trigger.take() {
            self.magnifier.toggle(ctx);
        }

        if let Some(frame) = self.magnifier.render_tick(self.source.as_ref(), Instant::now()) {
            self.upload_frame(ctx, frame);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                if let Some(tex) = &self.texture {
                    let size = ui.available_size();
                    ui.add(egui::Image::new(tex).fit_to_exact_size(size));
                }
            });

        egui::Area::new(egui::Id::new("settings_button"))
            .fixed_pos(egui::pos2(10.0, 10.0))
            .show(ctx, |ui| {
                if ui.button("⚙").clicked() && !self.settings_panel.open {
                    self.settings_panel.open(self.magnifier.settings());
                }
            });

        for msg in self.settings_panel.ui(ctx) {
            self.magnifier.apply(msg, ctx);
        }

        ctx.request_repaint_after(self.magnifier.scheduler().remaining(Instant::now()));
    }
}
