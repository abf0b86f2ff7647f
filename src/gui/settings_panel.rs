use crate::magnifier::SettingsMessage;
use crate::settings::{
    Settings, CAPTURE_OFFSET_RANGE, CAPTURE_SIZE_RANGE, FPS_CHOICES, WINDOW_OFFSET_RANGE,
    ZOOM_RANGE,
};
use eframe::egui;

/// Per-field validation messages shown when the panel refuses to close.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FieldErrors {
    pub zoom: Option<String>,
    pub capture_size: Option<String>,
    pub fps: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.zoom.is_none() && self.capture_size.is_none() && self.fps.is_none()
    }
}

/// Secondary window editing the magnifier settings.
///
/// Offsets are sent as soon as a slider moves. Zoom, capture size and
/// refresh rate are validated and sent only when the window closes.
#[derive(Default)]
pub struct SettingsPanel {
    pub open: bool,
    zoom: f32,
    capture_size: String,
    fps: String,
    capture_offset: (i32, i32),
    window_offset: (i32, i32),
    errors: FieldErrors,
}

impl SettingsPanel {
    pub fn open(&mut self, settings: &Settings) {
        self.open = true;
        self.zoom = settings.zoom;
        self.capture_size = settings.capture_size.to_string();
        self.fps = settings.fps.to_string();
        self.capture_offset = (settings.capture_offset_x, settings.capture_offset_y);
        self.window_offset = (settings.window_offset_x, settings.window_offset_y);
        self.errors = FieldErrors::default();
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn set_capture_size_input(&mut self, text: &str) {
        self.capture_size = text.to_string();
    }

    pub fn set_fps_input(&mut self, text: &str) {
        self.fps = text.to_string();
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom;
    }

    /// Check the deferred fields, collecting one message per invalid field.
    pub fn validate(&self) -> Result<SettingsMessage, FieldErrors> {
        let mut errors = FieldErrors::default();

        if !ZOOM_RANGE.contains(&self.zoom) {
            errors.zoom = Some(format!(
                "Zoom must be between {} and {}",
                ZOOM_RANGE.start(),
                ZOOM_RANGE.end()
            ));
        }

        let capture_size = match self.capture_size.trim().parse::<u32>() {
            Ok(v) if CAPTURE_SIZE_RANGE.contains(&v) => Some(v),
            Ok(_) => {
                errors.capture_size = Some(format!(
                    "Capture size must be between {} and {}",
                    CAPTURE_SIZE_RANGE.start(),
                    CAPTURE_SIZE_RANGE.end()
                ));
                None
            }
            Err(_) => {
                errors.capture_size = Some("Capture size must be a whole number".into());
                None
            }
        };

        let fps = match self.fps.trim().parse::<u32>() {
            Ok(v) if v > 0 => Some(v),
            _ => {
                errors.fps = Some("Refresh rate must be a positive whole number".into());
                None
            }
        };

        match (capture_size, fps) {
            (Some(capture_size), Some(fps)) if errors.is_empty() => Ok(SettingsMessage::Commit {
                zoom: self.zoom,
                capture_size,
                fps,
            }),
            _ => Err(errors),
        }
    }

    /// Close the panel if the input is valid, returning the commit message.
    /// On invalid input the panel stays open and the errors are recorded.
    pub fn try_close(&mut self) -> Option<SettingsMessage> {
        match self.validate() {
            Ok(msg) => {
                self.errors = FieldErrors::default();
                self.open = false;
                tracing::info!("settings panel closed");
                Some(msg)
            }
            Err(errors) => {
                tracing::warn!(?errors, "invalid settings input");
                self.errors = errors;
                None
            }
        }
    }

    fn offsets_message(&self) -> SettingsMessage {
        SettingsMessage::Offsets {
            capture: self.capture_offset,
            window: self.window_offset,
        }
    }

    fn contents(&mut self, ui: &mut egui::Ui, messages: &mut Vec<SettingsMessage>) {
        ui.heading("Basic");
        ui.label("Zoom (2-8)");
        ui.add(egui::Slider::new(&mut self.zoom, ZOOM_RANGE).step_by(1.0));
        error_label(ui, &self.errors.zoom);

        ui.label("Capture size (100-800)");
        ui.text_edit_singleline(&mut self.capture_size);
        error_label(ui, &self.errors.capture_size);

        ui.label("Refresh rate (FPS)");
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.fps);
            egui::ComboBox::from_id_source("fps_choices")
                .selected_text("")
                .show_ui(ui, |ui| {
                    for fps in FPS_CHOICES {
                        let label = fps.to_string();
                        if ui.selectable_label(self.fps == label, label.as_str()).clicked() {
                            self.fps = label;
                        }
                    }
                });
        });
        error_label(ui, &self.errors.fps);

        ui.separator();
        ui.heading("Advanced");
        let mut changed = false;
        ui.label("Capture offset X");
        changed |= ui
            .add(egui::Slider::new(&mut self.capture_offset.0, CAPTURE_OFFSET_RANGE))
            .changed();
        ui.label("Capture offset Y");
        changed |= ui
            .add(egui::Slider::new(&mut self.capture_offset.1, CAPTURE_OFFSET_RANGE))
            .changed();
        ui.label("Window offset X");
        changed |= ui
            .add(egui::Slider::new(&mut self.window_offset.0, WINDOW_OFFSET_RANGE))
            .changed();
        ui.label("Window offset Y");
        changed |= ui
            .add(egui::Slider::new(&mut self.window_offset.1, WINDOW_OFFSET_RANGE))
            .changed();
        if changed {
            messages.push(self.offsets_message());
        }

        ui.separator();
        if ui.button("Save & Close").clicked() {
            if let Some(msg) = self.try_close() {
                messages.push(msg);
            }
        }
    }

    /// Show the panel in its own native window. Returns the messages produced
    /// this frame, in order.
    pub fn ui(&mut self, ctx: &egui::Context) -> Vec<SettingsMessage> {
        let mut messages = Vec::new();
        if !self.open {
            return messages;
        }

        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("magnifier_settings"),
            egui::ViewportBuilder::default()
                .with_title("Settings")
                .with_inner_size([380.0, 600.0]),
            |ctx, class| {
                if matches!(class, egui::ViewportClass::Embedded) {
                    let mut open = true;
                    egui::Window::new("Settings")
                        .open(&mut open)
                        .resizable(true)
                        .show(ctx, |ui| self.contents(ui, &mut messages));
                    if !open {
                        if let Some(msg) = self.try_close() {
                            messages.push(msg);
                        }
                    }
                    return;
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| self.contents(ui, &mut messages));
                });

                if ctx.input(|i| i.viewport().close_requested()) {
                    match self.try_close() {
                        Some(msg) => messages.push(msg),
                        None => ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose),
                    }
                }
            },
        );

        messages
    }
}

fn error_label(ui: &mut egui::Ui, error: &Option<String>) {
    if let Some(err) = error {
        ui.colored_label(egui::Color32::RED, err);
    }
}
