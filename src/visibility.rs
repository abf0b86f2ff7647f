use eframe::egui;

/// Position the overlay is parked at while hidden.
///
/// Moving the window offscreen instead of unmapping it keeps the event loop
/// (and with it the hotkey polling) running on every platform.
pub const OFFSCREEN_POS: (f32, f32) = (-10000.0, -10000.0);

/// The subset of [`egui::Context`] used to drive the overlay window.
pub trait ViewportCtx {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand);
    fn request_repaint(&self);
}

impl ViewportCtx for egui::Context {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand) {
        egui::Context::send_viewport_cmd(self, cmd);
    }

    fn request_repaint(&self) {
        egui::Context::request_repaint(self);
    }
}

/// Show the overlay at `pos` or park it offscreen.
pub fn apply_visibility(visible: bool, pos: (f32, f32), ctx: &dyn ViewportCtx) {
    let (x, y) = if visible { pos } else { OFFSCREEN_POS };
    ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(x, y)));
    ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
    ctx.request_repaint();
}

/// Move and resize the overlay without changing its visibility.
pub fn place_window(pos: (f32, f32), size: f32, ctx: &dyn ViewportCtx) {
    ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(size, size)));
    ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(pos.0, pos.1)));
}
