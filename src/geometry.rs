//! Screen-space math for the overlay: where to grab pixels and where to put
//! the window. All values are physical screen pixels.

use crate::settings::Settings;

/// Resolution and DPI scale of the display being magnified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    pub width: i32,
    pub height: i32,
    pub scale: f32,
}

impl Default for DisplayMetrics {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            scale: 1.0,
        }
    }
}

/// Rectangle in screen pixels, `x`/`y` being the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Values derived from [`Settings`] and [`DisplayMetrics`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Side length of the source square read from the screen.
    pub actual_capture: u32,
    /// Top-left corner of the overlay window.
    pub window_pos: (i32, i32),
    /// Side length of the overlay window.
    pub window_size: u32,
    /// Source square clamped to the screen bounds.
    pub capture_rect: Rect,
}

impl Geometry {
    pub fn compute(settings: &Settings, metrics: &DisplayMetrics) -> Self {
        let actual_capture = actual_capture(settings.capture_size, settings.zoom, metrics.scale);
        Self {
            actual_capture,
            window_pos: window_position(
                metrics,
                settings.capture_size,
                (settings.window_offset_x, settings.window_offset_y),
            ),
            window_size: settings.capture_size,
            capture_rect: capture_rect(
                metrics,
                actual_capture,
                (settings.capture_offset_x, settings.capture_offset_y),
            ),
        }
    }
}

/// `capture_size / zoom / scale`, truncated and never below one pixel.
pub fn actual_capture(capture_size: u32, zoom: f32, scale: f32) -> u32 {
    let zoom = if zoom > 0.0 { zoom } else { 1.0 };
    let scale = if scale > 0.0 { scale } else { 1.0 };
    ((capture_size as f32 / zoom / scale) as u32).max(1)
}

/// Centered window origin plus the manual window offset.
pub fn window_position(metrics: &DisplayMetrics, size: u32, offset: (i32, i32)) -> (i32, i32) {
    let size = size.min(i32::MAX as u32) as i32;
    (
        metrics
            .width
            .saturating_sub(size)
            .div_euclid(2)
            .saturating_add(offset.0),
        metrics
            .height
            .saturating_sub(size)
            .div_euclid(2)
            .saturating_add(offset.1),
    )
}

/// Source square centered on the display, shifted by the scaled capture
/// offset and clamped to the screen.
pub fn capture_rect(metrics: &DisplayMetrics, actual: u32, offset: (i32, i32)) -> Rect {
    let actual = actual.min(i32::MAX as u32) as i32;
    let half = actual / 2;
    // float-to-int `as` saturates, so huge offsets stay in range
    let x = (metrics.width / 2 - half).saturating_add((offset.0 as f32 * metrics.scale) as i32);
    let y = (metrics.height / 2 - half).saturating_add((offset.1 as f32 * metrics.scale) as i32);

    let left = x.clamp(0, metrics.width);
    let top = y.clamp(0, metrics.height);
    let right = x.saturating_add(actual).clamp(0, metrics.width);
    let bottom = y.saturating_add(actual).clamp(0, metrics.height);

    Rect {
        x: left,
        y: top,
        width: (right - left).max(0) as u32,
        height: (bottom - top).max(0) as u32,
    }
}
