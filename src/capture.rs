use crate::geometry::{DisplayMetrics, Rect};
use image::{Rgba, RgbaImage};
use screenshots::Screen;

/// Fill colour of the frame shown when the screen cannot be read.
pub const PLACEHOLDER_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Access to the display being magnified.
pub trait ScreenSource {
    fn metrics(&self) -> anyhow::Result<DisplayMetrics>;
    /// Read `rect` (physical pixels) from the screen.
    fn grab(&self, rect: Rect) -> anyhow::Result<RgbaImage>;
}

/// Solid square shown instead of a captured frame.
pub fn placeholder(size: u32) -> RgbaImage {
    RgbaImage::from_pixel(size.max(1), size.max(1), PLACEHOLDER_COLOR)
}

/// Capture `rect`, substituting a `fallback_size` placeholder on failure.
pub fn capture_or_placeholder(
    source: &dyn ScreenSource,
    rect: Rect,
    fallback_size: u32,
) -> RgbaImage {
    let result = if rect.is_empty() {
        Err(anyhow::anyhow!("capture region {:?} lies outside the screen", rect))
    } else {
        source.grab(rect)
    };
    match result {
        Ok(img) => img,
        Err(e) => {
            tracing::warn!("screen capture failed: {e}");
            placeholder(fallback_size)
        }
    }
}

/// Primary display read through the `screenshots` crate.
///
/// `screenshots` works in logical coordinates, so metrics are reported in
/// physical pixels and capture rectangles converted back on the way in.
pub struct PrimaryScreen;

impl PrimaryScreen {
    fn screen() -> anyhow::Result<Screen> {
        let screens = Screen::all()?;
        screens
            .iter()
            .find(|s| s.display_info.is_primary)
            .or_else(|| screens.first())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no display found"))
    }
}

impl ScreenSource for PrimaryScreen {
    fn metrics(&self) -> anyhow::Result<DisplayMetrics> {
        let info = Self::screen()?.display_info;
        let scale = if info.scale_factor > 0.0 {
            info.scale_factor
        } else {
            1.0
        };
        Ok(DisplayMetrics {
            width: (info.width as f32 * scale).round() as i32,
            height: (info.height as f32 * scale).round() as i32,
            scale,
        })
    }

    fn grab(&self, rect: Rect) -> anyhow::Result<RgbaImage> {
        let screen = Self::screen()?;
        let scale = screen.display_info.scale_factor.max(f32::EPSILON);
        let logical = |v: f32| (v / scale).round();
        Ok(screen.capture_area(
            logical(rect.x as f32) as i32,
            logical(rect.y as f32) as i32,
            logical(rect.width as f32).max(1.0) as u32,
            logical(rect.height as f32).max(1.0) as u32,
        )?)
    }
}
