use screen_magnifier::geometry::{actual_capture, window_position, DisplayMetrics, Geometry};
use screen_magnifier::settings::Settings;

#[test]
fn derived_capture_size() {
    assert_eq!(actual_capture(400, 4.0, 1.0), 100);
    assert_eq!(actual_capture(400, 4.0, 1.25), 80);
    assert_eq!(actual_capture(100, 8.0, 1.5), 8);
}

#[test]
fn derived_capture_size_never_zero() {
    assert_eq!(actual_capture(100, 8.0, 100.0), 1);
    assert_eq!(actual_capture(400, 0.0, 1.0), 400);
}

#[test]
fn window_is_centered() {
    let metrics = DisplayMetrics {
        width: 1920,
        height: 1080,
        scale: 1.0,
    };
    assert_eq!(window_position(&metrics, 400, (0, 0)), (760, 340));
    assert_eq!(window_position(&metrics, 400, (-60, 25)), (700, 365));
}

#[test]
fn geometry_from_default_settings() {
    let geo = Geometry::compute(&Settings::default(), &DisplayMetrics::default());
    assert_eq!(geo.actual_capture, 100);
    assert_eq!(geo.window_pos, (760, 340));
    assert_eq!(geo.window_size, 400);
    assert_eq!(geo.capture_rect.x, 910);
    assert_eq!(geo.capture_rect.y, 490);
    assert_eq!(geo.capture_rect.width, 100);
    assert_eq!(geo.capture_rect.height, 100);
}
