use eframe::egui;
use image::RgbaImage;
use screen_magnifier::capture::{ScreenSource, PLACEHOLDER_COLOR};
use screen_magnifier::geometry::{DisplayMetrics, Rect};
use screen_magnifier::magnifier::{Magnifier, SettingsMessage};
use screen_magnifier::settings::Settings;
use screen_magnifier::visibility::OFFSCREEN_POS;
use std::cell::RefCell;
use std::time::{Duration, Instant};
use tempfile::tempdir;

use mock_ctx::MockCtx;

/// Screen that records requested regions and returns a grey square.
#[derive(Default)]
struct FakeScreen {
    fail: bool,
    grabs: RefCell<Vec<Rect>>,
}

impl ScreenSource for FakeScreen {
    fn metrics(&self) -> anyhow::Result<DisplayMetrics> {
        Ok(DisplayMetrics::default())
    }

    fn grab(&self, rect: Rect) -> anyhow::Result<RgbaImage> {
        self.grabs.borrow_mut().push(rect);
        if self.fail {
            anyhow::bail!("capture denied");
        }
        Ok(RgbaImage::from_pixel(rect.width, rect.height, image::Rgba([9, 9, 9, 255])))
    }
}

fn new_magnifier(path: &str, start: Instant) -> Magnifier {
    Magnifier::new(Settings::default(), path.into(), DisplayMetrics::default(), start)
}

#[test]
fn two_toggles_restore_visibility() {
    let ctx = MockCtx::default();
    let mut m = new_magnifier("unused.json", Instant::now());
    assert!(!m.is_active());
    m.toggle(&ctx);
    assert!(m.is_active());
    m.toggle(&ctx);
    assert!(!m.is_active());

    let cmds = ctx.take_commands();
    assert_eq!(cmds.len(), 4);
    match cmds[0] {
        egui::ViewportCommand::OuterPosition(pos) => {
            assert_eq!((pos.x, pos.y), (760.0, 340.0));
        }
        _ => panic!("unexpected command"),
    }
    match cmds[2] {
        egui::ViewportCommand::OuterPosition(pos) => {
            assert_eq!((pos.x, pos.y), OFFSCREEN_POS);
        }
        _ => panic!("unexpected command"),
    }
}

#[test]
fn capture_failure_yields_placeholder() {
    let screen = FakeScreen {
        fail: true,
        ..Default::default()
    };
    let m = new_magnifier("unused.json", Instant::now());
    let img = m.capture(&screen);
    assert_eq!(img.dimensions(), (400, 400));
    assert_eq!(*img.get_pixel(0, 0), PLACEHOLDER_COLOR);
}

#[test]
fn offscreen_capture_region_yields_placeholder_without_grabbing() {
    let screen = FakeScreen::default();
    let ctx = MockCtx::default();
    let mut m = new_magnifier("unused.json", Instant::now());
    m.apply(
        SettingsMessage::Offsets {
            capture: (-1100, -1100),
            window: (0, 0),
        },
        &ctx,
    );
    assert!(m.geometry().capture_rect.is_empty());

    let img = m.capture(&screen);
    assert_eq!(img.dimensions(), (400, 400));
    assert_eq!(*img.get_pixel(0, 0), PLACEHOLDER_COLOR);
    assert!(screen.grabs.borrow().is_empty());
}

#[test]
fn capture_reads_centered_region() {
    let screen = FakeScreen::default();
    let m = new_magnifier("unused.json", Instant::now());
    let img = m.capture(&screen);
    assert_eq!(img.dimensions(), (100, 100));
    let grabs = screen.grabs.borrow();
    assert_eq!(
        grabs[0],
        Rect {
            x: 910,
            y: 490,
            width: 100,
            height: 100
        }
    );
}

#[test]
fn inactive_tick_renders_nothing_but_reschedules() {
    let screen = FakeScreen::default();
    let start = Instant::now();
    let mut m = new_magnifier("unused.json", start);
    assert!(m.render_tick(&screen, start).is_none());
    assert!(screen.grabs.borrow().is_empty());
    assert!(!m.scheduler().is_due(start));
    assert!(m.scheduler().is_due(start + Duration::from_millis(16)));
}

#[test]
fn active_tick_scales_to_capture_size() {
    let screen = FakeScreen::default();
    let ctx = MockCtx::default();
    let start = Instant::now();
    let mut m = new_magnifier("unused.json", start);
    m.toggle(&ctx);

    let frame = m.render_tick(&screen, start).expect("frame");
    assert_eq!(frame.dimensions(), (400, 400));
    // not due again until the interval elapsed
    assert!(m.render_tick(&screen, start + Duration::from_millis(5)).is_none());
    assert!(m.render_tick(&screen, start + Duration::from_millis(16)).is_some());
}

#[test]
fn failing_capture_still_renders_placeholder_and_reschedules() {
    let screen = FakeScreen {
        fail: true,
        ..Default::default()
    };
    let ctx = MockCtx::default();
    let start = Instant::now();
    let mut m = new_magnifier("unused.json", start);
    m.toggle(&ctx);

    let frame = m.render_tick(&screen, start).expect("placeholder frame");
    assert_eq!(*frame.get_pixel(200, 200), PLACEHOLDER_COLOR);
    assert!(!m.scheduler().is_due(start));
}

#[test]
fn offsets_apply_live_and_move_window() {
    let ctx = MockCtx::default();
    let mut m = new_magnifier("unused.json", Instant::now());
    m.toggle(&ctx);
    ctx.take_commands();

    m.apply(
        SettingsMessage::Offsets {
            capture: (10, -10),
            window: (40, -40),
        },
        &ctx,
    );
    assert_eq!(m.geometry().window_pos, (800, 300));
    assert_eq!(m.geometry().capture_rect.x, 920);
    assert_eq!(m.geometry().capture_rect.y, 480);

    let cmds = ctx.take_commands();
    assert!(cmds.iter().any(|c| matches!(
        c,
        egui::ViewportCommand::OuterPosition(p) if (p.x, p.y) == (800.0, 300.0)
    )));
}

#[test]
fn commit_updates_geometry_interval_and_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("magnifier_settings.json");
    let path = path.to_str().unwrap();
    let ctx = MockCtx::default();
    let mut m = new_magnifier(path, Instant::now());

    m.apply(
        SettingsMessage::Commit {
            zoom: 2.0,
            capture_size: 600,
            fps: 30,
        },
        &ctx,
    );
    assert_eq!(m.geometry().actual_capture, 300);
    assert_eq!(m.geometry().window_pos, (660, 240));
    assert_eq!(m.scheduler().interval(), Duration::from_millis(33));

    let saved = Settings::load(path).unwrap();
    assert_eq!(saved.zoom, 2.0);
    assert_eq!(saved.capture_size, 600);
    assert_eq!(saved.fps, 30);
}

#[test]
fn exit_saves_and_closes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("magnifier_settings.json");
    let ctx = MockCtx::default();
    let m = new_magnifier(path.to_str().unwrap(), Instant::now());

    m.exit(&ctx);
    assert!(path.exists());
    let cmds = ctx.take_commands();
    assert!(matches!(cmds.last(), Some(egui::ViewportCommand::Close)));
}
