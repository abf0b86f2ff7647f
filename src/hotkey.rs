use eframe::egui;
use rdev::{listen, EventType, Key};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hotkey {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Hotkey {
    /// A hotkey consisting of a single key without modifiers.
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
            alt: false,
        }
    }
}

const LETTER_KEYS: [Key; 26] = [
    Key::KeyA,
    Key::KeyB,
    Key::KeyC,
    Key::KeyD,
    Key::KeyE,
    Key::KeyF,
    Key::KeyG,
    Key::KeyH,
    Key::KeyI,
    Key::KeyJ,
    Key::KeyK,
    Key::KeyL,
    Key::KeyM,
    Key::KeyN,
    Key::KeyO,
    Key::KeyP,
    Key::KeyQ,
    Key::KeyR,
    Key::KeyS,
    Key::KeyT,
    Key::KeyU,
    Key::KeyV,
    Key::KeyW,
    Key::KeyX,
    Key::KeyY,
    Key::KeyZ,
];

const DIGIT_KEYS: [Key; 10] = [
    Key::Num0,
    Key::Num1,
    Key::Num2,
    Key::Num3,
    Key::Num4,
    Key::Num5,
    Key::Num6,
    Key::Num7,
    Key::Num8,
    Key::Num9,
];

const FUNCTION_KEYS: [Key; 12] = [
    Key::F1,
    Key::F2,
    Key::F3,
    Key::F4,
    Key::F5,
    Key::F6,
    Key::F7,
    Key::F8,
    Key::F9,
    Key::F10,
    Key::F11,
    Key::F12,
];

/// Parse a hotkey string like "Ctrl+Shift+M" into a [`Hotkey`].
pub fn parse_hotkey(s: &str) -> Option<Hotkey> {
    let mut ctrl = false;
    let mut shift = false;
    let mut alt = false;
    let mut key: Option<Key> = None;

    for part in s.split('+') {
        let upper = part.trim().to_ascii_uppercase();
        match upper.as_str() {
            "CTRL" | "CONTROL" => ctrl = true,
            "SHIFT" => shift = true,
            "ALT" => alt = true,
            "" => {}
            _ => key = Some(parse_key(&upper)?),
        }
    }

    key.map(|key| Hotkey {
        key,
        ctrl,
        shift,
        alt,
    })
}

fn parse_key(upper: &str) -> Option<Key> {
    match upper {
        "SPACE" => return Some(Key::Space),
        "TAB" => return Some(Key::Tab),
        "ENTER" | "RETURN" => return Some(Key::Return),
        "ESC" | "ESCAPE" => return Some(Key::Escape),
        "PAUSE" => return Some(Key::Pause),
        "INSERT" => return Some(Key::Insert),
        "HOME" => return Some(Key::Home),
        "END" => return Some(Key::End),
        "PAGEUP" => return Some(Key::PageUp),
        "PAGEDOWN" => return Some(Key::PageDown),
        "CAPSLOCK" => return Some(Key::CapsLock),
        _ => {}
    }

    if let Some(n) = upper.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
        return n.checked_sub(1).and_then(|i| FUNCTION_KEYS.get(i)).copied();
    }

    let mut chars = upper.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if c.is_ascii_uppercase() {
        Some(LETTER_KEYS[(c as u8 - b'A') as usize])
    } else if c.is_ascii_digit() {
        Some(DIGIT_KEYS[(c as u8 - b'0') as usize])
    } else {
        None
    }
}

/// Tracks modifier and key state for one hotkey across press/release events.
///
/// A combo fires once when it becomes fully pressed and re-arms only after it
/// is released, so holding the key does not repeat the trigger.
#[derive(Debug, Default)]
pub struct ComboState {
    ctrl: bool,
    shift: bool,
    alt: bool,
    watch: bool,
    triggered: bool,
}

impl ComboState {
    /// Feed a keyboard event. Returns `true` when `hotkey` has just fired.
    pub fn on_event(&mut self, hotkey: &Hotkey, event: &EventType) -> bool {
        let (key, pressed) = match *event {
            EventType::KeyPress(k) => (k, true),
            EventType::KeyRelease(k) => (k, false),
            _ => return false,
        };
        match key {
            Key::ControlLeft | Key::ControlRight => self.ctrl = pressed,
            Key::ShiftLeft | Key::ShiftRight => self.shift = pressed,
            Key::Alt | Key::AltGr => self.alt = pressed,
            _ => {}
        }
        if key == hotkey.key {
            self.watch = pressed;
        }

        let combo = self.watch
            && (!hotkey.ctrl || self.ctrl)
            && (!hotkey.shift || self.shift)
            && (!hotkey.alt || self.alt);
        if combo {
            if !self.triggered {
                self.triggered = true;
                return true;
            }
        } else {
            if self.triggered {
                tracing::debug!("combo released: {:?}", hotkey.key);
            }
            self.triggered = false;
        }
        false
    }
}

/// Shared flag raised by the listener thread and taken by the GUI thread.
#[derive(Clone)]
pub struct HotkeyTrigger {
    pub open: Arc<Mutex<bool>>,
    pub hotkey: Hotkey,
}

impl HotkeyTrigger {
    pub fn new(hotkey: Hotkey) -> Self {
        Self {
            open: Arc::new(Mutex::new(false)),
            hotkey,
        }
    }

    pub fn fire(&self) {
        if let Ok(mut flag) = self.open.lock() {
            *flag = true;
        }
    }

    pub fn take(&self) -> bool {
        match self.open.lock() {
            Ok(mut open) => std::mem::replace(&mut *open, false),
            Err(_) => false,
        }
    }
}

/// Handle used by the listener thread to wake the GUI once a trigger fires.
pub type RepaintHandle = Arc<Mutex<Option<egui::Context>>>;

/// Spawn the global keyboard hook. Each trigger is raised when its hotkey is
/// pressed; the GUI is then woken through `repaint` if a context is present.
pub fn start_listener(triggers: Vec<HotkeyTrigger>, repaint: RepaintHandle) {
    for t in &triggers {
        tracing::debug!("starting hotkey listener for {:?}", t.hotkey);
    }
    thread::spawn(move || loop {
        let triggers = triggers.clone();
        let repaint = repaint.clone();
        let mut states: Vec<ComboState> = triggers.iter().map(|_| ComboState::default()).collect();

        let result = listen(move |event| {
            let mut fired = false;
            for (trigger, state) in triggers.iter().zip(states.iter_mut()) {
                if state.on_event(&trigger.hotkey, &event.event_type) {
                    tracing::debug!("hotkey match: {:?}", trigger.hotkey);
                    trigger.fire();
                    fired = true;
                }
            }
            if fired {
                if let Ok(guard) = repaint.lock() {
                    if let Some(ctx) = guard.as_ref() {
                        ctx.request_repaint();
                    }
                }
            }
        });

        match result {
            Ok(()) => tracing::warn!("Hotkey listener exited unexpectedly. Restarting shortly"),
            Err(e) => tracing::warn!("Hotkey listener failed: {:?}. Retrying shortly", e),
        }

        thread::sleep(Duration::from_millis(500));
    });
}
