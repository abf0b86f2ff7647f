use rdev::{EventType, Key};
use screen_magnifier::hotkey::{parse_hotkey, ComboState, Hotkey, HotkeyTrigger};

#[test]
fn parse_single_letter() {
    let hk = parse_hotkey("o").expect("should parse o");
    assert_eq!(hk, Hotkey::plain(Key::KeyO));
}

#[test]
fn parse_escape_and_function_keys() {
    assert_eq!(parse_hotkey("Esc").unwrap().key, Key::Escape);
    assert_eq!(parse_hotkey("F").unwrap().key, Key::KeyF);
    assert_eq!(parse_hotkey("F10").unwrap().key, Key::F10);
    assert!(parse_hotkey("F13").is_none());
}

#[test]
fn parse_combo_hotkey() {
    let hk = parse_hotkey("Ctrl+Alt+7").expect("should parse combination");
    assert_eq!(hk.key, Key::Num7);
    assert!(hk.ctrl && hk.alt && !hk.shift);
}

#[test]
fn parse_invalid_hotkey() {
    assert!(parse_hotkey("Ctrl+Foo").is_none());
    assert!(parse_hotkey("Ctrl+Shift").is_none());
}

#[test]
fn combo_fires_once_until_released() {
    let hk = Hotkey::plain(Key::KeyO);
    let mut state = ComboState::default();
    assert!(state.on_event(&hk, &EventType::KeyPress(Key::KeyO)));
    // auto-repeat while held
    assert!(!state.on_event(&hk, &EventType::KeyPress(Key::KeyO)));
    assert!(!state.on_event(&hk, &EventType::KeyRelease(Key::KeyO)));
    assert!(state.on_event(&hk, &EventType::KeyPress(Key::KeyO)));
}

#[test]
fn combo_requires_modifiers() {
    let hk = parse_hotkey("Ctrl+M").unwrap();
    let mut state = ComboState::default();
    assert!(!state.on_event(&hk, &EventType::KeyPress(Key::KeyM)));
    assert!(!state.on_event(&hk, &EventType::KeyRelease(Key::KeyM)));
    assert!(!state.on_event(&hk, &EventType::KeyPress(Key::ControlLeft)));
    assert!(state.on_event(&hk, &EventType::KeyPress(Key::KeyM)));
}

#[test]
fn trigger_is_taken_once() {
    let trigger = HotkeyTrigger::new(Hotkey::plain(Key::Escape));
    assert!(!trigger.take());
    trigger.clone().fire();
    assert!(trigger.take());
    assert!(!trigger.take());
}
