use crate::hotkey::{parse_hotkey, Hotkey};
use rdev::Key;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Name of the settings file, relative to the working directory.
pub const SETTINGS_FILE: &str = "magnifier_settings.json";

/// Refresh rates offered by the settings panel.
pub const FPS_CHOICES: [u32; 4] = [30, 60, 90, 120];

pub const ZOOM_RANGE: std::ops::RangeInclusive<f32> = 2.0..=8.0;
pub const CAPTURE_SIZE_RANGE: std::ops::RangeInclusive<u32> = 100..=800;
pub const CAPTURE_OFFSET_RANGE: std::ops::RangeInclusive<i32> = -1000..=1000;
pub const WINDOW_OFFSET_RANGE: std::ops::RangeInclusive<i32> = -2000..=2000;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Ratio of the displayed size to the captured source size.
    #[serde(rename = "ZOOM", default = "default_zoom", deserialize_with = "zoom_or_default")]
    pub zoom: f32,
    /// Side length of the overlay window in pixels.
    #[serde(
        rename = "CAPTURE_SIZE",
        default = "default_capture_size",
        deserialize_with = "capture_size_or_default"
    )]
    pub capture_size: u32,
    #[serde(rename = "FPS", default = "default_fps", deserialize_with = "fps_or_default")]
    pub fps: u32,
    #[serde(default, deserialize_with = "offset_or_default")]
    pub capture_offset_x: i32,
    #[serde(default, deserialize_with = "offset_or_default")]
    pub capture_offset_y: i32,
    #[serde(default, deserialize_with = "offset_or_default")]
    pub window_offset_x: i32,
    #[serde(default, deserialize_with = "offset_or_default")]
    pub window_offset_y: i32,
    /// Key combination that shows or hides the overlay. Defaults to `O`.
    #[serde(default = "default_toggle_hotkey", deserialize_with = "toggle_hotkey_or_default")]
    pub toggle_hotkey: Option<String>,
    /// Key combination that saves the settings and quits. Defaults to `Esc`.
    #[serde(default = "default_exit_hotkey", deserialize_with = "exit_hotkey_or_default")]
    pub exit_hotkey: Option<String>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default, deserialize_with = "debug_logging_or_default")]
    pub debug_logging: bool,
    /// Write log output to this file instead of stderr.
    #[serde(default, deserialize_with = "log_file_or_default")]
    pub log_file: Option<String>,
}

fn default_zoom() -> f32 {
    4.0
}

fn default_capture_size() -> u32 {
    400
}

fn default_fps() -> u32 {
    60
}

fn default_toggle_hotkey() -> Option<String> {
    Some("O".into())
}

fn default_exit_hotkey() -> Option<String> {
    Some("Esc".into())
}

// A badly typed key falls back to its own default instead of failing the
// whole file, so the remaining keys survive the next save.
fn or_default<'de, D, T>(
    deserializer: D,
    key: &str,
    default: T,
    convert: impl Fn(&Value) -> Option<T>,
) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: std::fmt::Debug,
{
    let value = Value::deserialize(deserializer)?;
    match convert(&value) {
        Some(v) => Ok(v),
        None => {
            tracing::warn!(
                "ignoring invalid value {} for '{}'; using {:?}",
                value,
                key,
                default
            );
            Ok(default)
        }
    }
}

fn as_f32(value: &Value) -> Option<f32> {
    value.as_f64().filter(|f| f.is_finite()).map(|f| f as f32)
}

fn as_whole<T: TryFrom<i64>>(value: &Value) -> Option<T> {
    let whole = match value.as_i64() {
        Some(i) => i,
        None => value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)?,
    };
    T::try_from(whole).ok()
}

fn as_optional_string(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        _ => None,
    }
}

fn zoom_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<f32, D::Error> {
    or_default(d, "ZOOM", default_zoom(), as_f32)
}

fn capture_size_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    or_default(d, "CAPTURE_SIZE", default_capture_size(), as_whole)
}

fn fps_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    or_default(d, "FPS", default_fps(), as_whole)
}

fn offset_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    or_default(d, "offset", 0, as_whole)
}

fn toggle_hotkey_or_default<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    or_default(d, "toggle_hotkey", default_toggle_hotkey(), as_optional_string)
}

fn exit_hotkey_or_default<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    or_default(d, "exit_hotkey", default_exit_hotkey(), as_optional_string)
}

fn debug_logging_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    or_default(d, "debug_logging", false, Value::as_bool)
}

fn log_file_or_default<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    or_default(d, "log_file", None, as_optional_string)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zoom: default_zoom(),
            capture_size: default_capture_size(),
            fps: default_fps(),
            capture_offset_x: 0,
            capture_offset_y: 0,
            window_offset_x: 0,
            window_offset_y: 0,
            toggle_hotkey: default_toggle_hotkey(),
            exit_hotkey: default_exit_hotkey(),
            debug_logging: false,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn toggle_hotkey(&self) -> Hotkey {
        if let Some(hotkey) = &self.toggle_hotkey {
            match parse_hotkey(hotkey) {
                Some(k) => return k,
                None => {
                    tracing::warn!(
                        "provided toggle_hotkey string '{}' is invalid; using default O",
                        hotkey
                    );
                }
            }
        }
        Hotkey::plain(Key::KeyO)
    }

    pub fn exit_hotkey(&self) -> Hotkey {
        if let Some(hotkey) = &self.exit_hotkey {
            match parse_hotkey(hotkey) {
                Some(k) => return k,
                None => {
                    tracing::warn!(
                        "provided exit_hotkey string '{}' is invalid; using default Esc",
                        hotkey
                    );
                }
            }
        }
        Hotkey::plain(Key::Escape)
    }
}
