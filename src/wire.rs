//! Realtime-database layout and snapshot decoding.
//!
//! ```text
//! Sensor                  { temperature, humidity, lux }
//! autoMode/config         { temperatureThreshold, humidityThreshold, luxThreshold }
//! autoMode/isAutoMode     bool
//! devices/<LED|FAN|Mist>/state   bool
//! servo                   { enabled, term }
//! ```
//!
//! Decoding is lenient where the device is: numeric fields may arrive as
//! JSON numbers or as numeric strings.  Anything else is a [`DecodeError`]
//! and the caller treats it as "no update".

use serde_json::{Map, Value};

use crate::config::{ControlConfig, TurnerSettings};
use crate::error::DecodeError;
use crate::model::{Device, Mode, SensorReading};

pub const SENSOR_PATH: &str = "Sensor";
pub const CONFIG_PATH: &str = "autoMode/config";
pub const MODE_PATH: &str = "autoMode/isAutoMode";
pub const DEVICES_PATH: &str = "devices";
pub const TURNER_PATH: &str = "servo";
pub const TURNER_ENABLED_PATH: &str = "servo/enabled";
pub const TURNER_TERM_PATH: &str = "servo/term";

/// `devices/<key>/state` for a device.
pub fn device_state_path(device: Device) -> String {
    format!("{}/{}/state", DEVICES_PATH, device.key())
}

/// Split a path into its non-empty segments (`"Sensor/"` → `["Sensor"]`).
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

// ── Decoding ──────────────────────────────────────────────────

fn as_object(value: &Value) -> Result<&Map<String, Value>, DecodeError> {
    match value {
        Value::Null => Err(DecodeError::Missing),
        Value::Object(map) => Ok(map),
        _ => Err(DecodeError::WrongType("object")),
    }
}

/// A finite number, given as a JSON number or a numeric string.
fn number(value: &Value, field: &'static str) -> Result<f32, DecodeError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64().map(|v| v as f32),
        Value::String(s) => s.trim().parse::<f32>().ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or(DecodeError::NotANumber(field))
}

fn required(map: &Map<String, Value>, field: &'static str) -> Result<f32, DecodeError> {
    match map.get(field) {
        None | Some(Value::Null) => Err(DecodeError::MissingField(field)),
        Some(v) => number(v, field),
    }
}

fn optional(map: &Map<String, Value>, field: &'static str) -> Result<Option<f32>, DecodeError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => number(v, field).map(Some),
    }
}

fn boolean(value: &Value) -> Result<bool, DecodeError> {
    match value {
        Value::Null => Err(DecodeError::Missing),
        Value::Bool(b) => Ok(*b),
        _ => Err(DecodeError::WrongType("bool")),
    }
}

/// Decode the `Sensor` node.
pub fn decode_reading(value: &Value) -> Result<SensorReading, DecodeError> {
    let map = as_object(value)?;
    Ok(SensorReading {
        temperature: required(map, "temperature")?,
        humidity: required(map, "humidity")?,
        lux: optional(map, "lux")?.unwrap_or(0.0),
    })
}

/// Decode the `autoMode/config` node.
pub fn decode_config(value: &Value) -> Result<ControlConfig, DecodeError> {
    let map = as_object(value)?;
    let defaults = ControlConfig::default();
    Ok(ControlConfig {
        temperature_threshold: required(map, "temperatureThreshold")?,
        humidity_threshold: required(map, "humidityThreshold")?,
        lux_threshold: optional(map, "luxThreshold")?.unwrap_or(defaults.lux_threshold),
    })
}

/// Decode `autoMode/isAutoMode`.
pub fn decode_mode(value: &Value) -> Result<Mode, DecodeError> {
    boolean(value).map(Mode::from_auto_flag)
}

/// Decode `devices/<key>/state`.
pub fn decode_device_state(value: &Value) -> Result<bool, DecodeError> {
    boolean(value)
}

/// Decode the `servo` node.
pub fn decode_turner(value: &Value) -> Result<TurnerSettings, DecodeError> {
    let map = as_object(value)?;
    let enabled = match map.get("enabled") {
        None | Some(Value::Null) => false,
        Some(v) => boolean(v)?,
    };
    // Milliseconds overflow f32 precision within a few hours; read as f64.
    let term = match map.get("term") {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().ok_or(DecodeError::NotANumber("term"))?,
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| DecodeError::NotANumber("term"))?,
        Some(_) => return Err(DecodeError::NotANumber("term")),
    };
    if !term.is_finite() || term < 0.0 {
        return Err(DecodeError::NotANumber("term"));
    }
    Ok(TurnerSettings {
        enabled,
        term: term.round() as u64,
    })
}

// ── Encoding ──────────────────────────────────────────────────

pub fn encode_config(config: &ControlConfig) -> Value {
    serde_json::to_value(config).unwrap_or(Value::Null)
}

pub fn encode_reading(reading: &SensorReading) -> Value {
    serde_json::to_value(reading).unwrap_or(Value::Null)
}

pub fn encode_mode(mode: Mode) -> Value {
    Value::Bool(mode.is_auto())
}
