//! Spoken announcement text for actuator transitions.
//!
//! The speech engine on the dashboard is configured for `vi-VN`, so
//! Vietnamese is the default locale.  Text is built into a fixed-capacity
//! string; the longest phrase ("Phun sương đã tắt") fits with room to spare.

use core::fmt::Write;

use heapless::String;

use crate::model::Device;

/// Capacity of a single announcement, in bytes.
pub const ANNOUNCEMENT_CAP: usize = 64;

/// Announcement text.
pub type Announcement = String<ANNOUNCEMENT_CAP>;

/// Language of spoken announcements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    Vietnamese,
    English,
}

impl Locale {
    /// Human-readable name of a device.
    pub const fn device_name(self, device: Device) -> &'static str {
        match (self, device) {
            (Self::Vietnamese, Device::Heater) => "Sưởi",
            (Self::Vietnamese, Device::Fan) => "Điều hòa",
            (Self::Vietnamese, Device::Mister) => "Phun sương",
            (Self::English, Device::Heater) => "Heater",
            (Self::English, Device::Fan) => "Fan",
            (Self::English, Device::Mister) => "Mister",
        }
    }

    const fn state_text(self, on: bool) -> &'static str {
        match (self, on) {
            (Self::Vietnamese, true) => "đã bật",
            (Self::Vietnamese, false) => "đã tắt",
            (Self::English, true) => "turned on",
            (Self::English, false) => "turned off",
        }
    }
}

/// Sentence announcing that `device` is now on or off.
pub fn device_changed(locale: Locale, device: Device, on: bool) -> Announcement {
    let mut text = Announcement::new();
    // Every phrase is well under ANNOUNCEMENT_CAP; a write error would only
    // truncate the text.
    let _ = write!(
        text,
        "{} {}",
        locale.device_name(device),
        locale.state_text(on)
    );
    text
}
