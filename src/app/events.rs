//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them — log to serial, publish over MQTT, refresh
//! the status panel.

use serde::Serialize;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy)]
pub enum AppEvent {
    /// Periodic telemetry snapshot (one per temperature tick).
    Telemetry(TelemetryData),

    /// The thermal interlock latched at the given sample.
    OverheatTripped { temp_c: f32 },

    /// The thermal interlock cleared at the given sample.
    OverheatCleared { temp_c: f32 },

    /// The manual override changed (carries the new status label).
    ManualChanged { label: &'static str },

    /// The application service has started (carries the initial duty).
    Started { duty: u16 },
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryData {
    /// Last temperature sample in °C.  Only meaningful if `sensor_ok`.
    pub temperature_c: f32,
    /// False when the last probe read failed — the sample is stale and
    /// must not be republished as a fresh value.
    pub sensor_ok: bool,
    /// Latest automatic commanded power (watts).
    pub automatic_power_w: f32,
    /// Manual override status label ("100%", "50%", "0%", "DISABLED").
    pub manual_label: &'static str,
    /// Duty currently driven onto the element.
    pub duty_cycle: u16,
    /// True while the overheat latch is tripped.
    pub overheat: bool,
}

/// Read model for the status surface (serialised to JSON by the panel).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusReport {
    /// Manual-state label: "100%", "50%", "0%" or "DISABLED".
    pub manual: &'static str,
    /// Current automatic commanded power (watts).
    pub automatic_power_w: f32,
    /// Current computed drive level (LEDC duty).
    pub duty_cycle: u16,
    /// Last temperature sample in °C.
    pub temperature_c: f32,
    /// False when the probe is missing or erroring (sample stale).
    pub sensor_ok: bool,
    /// True while the overheat latch is tripped.
    pub overheat: bool,
}

impl Default for StatusReport {
    fn default() -> Self {
        Self {
            manual: "DISABLED",
            automatic_power_w: 0.0,
            duty_cycle: 0,
            temperature_c: 0.0,
            sensor_ok: false,
            overheat: false,
        }
    }
}
