//! Error types for the PvHeat firmware.
//!
//! Per-subsystem `Copy` enums so failures can be cheaply passed through
//! the control path without allocation.  `anyhow` is used only at the
//! `main()` boundary.

use core::fmt;

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Failure modes of the DS18B20 one-wire probe.
///
/// A missing or failing probe is deliberately distinct from a valid 0 °C
/// reading: the interlock holds its last state on any of these, and the
/// telemetry path flags the sample as stale instead of reusing the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No presence pulse after the bus reset — probe absent or bus shorted.
    NoPresence,
    /// Scratchpad CRC mismatch — corrupted transfer.
    CrcMismatch,
    /// The temperature conversion did not complete within the driver timeout.
    ConversionTimeout,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPresence => write!(f, "no presence pulse on one-wire bus"),
            Self::CrcMismatch => write!(f, "scratchpad CRC mismatch"),
            Self::ConversionTimeout => write!(f, "conversion timeout"),
        }
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    MqttConnectFailed,
    MqttPublishFailed,
    HttpServerFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MqttConnectFailed => write!(f, "MQTT connect failed"),
            Self::MqttPublishFailed => write!(f, "MQTT publish failed"),
            Self::HttpServerFailed => write!(f, "HTTP panel server failed to start"),
        }
    }
}
