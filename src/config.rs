//! System configuration parameters
//!
//! All tunable parameters for the PvHeat controller.  There is no runtime
//! persistence — values are compile-time defaults, optionally overridden
//! once at boot (e.g. from a baked-in JSON blob).

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Power mapping ---
    /// Commanded power corresponding to 100 % drive (watts).
    pub max_power_w: f32,
    /// Lowest LEDC duty the element accepts (10 % of the 10-bit scale).
    /// The element idles here — it never drops to a true zero drive.
    pub duty_min: u16,
    /// Highest LEDC duty the element accepts (90 % of the 10-bit scale).
    pub duty_max: u16,

    // --- Thermal interlock ---
    /// Tank temperature (°C) at which the overheat latch trips.
    pub overheat_trip_c: f32,
    /// Tank temperature (°C) below which a tripped latch clears.
    pub overheat_clear_c: f32,

    // --- Timing ---
    /// Temperature sampling / telemetry interval (milliseconds).
    pub temp_sample_interval_ms: u32,
    /// Control loop pacing (milliseconds).  The actuator path runs every
    /// iteration; this only bounds the iteration rate.
    pub control_loop_interval_ms: u32,

    // --- MQTT ---
    /// Broker URL, e.g. `mqtt://192.168.1.10:1883`.
    pub mqtt_broker_url: heapless::String<64>,
    /// Topic carrying the commanded power in watts.
    pub mqtt_power_topic: heapless::String<48>,
    /// Topic the latest temperature sample is published to.
    pub mqtt_temperature_topic: heapless::String<48>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Power mapping (TA EHS-R: 0 – 3000 W, 10 % floor on a 10-bit scale)
            max_power_w: 3000.0,
            duty_min: 102,
            duty_max: 921,

            // Thermal interlock (trip at 75 °C, clear below 70 °C)
            overheat_trip_c: 75.0,
            overheat_clear_c: 70.0,

            // Timing
            temp_sample_interval_ms: 10_000,
            control_loop_interval_ms: 100,

            // MQTT
            mqtt_broker_url: str_into("mqtt://192.168.1.10:1883"),
            mqtt_power_topic: str_into("heating/water/pvheating"),
            mqtt_temperature_topic: str_into("heating/water/ww_temp"),
        }
    }
}

fn str_into<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    // Defaults are compile-time literals shorter than N.
    let _ = out.push_str(s);
    out
}
