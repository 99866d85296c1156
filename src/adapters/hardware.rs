//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the temperature probe and the heater driver, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  This is the only
//! module in the system that touches actual hardware.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::heater::HeaterDriver;
use crate::error::SensorError;
use crate::sensors::temperature::Ds18b20Sensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor: Ds18b20Sensor,
    heater: HeaterDriver,
}

impl HardwareAdapter {
    pub fn new(sensor: Ds18b20Sensor, heater: HeaterDriver) -> Self {
        Self { sensor, heater }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.sensor.read()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn write_duty(&mut self, duty: u16) {
        self.heater.set_duty(duty);
    }
}
