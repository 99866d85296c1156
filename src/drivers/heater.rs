//! Resistive heating element driver (LEDC PWM channel 0).
//!
//! The external power stage interprets the PWM duty as a drive level, so
//! this driver is a dumb actuator: it writes whatever duty it is told,
//! clamped only to the 10-bit LEDC scale.  Window limits and the overheat
//! override live in the control layer, not here.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real PWM via hw_init helpers.
//! On host/test: tracks the last written duty in-memory only.

use core::convert::Infallible;

use crate::drivers::hw_init;
use crate::pins;

/// Full-scale duty on the configured LEDC resolution.
const DUTY_FULL_SCALE: u16 = ((1u32 << pins::PWM_RESOLUTION_BITS) - 1) as u16;

pub struct HeaterDriver {
    hw_duty: u16,
}

impl HeaterDriver {
    pub fn new() -> Self {
        Self { hw_duty: 0 }
    }

    /// Write a raw duty to the element, clamped to the 10-bit scale.
    pub fn set_duty(&mut self, duty: u16) {
        let duty = duty.min(DUTY_FULL_SCALE);
        hw_init::ledc_set(hw_init::LEDC_CH_HEATER, duty);
        self.hw_duty = duty;
    }

    /// Duty most recently written to the hardware.
    pub fn current_duty(&self) -> u16 {
        self.hw_duty
    }
}

impl Default for HeaterDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl embedded_hal::pwm::ErrorType for HeaterDriver {
    type Error = Infallible;
}

impl embedded_hal::pwm::SetDutyCycle for HeaterDriver {
    fn max_duty_cycle(&self) -> u16 {
        DUTY_FULL_SCALE
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.set_duty(duty);
        Ok(())
    }
}
