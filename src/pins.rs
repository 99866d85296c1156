//! GPIO / peripheral pin assignments for the PvHeat controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Heating element driver (TA EHS-R, PWM control input via gate driver)
// ---------------------------------------------------------------------------

/// LEDC PWM output driving the heating element control input.
pub const HEATER_PWM_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// One-wire bus (DS18B20 tank temperature probe)
// ---------------------------------------------------------------------------

/// Open-drain data line of the one-wire bus (external 4.7 kΩ pull-up).
pub const ONE_WIRE_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  10-bit gives 0 – 1023 duty levels,
/// matching the element's 10 %–90 % usable drive window (102 – 921).
pub const PWM_RESOLUTION_BITS: u32 = 10;
/// LEDC base frequency for the heater drive (element accepts 400 Hz – 4 kHz).
pub const HEATER_PWM_FREQ_HZ: u32 = 1_000;
