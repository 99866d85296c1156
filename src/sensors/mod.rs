//! Sensor subsystem.
//!
//! One probe only: the DS18B20 tank temperature sensor on the one-wire
//! bus.  The driver is bound to a single fixed ROM address so a foreign
//! probe spliced onto the bus can never masquerade as the tank sensor.

pub mod temperature;
