//! Pure control logic: command arbitration and duty-cycle mapping.
//!
//! Everything in here is hardware-free and runs identically on host and
//! target — the control loop feeds it shared command state and the latched
//! overheat state, and gets back a bounded LEDC duty value.

pub mod arbiter;
pub mod mapper;
