//! Hardware drivers.
//!
//! | Module     | Hardware                                |
//! |------------|-----------------------------------------|
//! | `hw_init`  | One-shot peripheral setup + raw helpers |
//! | `heater`   | Resistive element via LEDC PWM (ch0)    |
//! | `watchdog` | Task watchdog timer (TWDT)              |

pub mod heater;
pub mod hw_init;
pub mod watchdog;
