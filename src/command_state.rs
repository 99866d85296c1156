//! Shared command state — the handoff between asynchronous callbacks and
//! the control loop.
//!
//! The MQTT handler and the control panel run in callback context and only
//! ever *write* here; the control loop only ever *reads*.  Each field is a
//! single atomic, so the semantics are "latest value wins" — a burst of
//! power messages never queues up, the cycle simply sees the newest one.
//!
//! ```text
//! MQTT callback ──▶ commanded power ──┐
//! Panel trigger ──▶ manual override ──┤──▶ control loop (reader)
//! ```

use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

use crate::control::arbiter::{ManualLevel, ManualOverride};

// Manual override wire encoding for the AtomicU8.  Kept private — the
// public surface is the tagged ManualOverride enum only.
const MANUAL_DISABLED: u8 = 0;
const MANUAL_OFF: u8 = 1;
const MANUAL_HALF: u8 = 2;
const MANUAL_FULL: u8 = 3;

/// Latest-value-wins container for the two externally mutated commands.
pub struct SharedCommands {
    /// Commanded power in watts, stored as `f32` bits.
    power_bits: AtomicU32,
    /// Manual override, stored via the private wire encoding.
    manual: AtomicU8,
}

impl SharedCommands {
    /// Boot state: 0 W automatic, manual disabled.
    pub const fn new() -> Self {
        Self {
            power_bits: AtomicU32::new(0), // 0.0f32 is all-zero bits
            manual: AtomicU8::new(MANUAL_DISABLED),
        }
    }

    /// Publish a new commanded power (callback context).
    pub fn set_automatic_power(&self, watts: f32) {
        self.power_bits.store(watts.to_bits(), Ordering::Release);
    }

    /// Publish a new manual override (callback context).
    pub fn set_manual(&self, manual: ManualOverride) {
        let raw = match manual {
            ManualOverride::Disabled => MANUAL_DISABLED,
            ManualOverride::Level(ManualLevel::Off) => MANUAL_OFF,
            ManualOverride::Level(ManualLevel::Half) => MANUAL_HALF,
            ManualOverride::Level(ManualLevel::Full) => MANUAL_FULL,
        };
        self.manual.store(raw, Ordering::Release);
    }

    /// Latest commanded power in watts (control-loop context).
    pub fn automatic_power(&self) -> f32 {
        f32::from_bits(self.power_bits.load(Ordering::Acquire))
    }

    /// Latest manual override (control-loop context).
    pub fn manual(&self) -> ManualOverride {
        match self.manual.load(Ordering::Acquire) {
            MANUAL_OFF => ManualOverride::Level(ManualLevel::Off),
            MANUAL_HALF => ManualOverride::Level(ManualLevel::Half),
            MANUAL_FULL => ManualOverride::Level(ManualLevel::Full),
            _ => ManualOverride::Disabled,
        }
    }
}

impl Default for SharedCommands {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide instance used by the espidf callbacks; tests construct
/// their own [`SharedCommands`].
pub static SHARED_COMMANDS: SharedCommands = SharedCommands::new();
