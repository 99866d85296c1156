//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (control panel,
//! MQTT) that the [`AppService`](super::service::AppService) interprets and
//! acts upon.  Every command takes effect through the shared command state
//! and is followed by an immediate actuator recompute.

use crate::control::arbiter::ManualOverride;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy)]
pub enum AppCommand {
    /// Set or clear the manual override.  `ManualOverride::Disabled`
    /// returns the controller to automatic (MQTT-commanded) operation.
    SetManual(ManualOverride),

    /// New automatic commanded power in watts (from the power topic).
    /// Out-of-range values are accepted here and clamped by the mapper.
    SetAutomaticPower(f32),
}
