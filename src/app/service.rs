//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the thermal interlock and the last-known sample and
//! drive level.  It exposes a clean, hardware-agnostic API.  All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       AppService        │
//! ActuatorPort ◀──│ Arbiter · Mapper · Latch│
//!                 └────────────────────────┘
//! ```
//!
//! Two periodic concerns share the main loop:
//! - `control_tick` runs every loop iteration (and again immediately on
//!   every external command change) — arbiter → mapper → actuator write.
//! - `temperature_tick` runs every sampling interval — probe read,
//!   interlock evaluation (exactly once per fresh sample), telemetry.

use log::warn;

use crate::command_state::SharedCommands;
use crate::config::SystemConfig;
use crate::control::{arbiter, mapper};
use crate::safety::{OverheatTransition, ThermalInterlock};

use super::commands::AppCommand;
use super::events::{AppEvent, StatusReport, TelemetryData};
use super::ports::{ActuatorPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all control logic.
pub struct AppService {
    config: SystemConfig,
    interlock: ThermalInterlock,
    /// Last temperature sample (°C); stale while `sensor_ok` is false.
    last_temp_c: f32,
    sensor_ok: bool,
    /// Duty most recently written to the actuator.
    last_duty: u16,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the actuator — call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let interlock = ThermalInterlock::new(&config);
        let last_duty = config.duty_min;
        Self {
            config,
            interlock,
            last_temp_c: 0.0,
            sensor_ok: false,
            last_duty,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the element to its idle floor and announce startup.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.write_duty(self.config.duty_min);
        self.last_duty = self.config.duty_min;
        sink.emit(&AppEvent::Started {
            duty: self.config.duty_min,
        });
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one actuator cycle: arbitrate → map → write.
    ///
    /// The write is unconditional — no debouncing, no change detection.
    /// Each call fully overwrites the prior drive level.
    pub fn control_tick(&mut self, shared: &SharedCommands, hw: &mut impl ActuatorPort) {
        self.tick_count += 1;

        let request = arbiter::select(shared.manual(), shared.automatic_power());
        let duty = mapper::map_duty(request, self.interlock.state(), &self.config);

        self.last_duty = duty;
        hw.write_duty(duty);
    }

    /// Run one temperature cycle: read the probe, evaluate the interlock
    /// on the fresh sample, and emit telemetry.
    ///
    /// On a failed read the interlock is not evaluated at all — a trip is
    /// never cleared by a bad reading — and the telemetry snapshot is
    /// flagged stale so sinks can suppress the numeric publish.
    pub fn temperature_tick(
        &mut self,
        shared: &SharedCommands,
        hw: &mut impl SensorPort,
        sink: &mut impl EventSink,
    ) {
        match hw.read_temperature() {
            Ok(temp_c) => {
                self.last_temp_c = temp_c;
                self.sensor_ok = true;

                match self.interlock.update(temp_c) {
                    Some(OverheatTransition::Tripped(t)) => {
                        sink.emit(&AppEvent::OverheatTripped { temp_c: t });
                    }
                    Some(OverheatTransition::Cleared(t)) => {
                        sink.emit(&AppEvent::OverheatCleared { temp_c: t });
                    }
                    None => {}
                }
            }
            Err(e) => {
                warn!("Temperature read failed ({e}), keeping interlock state");
                self.sensor_ok = false;
            }
        }

        sink.emit(&AppEvent::Telemetry(self.telemetry(shared)));
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (from the panel or MQTT handler).
    ///
    /// Commands mutate the shared state and immediately rerun the actuator
    /// cycle — the drive level updates on every command change, not only
    /// on the next pacing tick.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        shared: &SharedCommands,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::SetManual(manual) => {
                shared.set_manual(manual);
                sink.emit(&AppEvent::ManualChanged {
                    label: manual.label(),
                });
            }
            AppCommand::SetAutomaticPower(watts) => {
                shared.set_automatic_power(watts);
            }
        }
        self.control_tick(shared, hw);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build the read model for the status surface.
    pub fn status(&self, shared: &SharedCommands) -> StatusReport {
        StatusReport {
            manual: shared.manual().label(),
            automatic_power_w: shared.automatic_power(),
            duty_cycle: self.last_duty,
            temperature_c: self.last_temp_c,
            sensor_ok: self.sensor_ok,
            overheat: self.interlock.is_tripped(),
        }
    }

    /// Total actuator cycles executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Duty most recently written to the element.
    pub fn current_duty(&self) -> u16 {
        self.last_duty
    }

    /// True while the overheat latch is tripped.
    pub fn is_overheat_tripped(&self) -> bool {
        self.interlock.is_tripped()
    }

    // ── Internal ──────────────────────────────────────────────

    fn telemetry(&self, shared: &SharedCommands) -> TelemetryData {
        TelemetryData {
            temperature_c: self.last_temp_c,
            sensor_ok: self.sensor_ok,
            automatic_power_w: shared.automatic_power(),
            manual_label: shared.manual().label(),
            duty_cycle: self.last_duty,
            overheat: self.interlock.is_tripped(),
        }
    }
}
