//! Thermal interlock — two-threshold overheat latch.
//!
//! The interlock runs **once per temperature refresh, not once per control
//! tick**: evaluating it at the (much faster) actuator rate would re-test the
//! same sample and could toggle rapidly if thresholds were ever misconfigured
//! to overlap.  The duty-cycle mapper reads the latched state on every tick.
//!
//! ## Latch lifecycle
//!
//! 1. Tank temperature reaches `overheat_trip_c` (75 °C) → latch trips,
//!    the mapper pins the element at its idle floor.
//! 2. The latch stays tripped through the dead band [70 °C, 75 °C).
//! 3. Temperature drops strictly below `overheat_clear_c` (70 °C) → latch
//!    clears and normal mapping resumes.
//!
//! A failed sensor read never reaches this module: the caller skips the
//! evaluation entirely, so a trip is never cleared by a bad reading.

use crate::config::SystemConfig;
use log::{error, info};

/// Overheat latch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverheatState {
    /// Temperature below the trip threshold (or cleared after a trip).
    #[default]
    Normal,
    /// Overheat protection active — drive pinned at the idle floor.
    Tripped,
}

/// State change reported by [`ThermalInterlock::update`].
// Carries the f32 sample, so only PartialEq.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverheatTransition {
    /// Normal → Tripped at the given sample.
    Tripped(f32),
    /// Tripped → Normal at the given sample.
    Cleared(f32),
}

/// Two-threshold hysteresis latch over the tank temperature.
pub struct ThermalInterlock {
    trip_c: f32,
    clear_c: f32,
    state: OverheatState,
}

impl ThermalInterlock {
    pub fn new(config: &SystemConfig) -> Self {
        debug_assert!(config.overheat_trip_c > config.overheat_clear_c);
        Self {
            trip_c: config.overheat_trip_c,
            clear_c: config.overheat_clear_c,
            state: OverheatState::Normal,
        }
    }

    /// Evaluate one fresh temperature sample.
    ///
    /// Returns the transition when the latch actually changed state, `None`
    /// for every sample inside the dead band or on the same side as the
    /// current state.  Callers emit events only on `Some`.
    pub fn update(&mut self, temp_c: f32) -> Option<OverheatTransition> {
        match self.state {
            OverheatState::Normal if temp_c >= self.trip_c => {
                self.state = OverheatState::Tripped;
                error!("OVERHEAT tripped at {:.2} °C (limit {:.1})", temp_c, self.trip_c);
                Some(OverheatTransition::Tripped(temp_c))
            }
            OverheatState::Tripped if temp_c < self.clear_c => {
                self.state = OverheatState::Normal;
                info!("Overheat cleared at {:.2} °C (below {:.1})", temp_c, self.clear_c);
                Some(OverheatTransition::Cleared(temp_c))
            }
            _ => None,
        }
    }

    /// Current latch state.
    pub fn state(&self) -> OverheatState {
        self.state
    }

    /// True while the latch is tripped.
    pub fn is_tripped(&self) -> bool {
        self.state == OverheatState::Tripped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make() -> ThermalInterlock {
        ThermalInterlock::new(&SystemConfig::default())
    }

    #[test]
    fn reference_sequence() {
        // 74, 76, 74, 69, 71 against thresholds 75/70: 69 is strictly
        // below the clear threshold, so the latch releases there and the
        // 71 inside the dead band leaves it released.
        let mut il = make();
        let expected = [
            OverheatState::Normal,
            OverheatState::Tripped,
            OverheatState::Tripped,
            OverheatState::Normal,
            OverheatState::Normal,
        ];
        for (temp, want) in [74.0, 76.0, 74.0, 69.0, 71.0].iter().zip(expected) {
            il.update(*temp);
            assert_eq!(il.state(), want, "after sample {temp}");
        }
    }

    #[test]
    fn trips_exactly_at_threshold() {
        let mut il = make();
        assert!(il.update(74.999).is_none());
        assert_eq!(
            il.update(75.0),
            Some(OverheatTransition::Tripped(75.0)),
            "trip requires >= 75"
        );
    }

    #[test]
    fn clears_strictly_below_threshold() {
        let mut il = make();
        il.update(80.0);
        assert!(il.update(70.0).is_none(), "70.0 is inside the band");
        assert_eq!(il.update(69.9), Some(OverheatTransition::Cleared(69.9)));
    }

    #[test]
    fn dead_band_causes_no_transition_in_either_state() {
        let mut il = make();
        assert!(il.update(72.0).is_none());
        assert_eq!(il.state(), OverheatState::Normal);

        il.update(76.0);
        assert!(il.update(72.0).is_none());
        assert_eq!(il.state(), OverheatState::Tripped);
    }

    #[test]
    fn transition_reported_once_not_per_evaluation() {
        let mut il = make();
        assert!(il.update(80.0).is_some());
        assert!(il.update(80.0).is_none(), "no event while already tripped");
        assert!(il.update(60.0).is_some());
        assert!(il.update(60.0).is_none(), "no event while already normal");
    }
}
