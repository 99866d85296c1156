//! Duty-cycle mapper — converts a power request into a bounded LEDC duty.
//!
//! Two calling conventions are supported: watts (automatic mode, rescaled
//! against `max_power_w`) and a direct percentage (manual mode).  Both land
//! on the same linear mapping
//!
//! ```text
//! duty = duty_min + (duty_max - duty_min) * percent / 100
//! ```
//!
//! evaluated as a single `f32` expression.  The scaling is deliberately
//! *not* split into `(100 / max_w)` and `(range / 100)` factors — done in
//! integer arithmetic those truncate to zero before the multiply.
//!
//! The overheat override is applied **after** clamping, as the final step:
//! a tripped latch pins the output at `duty_min` no matter what was
//! commanded.

use crate::config::SystemConfig;
use crate::control::arbiter::PowerRequest;
use crate::safety::OverheatState;

/// Map a power request onto the element's usable duty window.
///
/// The result is always within `[duty_min, duty_max]`: negative or
/// over-range inputs clamp, and a zero command still yields `duty_min`
/// because the element has a non-zero idle floor.
pub fn map_duty(request: PowerRequest, overheat: OverheatState, config: &SystemConfig) -> u16 {
    let percent = match request {
        PowerRequest::Watts(w) => 100.0 * w / config.max_power_w,
        PowerRequest::Percent(p) => p,
    };
    // NaN survives round()/clamp() and would collapse to 0 below the
    // window on the u16 cast; treat it as a zero command.
    let percent = if percent.is_finite() { percent } else { 0.0 };

    let range = f32::from(config.duty_max - config.duty_min);
    let duty = f32::from(config.duty_min) + range * percent / 100.0;
    let duty = duty.round().clamp(f32::from(config.duty_min), f32::from(config.duty_max)) as u16;

    // Interlock override is the last step, not an input gate.
    match overheat {
        OverheatState::Tripped => config.duty_min,
        OverheatState::Normal => duty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::arbiter::PowerRequest::{Percent, Watts};

    fn cfg() -> SystemConfig {
        SystemConfig::default()
    }

    #[test]
    fn zero_watts_yields_idle_floor() {
        assert_eq!(map_duty(Watts(0.0), OverheatState::Normal, &cfg()), 102);
    }

    #[test]
    fn full_power_yields_duty_max() {
        assert_eq!(map_duty(Watts(3000.0), OverheatState::Normal, &cfg()), 921);
    }

    #[test]
    fn half_power_yields_mid_window() {
        let duty = map_duty(Watts(1500.0), OverheatState::Normal, &cfg());
        // 102 + 819 * 0.5 = 511.5 → rounds away from zero.
        assert_eq!(duty, 512);
    }

    #[test]
    fn calling_conventions_agree() {
        let c = cfg();
        for w in [0.0_f32, 450.0, 1000.0, 1500.0, 2222.0, 3000.0] {
            let as_watts = map_duty(Watts(w), OverheatState::Normal, &c);
            let as_percent = map_duty(Percent(100.0 * w / 3000.0), OverheatState::Normal, &c);
            assert_eq!(as_watts, as_percent, "conventions disagree at {w} W");
        }
    }

    #[test]
    fn percent_output_always_in_window() {
        let c = cfg();
        for p in 0..=100 {
            let duty = map_duty(Percent(p as f32), OverheatState::Normal, &c);
            assert!((c.duty_min..=c.duty_max).contains(&duty), "p={p} duty={duty}");
        }
    }

    #[test]
    fn over_range_watts_clamp_to_duty_max() {
        assert_eq!(map_duty(Watts(9999.0), OverheatState::Normal, &cfg()), 921);
    }

    #[test]
    fn negative_watts_clamp_to_idle_floor() {
        // Corrected edge case: the lower clamp catches negative inputs
        // instead of wrapping below the element's floor.
        assert_eq!(map_duty(Watts(-500.0), OverheatState::Normal, &cfg()), 102);
    }

    #[test]
    fn non_finite_inputs_land_on_idle_floor() {
        let c = cfg();
        assert_eq!(map_duty(Percent(f32::NAN), OverheatState::Normal, &c), 102);
        assert_eq!(map_duty(Watts(f32::NAN), OverheatState::Normal, &c), 102);
        assert_eq!(
            map_duty(Percent(f32::NEG_INFINITY), OverheatState::Normal, &c),
            102
        );
        assert_eq!(
            map_duty(Percent(f32::INFINITY), OverheatState::Normal, &c),
            102,
            "non-finite means garbage, not full drive"
        );
    }

    #[test]
    fn tripped_latch_pins_output_regardless_of_command() {
        let c = cfg();
        for req in [Watts(3000.0), Watts(1500.0), Percent(100.0), Percent(0.0)] {
            assert_eq!(map_duty(req, OverheatState::Tripped, &c), c.duty_min);
        }
    }

    #[test]
    fn mapping_is_idempotent() {
        let c = cfg();
        let a = map_duty(Watts(1337.0), OverheatState::Normal, &c);
        let b = map_duty(Watts(1337.0), OverheatState::Normal, &c);
        assert_eq!(a, b);
    }
}
