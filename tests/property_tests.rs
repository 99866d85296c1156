//! Property tests for the control-path invariants.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;
use pvheat::adapters::mqtt::parse_power_payload;
use pvheat::config::SystemConfig;
use pvheat::control::arbiter::{self, ManualLevel, ManualOverride, PowerRequest};
use pvheat::control::mapper::map_duty;
use pvheat::safety::{OverheatState, ThermalInterlock};
use pvheat::sensors::temperature::crc8;

// ── Duty window invariants ────────────────────────────────────

proptest! {
    /// Any finite wattage, however absurd, maps inside the duty window.
    #[test]
    fn any_watts_map_inside_window(w in -1.0e9f32..=1.0e9f32) {
        let c = SystemConfig::default();
        let duty = map_duty(PowerRequest::Watts(w), OverheatState::Normal, &c);
        prop_assert!((c.duty_min..=c.duty_max).contains(&duty));
    }

    #[test]
    fn any_percent_maps_inside_window(p in -1.0e6f32..=1.0e6f32) {
        let c = SystemConfig::default();
        let duty = map_duty(PowerRequest::Percent(p), OverheatState::Normal, &c);
        prop_assert!((c.duty_min..=c.duty_max).contains(&duty));
    }

    /// The watts and percent conventions agree wherever both are defined.
    #[test]
    fn conventions_agree(w in 0.0f32..=3000.0f32) {
        let c = SystemConfig::default();
        let as_watts = map_duty(PowerRequest::Watts(w), OverheatState::Normal, &c);
        let as_percent = map_duty(
            PowerRequest::Percent(100.0 * w / c.max_power_w),
            OverheatState::Normal,
            &c,
        );
        prop_assert_eq!(as_watts, as_percent);
    }

    /// The mapping is monotone: more commanded power never means less duty.
    #[test]
    fn mapping_is_monotone(a in 0.0f32..=3000.0f32, b in 0.0f32..=3000.0f32) {
        let c = SystemConfig::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let duty_lo = map_duty(PowerRequest::Watts(lo), OverheatState::Normal, &c);
        let duty_hi = map_duty(PowerRequest::Watts(hi), OverheatState::Normal, &c);
        prop_assert!(duty_lo <= duty_hi);
    }

    /// A tripped latch pins every conceivable command at the idle floor.
    #[test]
    fn tripped_latch_always_pins(w in -1.0e9f32..=1.0e9f32) {
        let c = SystemConfig::default();
        let duty = map_duty(PowerRequest::Watts(w), OverheatState::Tripped, &c);
        prop_assert_eq!(duty, c.duty_min);
    }
}

// ── Arbitration invariants ────────────────────────────────────

proptest! {
    /// With an active manual level the automatic watts are irrelevant.
    #[test]
    fn manual_selection_is_independent_of_watts(w in -1.0e9f32..=1.0e9f32) {
        for level in [ManualLevel::Off, ManualLevel::Half, ManualLevel::Full] {
            let req = arbiter::select(ManualOverride::Level(level), w);
            prop_assert_eq!(req, PowerRequest::Percent(level.percent()));
        }
    }

    /// Disabled override always forwards the watts untouched.
    #[test]
    fn disabled_forwards_watts(w in -1.0e9f32..=1.0e9f32) {
        prop_assert_eq!(
            arbiter::select(ManualOverride::Disabled, w),
            PowerRequest::Watts(w)
        );
    }
}

// ── Hysteresis invariants ─────────────────────────────────────

proptest! {
    /// Over any sample sequence the latch state is exactly determined by
    /// the thresholds: tripped after a >=75 sample until a <70 sample,
    /// never anything else.
    #[test]
    fn latch_follows_thresholds(
        samples in proptest::collection::vec(0.0f32..=120.0f32, 1..64),
    ) {
        let c = SystemConfig::default();
        let mut il = ThermalInterlock::new(&c);
        let mut model_tripped = false;

        for &t in &samples {
            il.update(t);
            if model_tripped {
                if t < c.overheat_clear_c {
                    model_tripped = false;
                }
            } else if t >= c.overheat_trip_c {
                model_tripped = true;
            }
            prop_assert_eq!(il.is_tripped(), model_tripped, "sample {}", t);
        }
    }

    /// A transition is reported exactly when the state changes.
    #[test]
    fn transitions_match_state_changes(
        samples in proptest::collection::vec(0.0f32..=120.0f32, 1..64),
    ) {
        let mut il = ThermalInterlock::new(&SystemConfig::default());
        for &t in &samples {
            let before = il.is_tripped();
            let transition = il.update(t);
            let after = il.is_tripped();
            prop_assert_eq!(transition.is_some(), before != after);
        }
    }
}

// ── Wire codec robustness ─────────────────────────────────────

proptest! {
    /// Arbitrary byte soup never panics the payload parser and always
    /// produces a finite wattage.
    #[test]
    fn power_parser_total_and_finite(payload in proptest::collection::vec(any::<u8>(), 0..64)) {
        let watts = parse_power_payload(&payload);
        prop_assert!(watts.is_finite());
    }

    /// Round-trip check against the bitwise CRC definition: appending the
    /// CRC of a message yields a whole-message CRC of zero.
    #[test]
    fn crc8_self_check(data in proptest::collection::vec(any::<u8>(), 0..32)) {
        let mut framed = data.clone();
        framed.push(crc8(&data));
        prop_assert_eq!(crc8(&framed), 0);
    }
}
