//! Fuzz target: `parse_power_payload`
//!
//! Drives arbitrary byte sequences through the MQTT power-payload parser
//! and asserts that it never panics and always yields a finite wattage —
//! the element drive must be computable from any broker garbage.
//!
//! cargo fuzz run fuzz_power_payload

#![no_main]

use libfuzzer_sys::fuzz_target;
use pvheat::adapters::mqtt::parse_power_payload;

fuzz_target!(|data: &[u8]| {
    let watts = parse_power_payload(data);
    assert!(watts.is_finite(), "parser yielded a non-finite wattage");

    // Malformed input must collapse to exactly 0 W, never something else.
    if core::str::from_utf8(data).is_err() {
        assert_eq!(watts, 0.0);
    }
});
