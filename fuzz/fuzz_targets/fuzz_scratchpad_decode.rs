//! Fuzz target: scratchpad CRC + temperature decode
//!
//! Feeds arbitrary 9-byte scratchpads through the CRC check and decoder
//! and asserts the pure helpers never panic and stay within the DS18B20's
//! representable range.
//!
//! cargo fuzz run fuzz_scratchpad_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use pvheat::sensors::temperature::{crc8, decode_temperature};

fuzz_target!(|data: &[u8]| {
    let _ = crc8(data);

    if data.len() >= 9 {
        let mut scratchpad = [0u8; 9];
        scratchpad.copy_from_slice(&data[..9]);
        let temp = decode_temperature(&scratchpad);
        // i16 / 16.0 is bounded by construction.
        assert!((-2048.0..2048.0).contains(&temp));
    }
});
