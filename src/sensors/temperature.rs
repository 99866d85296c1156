//! DS18B20 one-wire temperature probe, bound to one fixed ROM address.
//!
//! The probe sits in the tank thermowell; acquisition is a blocking
//! MATCH ROM → CONVERT T → poll → READ SCRATCHPAD sequence, bounded by the
//! conversion timeout (~750 ms at 12-bit resolution).  Every scratchpad is
//! CRC-checked — a missing probe (no presence pulse), a corrupted transfer
//! and a stuck conversion each surface as a distinct [`SensorError`], never
//! as a fabricated 0 °C reading.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the bus via the open-drain GPIO helpers in
//! `hw_init` (µs timing from `esp_rom_delay_us`).
//! On host/test: reads from injectable atomics.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::error::SensorError;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

// ── Host-side injection ───────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_BITS: AtomicU32 = AtomicU32::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_FAIL: AtomicBool = AtomicBool::new(false);

/// Inject the temperature the next `read()` returns (host/test only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temperature(celsius: f32) {
    SIM_TEMP_BITS.store(celsius.to_bits(), Ordering::Relaxed);
    SIM_FAIL.store(false, Ordering::Relaxed);
}

/// Make subsequent `read()` calls fail as a missing probe (host/test only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_failure(fail: bool) {
    SIM_FAIL.store(fail, Ordering::Relaxed);
}

// ── Protocol constants ────────────────────────────────────────

const CMD_MATCH_ROM: u8 = 0x55;
const CMD_CONVERT_T: u8 = 0x44;
const CMD_READ_SCRATCHPAD: u8 = 0xBE;

/// Worst-case 12-bit conversion time per datasheet.
const CONVERT_TIMEOUT_MS: u32 = 750;

/// One-wire ROM address (64-bit: family, serial, CRC).
pub type RomAddress = [u8; 8];

/// ROM address of the tank probe fitted in production units.
pub const TANK_PROBE_ADDRESS: RomAddress = [0x28, 0xFF, 0x77, 0x62, 0x40, 0x17, 0x04, 0x31];

// ── Pure helpers (host-testable) ──────────────────────────────

/// Dallas/Maxim CRC-8 (polynomial 0x31 reflected → 0x8C).
/// The last byte of every ROM address and scratchpad is the CRC of the
/// preceding bytes.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &b in data {
        let mut byte = b;
        for _ in 0..8 {
            let mix = (crc ^ byte) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            byte >>= 1;
        }
    }
    crc
}

/// Decode the 16-bit two's-complement raw temperature from the first two
/// scratchpad bytes (1/16 °C per LSB at the default 12-bit resolution).
pub fn decode_temperature(scratchpad: &[u8; 9]) -> f32 {
    let raw = i16::from_le_bytes([scratchpad[0], scratchpad[1]]);
    f32::from(raw) / 16.0
}

// ── Driver ────────────────────────────────────────────────────

/// DS18B20 driver bound to one ROM address.
pub struct Ds18b20Sensor {
    address: RomAddress,
    _gpio: i32,
}

impl Ds18b20Sensor {
    pub fn new(gpio: i32, address: RomAddress) -> Self {
        Self {
            address,
            _gpio: gpio,
        }
    }

    /// The ROM address this driver is bound to.
    pub fn address(&self) -> &RomAddress {
        &self.address
    }

    /// Acquire one temperature sample in °C.
    #[cfg(not(target_os = "espidf"))]
    pub fn read(&mut self) -> Result<f32, SensorError> {
        if SIM_FAIL.load(Ordering::Relaxed) {
            return Err(SensorError::NoPresence);
        }
        Ok(f32::from_bits(SIM_TEMP_BITS.load(Ordering::Relaxed)))
    }

    /// Acquire one temperature sample in °C.
    ///
    /// Bit timing follows the datasheet standard-speed slots; the slots
    /// tolerate the occasional tick-interrupt stretch because every slot
    /// ends with a bus-idle recovery phase.
    #[cfg(target_os = "espidf")]
    pub fn read(&mut self) -> Result<f32, SensorError> {
        // Start a conversion on the addressed probe.
        self.reset()?;
        self.write_byte(CMD_MATCH_ROM);
        for b in self.address {
            self.write_byte(b);
        }
        self.write_byte(CMD_CONVERT_T);

        // The probe holds read slots low until the conversion finishes.
        let mut waited_ms = 0;
        while self.read_bit() == 0 {
            hw_init::delay_us(10_000);
            waited_ms += 10;
            if waited_ms > CONVERT_TIMEOUT_MS {
                return Err(SensorError::ConversionTimeout);
            }
        }

        // Fetch and verify the scratchpad.
        self.reset()?;
        self.write_byte(CMD_MATCH_ROM);
        for b in self.address {
            self.write_byte(b);
        }
        self.write_byte(CMD_READ_SCRATCHPAD);

        let mut scratchpad = [0u8; 9];
        for slot in &mut scratchpad {
            *slot = self.read_byte();
        }
        if crc8(&scratchpad[..8]) != scratchpad[8] {
            return Err(SensorError::CrcMismatch);
        }

        Ok(decode_temperature(&scratchpad))
    }

    // ── One-wire primitives (espidf only) ─────────────────────

    /// Bus reset: 480 µs low, then sample the presence pulse.
    #[cfg(target_os = "espidf")]
    fn reset(&self) -> Result<(), SensorError> {
        hw_init::ow_drive_low();
        hw_init::delay_us(480);
        hw_init::ow_release();
        hw_init::delay_us(70);
        let present = !hw_init::ow_level();
        hw_init::delay_us(410);
        if present {
            Ok(())
        } else {
            Err(SensorError::NoPresence)
        }
    }

    #[cfg(target_os = "espidf")]
    fn write_bit(&self, bit: bool) {
        hw_init::ow_drive_low();
        hw_init::delay_us(if bit { 6 } else { 60 });
        hw_init::ow_release();
        hw_init::delay_us(if bit { 64 } else { 10 });
    }

    #[cfg(target_os = "espidf")]
    fn read_bit(&self) -> u8 {
        hw_init::ow_drive_low();
        hw_init::delay_us(6);
        hw_init::ow_release();
        hw_init::delay_us(9);
        let level = hw_init::ow_level();
        hw_init::delay_us(55);
        u8::from(level)
    }

    #[cfg(target_os = "espidf")]
    fn write_byte(&self, byte: u8) {
        for i in 0..8 {
            self.write_bit((byte >> i) & 0x01 != 0);
        }
    }

    #[cfg(target_os = "espidf")]
    fn read_byte(&self) -> u8 {
        let mut byte = 0u8;
        for i in 0..8 {
            byte |= self.read_bit() << i;
        }
        byte
    }
}
