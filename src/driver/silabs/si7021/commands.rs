//! Command byte sequences understood by the sensor.

/// Measure relative humidity, hold master mode (clock stretching).
pub const MEASURE_HUMIDITY_HOLD: &[u8] = &[0xE5];
/// Measure relative humidity, no hold master mode.
pub const MEASURE_HUMIDITY_NO_HOLD: &[u8] = &[0xF5];
/// Measure temperature, hold master mode (clock stretching).
pub const MEASURE_TEMPERATURE_HOLD: &[u8] = &[0xE3];
/// Measure temperature, no hold master mode.
pub const MEASURE_TEMPERATURE_NO_HOLD: &[u8] = &[0xF3];
/// Read the temperature sampled during the previous humidity conversion.
pub const TEMPERATURE_FROM_PREVIOUS: &[u8] = &[0xE0];

pub const RESET: &[u8] = &[0xFE];

pub const WRITE_USER_REG: &[u8] = &[0xE6];
pub const READ_USER_REG: &[u8] = &[0xE7];
pub const WRITE_HEATER_REG: &[u8] = &[0x51];
pub const READ_HEATER_REG: &[u8] = &[0x11];

/// Electronic ID, first access. Answers with 8 bytes.
pub const READ_ID_PART1: &[u8] = &[0xFA, 0x0F];
/// Electronic ID, second access. Answers with 6 bytes.
pub const READ_ID_PART2: &[u8] = &[0xFC, 0xC9];
pub const READ_FIRMWARE_REV: &[u8] = &[0x84, 0xB8];

/// Worst-case conversion time at the highest resolution, plus margin.
pub const CONVERSION_DELAY_MS: u32 = 12 + 11;
/// Power-up time after a software reset.
pub const RESET_DELAY_MS: u32 = 15;
