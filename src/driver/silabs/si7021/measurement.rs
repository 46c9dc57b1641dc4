use super::commands;
use crate::util::round;

/// How the sensor behaves on the bus while a conversion runs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MeasureMode {
    /// The sensor stretches the clock until the result is ready.
    Hold,
    /// The sensor NACKs reads until the result is ready; the master waits.
    NoHold,
}

impl MeasureMode {
    pub(crate) fn humidity_command(self) -> &'static [u8] {
        match self {
            MeasureMode::Hold => commands::MEASURE_HUMIDITY_HOLD,
            MeasureMode::NoHold => commands::MEASURE_HUMIDITY_NO_HOLD,
        }
    }

    pub(crate) fn temperature_command(self) -> &'static [u8] {
        match self {
            MeasureMode::Hold => commands::MEASURE_TEMPERATURE_HOLD,
            MeasureMode::NoHold => commands::MEASURE_TEMPERATURE_NO_HOLD,
        }
    }
}

/// Raw ADC code as returned by the sensor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Measurement {
    pub raw: u16,
    /// Checksum byte, when the command returns one.
    pub crc: Option<u8>,
}

impl Measurement {
    pub fn relative_humidity(self) -> f32 {
        relative_humidity(self.raw)
    }

    pub fn temperature(self) -> f32 {
        temperature_celsius(self.raw)
    }
}

/// %RH = code * 125 / 65536 - 6, rounded to 2 decimals.
pub fn relative_humidity(raw: u16) -> f32 {
    round(raw as f64 * 125.0 / 65536.0 - 6.0, 2) as f32
}

/// °C = code * 175.72 / 65536 - 46.85, rounded to 2 decimals.
pub fn temperature_celsius(raw: u16) -> f32 {
    round(raw as f64 * 175.72 / 65536.0 - 46.85, 2) as f32
}
