use std::fmt;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

pub const RESOLUTION_MASK: u8 = 0x81;
pub const HEATER_ENABLED: u8 = 0x04;
/// Set by the sensor when VDD drops below 1.9 V.
pub const VOLTAGE_LOW: u8 = 0x40;
pub const HEATER_LEVEL_MASK: u8 = 0x0F;

/// User register contents after power-up or reset.
pub const USER_REG_DEFAULT: u8 = 0x3A;

/// Measurement resolution, encoded in bits 7 and 0 of the user register.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum Resolution {
    /// RH 12 bit, temperature 14 bit. The power-up default.
    Rh12Temp14 = 0x00,
    /// RH 8 bit, temperature 12 bit.
    Rh8Temp12 = 0x01,
    /// RH 10 bit, temperature 13 bit.
    Rh10Temp13 = 0x80,
    /// RH 11 bit, temperature 11 bit.
    Rh11Temp11 = 0x81,
}

impl Resolution {
    pub const ALL: [Resolution; 4] = [
        Resolution::Rh12Temp14,
        Resolution::Rh8Temp12,
        Resolution::Rh10Temp13,
        Resolution::Rh11Temp11,
    ];

    /// Bits of (humidity, temperature) resolution.
    pub fn bits(self) -> (u8, u8) {
        match self {
            Resolution::Rh12Temp14 => (12, 14),
            Resolution::Rh8Temp12 => (8, 12),
            Resolution::Rh10Temp13 => (10, 13),
            Resolution::Rh11Temp11 => (11, 11),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rh, temp) = self.bits();
        write!(f, "RES_RH_{rh}BIT_TEMP_{temp}BIT")
    }
}

/// Decoded view of the RH/T user register 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UserRegister(pub u8);

impl UserRegister {
    pub fn resolution(self) -> Resolution {
        // every combination of the two masked bits is a valid variant
        Resolution::from_u8(self.0 & RESOLUTION_MASK).unwrap_or(Resolution::Rh12Temp14)
    }

    pub fn heater_enabled(self) -> bool {
        self.0 & HEATER_ENABLED != 0
    }

    pub fn voltage_low(self) -> bool {
        self.0 & VOLTAGE_LOW != 0
    }

    /// Replace the resolution bits, leaving every other bit untouched.
    pub fn with_resolution(self, resolution: Resolution) -> Self {
        Self(self.0 & !RESOLUTION_MASK | resolution as u8)
    }

    /// Replace the heater enable bit, leaving every other bit untouched.
    pub fn with_heater(self, enabled: bool) -> Self {
        let cleared = self.0 & !HEATER_ENABLED;
        Self(if enabled { cleared | HEATER_ENABLED } else { cleared })
    }
}

impl fmt::Display for UserRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.heater_enabled() {
            f.write_str("HEATER_ENABLED | ")?;
        }
        if self.voltage_low() {
            f.write_str("VOLTAGE_LOW | ")?;
        }
        write!(f, "{}", self.resolution())
    }
}

/// Heater current setting, 0 (about 3 mA) to 15 (about 94 mA).
///
/// While the heater runs the reported temperature does not reflect the ambient temperature.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct HeaterLevel(u8);

impl HeaterLevel {
    pub const MIN: HeaterLevel = HeaterLevel(0x0);
    pub const MAX: HeaterLevel = HeaterLevel(0xF);
    /// Level 8 of 16, about 51 mA.
    pub const MEDIUM: HeaterLevel = HeaterLevel(0x7);

    pub fn new(level: u8) -> Option<Self> {
        if level <= HEATER_LEVEL_MASK {
            Some(Self(level))
        } else {
            None
        }
    }

    pub(crate) fn from_register(value: u8) -> Self {
        Self(value & HEATER_LEVEL_MASK)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Typical heater current in mA, where the datasheet documents one.
    pub fn typical_current_ma(self) -> Option<f32> {
        match self.0 {
            0x0 => Some(3.09),
            0x1 => Some(9.18),
            0x2 => Some(15.24),
            0x4 => Some(27.39),
            0x8 => Some(51.69),
            0xF => Some(94.2),
            _ => None,
        }
    }
}

impl fmt::Display for HeaterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HEATER_LEVEL_{}", self.0 + 1)
    }
}
