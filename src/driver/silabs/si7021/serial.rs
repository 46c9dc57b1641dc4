use std::fmt;

use bytes::Buf;
use num_derive::FromPrimitive;

use super::crc::crc8;

pub const ID_PART1_LEN: usize = 8;
pub const ID_PART2_LEN: usize = 6;

/// Device identification carried in `SNB3`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SensorType {
    EngineeringSample,
    Si7013,
    Si7020,
    Si7021,
    Unknown(u8),
}

impl From<u8> for SensorType {
    fn from(id: u8) -> Self {
        match id {
            0x00 | 0xFF => SensorType::EngineeringSample,
            0x0D => SensorType::Si7013,
            0x14 => SensorType::Si7020,
            0x15 => SensorType::Si7021,
            other => SensorType::Unknown(other),
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorType::EngineeringSample => f.write_str("engineering samples"),
            SensorType::Si7013 => f.write_str("Si7013"),
            SensorType::Si7020 => f.write_str("Si7020"),
            SensorType::Si7021 => f.write_str("Si7021"),
            SensorType::Unknown(_) => f.write_str("<unknown>"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum FirmwareVersion {
    V1_0 = 0xFF,
    V2_0 = 0x20,
}

/// Raw firmware revision byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FirmwareRevision(pub u8);

impl FirmwareRevision {
    pub fn version(self) -> Option<FirmwareVersion> {
        num_traits::FromPrimitive::from_u8(self.0)
    }
}

impl fmt::Display for FirmwareRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version() {
            Some(FirmwareVersion::V1_0) => f.write_str("version 1.0"),
            Some(FirmwareVersion::V2_0) => f.write_str("version 2.0"),
            None => f.write_str("<unknown>"),
        }
    }
}

/// One failed checksum comparison.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CrcMismatch {
    pub field: &'static str,
    /// Checksum computed from the received data.
    pub expected: u8,
    /// Checksum byte sent by the sensor.
    pub actual: u8,
}

impl fmt::Display for CrcMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: calculated 0x{:02X} != received 0x{:02X}",
            self.field, self.expected, self.actual
        )
    }
}

/// Electronic ID bytes as they arrive from the two ID commands, CRCs included.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SerialNumberRaw {
    pub sna3: u8,
    pub crc_sna3: u8,
    pub sna2: u8,
    pub crc_sna2: u8,
    pub sna1: u8,
    pub crc_sna1: u8,
    pub sna0: u8,
    pub crc_sna0: u8,
    pub snb3: u8,
    pub snb2: u8,
    pub crc_snb2: u8,
    pub snb1: u8,
    pub snb0: u8,
    pub crc_snb0: u8,
}

impl SerialNumberRaw {
    pub fn from_parts(part1: &[u8; ID_PART1_LEN], part2: &[u8; ID_PART2_LEN]) -> Self {
        let (mut part1, mut part2) = (&part1[..], &part2[..]);
        Self {
            sna3: part1.get_u8(),
            crc_sna3: part1.get_u8(),
            sna2: part1.get_u8(),
            crc_sna2: part1.get_u8(),
            sna1: part1.get_u8(),
            crc_sna1: part1.get_u8(),
            sna0: part1.get_u8(),
            crc_sna0: part1.get_u8(),
            snb3: part2.get_u8(),
            snb2: part2.get_u8(),
            crc_snb2: part2.get_u8(),
            snb1: part2.get_u8(),
            snb0: part2.get_u8(),
            crc_snb0: part2.get_u8(),
        }
    }

    /// Checks both CRC chains and returns every mismatched pair.
    ///
    /// Each chain link is seeded with the checksum byte the sensor sent for the previous field.
    pub fn verify(&self) -> Vec<CrcMismatch> {
        let checks = [
            ("SNA3", crc8(0x00, &[self.sna3]), self.crc_sna3),
            ("SNA2", crc8(self.crc_sna3, &[self.sna2]), self.crc_sna2),
            ("SNA1", crc8(self.crc_sna2, &[self.sna1]), self.crc_sna1),
            ("SNA0", crc8(self.crc_sna1, &[self.sna0]), self.crc_sna0),
            ("SNB3..SNB2", crc8(0x00, &[self.snb3, self.snb2]), self.crc_snb2),
            ("SNB1..SNB0", crc8(self.crc_snb2, &[self.snb1, self.snb0]), self.crc_snb0),
        ];

        checks
            .into_iter()
            .filter(|(_, expected, actual)| expected != actual)
            .map(|(field, expected, actual)| CrcMismatch {
                field,
                expected,
                actual,
            })
            .collect()
    }

    pub fn id(&self) -> u64 {
        u64::from_be_bytes([
            self.sna3, self.sna2, self.sna1, self.sna0, self.snb3, self.snb2, self.snb1, self.snb0,
        ])
    }

    pub fn sensor_type(&self) -> SensorType {
        SensorType::from(self.snb3)
    }
}

/// Validated 64-bit electronic ID.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SerialNumber {
    pub id: u64,
    pub sensor_type: SensorType,
}
