//! Driver for the Silicon Labs Si7021 (and Si7013/Si7020) humidity and temperature sensor.
//! Based on the Si7021-A20 datasheet, rev. 1.2.

use bytes::{Buf, Bytes};
use embedded_hal::blocking::delay::DelayMs;
use thiserror::Error;
use tracing::{debug, trace};

pub mod commands;
pub mod crc;
pub mod measurement;
pub mod register;
pub mod serial;
pub mod transport;

pub use measurement::{MeasureMode, Measurement};
pub use register::{HeaterLevel, Resolution, UserRegister};
pub use serial::{
    CrcMismatch, FirmwareRevision, FirmwareVersion, SensorType, SerialNumber, SerialNumberRaw,
};
pub use transport::{I2cTransport, Transport, DEFAULT_ADDRESS};

use self::crc::crc8;

#[derive(Debug, Error)]
pub enum Error<E> {
    #[error("i2c transport error: {0:?}")]
    Transport(E),
    #[error("{context} checksum mismatch: {}", join_mismatches(.mismatches))]
    ChecksumMismatch {
        context: &'static str,
        mismatches: Vec<CrcMismatch>,
    },
    #[error("malformed {context} response: expected {expected} bytes, got {actual}")]
    MalformedResponse {
        context: &'static str,
        expected: usize,
        actual: usize,
    },
}

fn join_mismatches(mismatches: &[CrcMismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Last known content of the user register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum RegisterCache {
    Fresh,
    Cached(u8),
}

/// A session with one physical sensor.
///
/// Multi-step operations (register read-modify-write, the two-part ID read, paired
/// humidity/temperature reads) take `&mut self`, so they can't interleave on one session.
/// Share a session between threads behind a single mutex.
pub struct Si7021<T> {
    transport: T,
    user_reg: RegisterCache,
}

impl<I2C> Si7021<I2cTransport<I2C>> {
    pub fn from_i2c(i2c: I2C, address: u8) -> Self {
        Self {
            transport: I2cTransport::new(i2c, address),
            user_reg: RegisterCache::Fresh,
        }
    }
}

impl<T: Transport> Si7021<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            user_reg: RegisterCache::Fresh,
        }
    }

    pub fn release(self) -> T {
        self.transport
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Direct access to the bus. Call [`Si7021::invalidate`] afterwards if the user
    /// register may have been touched.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Forget the cached user register, so the next access reads it from the sensor.
    ///
    /// Call this after a transport call was aborted from outside.
    pub fn invalidate(&mut self) {
        self.user_reg = RegisterCache::Fresh;
    }

    /// The cached user register, if one is held.
    pub fn cached_user_register(&self) -> Option<UserRegister> {
        match self.user_reg {
            RegisterCache::Fresh => None,
            RegisterCache::Cached(value) => Some(UserRegister(value)),
        }
    }

    fn send(&mut self, command: &[u8]) -> Result<(), Error<T::Error>> {
        self.transport.write(command).map_err(Error::Transport)
    }

    fn receive(&mut self, count: usize, context: &'static str) -> Result<Bytes, Error<T::Error>> {
        let data = self.transport.read(count).map_err(Error::Transport)?;
        if data.len() != count {
            return Err(Error::MalformedResponse {
                context,
                expected: count,
                actual: data.len(),
            });
        }
        Ok(data)
    }

    fn query(
        &mut self,
        command: &[u8],
        count: usize,
        context: &'static str,
    ) -> Result<Bytes, Error<T::Error>> {
        self.send(command)?;
        self.receive(count, context)
    }

    fn query_array<const N: usize>(
        &mut self,
        command: &[u8],
        context: &'static str,
    ) -> Result<[u8; N], Error<T::Error>> {
        let mut data = self.query(command, N, context)?;
        let mut buf = [0u8; N];
        data.copy_to_slice(&mut buf);
        Ok(buf)
    }

    /// Software reset. Blocks for the sensor's power-up time.
    pub fn reset<DELAY: DelayMs<u32>>(&mut self, delay: &mut DELAY) -> Result<(), Error<T::Error>> {
        debug!("resetting sensor");
        // register contents return to their defaults whatever happens below
        self.invalidate();
        self.send(commands::RESET)?;
        delay.delay_ms(commands::RESET_DELAY_MS);
        Ok(())
    }

    pub fn read_firmware_revision(&mut self) -> Result<FirmwareRevision, Error<T::Error>> {
        let mut data = self.query(commands::READ_FIRMWARE_REV, 1, "firmware revision")?;
        Ok(FirmwareRevision(data.get_u8()))
    }

    /// Read both halves of the electronic ID without validating them.
    pub fn read_serial_number_raw(&mut self) -> Result<SerialNumberRaw, Error<T::Error>> {
        debug!("reading serial number");
        let part1 = self.query_array(commands::READ_ID_PART1, "electronic id")?;
        let part2 = self.query_array(commands::READ_ID_PART2, "electronic id")?;
        let raw = SerialNumberRaw::from_parts(&part1, &part2);
        trace!("raw serial number = {raw:?}");
        Ok(raw)
    }

    pub fn read_serial_number(&mut self) -> Result<SerialNumber, Error<T::Error>> {
        let raw = self.read_serial_number_raw()?;
        let mismatches = raw.verify();
        if !mismatches.is_empty() {
            return Err(Error::ChecksumMismatch {
                context: "electronic id",
                mismatches,
            });
        }
        Ok(SerialNumber {
            id: raw.id(),
            sensor_type: raw.sensor_type(),
        })
    }

    pub fn read_sensor_type(&mut self) -> Result<SensorType, Error<T::Error>> {
        Ok(self.read_serial_number()?.sensor_type)
    }

    /// Current user register, from the cache when one is held.
    pub fn read_user_register(&mut self) -> Result<UserRegister, Error<T::Error>> {
        if let RegisterCache::Cached(value) = self.user_reg {
            return Ok(UserRegister(value));
        }

        let mut data = self.query(commands::READ_USER_REG, 1, "user register")?;
        let value = data.get_u8();
        self.user_reg = RegisterCache::Cached(value);
        Ok(UserRegister(value))
    }

    fn write_user_register(&mut self, reg: UserRegister) -> Result<(), Error<T::Error>> {
        trace!("writing user register {:#04x}", reg.0);
        match self.send(&[commands::WRITE_USER_REG[0], reg.0]) {
            Ok(()) => {
                self.user_reg = RegisterCache::Cached(reg.0);
                Ok(())
            }
            Err(err) => {
                // the sensor may or may not have latched the new value
                self.invalidate();
                Err(err)
            }
        }
    }

    pub fn get_measure_resolution(&mut self) -> Result<Resolution, Error<T::Error>> {
        Ok(self.read_user_register()?.resolution())
    }

    pub fn set_measure_resolution(&mut self, resolution: Resolution) -> Result<(), Error<T::Error>> {
        debug!("setting measure resolution to {resolution}");
        let reg = self.read_user_register()?;
        self.write_user_register(reg.with_resolution(resolution))
    }

    pub fn get_heater_status(&mut self) -> Result<bool, Error<T::Error>> {
        Ok(self.read_user_register()?.heater_enabled())
    }

    pub fn set_heater_status(&mut self, enabled: bool) -> Result<(), Error<T::Error>> {
        debug!("setting heater {}", if enabled { "on" } else { "off" });
        let reg = self.read_user_register()?;
        self.write_user_register(reg.with_heater(enabled))
    }

    /// `true` when the supply voltage is below 1.9 V. Always read from the sensor.
    pub fn get_voltage_status(&mut self) -> Result<bool, Error<T::Error>> {
        debug!("getting voltage low status");
        self.invalidate();
        Ok(self.read_user_register()?.voltage_low())
    }

    pub fn get_heater_level(&mut self) -> Result<HeaterLevel, Error<T::Error>> {
        let mut data = self.query(commands::READ_HEATER_REG, 1, "heater register")?;
        Ok(HeaterLevel::from_register(data.get_u8()))
    }

    pub fn set_heater_level(&mut self, level: HeaterLevel) -> Result<(), Error<T::Error>> {
        debug!("setting heater level to {level}");
        self.send(&[
            commands::WRITE_HEATER_REG[0],
            level.value() & register::HEATER_LEVEL_MASK,
        ])
    }

    /// Start a conversion, wait it out and read the code with its checksum.
    ///
    /// No-hold conversions return the checksum byte as well and are verified the same way.
    fn measure<DELAY: DelayMs<u32>>(
        &mut self,
        command: &[u8],
        delay: &mut DELAY,
    ) -> Result<Measurement, Error<T::Error>> {
        self.send(command)?;
        // also applied in hold mode, since not every bus supports clock stretching
        delay.delay_ms(commands::CONVERSION_DELAY_MS);

        let mut data = self.receive(3, "measurement")?;
        let code = [data.get_u8(), data.get_u8()];
        let received = data.get_u8();
        let calculated = crc8(0x00, &code);
        if calculated != received {
            return Err(Error::ChecksumMismatch {
                context: "measurement",
                mismatches: vec![CrcMismatch {
                    field: "code",
                    expected: calculated,
                    actual: received,
                }],
            });
        }
        trace!("measurement crc verified: {received:#04x}");

        Ok(Measurement {
            raw: u16::from_be_bytes(code),
            crc: Some(received),
        })
    }

    /// Temperature sampled during the last humidity conversion. No checksum is sent.
    fn read_previous_temperature(&mut self) -> Result<Measurement, Error<T::Error>> {
        let mut data = self.query(commands::TEMPERATURE_FROM_PREVIOUS, 2, "temperature")?;
        Ok(Measurement {
            raw: data.get_u16(),
            crc: None,
        })
    }

    pub fn read_uncompensated_humidity<DELAY: DelayMs<u32>>(
        &mut self,
        mode: MeasureMode,
        delay: &mut DELAY,
    ) -> Result<Measurement, Error<T::Error>> {
        debug!("reading uncompensated humidity ({mode:?})");
        self.measure(mode.humidity_command(), delay)
    }

    pub fn read_uncompensated_temperature<DELAY: DelayMs<u32>>(
        &mut self,
        mode: MeasureMode,
        delay: &mut DELAY,
    ) -> Result<Measurement, Error<T::Error>> {
        debug!("reading uncompensated temperature ({mode:?})");
        self.measure(mode.temperature_command(), delay)
    }

    /// One humidity conversion, plus the temperature the sensor sampled alongside it.
    pub fn read_uncompensated_humidity_and_temperature<DELAY: DelayMs<u32>>(
        &mut self,
        mode: MeasureMode,
        delay: &mut DELAY,
    ) -> Result<(Measurement, Measurement), Error<T::Error>> {
        debug!("reading uncompensated humidity and temperature ({mode:?})");
        let humidity = self.measure(mode.humidity_command(), delay)?;
        let temperature = self.read_previous_temperature()?;
        Ok((humidity, temperature))
    }

    /// Relative humidity in %.
    pub fn read_relative_humidity<DELAY: DelayMs<u32>>(
        &mut self,
        mode: MeasureMode,
        delay: &mut DELAY,
    ) -> Result<f32, Error<T::Error>> {
        Ok(self.read_uncompensated_humidity(mode, delay)?.relative_humidity())
    }

    /// Temperature in degrees Celsius.
    pub fn read_temperature<DELAY: DelayMs<u32>>(
        &mut self,
        mode: MeasureMode,
        delay: &mut DELAY,
    ) -> Result<f32, Error<T::Error>> {
        Ok(self.read_uncompensated_temperature(mode, delay)?.temperature())
    }

    pub fn read_relative_humidity_and_temperature<DELAY: DelayMs<u32>>(
        &mut self,
        mode: MeasureMode,
        delay: &mut DELAY,
    ) -> Result<(f32, f32), Error<T::Error>> {
        let (humidity, temperature) =
            self.read_uncompensated_humidity_and_temperature(mode, delay)?;
        Ok((humidity.relative_humidity(), temperature.temperature()))
    }
}
