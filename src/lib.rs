//! Protocol codec for the Silicon Labs Si7021 family of humidity/temperature sensors.

pub mod driver;
mod util;

pub use driver::silabs::si7021::{
    CrcMismatch, Error, FirmwareRevision, FirmwareVersion, HeaterLevel, I2cTransport,
    Measurement, MeasureMode, Resolution, SensorType, SerialNumber, SerialNumberRaw, Si7021,
    Transport, UserRegister, DEFAULT_ADDRESS,
};
pub use driver::ThreadDelay;
