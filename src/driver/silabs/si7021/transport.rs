use std::fmt::Debug;

use bytes::{Bytes, BytesMut};
use embedded_hal::blocking::i2c::{Read, Write};
use tracing::trace;

/// Default 7-bit bus address of the sensor.
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Byte-oriented access to a single device.
pub trait Transport {
    type Error: Debug;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    fn read(&mut self, count: usize) -> Result<Bytes, Self::Error>;
}

/// [`Transport`] over an embedded-hal I2C bus, bound to one device address.
pub struct I2cTransport<I2C> {
    pub i2c: I2C,
    pub address: u8,
}

impl<I2C> I2cTransport<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }
}

impl<I2C, E> Transport for I2cTransport<I2C>
where
    I2C: Read<Error = E> + Write<Error = E>,
    E: Debug,
{
    type Error = E;

    fn write(&mut self, bytes: &[u8]) -> Result<(), E> {
        trace!("i2c write {:#04x}: {bytes:02X?}", self.address);
        self.i2c.write(self.address, bytes)
    }

    fn read(&mut self, count: usize) -> Result<Bytes, E> {
        let mut buf = BytesMut::zeroed(count);
        self.i2c.read(self.address, &mut buf[..])?;
        trace!("i2c read {:#04x}: {:02X?}", self.address, &buf[..]);
        Ok(buf.freeze())
    }
}
