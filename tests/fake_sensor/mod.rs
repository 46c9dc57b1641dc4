use embedded_hal::blocking::i2c::{Read, Write};
use si7021::driver::silabs::si7021::crc::crc8;

#[derive(Debug, PartialEq)]
pub enum FakeI2cError {
    Nack,
    WrongAddress(u8),
}

const USER_REG_DEFAULT: u8 = 0x3A;

/// Simulated Si7021 answering on a single address.
pub struct FakeSensor {
    address: u8,
    user_reg: u8,
    heater_reg: u8,
    voltage_low: bool,
    humidity: u16,
    temperature: u16,
    last_temperature: Option<u16>,
    id: ([u8; 8], [u8; 6]),
    response: Vec<u8>,
    fail_writes: usize,
    fail_command: Option<Vec<u8>>,
    pub commands: Vec<Vec<u8>>,
}

impl FakeSensor {
    pub fn new(address: u8) -> FakeSensor {
        FakeSensor {
            address,
            user_reg: USER_REG_DEFAULT,
            heater_reg: 0x00,
            voltage_low: false,
            humidity: 0x683A,
            temperature: 0x4E85,
            last_temperature: None,
            id: electronic_id([0xDE, 0xAD, 0xBE, 0xEF], [0x15, 0xFF, 0x00, 0x01]),
            response: Vec::new(),
            fail_writes: 0,
            fail_command: None,
            commands: Vec::new(),
        }
    }

    pub fn set_codes(&mut self, humidity: u16, temperature: u16) {
        self.humidity = humidity;
        self.temperature = temperature;
    }

    pub fn set_voltage_low(&mut self, low: bool) {
        self.voltage_low = low;
    }

    pub fn set_user_reg(&mut self, value: u8) {
        self.user_reg = value;
    }

    pub fn set_id(&mut self, id: ([u8; 8], [u8; 6])) {
        self.id = id;
    }

    /// Make the next `count` writes fail with a NACK.
    pub fn fail_next_writes(&mut self, count: usize) {
        self.fail_writes = count;
    }

    /// NACK every write that starts with `command`.
    pub fn fail_on(&mut self, command: &[u8]) {
        self.fail_command = Some(command.to_vec());
    }

    /// Number of commands starting with `command` the sensor has seen.
    pub fn count(&self, command: &[u8]) -> usize {
        self.commands
            .iter()
            .filter(|c| c.starts_with(command))
            .count()
    }

    fn with_crc(code: u16) -> Vec<u8> {
        let bytes = code.to_be_bytes();
        vec![bytes[0], bytes[1], crc8(0, &bytes)]
    }

    fn user_reg_value(&self) -> u8 {
        if self.voltage_low {
            self.user_reg | 0x40
        } else {
            self.user_reg & !0x40
        }
    }
}

/// Builds both ID responses with correctly chained checksums.
pub fn electronic_id(sna: [u8; 4], snb: [u8; 4]) -> ([u8; 8], [u8; 6]) {
    let mut part1 = [0u8; 8];
    let mut seed = 0;
    for (i, byte) in sna.iter().enumerate() {
        seed = crc8(seed, &[*byte]);
        part1[2 * i] = *byte;
        part1[2 * i + 1] = seed;
    }
    let crc_b2 = crc8(0, &snb[..2]);
    let crc_b0 = crc8(crc_b2, &snb[2..]);
    let part2 = [snb[0], snb[1], crc_b2, snb[2], snb[3], crc_b0];
    (part1, part2)
}

impl Write for FakeSensor {
    type Error = FakeI2cError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(FakeI2cError::WrongAddress(address));
        }
        if self.fail_writes > 0 {
            self.fail_writes -= 1;
            return Err(FakeI2cError::Nack);
        }
        if let Some(command) = &self.fail_command {
            if bytes.starts_with(command) {
                return Err(FakeI2cError::Nack);
            }
        }
        self.commands.push(bytes.to_vec());

        self.response = match bytes {
            [0xE5] | [0xF5] => {
                self.last_temperature = Some(self.temperature);
                Self::with_crc(self.humidity)
            }
            [0xE3] | [0xF3] => Self::with_crc(self.temperature),
            [0xE0] => match self.last_temperature {
                Some(t) => t.to_be_bytes().to_vec(),
                None => return Err(FakeI2cError::Nack),
            },
            [0xFE] => {
                self.user_reg = USER_REG_DEFAULT;
                self.heater_reg = 0x00;
                self.last_temperature = None;
                Vec::new()
            }
            [0xE6, value] => {
                self.user_reg = *value & !0x40;
                Vec::new()
            }
            [0xE7] => vec![self.user_reg_value()],
            [0x51, value] => {
                self.heater_reg = *value & 0x0F;
                Vec::new()
            }
            [0x11] => vec![self.heater_reg],
            [0xFA, 0x0F] => self.id.0.to_vec(),
            [0xFC, 0xC9] => self.id.1.to_vec(),
            [0x84, 0xB8] => vec![0x20],
            _ => return Err(FakeI2cError::Nack),
        };
        Ok(())
    }
}

impl Read for FakeSensor {
    type Error = FakeI2cError;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(FakeI2cError::WrongAddress(address));
        }
        if buffer.len() > self.response.len() {
            return Err(FakeI2cError::Nack);
        }
        let rest = self.response.split_off(buffer.len());
        buffer.copy_from_slice(&self.response);
        self.response = rest;
        Ok(())
    }
}
