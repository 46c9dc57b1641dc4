use std::time::Duration;

use anyhow::{anyhow, Context};
use si7021::{HeaterLevel, DEFAULT_ADDRESS};

/// Settings of the probe program, overridable from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// I2C bus number, as in `/dev/i2c-<bus>`.
    pub bus: u8,
    pub address: u8,
    pub heater_level: HeaterLevel,
    /// How long the heater stays on during the heater check.
    pub heater_pause: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bus: 1,
            address: DEFAULT_ADDRESS,
            heater_level: HeaterLevel::MEDIUM,
            heater_pause: Duration::from_secs(3),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(bus) = lookup("SI7021_BUS") {
            config.bus = parse_u8(&bus).context("invalid SI7021_BUS")?;
        }
        if let Some(address) = lookup("SI7021_ADDRESS") {
            config.address = parse_u8(&address).context("invalid SI7021_ADDRESS")?;
        }
        if let Some(level) = lookup("SI7021_HEATER_LEVEL") {
            let level = parse_u8(&level).context("invalid SI7021_HEATER_LEVEL")?;
            config.heater_level = HeaterLevel::new(level)
                .ok_or_else(|| anyhow!("SI7021_HEATER_LEVEL must be 0..=15, got {level}"))?;
        }
        if let Some(pause) = lookup("SI7021_HEATER_PAUSE_MS") {
            let ms = pause
                .trim()
                .parse::<u64>()
                .context("invalid SI7021_HEATER_PAUSE_MS")?;
            config.heater_pause = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

/// Accepts decimal or `0x`-prefixed hexadecimal.
fn parse_u8(value: &str) -> anyhow::Result<u8> {
    let value = value.trim();
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.with_context(|| format!("{value:?} is not a byte value"))
}
