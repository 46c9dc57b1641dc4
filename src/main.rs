use anyhow::Context;
use rppal::i2c::I2c;
use si7021::{I2cTransport, MeasureMode, Si7021, ThreadDelay};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

type Sensor = Si7021<I2cTransport<I2c>>;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    info!("using {config:?}");

    let (stop_tx, stop_rx) = flume::bounded(1);

    ctrlc::set_handler(move || {
        info!("received ctrl+c, exiting");
        let _ = stop_tx.try_send(());
    })?;

    let i2c = I2c::with_bus(config.bus).context("failed to open i2c bus")?;
    let mut sensor = Si7021::from_i2c(i2c, config.address);
    let mut delay = ThreadDelay;

    sensor.reset(&mut delay).context("failed to reset sensor")?;

    report_identity(&mut sensor)?;
    report_measurements(&mut sensor, &mut delay)?;
    heater_check(&mut sensor, &mut delay, &config, &stop_rx)?;

    info!("exit");

    Ok(())
}

fn report_identity(sensor: &mut Sensor) -> anyhow::Result<()> {
    let voltage_low = sensor
        .get_voltage_status()
        .context("failed to read voltage status")?;
    info!("voltage status = {}", if voltage_low { "LOW" } else { "OK" });

    let resolution = sensor.get_measure_resolution()?;
    info!("measure resolution = {resolution}");
    info!("heater on = {}", sensor.get_heater_status()?);
    info!("heater level = {}", sensor.get_heater_level()?);

    let revision = sensor
        .read_firmware_revision()
        .context("failed to read firmware revision")?;
    info!("firmware = {revision}");

    let serial = sensor
        .read_serial_number()
        .context("failed to read serial number")?;
    info!("serial number = {:#018x}", serial.id);
    info!("sensor type = {}", serial.sensor_type);

    Ok(())
}

fn report_measurements(sensor: &mut Sensor, delay: &mut ThreadDelay) -> anyhow::Result<()> {
    let (rh, t) = sensor.read_uncompensated_humidity_and_temperature(MeasureMode::Hold, delay)?;
    info!("humidity and temperature uncompensated = {:#06x}, {:#06x}", rh.raw, t.raw);

    for mode in [MeasureMode::Hold, MeasureMode::NoHold] {
        let rh = sensor
            .read_relative_humidity(mode, delay)
            .context("failed to read humidity")?;
        let t = sensor
            .read_temperature(mode, delay)
            .context("failed to read temperature")?;
        info!("{mode:?}: relative humidity = {rh}%, temperature = {t}°C");

        let (rh, t) = sensor
            .read_relative_humidity_and_temperature(mode, delay)
            .context("failed to read humidity and temperature")?;
        info!("{mode:?}: paired read = {rh}%, {t}°C");
    }

    Ok(())
}

fn heater_check(
    sensor: &mut Sensor,
    delay: &mut ThreadDelay,
    config: &Config,
    stop_rx: &flume::Receiver<()>,
) -> anyhow::Result<()> {
    let level = config.heater_level;
    match level.typical_current_ma() {
        Some(ma) => info!("heater level {level}, typically {ma} mA"),
        None => info!("heater level {level}"),
    }
    sensor.set_heater_level(level)?;
    sensor.set_heater_status(true)?;
    info!(
        "heater on = {}, level = {}",
        sensor.get_heater_status()?,
        sensor.get_heater_level()?
    );

    info!("waiting {:?}", config.heater_pause);
    let interrupted = match stop_rx.recv_timeout(config.heater_pause) {
        Ok(()) => true,
        Err(flume::RecvTimeoutError::Timeout | flume::RecvTimeoutError::Disconnected) => false,
    };

    // the heater must not stay on, interrupted or not
    sensor
        .set_heater_status(false)
        .context("failed to switch heater off")?;
    info!("heater on = {}", sensor.get_heater_status()?);

    if interrupted {
        warn!("heater check interrupted");
        return Ok(());
    }

    let (rh, t) = sensor.read_relative_humidity_and_temperature(MeasureMode::Hold, delay)?;
    info!("after heating: relative humidity = {rh}%, temperature = {t}°C");

    Ok(())
}
