use std::time::Duration;

pub mod silabs;

/// Blocking delay backed by the OS scheduler, for hosted targets such as a Raspberry Pi.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl embedded_hal::blocking::delay::DelayMs<u32> for ThreadDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64))
    }
}
