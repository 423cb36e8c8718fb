//! Display page selection and the per-cycle presentation decision.

use core::sync::atomic::{AtomicU8, Ordering};

use super::ports::DisplayPort;
use crate::sensors::SensorReading;

/// Which quantity the display shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Page {
    Co2 = 0,
    Temperature = 1,
    Humidity = 2,
}

impl Page {
    pub const COUNT: u8 = 3;

    pub const fn next(self) -> Self {
        Self::from_index((self as u8 + 1) % Self::COUNT)
    }

    const fn from_index(index: u8) -> Self {
        match index % Self::COUNT {
            0 => Self::Co2,
            1 => Self::Temperature,
            _ => Self::Humidity,
        }
    }
}

/// Current page, written by the input activity and read by presentation.
#[derive(Debug)]
pub struct PageSelector(AtomicU8);

impl PageSelector {
    pub const fn new(initial: Page) -> Self {
        Self(AtomicU8::new(initial as u8))
    }

    pub fn current(&self) -> Page {
        Page::from_index(self.0.load(Ordering::Relaxed))
    }

    /// Cycle to the next page and return it. Only the input activity
    /// advances, so a load/store pair is sufficient.
    pub fn advance(&self) -> Page {
        let next = self.current().next();
        self.0.store(next as u8, Ordering::Relaxed);
        next
    }
}

impl Default for PageSelector {
    fn default() -> Self {
        Self::new(Page::Co2)
    }
}

/// Make exactly one display call for this cycle.
///
/// Without a reading the waiting screen is shown instead of zeros or a
/// stale default.
pub fn present(reading: Option<SensorReading>, page: Page, display: &mut dyn DisplayPort) {
    match (reading, page) {
        (None, _) => display.show_waiting(),
        (Some(r), Page::Co2) => display.show_co2(r.co2_ppm),
        (Some(r), Page::Temperature) => display.show_temperature(r.temperature_c),
        (Some(r), Page::Humidity) => display.show_humidity(r.humidity_rh),
    }
}
