//! Shared "latest reading" cache.
//!
//! The sampling activity is the single writer; actuation and presentation
//! take copies. The whole `Option<SensorReading>` is swapped inside one
//! critical section, so a reader sees either the previous sample or the new
//! one, never fields from two different samples.
//!
//! ```text
//!   Sampling ──set()──▶ ┌──────────────┐ ──get()──▶ Actuation   (5 ms)
//!                       │ ReadingCache │ ──get()──▶ Presentation (500 ms)
//!                       └──────────────┘
//! ```
//!
//! The critical section only spans the copy-in / copy-out of a 12-byte value;
//! no I/O ever happens while it is held.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::sensors::SensorReading;

pub struct ReadingCache {
    latest: Mutex<CriticalSectionRawMutex, Cell<Option<SensorReading>>>,
}

impl ReadingCache {
    /// Empty cache: no reading has been produced yet.
    pub const fn new() -> Self {
        Self {
            latest: Mutex::new(Cell::new(None)),
        }
    }

    /// Replace the cached reading.
    pub fn set(&self, reading: SensorReading) {
        self.latest.lock(|latest| latest.set(Some(reading)));
    }

    /// Copy out the cached reading, or `None` if nothing was ever stored.
    pub fn get(&self) -> Option<SensorReading> {
        self.latest.lock(Cell::get)
    }

    pub fn has_reading(&self) -> bool {
        self.get().is_some()
    }
}

impl Default for ReadingCache {
    fn default() -> Self {
        Self::new()
    }
}
