//! Monotonic clock adapter.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side testing and simulation.
//!
//! Sleeping goes through `std::thread::sleep` on both, which ESP-IDF maps
//! onto a FreeRTOS delay and so yields the core to other tasks.

use core::time::Duration;

use crate::scheduler::Clock;

/// Time since boot. `Copy`, so every activity thread gets its own handle
/// with the same origin.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    #[cfg(target_os = "espidf")]
    fn now(&self) -> Duration {
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        Duration::from_micros(us.max(0) as u64)
    }

    #[cfg(not(target_os = "espidf"))]
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
