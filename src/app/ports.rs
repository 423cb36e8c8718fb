//! Port traits — the boundary between the activities and the collaborators
//! the core does not implement (display panel, removable storage).
//!
//! ```text
//!   Activity ──▶ Port trait ──▶ Adapter (LCD text renderer, CSV log, …)
//! ```
//!
//! The activities consume these via generics / trait objects, so the core
//! never touches a panel driver or a filesystem directly.

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → panel)
// ───────────────────────────────────────────────────────────────

/// Exactly one of these is called per presentation cycle.
pub trait DisplayPort {
    fn show_co2(&mut self, ppm: f32);

    fn show_temperature(&mut self, celsius: f32);

    fn show_humidity(&mut self, rh_percent: f32);

    /// No reading has been cached yet.
    fn show_waiting(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain → removable media)
// ───────────────────────────────────────────────────────────────

/// Append-only sample log.
///
/// Called at most once per successful sample and never from the actuation
/// path, so implementations may block on media I/O.
pub trait StoragePort {
    /// Returns `false` if the sample could not be written.
    fn append(
        &mut self,
        timestamp_ms: u32,
        co2_ppm: f32,
        temperature_c: f32,
        humidity_rh: f32,
    ) -> bool;
}

impl<T: DisplayPort + ?Sized> DisplayPort for Box<T> {
    fn show_co2(&mut self, ppm: f32) {
        (**self).show_co2(ppm);
    }
    fn show_temperature(&mut self, celsius: f32) {
        (**self).show_temperature(celsius);
    }
    fn show_humidity(&mut self, rh_percent: f32) {
        (**self).show_humidity(rh_percent);
    }
    fn show_waiting(&mut self) {
        (**self).show_waiting();
    }
}

impl<T: StoragePort + ?Sized> StoragePort for Box<T> {
    fn append(
        &mut self,
        timestamp_ms: u32,
        co2_ppm: f32,
        temperature_c: f32,
        humidity_rh: f32,
    ) -> bool {
        (**self).append(timestamp_ms, co2_ppm, temperature_c, humidity_rh)
    }
}
