//! Airvent firmware library.
//!
//! CO2-driven ventilation controller: an SCD41 sensor is sampled once a
//! second, the latest good reading is shared through a critical-section
//! cache, and a damper stepper runs while CO2 is above threshold.
//!
//! Everything here builds and tests on the host. ESP-IDF-specific code is
//! guarded by `#[cfg(target_os = "espidf")]` within each module, and the
//! board wiring lives in the `espidf`-only binary.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod scheduler;
pub mod sensors;
