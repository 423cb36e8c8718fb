//! 16×2 character LCD renderer.
//!
//! Implements [`DisplayPort`] by composing the two text lines the panel
//! shows and handing them to the log. A panel driver would push
//! [`LcdTextDisplay::lines`] to the HD44780 backpack instead.
//!
//! ```text
//!  ┌────────────────┐   ┌────────────────┐
//!  │CO2 PPM: 812    │   │Waiting for     │
//!  │SD Log: Enabled │   │sensor...       │
//!  └────────────────┘   └────────────────┘
//! ```

use core::fmt::{self, Write as _};
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use heapless::String;
use log::debug;

use crate::app::ports::DisplayPort;

/// Characters per line on the panel.
pub const LCD_COLUMNS: usize = 16;

type Line = String<LCD_COLUMNS>;

pub struct LcdTextDisplay {
    lines: [Line; 2],
    logging_enabled: Arc<AtomicBool>,
}

impl LcdTextDisplay {
    /// `logging_enabled` is the same flag the input activity toggles.
    pub fn new(logging_enabled: Arc<AtomicBool>) -> Self {
        Self {
            lines: [Line::new(), Line::new()],
            logging_enabled,
        }
    }

    pub fn lines(&self) -> [&str; 2] {
        [self.lines[0].as_str(), self.lines[1].as_str()]
    }

    /// Text past the last column is dropped.
    fn set_line(&mut self, row: usize, args: fmt::Arguments<'_>) {
        let line = &mut self.lines[row];
        line.clear();
        let _ = line.write_fmt(args);
    }

    fn show_value(&mut self, label: &str, value: f32) {
        self.set_line(0, format_args!("{label}{value:.0}"));
        let status = if self.logging_enabled.load(Ordering::Relaxed) {
            "Enabled"
        } else {
            "Disabled"
        };
        self.set_line(1, format_args!("SD Log: {status}"));
        self.flush();
    }

    fn flush(&self) {
        debug!("LCD | {:<16} | {:<16}", self.lines[0], self.lines[1]);
    }
}

impl DisplayPort for LcdTextDisplay {
    fn show_co2(&mut self, ppm: f32) {
        self.show_value("CO2 PPM: ", ppm);
    }

    fn show_temperature(&mut self, celsius: f32) {
        self.show_value("Temp: ", celsius);
    }

    fn show_humidity(&mut self, rh_percent: f32) {
        self.show_value("Humidity: ", rh_percent);
    }

    fn show_waiting(&mut self) {
        self.set_line(0, format_args!("Waiting for"));
        self.set_line(1, format_args!("sensor..."));
        self.flush();
    }
}
