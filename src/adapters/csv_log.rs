//! CSV sample log.
//!
//! Implements [`StoragePort`] over any `std::io::Write`. On the device the
//! writer is the log file on the SD card's FAT mount; tests use a `Vec<u8>`.
//!
//! ```text
//! millis,co2_ppm,temperature_c,humidity_rh
//! 5021,812.0,22.61,41.2
//! ```

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use anyhow::Context as _;
use log::{info, warn};

use crate::app::ports::StoragePort;

pub const HEADER: [&str; 4] = ["millis", "co2_ppm", "temperature_c", "humidity_rh"];

pub struct CsvSampleLog<W: io::Write> {
    writer: csv::Writer<W>,
}

impl<W: io::Write> CsvSampleLog<W> {
    /// Wrap `inner`, emitting the header row first if `write_header`.
    pub fn new(inner: W, write_header: bool) -> csv::Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        if write_header {
            writer.write_record(HEADER)?;
            writer.flush()?;
        }
        Ok(Self { writer })
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    fn write_row(
        &mut self,
        timestamp_ms: u32,
        co2_ppm: f32,
        temperature_c: f32,
        humidity_rh: f32,
    ) -> csv::Result<()> {
        self.writer.write_record([
            timestamp_ms.to_string(),
            format!("{co2_ppm:.1}"),
            format!("{temperature_c:.2}"),
            format!("{humidity_rh:.1}"),
        ])?;
        // Each row must survive a card pull.
        self.writer.flush()?;
        Ok(())
    }
}

impl CsvSampleLog<File> {
    /// Open (or create) `path` for appending. The header is written only
    /// when the file is empty.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening sample log {}", path.display()))?;
        let fresh = file
            .metadata()
            .with_context(|| format!("stat {}", path.display()))?
            .len()
            == 0;
        let log = Self::new(file, fresh).context("writing sample log header")?;
        info!(
            "Storage: sample log at {} ({})",
            path.display(),
            if fresh { "new" } else { "appending" }
        );
        Ok(log)
    }
}

impl<W: io::Write> StoragePort for CsvSampleLog<W> {
    fn append(
        &mut self,
        timestamp_ms: u32,
        co2_ppm: f32,
        temperature_c: f32,
        humidity_rh: f32,
    ) -> bool {
        match self.write_row(timestamp_ms, co2_ppm, temperature_c, humidity_rh) {
            Ok(()) => true,
            Err(e) => {
                warn!("Storage: append failed: {e}");
                false
            }
        }
    }
}
