//! The periodic activities that make up the appliance.
//!
//! | Activity     | Period  | Reads               | Writes               |
//! |--------------|---------|---------------------|----------------------|
//! | Sampling     | 1 s     | SCD41               | cache, stats, storage|
//! | Actuation    | 5 ms    | cache               | stepper coils        |
//! | Presentation | 500 ms  | cache, page         | display              |
//! | Input        | 10 ms   | buttons             | page, logging flag   |
//!
//! Each one owns its own state and is handed shared handles (`Arc`) at
//! construction. None of them waits on another: the only cross-activity
//! channels are the [`ReadingCache`] critical section and two atomics.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use std::sync::Arc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::i2c::I2c;
use log::{debug, info, trace, warn};

use super::ports::{DisplayPort, StoragePort};
use super::presenter::{PageSelector, present};
use crate::cache::ReadingCache;
use crate::config::SystemConfig;
use crate::diagnostics::SampleStats;
use crate::drivers::button::{Button, ButtonEvent};
use crate::drivers::stepper::Stepper;
use crate::scheduler::{Activity, Clock};
use crate::sensors::SensorReading;
use crate::sensors::scd41::Scd41;

/// Damper control rule: run only on a valid reading strictly above the
/// threshold.
pub fn should_ventilate(reading: Option<SensorReading>, threshold_ppm: f32) -> bool {
    matches!(reading, Some(r) if r.co2_ppm > threshold_ppm)
}

fn millis(ms: u32) -> Duration {
    Duration::from_millis(u64::from(ms))
}

// ═══════════════════════════════════════════════════════════════
//  Sampling
// ═══════════════════════════════════════════════════════════════

/// Polls the sensor and publishes successful samples. Sole cache writer.
pub struct SamplingActivity<I2C, D, C> {
    sensor: Scd41<I2C, D>,
    cache: Arc<ReadingCache>,
    stats: Arc<SampleStats>,
    storage: Option<Box<dyn StoragePort + Send>>,
    logging_enabled: Arc<AtomicBool>,
    clock: C,
    period: Duration,
    report_every: u32,
    cycles: u32,
}

impl<I2C, D, C> SamplingActivity<I2C, D, C>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    pub fn new(
        sensor: Scd41<I2C, D>,
        cache: Arc<ReadingCache>,
        stats: Arc<SampleStats>,
        clock: C,
        config: &SystemConfig,
    ) -> Self {
        Self {
            sensor,
            cache,
            stats,
            storage: None,
            logging_enabled: Arc::new(AtomicBool::new(config.storage_enabled)),
            clock,
            period: millis(config.sample_interval_ms),
            report_every: config.stats_report_every,
            cycles: 0,
        }
    }

    /// Attach a sample log. `enabled` is shared with whoever toggles logging.
    #[must_use]
    pub fn with_storage(
        mut self,
        storage: Box<dyn StoragePort + Send>,
        enabled: Arc<AtomicBool>,
    ) -> Self {
        self.storage = Some(storage);
        self.logging_enabled = enabled;
        self
    }

    fn persist(&mut self, reading: SensorReading) {
        if !self.logging_enabled.load(Ordering::Relaxed) {
            return;
        }
        let Some(storage) = self.storage.as_mut() else {
            return;
        };
        let timestamp_ms = self.clock.millis();
        if !storage.append(
            timestamp_ms,
            reading.co2_ppm,
            reading.temperature_c,
            reading.humidity_rh,
        ) {
            warn!("Sampling: sample log append failed at t={timestamp_ms} ms");
        }
    }
}

impl<I2C, D, C> Activity for SamplingActivity<I2C, D, C>
where
    I2C: I2c,
    D: DelayNs,
    C: Clock,
{
    fn name(&self) -> &'static str {
        "sampling"
    }

    fn period(&self) -> Duration {
        self.period
    }

    fn run_once(&mut self) {
        self.cycles = self.cycles.wrapping_add(1);

        match self.sensor.read() {
            Ok(reading) => {
                self.cache.set(reading);
                self.stats.record_ok();
                debug!(
                    "Sampling: CO2={:.0}ppm T={:.2}\u{00b0}C RH={:.1}%",
                    reading.co2_ppm, reading.temperature_c, reading.humidity_rh
                );
                self.persist(reading);
            }
            Err(err) => {
                let run = self.stats.record_error(err);
                if !err.is_fault() {
                    trace!("Sampling: {err}");
                } else if run.is_power_of_two() {
                    warn!("Sampling: {err} ({run} consecutive)");
                }
            }
        }

        if self.report_every != 0 && self.cycles % self.report_every == 0 {
            info!("STATS | {}", self.stats.snapshot());
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Actuation
// ═══════════════════════════════════════════════════════════════

/// Steps the damper motor once per period while CO2 is above threshold.
pub struct ActuationActivity<P> {
    cache: Arc<ReadingCache>,
    stepper: Stepper<P>,
    threshold_ppm: f32,
    period: Duration,
    running: bool,
}

impl<P: OutputPin> ActuationActivity<P> {
    pub fn new(cache: Arc<ReadingCache>, stepper: Stepper<P>, config: &SystemConfig) -> Self {
        Self {
            cache,
            stepper,
            threshold_ppm: config.co2_threshold_ppm,
            period: millis(config.actuation_interval_ms),
            running: false,
        }
    }

    pub fn stepper(&self) -> &Stepper<P> {
        &self.stepper
    }
}

impl<P: OutputPin> Activity for ActuationActivity<P> {
    fn name(&self) -> &'static str {
        "actuation"
    }

    fn period(&self) -> Duration {
        self.period
    }

    fn run_once(&mut self) {
        let enabled = should_ventilate(self.cache.get(), self.threshold_ppm);
        if enabled != self.running {
            self.running = enabled;
            info!(
                "Actuation: damper motor {} (threshold {:.0} ppm)",
                if enabled { "started" } else { "stopped" },
                self.threshold_ppm
            );
        }
        self.stepper.step(enabled);
    }
}

// ═══════════════════════════════════════════════════════════════
//  Presentation
// ═══════════════════════════════════════════════════════════════

/// Forwards the cached reading to the display, one call per period.
pub struct PresentationActivity<Disp> {
    cache: Arc<ReadingCache>,
    pages: Arc<PageSelector>,
    display: Disp,
    period: Duration,
}

impl<Disp: DisplayPort> PresentationActivity<Disp> {
    pub fn new(
        cache: Arc<ReadingCache>,
        pages: Arc<PageSelector>,
        display: Disp,
        config: &SystemConfig,
    ) -> Self {
        Self {
            cache,
            pages,
            display,
            period: millis(config.presentation_interval_ms),
        }
    }

    pub fn display(&self) -> &Disp {
        &self.display
    }
}

impl<Disp: DisplayPort> Activity for PresentationActivity<Disp> {
    fn name(&self) -> &'static str {
        "presentation"
    }

    fn period(&self) -> Duration {
        self.period
    }

    fn run_once(&mut self) {
        present(self.cache.get(), self.pages.current(), &mut self.display);
    }
}

// ═══════════════════════════════════════════════════════════════
//  Inputs
// ═══════════════════════════════════════════════════════════════

/// Polls the page and log buttons.
pub struct InputActivity<P> {
    page_button: Button<P>,
    log_button: Button<P>,
    pages: Arc<PageSelector>,
    logging_enabled: Arc<AtomicBool>,
    period: Duration,
}

impl<P: InputPin> InputActivity<P> {
    pub fn new(
        page_button: Button<P>,
        log_button: Button<P>,
        pages: Arc<PageSelector>,
        logging_enabled: Arc<AtomicBool>,
        config: &SystemConfig,
    ) -> Self {
        Self {
            page_button,
            log_button,
            pages,
            logging_enabled,
            period: millis(config.input_poll_interval_ms),
        }
    }
}

impl<P: InputPin> Activity for InputActivity<P> {
    fn name(&self) -> &'static str {
        "inputs"
    }

    fn period(&self) -> Duration {
        self.period
    }

    fn run_once(&mut self) {
        if self.page_button.poll() == Some(ButtonEvent::Pressed) {
            let page = self.pages.advance();
            debug!("Input: '{}' pressed, page -> {:?}", self.page_button.label(), page);
        }

        if self.log_button.poll() == Some(ButtonEvent::Pressed) {
            let enabled = !self.logging_enabled.fetch_xor(true, Ordering::Relaxed);
            info!(
                "Input: '{}' pressed, sample logging {}",
                self.log_button.label(),
                if enabled { "enabled" } else { "disabled" }
            );
        }
    }
}
