//! Airvent Firmware — Main Entry Point
//!
//! Wires the board peripherals into the four periodic activities and
//! spawns each on its own FreeRTOS-backed thread.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  core 0                                    core 1            │
//! │                                                              │
//! │  sampling (1 s) ──set──▶ ┌──────────────┐ ◀──get── motor (5 ms)│
//! │                          │ ReadingCache │                     │
//! │  display (500 ms) ◀─get─ └──────────────┘                     │
//! │        ▲                                                     │
//! │        │ page / log flag (atomics)                           │
//! │  inputs (10 ms)                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::hal::delay::Delay;
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyOutputPin, PinDriver, Pull};
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::spi::SPI2;
use esp_idf_svc::hal::units::Hertz;

use airvent::adapters::csv_log::CsvSampleLog;
use airvent::adapters::lcd_text::LcdTextDisplay;
use airvent::adapters::time::MonotonicClock;
use airvent::app::activities::{
    ActuationActivity, InputActivity, PresentationActivity, SamplingActivity,
};
use airvent::app::presenter::PageSelector;
use airvent::cache::ReadingCache;
use airvent::config::SystemConfig;
use airvent::diagnostics::SampleStats;
use airvent::drivers::button::Button;
use airvent::drivers::stepper::Stepper;
use airvent::drivers::task_pin::{
    ACTUATION_TASK, INPUT_TASK, PRESENTATION_TASK, SAMPLING_TASK, spawn_on_core,
};
use airvent::error::Error;
use airvent::pins;
use airvent::scheduler::run_forever;
use airvent::sensors::scd41::Scd41;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Airvent v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let peripherals =
        Peripherals::take().map_err(|_| Error::Init("peripherals already taken"))?;

    // ── 2. SD card + config ───────────────────────────────────
    let sd_card = match mount_sd_card(peripherals.spi2) {
        Ok(mounted) => Some(mounted),
        Err(e) => {
            warn!("SD card mount failed: {e:#}, logging disabled");
            None
        }
    };
    let config = if sd_card.is_some() {
        load_config(pins::CONFIG_PATH)
    } else {
        SystemConfig::default()
    };
    config.validate()?;
    info!(
        "Config: threshold={:.0}ppm sample={}ms motor={}ms",
        config.co2_threshold_ppm, config.sample_interval_ms, config.actuation_interval_ms
    );

    // ── 3. Sensor ─────────────────────────────────────────────
    // SAFETY: each GPIO number in `pins` is claimed exactly once below.
    let (sda, scl) = unsafe {
        (
            AnyIOPin::new(pins::I2C_SDA_GPIO),
            AnyIOPin::new(pins::I2C_SCL_GPIO),
        )
    };
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        sda,
        scl,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_BAUDRATE_HZ)),
    )?;
    let mut sensor = Scd41::with_address(i2c, Delay::new_default(), config.sensor_address);
    // Not fatal: a sensor that is already measuring still answers reads.
    if let Err(e) = sensor.init() {
        warn!("SCD41 init failed: {e}, sampling anyway");
    }

    // ── 4. Shared state ───────────────────────────────────────
    let cache = Arc::new(ReadingCache::new());
    let stats = Arc::new(SampleStats::new());
    let pages = Arc::new(PageSelector::default());
    let logging_enabled = Arc::new(AtomicBool::new(config.storage_enabled));
    let clock = MonotonicClock::new();

    // ── 5. Storage ────────────────────────────────────────────
    let mut sampling = SamplingActivity::new(sensor, cache.clone(), stats, clock, &config);
    if sd_card.is_some() {
        match CsvSampleLog::open(pins::SAMPLE_LOG_PATH) {
            Ok(log) => {
                sampling = sampling.with_storage(Box::new(log), logging_enabled.clone());
            }
            Err(e) => warn!("Sample log unavailable: {e:#}"),
        }
    }

    // ── 6. Damper motor ───────────────────────────────────────
    let coils = pins::MOTOR_COIL_GPIOS.map(|gpio| {
        // SAFETY: see above.
        PinDriver::output(unsafe { AnyOutputPin::new(gpio) })
    });
    let [a, b, c, d] = coils;
    let stepper = Stepper::new([a?, b?, c?, d?]);
    let actuation = ActuationActivity::new(cache.clone(), stepper, &config);

    // ── 7. Display + buttons ──────────────────────────────────
    let display = LcdTextDisplay::new(logging_enabled.clone());
    let presentation = PresentationActivity::new(cache, pages.clone(), display, &config);

    let mut page_pin = PinDriver::input(unsafe { AnyIOPin::new(pins::PAGE_BUTTON_GPIO) })?;
    page_pin.set_pull(Pull::Down)?;
    let mut log_pin = PinDriver::input(unsafe { AnyIOPin::new(pins::LOG_BUTTON_GPIO) })?;
    log_pin.set_pull(Pull::Up)?;
    let inputs = InputActivity::new(
        Button::new("page", page_pin, true, config.debounce_samples),
        Button::new("log", log_pin, false, config.debounce_samples),
        pages,
        logging_enabled,
        &config,
    );

    // ── 8. Spawn ──────────────────────────────────────────────
    let handles = [
        spawn_on_core(ACTUATION_TASK, move || run_forever(actuation, clock))?,
        spawn_on_core(SAMPLING_TASK, move || run_forever(sampling, clock))?,
        spawn_on_core(PRESENTATION_TASK, move || run_forever(presentation, clock))?,
        spawn_on_core(INPUT_TASK, move || run_forever(inputs, clock))?,
    ];
    info!("All activities running");

    for handle in handles {
        if handle.join().is_err() {
            warn!("An activity thread panicked");
        }
    }
    Ok(())
}

/// Read the optional JSON config document from the card. A missing file
/// means defaults; an unreadable or invalid one is reported and ignored.
fn load_config(path: &str) -> SystemConfig {
    match std::fs::read_to_string(path) {
        Ok(json) => match SystemConfig::from_json(&json) {
            Ok(config) => {
                info!("Config loaded from {path}");
                config
            }
            Err(e) => {
                warn!("Config {path} rejected ({e}), using defaults");
                SystemConfig::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No config at {path}, using defaults");
            SystemConfig::default()
        }
        Err(e) => {
            warn!("Config {path} unreadable ({e}), using defaults");
            SystemConfig::default()
        }
    }
}

/// Mount the SD card's FAT volume at [`pins::SD_MOUNT_POINT`]. The card
/// stays mounted for as long as the returned guard lives.
fn mount_sd_card(spi: SPI2) -> Result<impl Sized> {
    use esp_idf_svc::fs::fatfs::Fatfs;
    use esp_idf_svc::hal::sd::spi::SdSpiHostDriver;
    use esp_idf_svc::hal::sd::{SdCardConfiguration, SdCardDriver};
    use esp_idf_svc::hal::spi::config::DriverConfig;
    use esp_idf_svc::hal::spi::{Dma, SpiDriver};
    use esp_idf_svc::io::vfs::MountedFatfs;

    // SAFETY: see `main`.
    let (sck, mosi, miso, cs) = unsafe {
        (
            AnyIOPin::new(pins::SD_SCK_GPIO),
            AnyIOPin::new(pins::SD_MOSI_GPIO),
            AnyIOPin::new(pins::SD_MISO_GPIO),
            AnyIOPin::new(pins::SD_CS_GPIO),
        )
    };
    let spi = SpiDriver::new(
        spi,
        sck,
        mosi,
        Some(miso),
        &DriverConfig::default().dma(Dma::Auto(4096)),
    )?;
    let host = SdSpiHostDriver::new(
        spi,
        Some(cs),
        AnyIOPin::none(),
        AnyIOPin::none(),
        AnyIOPin::none(),
        None,
    )?;
    let card = SdCardDriver::new_spi(host, &SdCardConfiguration::new())?;
    let mounted = MountedFatfs::mount(Fatfs::new_sdcard(0, card)?, pins::SD_MOUNT_POINT, 4)?;
    info!("SD card mounted at {}", pins::SD_MOUNT_POINT);
    Ok(mounted)
}
