//! GPIO / peripheral pin assignments for the ESP32-S3 ventilation board.
//!
//! Single source of truth — `main` references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// I²C bus (SCD41 at 0x62, LCD backpack at 0x27)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 4;
pub const I2C_SCL_GPIO: i32 = 5;
/// Standard-mode clock; the SCD41 tops out at 100 kHz.
pub const I2C_BAUDRATE_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Damper stepper (ULN2003 driver, coils A..D)
// ---------------------------------------------------------------------------

pub const MOTOR_COIL_GPIOS: [i32; 4] = [6, 7, 8, 3];

// ---------------------------------------------------------------------------
// Buttons
// ---------------------------------------------------------------------------

/// Next page. Active HIGH: internal pull-down, switch to 3V3.
pub const PAGE_BUTTON_GPIO: i32 = 35;
/// Toggle SD logging. Active LOW: internal pull-up, switch to GND.
pub const LOG_BUTTON_GPIO: i32 = 37;

// ---------------------------------------------------------------------------
// SD card (SPI)
// ---------------------------------------------------------------------------

pub const SD_CS_GPIO: i32 = 10;
pub const SD_MOSI_GPIO: i32 = 11;
pub const SD_SCK_GPIO: i32 = 12;
pub const SD_MISO_GPIO: i32 = 13;

/// VFS mount point of the card and the log file on it.
pub const SD_MOUNT_POINT: &str = "/sdcard";
pub const SAMPLE_LOG_PATH: &str = "/sdcard/scd41_log.csv";
/// Optional `SystemConfig` JSON document; defaults apply when absent.
pub const CONFIG_PATH: &str = "/sdcard/airvent.json";
