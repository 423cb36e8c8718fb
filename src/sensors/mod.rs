//! Sensor subsystem — the SCD41 CO2/temperature/humidity driver and the
//! value type it produces.
//!
//! A [`SensorReading`] is only ever built from a fully validated response;
//! it is `Copy` so consumers take whole-value snapshots out of the
//! [`ReadingCache`](crate::cache::ReadingCache).

pub mod crc;
pub mod scd41;

/// Denominator shared by the temperature and humidity conversions (2^16 - 1).
const WORD_FULL_SCALE: f32 = 65535.0;

/// One decoded measurement in engineering units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// CO2 concentration (ppm).
    pub co2_ppm: f32,
    /// Ambient temperature (°C).
    pub temperature_c: f32,
    /// Relative humidity (%RH).
    pub humidity_rh: f32,
}

impl SensorReading {
    pub const fn new(co2_ppm: f32, temperature_c: f32, humidity_rh: f32) -> Self {
        Self {
            co2_ppm,
            temperature_c,
            humidity_rh,
        }
    }

    /// Convert the three raw measurement words (CO2, T, RH) to units.
    ///
    /// ```text
    /// CO2 [ppm] = w0
    /// T   [°C]  = -45 + 175 * w1 / 65535
    /// RH  [%]   = 100 * w2 / 65535
    /// ```
    pub fn from_raw_words(words: [u16; 3]) -> Self {
        let [co2, temp, rh] = words;
        Self {
            co2_ppm: f32::from(co2),
            temperature_c: -45.0 + 175.0 * (f32::from(temp) / WORD_FULL_SCALE),
            humidity_rh: 100.0 * (f32::from(rh) / WORD_FULL_SCALE),
        }
    }
}
