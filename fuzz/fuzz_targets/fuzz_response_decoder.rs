//! Fuzz target: `scd41::decode_words`
//!
//! Feeds arbitrary byte strings to the response decoder as if they came
//! off the bus. It must never panic, must reject any length that is not a
//! whole number of words, and every word it accepts must carry a valid
//! checksum.
//!
//! cargo fuzz run fuzz_response_decoder

#![no_main]

use airvent::sensors::SensorReading;
use airvent::sensors::crc::crc8;
use airvent::sensors::scd41::decode_words;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let words = data.len() / 3;
    if words == 0 || words > 3 {
        let mut out = [0u16; 3];
        let _ = decode_words(data, &mut out[..words.min(3)]);
        return;
    }

    let mut out = [0u16; 3];
    let out = &mut out[..words];
    if data.len() % 3 != 0 {
        assert!(decode_words(data, out).is_err());
        return;
    }

    if decode_words(data, out).is_ok() {
        for (chunk, word) in data.chunks_exact(3).zip(out.iter()) {
            assert_eq!(crc8(&chunk[..2]), chunk[2]);
            assert_eq!(u16::from_be_bytes([chunk[0], chunk[1]]), *word);
        }
        if words == 3 {
            let r = SensorReading::from_raw_words([out[0], out[1], out[2]]);
            assert!((-45.0..=130.0).contains(&r.temperature_c));
            assert!((0.0..=100.0).contains(&r.humidity_rh));
        }
    }
});
