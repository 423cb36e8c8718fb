//! Sensirion CRC-8 (polynomial 0x31, init 0xFF, no reflection, no final XOR).
//!
//! Every 16-bit word the SCD41 returns is followed by this checksum computed
//! over the word's two bytes, MSB first.

const CRC8_POLYNOMIAL: u8 = 0x31;
const CRC8_INIT: u8 = 0xFF;

/// Compute the CRC-8 over an arbitrary byte slice.
pub const fn crc8(data: &[u8]) -> u8 {
    let mut crc = CRC8_INIT;
    let mut i = 0;
    while i < data.len() {
        crc ^= data[i];
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ CRC8_POLYNOMIAL
            } else {
                crc << 1
            };
            bit += 1;
        }
        i += 1;
    }
    crc
}

/// Validate one response word against its trailing checksum byte.
pub const fn word_checksum_ok(msb: u8, lsb: u8, crc: u8) -> bool {
    crc8(&[msb, lsb]) == crc
}
