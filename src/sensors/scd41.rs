//! Sensirion SCD41 photoacoustic CO2 sensor driver (periodic mode).
//!
//! Talks to the sensor through any `embedded_hal::i2c::I2c` bus and blocks
//! on an `embedded_hal::delay::DelayNs` for the command execution windows.
//!
//! ## Protocol
//!
//! ```text
//! host → sensor : [cmd_hi, cmd_lo]                     (16-bit opcode)
//! wait ~1 ms
//! sensor → host : [msb, lsb, crc] × n_words            (CRC-8 per word)
//! ```
//!
//! A read first polls `get_data_ready_status`; only when the low 11 bits of
//! the status word are non-zero does it fetch the three measurement words.
//!
//! ## State
//!
//! | State           | Entered by                  |
//! |-----------------|-----------------------------|
//! | `Uninitialized` | construction                |
//! | `Periodic`      | `init()` start acknowledged |
//!
//! Read faults never change the state; the caller owns retry policy.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{Error as _, I2c};
use log::{debug, info};

use super::SensorReading;
use super::crc::word_checksum_ok;
use crate::error::{CommsFault, SensorError};

/// Default 7-bit I2C address.
pub const DEFAULT_ADDRESS: u8 = 0x62;

/// Maximum power-up time is 30 ms; wait a little longer.
const POWER_UP_DELAY_MS: u32 = 50;
/// After `stop_periodic_measurement` the sensor ignores commands for 500 ms.
const STOP_SETTLE_MS: u32 = 500;
/// Execution time of the read-type commands used here.
const RESPONSE_DELAY_MS: u32 = 1;

/// Data-ready flag lives in the least significant 11 bits of the status word.
const DATA_READY_MASK: u16 = 0x07FF;

const BYTES_PER_WORD: usize = 3;
const MAX_WORDS: usize = 3;

/// SCD41 command opcodes, transmitted high byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Command {
    StartPeriodicMeasurement = 0x21B1,
    StopPeriodicMeasurement = 0x3F86,
    GetDataReadyStatus = 0xE4B8,
    ReadMeasurement = 0xEC05,
}

impl Command {
    pub const fn opcode(self) -> u16 {
        self as u16
    }

    /// Wire encoding (big-endian).
    pub const fn to_bytes(self) -> [u8; 2] {
        self.opcode().to_be_bytes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Uninitialized,
    Periodic,
}

/// Interpret a `get_data_ready_status` word.
pub const fn status_is_ready(status: u16) -> bool {
    status & DATA_READY_MASK != 0
}

/// Decode `[msb, lsb, crc]` triplets into `out`, validating every checksum.
///
/// `bytes` must hold exactly `out.len() * 3` bytes. On any mismatch nothing
/// useful is left in `out` and the whole decode fails.
pub fn decode_words(bytes: &[u8], out: &mut [u16]) -> Result<(), CommsFault> {
    if bytes.len() != out.len() * BYTES_PER_WORD {
        return Err(CommsFault::Transport);
    }
    for (word, chunk) in out.iter_mut().zip(bytes.chunks_exact(BYTES_PER_WORD)) {
        let (msb, lsb, crc) = (chunk[0], chunk[1], chunk[2]);
        if !word_checksum_ok(msb, lsb, crc) {
            return Err(CommsFault::ChecksumMismatch);
        }
        *word = u16::from_be_bytes([msb, lsb]);
    }
    Ok(())
}

pub struct Scd41<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    state: DriverState,
}

impl<I2C, D> Scd41<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a driver at the default address (0x62).
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            state: DriverState::Uninitialized,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Hand back the bus and delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Restart periodic measurement.
    ///
    /// Only the start command's acknowledgement decides the result; the
    /// sensor's first sample arrives ~5 s later.
    pub fn init(&mut self) -> Result<(), SensorError> {
        self.delay.delay_ms(POWER_UP_DELAY_MS);

        // The sensor may not have been measuring, in which case it NACKs.
        if let Err(e) = self.send_command(Command::StopPeriodicMeasurement) {
            debug!("SCD41: stop before start ignored ({e})");
        }
        self.delay.delay_ms(STOP_SETTLE_MS);

        self.send_command(Command::StartPeriodicMeasurement)?;
        self.state = DriverState::Periodic;
        info!("SCD41: periodic measurement started (addr=0x{:02X})", self.address);
        Ok(())
    }

    /// Fetch the newest measurement if one is available.
    pub fn read(&mut self) -> Result<SensorReading, SensorError> {
        if !self.data_ready()? {
            return Err(SensorError::NotReady);
        }

        let mut words = [0u16; 3];
        self.read_words(Command::ReadMeasurement, &mut words)?;
        Ok(SensorReading::from_raw_words(words))
    }

    /// Poll the data-ready status word.
    pub fn data_ready(&mut self) -> Result<bool, SensorError> {
        let mut status = [0u16; 1];
        self.read_words(Command::GetDataReadyStatus, &mut status)?;
        Ok(status_is_ready(status[0]))
    }

    // ── Internal ──────────────────────────────────────────────────

    fn send_command(&mut self, cmd: Command) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &cmd.to_bytes())
            .map_err(|e| transport_fault("write", cmd, e.kind()))
    }

    fn read_words(&mut self, cmd: Command, out: &mut [u16]) -> Result<(), SensorError> {
        debug_assert!(out.len() <= MAX_WORDS);

        self.send_command(cmd)?;
        self.delay.delay_ms(RESPONSE_DELAY_MS);

        let mut buf = [0u8; MAX_WORDS * BYTES_PER_WORD];
        let buf = &mut buf[..out.len() * BYTES_PER_WORD];
        self.i2c
            .read(self.address, buf)
            .map_err(|e| transport_fault("read", cmd, e.kind()))?;

        decode_words(buf, out).map_err(|fault| {
            debug!("SCD41: {:?} response rejected ({fault})", cmd);
            SensorError::Comms(fault)
        })
    }
}

fn transport_fault(op: &str, cmd: Command, kind: embedded_hal::i2c::ErrorKind) -> SensorError {
    debug!("SCD41: bus {op} failed for {:?}: {:?}", cmd, kind);
    SensorError::Comms(CommsFault::Transport)
}
