//! Unified error types for the airvent firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! boot path's error handling uniform. All variants are `Copy` so they can
//! be passed between activities and counted without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The CO2 sensor could not be read or initialised.
    Sensor(SensorError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Outcome of a failed sensor operation.
///
/// `NotReady` is the expected "try again next period" case and is not a
/// fault. Everything else is a communication fault; callers branch on
/// [`SensorError::is_fault`] and never on the fault kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The device has no new measurement yet.
    NotReady,
    /// The bus exchange failed or the response did not validate.
    Comms(CommsFault),
}

impl SensorError {
    /// True for communication faults, false for the benign `NotReady`.
    pub const fn is_fault(self) -> bool {
        matches!(self, Self::Comms(_))
    }
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "data not ready"),
            Self::Comms(fault) => write!(f, "read failed ({fault})"),
        }
    }
}

impl From<CommsFault> for SensorError {
    fn from(fault: CommsFault) -> Self {
        Self::Comms(fault)
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

/// Diagnostic detail of a communication fault. Kept for logs and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsFault {
    /// Bus write or read was not acknowledged / failed at the transport level.
    Transport,
    /// A response word arrived but its CRC-8 did not match.
    ChecksumMismatch,
}

impl fmt::Display for CommsFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "bus transfer failed"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
