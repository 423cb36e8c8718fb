//! Unipolar stepper driver (28BYJ-48 via ULN2003) for the ventilation damper.
//!
//! Half-step drive: eight phases alternating single- and dual-coil
//! energisation. One call to [`Stepper::step`] performs exactly one
//! transition; the actuation activity owns the timing.
//!
//! ## Dual-target design
//!
//! The coils are any four `embedded_hal::digital::OutputPin`s, so the same
//! driver runs against ESP-IDF `PinDriver`s and host-side recording pins.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

/// Number of phases in the half-step cycle.
pub const PHASE_COUNT: usize = 8;

/// Coil activation per phase (IN1..IN4). Neighbouring rows, including
/// 7 → 0, differ by exactly one coil.
pub static HALF_STEP_SEQUENCE: [[bool; 4]; PHASE_COUNT] = [
    [true, false, false, false],
    [true, true, false, false],
    [false, true, false, false],
    [false, true, true, false],
    [false, false, true, false],
    [false, false, true, true],
    [false, false, false, true],
    [true, false, false, true],
];

const ALL_OFF: [bool; 4] = [false; 4];

pub struct Stepper<P> {
    coils: [P; 4],
    phase: usize,
    driven: [bool; 4],
}

impl<P: OutputPin> Stepper<P> {
    /// Take ownership of the coil pins and de-energise them.
    pub fn new(coils: [P; 4]) -> Self {
        let mut stepper = Self {
            coils,
            phase: 0,
            driven: ALL_OFF,
        };
        stepper.drive(ALL_OFF);
        stepper
    }

    /// Advance one half-step when `enabled`, otherwise release all coils.
    ///
    /// Disabling keeps the phase index so the next enabled step continues
    /// the sequence instead of restarting it.
    pub fn step(&mut self, enabled: bool) {
        if enabled {
            self.phase = (self.phase + 1) % PHASE_COUNT;
            self.drive(HALF_STEP_SEQUENCE[self.phase]);
        } else {
            self.drive(ALL_OFF);
        }
    }

    pub fn phase_index(&self) -> usize {
        self.phase
    }

    pub fn is_energized(&self) -> bool {
        self.driven.iter().any(|&on| on)
    }

    pub fn release(mut self) -> [P; 4] {
        self.drive(ALL_OFF);
        self.coils
    }

    fn drive(&mut self, pattern: [bool; 4]) {
        for (i, (pin, &on)) in self.coils.iter_mut().zip(pattern.iter()).enumerate() {
            if let Err(e) = pin.set_state(PinState::from(on)) {
                warn!("Stepper: coil {} write failed: {:?}", i + 1, e);
            }
        }
        self.driven = pattern;
    }
}
