//! Counter-debounced push buttons.
//!
//! ## Hardware
//!
//! Two momentary switches polled at a fixed rate by the input activity:
//!
//! | Button | Wiring                    | Active level | Action               |
//! |--------|---------------------------|--------------|----------------------|
//! | Page   | pull-down, switch to 3V3  | high         | cycle display page   |
//! | Log    | internal pull-up          | low          | toggle sample logging|
//!
//! ## Debounce
//!
//! A raw level that differs from the accepted level must be observed on
//! `settle_samples` consecutive polls before it is accepted. Any poll that
//! matches the accepted level resets the counter, so contact bounce never
//! produces an edge.

use embedded_hal::digital::InputPin;
use log::debug;

/// Edge reported once the new level has settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
    Released,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    active_high: bool,
    settle_samples: u8,
    stable_level: bool,
    pending: u8,
}

impl Debouncer {
    /// Create a debouncer that starts in the released state.
    pub fn new(active_high: bool, settle_samples: u8) -> Self {
        Self {
            active_high,
            settle_samples: settle_samples.max(1),
            stable_level: !active_high,
            pending: 0,
        }
    }

    /// Feed one raw level sample. Returns an event when an edge settles.
    pub fn update(&mut self, level_high: bool) -> Option<ButtonEvent> {
        if level_high == self.stable_level {
            self.pending = 0;
            return None;
        }

        self.pending += 1;
        if self.pending < self.settle_samples {
            return None;
        }

        self.pending = 0;
        self.stable_level = level_high;
        if level_high == self.active_high {
            Some(ButtonEvent::Pressed)
        } else {
            Some(ButtonEvent::Released)
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.stable_level == self.active_high
    }
}

/// A GPIO input paired with its debouncer.
pub struct Button<P> {
    pin: P,
    debouncer: Debouncer,
    label: &'static str,
}

impl<P: InputPin> Button<P> {
    pub fn new(label: &'static str, pin: P, active_high: bool, settle_samples: u8) -> Self {
        Self {
            pin,
            debouncer: Debouncer::new(active_high, settle_samples),
            label,
        }
    }

    /// Sample the pin once. A failed read is skipped and does not count
    /// towards the settle window.
    pub fn poll(&mut self) -> Option<ButtonEvent> {
        match self.pin.is_high() {
            Ok(level) => self.debouncer.update(level),
            Err(e) => {
                debug!("Button '{}': read failed: {:?}", self.label, e);
                None
            }
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}
