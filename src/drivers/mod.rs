//! Peripheral drivers and task helpers.

pub mod button;
pub mod stepper;
pub mod task_pin;
