//! Application core — the periodic activities and the policies they apply.
//!
//! Sampling, actuation, presentation and input handling are each an
//! [`Activity`](crate::scheduler::Activity). Interaction with the display
//! panel and removable storage happens through the **port traits** in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod activities;
pub mod ports;
pub mod presenter;
