//! Platform abstraction layer
//!
//! Handles browser/native differences for input. Everything here is plain
//! data so it can be exercised without a browser.

pub mod input;

pub use input::{ControlMode, InputState, KeyboardState, TouchTracker};
