//! Fly controls: maps per-frame input onto the camera's position and angles.
//!
//! # Invariants
//! - Pitch is clamped to `[-89, 89]` before the camera derives its basis.
//! - Look deltas are applied once per frame, never per event.
//! - Frame time is measured from the previous frame, starting at loop entry.

pub mod action;
pub mod clock;
pub mod controller;

pub use action::{Action, FrameInput};
pub use clock::FrameClock;
pub use controller::{ControlSettings, FlyController, PITCH_LIMIT, clamp_pitch, wrap_yaw};

pub fn crate_info() -> &'static str {
    concat!("cubecam-input v", env!("CARGO_PKG_VERSION"))
}
