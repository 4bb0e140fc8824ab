//! Camera model: turns Euler orientation state into a renderable view matrix.
//!
//! Two ways to orient the camera:
//! - free-fly: write `position`/`eulers`, then call [`Camera::update`];
//! - look-at: call [`Camera::look_at`] with a target point, which re-derives
//!   `eulers` so a following free-fly update continues from the same pose.
//!
//! # Invariants
//! - `forward`, `right`, `up` are orthonormal right after `update`/`look_at`.
//! - Derived state is never written directly; it is recomputed from
//!   `position` and `eulers`.
//! - Pitch limits are the caller's policy, not the camera's.

mod camera;
mod projection;
mod readout;

pub use camera::{Camera, Eulers, WORLD_UP};
pub use projection::Projection;
pub use readout::PoseReadout;

pub fn crate_info() -> &'static str {
    concat!("cubecam-camera v", env!("CARGO_PKG_VERSION"))
}
