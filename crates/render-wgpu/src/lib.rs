//! wgpu render backend for the cube scene.
//!
//! Builds a render pipeline from a [`cubecam_render::LinkedProgram`], uploads
//! the cube mesh and texture once, and writes the frame's model, view and
//! projection matrices into a uniform buffer every frame.
//!
//! # Invariants
//! - The renderer never mutates the camera; it only reads frame matrices.
//! - A pipeline that fails GPU-side validation is reported, never drawn with.

mod gpu;

pub use gpu::CubeRenderer;

pub fn crate_info() -> &'static str {
    concat!("cubecam-render-wgpu v", env!("CARGO_PKG_VERSION"))
}
