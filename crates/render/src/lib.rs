//! Render data that does not touch the GPU.
//!
//! The wgpu backend consumes what this crate produces: the cube mesh, texture
//! pixels, per-frame uniforms, and a linked shader program whose stages were
//! parsed and checked with naga before any device exists.
//!
//! # Invariants
//! - A [`LinkedProgram`] always has exactly one vertex and one fragment stage
//!   with matching `@location` interfaces.
//! - The model matrix is identity; the scene has a single cube at the origin.

mod frame;
mod mesh;
mod shader;
mod shaders;
mod texture;

pub use frame::{FrameMatrices, SceneUniforms};
pub use mesh::{MeshVertex, cube_mesh};
pub use shader::{
    CompiledStage, LinkedProgram, ProgramBuilder, ShaderError, ShaderStage, compile, compile_file,
    link, load_source,
};
pub use shaders::{
    DEFAULT_FRAGMENT_SHADER, DEFAULT_VERTEX_SHADER, FRAGMENT_SHADER_FILE, VERTEX_SHADER_FILE,
    build_program,
};
pub use texture::{TextureData, TextureError};

pub fn crate_info() -> &'static str {
    concat!("cubecam-render v", env!("CARGO_PKG_VERSION"))
}
