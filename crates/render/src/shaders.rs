use crate::shader::{self, LinkedProgram, ProgramBuilder, ShaderError, ShaderStage};
use std::path::Path;

/// File names looked up inside a shader override directory.
pub const VERTEX_SHADER_FILE: &str = "vertex.wgsl";
pub const FRAGMENT_SHADER_FILE: &str = "fragment.wgsl";

/// Vertex stage: transforms cube vertices by model, view and projection.
pub const DEFAULT_VERTEX_SHADER: &str = include_str!("../shaders/vertex.wgsl");

/// Fragment stage: samples the cube texture, modulated by a time-based shade.
pub const DEFAULT_FRAGMENT_SHADER: &str = include_str!("../shaders/fragment.wgsl");

/// Compile and link the scene program, from `dir` when given or from the
/// embedded defaults otherwise.
pub fn build_program(dir: Option<&Path>) -> Result<LinkedProgram, ShaderError> {
    let (vertex, fragment) = match dir {
        Some(dir) => {
            tracing::info!("loading shaders from {}", dir.display());
            (
                shader::compile_file(&dir.join(VERTEX_SHADER_FILE), ShaderStage::Vertex)?,
                shader::compile_file(&dir.join(FRAGMENT_SHADER_FILE), ShaderStage::Fragment)?,
            )
        }
        None => (
            shader::compile(DEFAULT_VERTEX_SHADER, ShaderStage::Vertex)?,
            shader::compile(DEFAULT_FRAGMENT_SHADER, ShaderStage::Fragment)?,
        ),
    };

    ProgramBuilder::new().stage(vertex).stage(fragment).link()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_program_links() {
        let program = build_program(None).unwrap();
        assert_eq!(program.vertex().entry_point(), "vs_main");
        assert_eq!(program.fragment().entry_point(), "fs_main");
    }

    #[test]
    fn program_loads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(VERTEX_SHADER_FILE), DEFAULT_VERTEX_SHADER).unwrap();
        std::fs::write(dir.path().join(FRAGMENT_SHADER_FILE), DEFAULT_FRAGMENT_SHADER).unwrap();
        assert!(build_program(Some(dir.path())).is_ok());
    }

    #[test]
    fn missing_directory_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(VERTEX_SHADER_FILE), DEFAULT_VERTEX_SHADER).unwrap();
        let err = build_program(Some(dir.path())).unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
    }

    #[test]
    fn broken_override_fails_to_compile() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(VERTEX_SHADER_FILE), "@vertex fn vs_main(").unwrap();
        std::fs::write(dir.path().join(FRAGMENT_SHADER_FILE), DEFAULT_FRAGMENT_SHADER).unwrap();
        let err = build_program(Some(dir.path())).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Parse {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
    }
}
