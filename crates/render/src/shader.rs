use naga::{Binding, Handle, Module, Type, TypeInner};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Pipeline stage a shader module is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors from loading, compiling, or linking shaders.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to compile {stage} shader:\n{log}")]
    Parse { stage: ShaderStage, log: String },
    #[error("{stage} shader failed validation:\n{log}")]
    Validation { stage: ShaderStage, log: String },
    #[error("{stage} shader has no {stage} entry point")]
    MissingEntryPoint { stage: ShaderStage },
    #[error("failed to link program: {0}")]
    Link(String),
}

/// A parsed and validated shader module bound to one entry point.
#[derive(Debug, Clone)]
pub struct CompiledStage {
    stage: ShaderStage,
    entry_point: String,
    source: String,
    module: Module,
}

impl CompiledStage {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// WGSL text the module was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    fn entry(&self) -> Option<&naga::EntryPoint> {
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.name == self.entry_point)
    }

    /// `@location` outputs of a vertex entry point.
    fn outputs(&self) -> BTreeMap<u32, TypeInner> {
        let mut out = BTreeMap::new();
        if let Some(result) = self.entry().and_then(|ep| ep.function.result.as_ref()) {
            collect_locations(&self.module, result.ty, result.binding.as_ref(), &mut out);
        }
        out
    }

    /// `@location` inputs of an entry point.
    fn inputs(&self) -> BTreeMap<u32, TypeInner> {
        let mut out = BTreeMap::new();
        if let Some(ep) = self.entry() {
            for arg in &ep.function.arguments {
                collect_locations(&self.module, arg.ty, arg.binding.as_ref(), &mut out);
            }
        }
        out
    }
}

fn collect_locations(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut BTreeMap<u32, TypeInner>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => {
            out.insert(*location, module.types[ty].inner.clone());
        }
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

/// Read shader text from disk.
pub fn load_source(path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse and validate WGSL for `stage`, selecting the first entry point of
/// that stage.
pub fn compile(source: &str, stage: ShaderStage) -> Result<CompiledStage, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Parse {
        stage,
        log: e.emit_to_string(source),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .map_err(|e| ShaderError::Validation {
        stage,
        log: e.emit_to_string(source),
    })?;

    let entry_point = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage.naga())
        .map(|ep| ep.name.clone())
        .ok_or(ShaderError::MissingEntryPoint { stage })?;

    tracing::debug!(%stage, entry_point = %entry_point, "shader compiled");

    Ok(CompiledStage {
        stage,
        entry_point,
        source: source.to_owned(),
        module,
    })
}

pub fn compile_file(path: &Path, stage: ShaderStage) -> Result<CompiledStage, ShaderError> {
    let source = load_source(path)?;
    compile(&source, stage)
}

/// A vertex + fragment pair whose stage interfaces agree.
#[derive(Debug, Clone)]
pub struct LinkedProgram {
    vertex: CompiledStage,
    fragment: CompiledStage,
}

impl LinkedProgram {
    pub fn vertex(&self) -> &CompiledStage {
        &self.vertex
    }

    pub fn fragment(&self) -> &CompiledStage {
        &self.fragment
    }
}

/// Collects compiled stages in order and links them into a program.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    stages: Vec<CompiledStage>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: CompiledStage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn link(self) -> Result<LinkedProgram, ShaderError> {
        link(self.stages)
    }
}

/// Link an ordered list of stages.
///
/// Requires exactly one vertex and one fragment stage. Every fragment
/// `@location` input must be written by the vertex stage with the same type.
pub fn link(stages: Vec<CompiledStage>) -> Result<LinkedProgram, ShaderError> {
    let mut vertex = None;
    let mut fragment = None;

    for stage in stages {
        let slot = match stage.stage {
            ShaderStage::Vertex => &mut vertex,
            ShaderStage::Fragment => &mut fragment,
        };
        if slot.is_some() {
            return Err(ShaderError::Link(format!(
                "more than one {} stage",
                stage.stage
            )));
        }
        *slot = Some(stage);
    }

    let vertex = vertex.ok_or_else(|| ShaderError::Link("missing vertex stage".into()))?;
    let fragment = fragment.ok_or_else(|| ShaderError::Link("missing fragment stage".into()))?;

    let outputs = vertex.outputs();
    for (location, ty) in fragment.inputs() {
        match outputs.get(&location) {
            None => {
                return Err(ShaderError::Link(format!(
                    "fragment input @location({location}) is not written by the vertex stage"
                )));
            }
            Some(out_ty) if *out_ty != ty => {
                return Err(ShaderError::Link(format!(
                    "@location({location}) type mismatch: vertex writes {out_ty:?}, fragment reads {ty:?}"
                )));
            }
            Some(_) => {}
        }
    }

    tracing::debug!(
        vertex = vertex.entry_point(),
        fragment = fragment.entry_point(),
        "program linked"
    );

    Ok(LinkedProgram { vertex, fragment })
}
