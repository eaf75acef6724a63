use std::fmt;
use std::path::PathBuf;

/// Failures while loading, compiling, linking or binding a shader program.
#[derive(Debug)]
pub enum ShaderError {
    /// A source file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A source file failed to parse or validate; `message` is the rendered diagnostic.
    Compile { path: PathBuf, message: String },
    /// The stages do not form a usable program.
    Link(String),
    /// A uniform the caller needs is not exposed by the linked program.
    UniformNotFound { name: String },
    /// The device rejected the program's GPU objects.
    Device(String),
}

impl ShaderError {
    pub(crate) fn link(msg: impl Into<String>) -> Self {
        Self::Link(msg.into())
    }

    /// Name of the missing uniform, if this is a resolution failure.
    pub fn missing_uniform(&self) -> Option<&str> {
        match self {
            Self::UniformNotFound { name } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read shader source {}: {source}", path.display())
            }
            Self::Compile { path, message } => {
                write!(f, "shader build failed for {}:\n{message}", path.display())
            }
            Self::Link(msg) => write!(f, "shader linkage failed: {msg}"),
            Self::UniformNotFound { name } => write!(f, "failed to find uniform '{name}'"),
            Self::Device(msg) => write!(f, "device rejected the shader program: {msg}"),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
