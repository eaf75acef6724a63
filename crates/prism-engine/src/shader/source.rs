use std::fs;
use std::path::{Path, PathBuf};

use super::ShaderError;

/// Shader directory shipped with the engine crate.
pub const BUNDLED_SHADER_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders");

/// File name of the color program's vertex stage inside the shader directory.
pub const COLOR_VERTEX_FILE: &str = "color.vert.wgsl";

/// File name of the color program's fragment stage inside the shader directory.
pub const COLOR_FRAGMENT_FILE: &str = "color.frag.wgsl";

/// One shader stage's WGSL text and where it came from.
#[derive(Debug, Clone)]
pub struct StageSource {
    pub path: PathBuf,
    pub code: String,
}

impl StageSource {
    pub fn new(path: impl Into<PathBuf>, code: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code: code.into(),
        }
    }

    pub fn read(path: &Path) -> Result<Self, ShaderError> {
        let code = fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path, code))
    }
}

/// Vertex + fragment sources for one program.
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: StageSource,
    pub fragment: StageSource,
}

impl ShaderSources {
    /// Reads the color program from `dir`.
    pub fn load_color(dir: &Path) -> Result<Self, ShaderError> {
        let vertex = StageSource::read(&dir.join(COLOR_VERTEX_FILE))?;
        let fragment = StageSource::read(&dir.join(COLOR_FRAGMENT_FILE))?;
        log::debug!(
            "loaded shader sources {} + {}",
            vertex.path.display(),
            fragment.path.display()
        );
        Ok(Self { vertex, fragment })
    }

    /// The color program as shipped with the crate, embedded at build time.
    pub fn builtin_color() -> Self {
        Self {
            vertex: StageSource::new(
                COLOR_VERTEX_FILE,
                include_str!("../../shaders/color.vert.wgsl"),
            ),
            fragment: StageSource::new(
                COLOR_FRAGMENT_FILE,
                include_str!("../../shaders/color.frag.wgsl"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_shipped_shaders_from_disk() {
        let dir = Path::new(BUNDLED_SHADER_DIR);
        let sources = ShaderSources::load_color(dir).unwrap();
        assert!(sources.vertex.code.contains("vs_main"));
        assert!(sources.fragment.code.contains("fs_main"));
    }

    #[test]
    fn missing_directory_reports_path() {
        let err = ShaderSources::load_color(Path::new("does/not/exist")).unwrap_err();
        match err {
            ShaderError::Io { path, .. } => assert!(path.ends_with(COLOR_VERTEX_FILE)),
            other => panic!("unexpected error: {other}"),
        }
    }
}
