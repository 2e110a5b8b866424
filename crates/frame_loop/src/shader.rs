use crate::error::FrameLoopError;
use crate::error::FrameLoopResult;
use crate::geometry::Semantic;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

impl ShaderStage {
    /// Compiler target profile.
    pub fn target(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_5_0",
            ShaderStage::Pixel => "ps_5_0",
        }
    }

    /// Name handed to the compiler for diagnostics.
    pub fn source_name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VS",
            ShaderStage::Pixel => "PS",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("Vertex"),
            ShaderStage::Pixel => f.write_str("Pixel"),
        }
    }
}

pub const VERTEX_SHADER_FILE: &str = "vertexShader.hlsl";
pub const PIXEL_SHADER_FILE: &str = "pixelShader.hlsl";
pub const ENTRY_POINT: &str = "main";

/// Where a sample's shaders live and what the vertex stage consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderProgram {
    /// Searched after the working directory and the executable's directory.
    pub fallback_dir: PathBuf,
    pub inputs: Vec<Semantic>,
}

impl ShaderProgram {
    pub fn new(fallback_dir: impl Into<PathBuf>, inputs: impl Into<Vec<Semantic>>) -> Self {
        Self {
            fallback_dir: fallback_dir.into(),
            inputs: inputs.into(),
        }
    }

    pub fn load(&self) -> FrameLoopResult<ProgramSource> {
        Ok(ProgramSource {
            vertex: read_shader_source(VERTEX_SHADER_FILE, &self.fallback_dir)?,
            pixel: read_shader_source(PIXEL_SHADER_FILE, &self.fallback_dir)?,
            inputs: self.inputs.clone(),
        })
    }
}

/// Shader text ready for the compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramSource {
    pub vertex: String,
    pub pixel: String,
    pub inputs: Vec<Semantic>,
}

impl ProgramSource {
    pub fn stage(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Pixel => &self.pixel,
        }
    }
}

fn candidate_paths(file_name: &str, fallback_dir: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(file_name)];
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join(file_name));
    }
    candidates.push(fallback_dir.join(file_name));
    candidates
}

pub fn read_shader_source(file_name: &str, fallback_dir: &Path) -> FrameLoopResult<String> {
    let candidates = candidate_paths(file_name, fallback_dir);
    let path = candidates
        .iter()
        .find(|p| p.is_file())
        .unwrap_or(&candidates[0]);
    debug!("Reading shader source {:?}", path);
    std::fs::read_to_string(path).map_err(|source| FrameLoopError::ShaderSource {
        path: path.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "frame_loop_shader_{}_{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn fallback_dir_is_searched() {
        let dir = scratch_dir("fallback");
        std::fs::write(dir.join(VERTEX_SHADER_FILE), "float4 main() : SV_POSITION { return 0; }")
            .unwrap();
        std::fs::write(dir.join(PIXEL_SHADER_FILE), "float4 main() : SV_TARGET { return 1; }")
            .unwrap();

        let program = ShaderProgram::new(&dir, [Semantic::Position]);
        let source = program.load().unwrap();
        assert!(source.stage(ShaderStage::Vertex).contains("SV_POSITION"));
        assert!(source.stage(ShaderStage::Pixel).contains("SV_TARGET"));
        assert_eq!(source.inputs, vec![Semantic::Position]);

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn working_directory_wins_over_fallback_dir() {
        let file_name = format!("frame_loop_cwd_{}.hlsl", std::process::id());
        let dir = scratch_dir("cwd");
        std::fs::write(dir.join(&file_name), "// fallback").unwrap();
        std::fs::write(&file_name, "// working directory").unwrap();

        let candidates = candidate_paths(&file_name, &dir);
        assert_eq!(candidates.first(), Some(&PathBuf::from(&file_name)));
        assert_eq!(candidates.last(), Some(&dir.join(&file_name)));
        let source = read_shader_source(&file_name, &dir);

        std::fs::remove_file(&file_name).ok();
        std::fs::remove_dir_all(dir).ok();
        assert_eq!(source.unwrap(), "// working directory");
    }

    #[test]
    fn missing_source_names_the_file() {
        let dir = scratch_dir("missing");
        let error = read_shader_source("doesNotExist.hlsl", &dir).unwrap_err();
        match error {
            FrameLoopError::ShaderSource { path, .. } => {
                assert!(path.ends_with("doesNotExist.hlsl"))
            }
            other => panic!("unexpected error {other:?}"),
        }
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn stage_profiles() {
        assert_eq!(ShaderStage::Vertex.target(), "vs_5_0");
        assert_eq!(ShaderStage::Pixel.target(), "ps_5_0");
    }
}
