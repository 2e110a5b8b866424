use bevy_math::Vec3;
use frame_loop::Sample;
use frame_loop::geometry::Mesh;
use frame_loop::geometry::Semantic;
use frame_loop::geometry::triangle;
use frame_loop::shader::ShaderProgram;

/// A red, blue and green triangle three units in front of the camera.
struct PerspectiveTriangle;

impl Sample for PerspectiveTriangle {
    fn title(&self) -> String {
        "D3D11 Perspective Triangle".into()
    }

    fn shader_program(&self) -> Option<ShaderProgram> {
        Some(ShaderProgram::new(
            concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"),
            [Semantic::Position, Semantic::Color],
        ))
    }

    fn mesh(&self) -> Option<Mesh> {
        Some(triangle())
    }

    fn world_translation(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, 3.0)
    }
}

#[cfg(windows)]
fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    frame_loop::run_sample(PerspectiveTriangle)
}

#[cfg(not(windows))]
fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    eyre::bail!(
        "{} needs Direct3D 11 and only runs on Windows",
        PerspectiveTriangle.title()
    )
}
