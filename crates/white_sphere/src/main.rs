use bevy_math::Vec3;
use frame_loop::RasterizerConfig;
use frame_loop::Sample;
use frame_loop::geometry::Mesh;
use frame_loop::geometry::Semantic;
use frame_loop::shader::ShaderProgram;
use frame_loop::sphere::SphereMesh;
use tracing::debug;

/// A flat white sphere drawn with an index buffer, a depth buffer and culling off.
struct WhiteSphere;

impl Sample for WhiteSphere {
    fn title(&self) -> String {
        "D3D11 White Sphere".into()
    }

    fn shader_program(&self) -> Option<ShaderProgram> {
        Some(ShaderProgram::new(
            concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"),
            [Semantic::Position],
        ))
    }

    fn mesh(&self) -> Option<Mesh> {
        let sphere = SphereMesh::default();
        debug!(
            "Sphere has {} vertices and {} elements",
            sphere.vertex_count(),
            sphere.element_count()
        );
        Some(sphere.into_mesh())
    }

    fn depth_buffer(&self) -> bool {
        true
    }

    fn rasterizer(&self) -> Option<RasterizerConfig> {
        Some(RasterizerConfig::CULL_NONE_SOLID)
    }

    fn world_translation(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, 3.0)
    }
}

#[cfg(windows)]
fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    frame_loop::run_sample(WhiteSphere)
}

#[cfg(not(windows))]
fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    eyre::bail!("{} needs Direct3D 11 and only runs on Windows", WhiteSphere.title())
}
