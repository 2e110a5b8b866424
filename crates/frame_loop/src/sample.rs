use crate::geometry::Mesh;
use crate::shader::ShaderProgram;
use bevy_math::Vec3;

/// Fixed-function rasterizer settings. `None` from [`Sample::rasterizer`] keeps the runtime default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizerConfig {
    pub cull_back_faces: bool,
    pub wireframe: bool,
    pub depth_clip: bool,
}

impl RasterizerConfig {
    pub const CULL_NONE_SOLID: RasterizerConfig = RasterizerConfig {
        cull_back_faces: false,
        wireframe: false,
        depth_clip: true,
    };
}

/// Describes what one tutorial program draws. The frame loop does the rest.
pub trait Sample {
    fn title(&self) -> String {
        "D3D11 Application".into()
    }

    fn window_size(&self) -> (u32, u32) {
        (800, 600)
    }

    fn clear_color(&self) -> [f32; 4] {
        [0.0, 0.0, 0.0, 1.0]
    }

    fn shader_program(&self) -> Option<ShaderProgram> {
        None
    }

    fn mesh(&self) -> Option<Mesh> {
        None
    }

    fn depth_buffer(&self) -> bool {
        false
    }

    fn rasterizer(&self) -> Option<RasterizerConfig> {
        None
    }

    fn world_translation(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, 3.0)
    }
}

/// Everything a sample asked for, captured once before the device exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub clear_color: [f32; 4],
    pub program: Option<ShaderProgram>,
    pub mesh: Option<Mesh>,
    pub depth_buffer: bool,
    pub rasterizer: Option<RasterizerConfig>,
    pub world_translation: Vec3,
}

impl Scene {
    pub fn from_sample<S: Sample + ?Sized>(sample: &S) -> Self {
        Self {
            clear_color: sample.clear_color(),
            program: sample.shader_program(),
            mesh: sample.mesh(),
            depth_buffer: sample.depth_buffer(),
            rasterizer: sample.rasterizer(),
            world_translation: sample.world_translation(),
        }
    }

    /// Inputs the vertex stage declares, in slot order.
    pub fn inputs(&self) -> &[crate::geometry::Semantic] {
        self.program
            .as_ref()
            .map(|p| p.inputs.as_slice())
            .unwrap_or(&[])
    }
}
