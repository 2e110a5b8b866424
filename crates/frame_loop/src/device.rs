use crate::driver_tier::DriverTier;
use crate::error::FrameLoopResult;
use crate::geometry::Mesh;
use crate::geometry::Semantic;
use crate::sample::RasterizerConfig;
use crate::shader::ProgramSource;
use crate::transform::ConstantBuffer;

/// The GPU side of a [`crate::FrameLoop`].
///
/// Implementations own every GPU object. `release` must drop them views first, then buffers,
/// then shaders and pipeline state, then the context and swap chain, and the device last.
pub trait RenderDevice: Sized {
    /// What the swap chain presents into.
    type Surface;

    /// Creates the device and a single-buffered swap chain of `size` on `tier`.
    fn create(
        tier: DriverTier,
        surface: &Self::Surface,
        size: (u32, u32),
        debug_layer: bool,
    ) -> FrameLoopResult<Self>;

    /// Compiles both stages and builds the input layout from `source.inputs`.
    fn compile_program(&mut self, source: &ProgramSource) -> FrameLoopResult<()>;

    fn create_constant_buffer(&mut self) -> FrameLoopResult<()>;

    /// Uploads every stream in `mesh`. Streams named by `inputs` get bound to slots in that order.
    fn upload_geometry(&mut self, mesh: &Mesh, inputs: &[Semantic]) -> FrameLoopResult<()>;

    fn create_rasterizer_state(&mut self, config: &RasterizerConfig) -> FrameLoopResult<()>;

    /// Drops the old views, resizes the swap chain buffers, then rebuilds the views and viewport.
    fn resize_views(&mut self, width: u32, height: u32, depth: bool) -> FrameLoopResult<()>;

    fn clear(&mut self, color: [f32; 4]);

    fn upload_transform(&mut self, constants: &ConstantBuffer) -> FrameLoopResult<()>;

    fn draw(&mut self, count: u32, indexed: bool) -> FrameLoopResult<()>;

    fn present(&mut self) -> FrameLoopResult<()>;

    fn release(&mut self);

    /// GPU objects currently held. Zero after `release`.
    fn live_objects(&self) -> usize;
}
