use frame_loop::FrameLoopError;
use frame_loop::FrameLoopResult;
use frame_loop::RasterizerConfig;
use frame_loop::RenderDevice;
use frame_loop::error::StatusCode;
use frame_loop::geometry::Mesh;
use frame_loop::geometry::Semantic;
use frame_loop::shader::ProgramSource;
use frame_loop::shader::ShaderStage;
use frame_loop::transform::ConstantBuffer;
use frame_loop::DriverTier;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// What the recording device saw. Shared with the test through the surface handle.
#[derive(Debug, Default)]
pub struct Recording {
    /// Tiers that refuse to create a device.
    pub failing_tiers: Vec<DriverTier>,
    pub fail_present: bool,
    pub fail_resize: bool,
    pub created_on: Option<DriverTier>,
    pub live: usize,
    pub peak_live: usize,
    pub viewport: Option<(u32, u32)>,
    pub render_target_bound: bool,
    pub depth_bound: bool,
    pub clears: Vec<[f32; 4]>,
    pub draws: Vec<(u32, bool)>,
    pub bound_inputs: Vec<Semantic>,
    pub uploaded_streams: usize,
    pub transforms: Vec<ConstantBuffer>,
    pub presents: u32,
    pub released: Vec<&'static str>,
}

impl Recording {
    fn create(&mut self, count: usize) {
        self.live += count;
        self.peak_live = self.peak_live.max(self.live);
    }
}

pub type Surface = Rc<RefCell<Recording>>;

pub fn surface() -> Surface {
    Rc::new(RefCell::new(Recording::default()))
}

/// A [`RenderDevice`] that tracks object lifetimes instead of talking to a GPU.
pub struct RecordingDevice {
    recording: Surface,
    views: usize,
    buffers: usize,
    pipeline: usize,
    core: usize,
}

impl RecordingDevice {
    fn drop_group(&mut self, name: &'static str, count: usize) {
        let mut recording = self.recording.borrow_mut();
        recording.live -= count;
        recording.released.push(name);
    }
}

/// Pretends to compile: a stage without a `main` entry point fails with compiler-style text.
fn compile(source: &str, stage: ShaderStage) -> FrameLoopResult<()> {
    if source.contains("main(") {
        Ok(())
    } else {
        Err(FrameLoopError::ShaderCompile {
            stage,
            diagnostics: format!(
                "{}(1,1): error X3501: 'main': entrypoint not found",
                stage.source_name()
            ),
            status: StatusCode::FAIL,
        })
    }
}

impl RenderDevice for RecordingDevice {
    type Surface = Surface;

    fn create(
        tier: DriverTier,
        surface: &Surface,
        _size: (u32, u32),
        _debug_layer: bool,
    ) -> FrameLoopResult<Self> {
        let mut recording = surface.borrow_mut();
        if recording.failing_tiers.contains(&tier) {
            return Err(FrameLoopError::object_creation(
                "device and swap chain",
                StatusCode(0x887A_0004_u32 as i32),
            ));
        }
        recording.created_on = Some(tier);
        // device, context, swap chain
        recording.create(3);
        drop(recording);
        Ok(Self {
            recording: surface.clone(),
            views: 0,
            buffers: 0,
            pipeline: 0,
            core: 3,
        })
    }

    fn compile_program(&mut self, source: &ProgramSource) -> FrameLoopResult<()> {
        compile(&source.vertex, ShaderStage::Vertex)?;
        self.pipeline += 1;
        self.recording.borrow_mut().create(1);
        compile(&source.pixel, ShaderStage::Pixel)?;
        let layout = usize::from(!source.inputs.is_empty());
        self.pipeline += 1 + layout;
        self.recording.borrow_mut().create(1 + layout);
        Ok(())
    }

    fn create_constant_buffer(&mut self) -> FrameLoopResult<()> {
        self.buffers += 1;
        self.recording.borrow_mut().create(1);
        Ok(())
    }

    fn upload_geometry(&mut self, mesh: &Mesh, inputs: &[Semantic]) -> FrameLoopResult<()> {
        let count = mesh.streams.len() + usize::from(mesh.indices.is_some());
        self.buffers += count;
        let mut recording = self.recording.borrow_mut();
        recording.create(count);
        recording.uploaded_streams = mesh.streams.len();
        recording.bound_inputs = inputs.to_vec();
        Ok(())
    }

    fn create_rasterizer_state(&mut self, _config: &RasterizerConfig) -> FrameLoopResult<()> {
        self.pipeline += 1;
        self.recording.borrow_mut().create(1);
        Ok(())
    }

    fn resize_views(&mut self, width: u32, height: u32, depth: bool) -> FrameLoopResult<()> {
        let mut recording = self.recording.borrow_mut();
        recording.live -= std::mem::take(&mut self.views);
        recording.render_target_bound = false;
        recording.depth_bound = false;
        if recording.fail_resize {
            return Err(FrameLoopError::SwapChainResize {
                width,
                height,
                status: StatusCode(0x887A_0001_u32 as i32),
            });
        }
        self.views = 1 + usize::from(depth);
        recording.create(self.views);
        recording.render_target_bound = true;
        recording.depth_bound = depth;
        recording.viewport = Some((width, height));
        Ok(())
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.recording.borrow_mut().clears.push(color);
    }

    fn upload_transform(&mut self, constants: &ConstantBuffer) -> FrameLoopResult<()> {
        self.recording.borrow_mut().transforms.push(*constants);
        Ok(())
    }

    fn draw(&mut self, count: u32, indexed: bool) -> FrameLoopResult<()> {
        self.recording.borrow_mut().draws.push((count, indexed));
        Ok(())
    }

    fn present(&mut self) -> FrameLoopResult<()> {
        let mut recording = self.recording.borrow_mut();
        if recording.fail_present {
            return Err(FrameLoopError::Present {
                status: StatusCode(0x887A_0005_u32 as i32),
            });
        }
        recording.presents += 1;
        Ok(())
    }

    fn release(&mut self) {
        let views = std::mem::take(&mut self.views);
        self.drop_group("views", views);
        let buffers = std::mem::take(&mut self.buffers);
        self.drop_group("buffers", buffers);
        let pipeline = std::mem::take(&mut self.pipeline);
        self.drop_group("pipeline", pipeline);
        // context and swap chain, then the device
        self.drop_group("context", 2);
        self.drop_group("device", 1);
        self.core = 0;
        let mut recording = self.recording.borrow_mut();
        recording.render_target_bound = false;
        recording.depth_bound = false;
    }

    fn live_objects(&self) -> usize {
        self.views + self.buffers + self.pipeline + self.core
    }
}

/// A scratch directory holding `vertexShader.hlsl` and `pixelShader.hlsl`.
pub fn shader_dir(name: &str, vertex: &str, pixel: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "frame_loop_it_{}_{}",
        name,
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("vertexShader.hlsl"), vertex).unwrap();
    std::fs::write(dir.join("pixelShader.hlsl"), pixel).unwrap();
    dir
}

pub const VALID_VERTEX: &str = "float4 main(float3 pos : POSITION) : SV_POSITION { return float4(pos, 1.0); }";
pub const VALID_PIXEL: &str = "float4 main() : SV_TARGET { return float4(1.0, 1.0, 1.0, 1.0); }";
