use crate::config::FrameLoopConfig;
use crate::device::RenderDevice;
use crate::driver_tier::DriverTier;
use crate::error::FrameLoopError;
use crate::error::FrameLoopResult;
use crate::sample::Scene;
use crate::state::LoopState;
use crate::transform::ConstantBuffer;
use crate::transform::Transforms;
use bevy_math::Mat4;
use tracing::debug;
use tracing::error;
use tracing::info;

/// Owns the device and runs the initialize / resize / render / shutdown lifecycle.
pub struct FrameLoop<D: RenderDevice> {
    config: FrameLoopConfig,
    scene: Scene,
    state: LoopState,
    device: Option<D>,
    tier: Option<DriverTier>,
    size: (u32, u32),
    projection: Mat4,
    views_ready: bool,
    active: bool,
    frame_count: u64,
}

impl<D: RenderDevice> FrameLoop<D> {
    pub fn new(config: FrameLoopConfig, scene: Scene) -> Self {
        let size = config.window_size;
        Self {
            projection: config.projection.matrix(size.0.max(1), size.1.max(1)),
            config,
            scene,
            state: LoopState::Uninitialized,
            device: None,
            tier: None,
            size,
            views_ready: false,
            active: false,
            frame_count: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn device(&self) -> Option<&D> {
        self.device.as_ref()
    }

    pub fn driver_tier(&self) -> Option<DriverTier> {
        self.tier
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn transition(&mut self, operation: &'static str, next: LoopState) -> FrameLoopResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(FrameLoopError::InvalidState {
                operation,
                state: self.state,
            });
        }
        self.state = next;
        Ok(())
    }

    /// Brings up the device on `surface` and gets it ready to draw.
    ///
    /// On failure everything created so far is released and the loop is back to
    /// [`LoopState::Uninitialized`].
    pub fn initialize(&mut self, surface: &D::Surface, size: (u32, u32)) -> FrameLoopResult<()> {
        self.transition("initialize", LoopState::Initializing)?;
        info!("Initializing Direct3D at {}x{}", size.0, size.1);

        match self.bring_up(surface, size) {
            Ok(()) => {
                self.state = LoopState::Running;
                info!("Initialization complete");
                Ok(())
            }
            Err(e) => {
                error!("Initialization failed: {}", e);
                self.release_device();
                self.state = LoopState::Uninitialized;
                Err(e)
            }
        }
    }

    fn bring_up(&mut self, surface: &D::Surface, size: (u32, u32)) -> FrameLoopResult<()> {
        let debug_layer = self.config.debug_layer;
        let (tier, device) = self
            .config
            .driver_tiers
            .select_first(|tier| D::create(tier, surface, size, debug_layer))?;
        self.tier = Some(tier);
        let device = self.device.insert(device);

        if let Some(program) = &self.scene.program {
            let source = program.load()?;
            device.compile_program(&source)?;
            info!("Shaders compiled");
            device.create_constant_buffer()?;
        }

        if let Some(mesh) = &self.scene.mesh {
            let inputs = self.scene.inputs();
            mesh.streams_for(inputs)?;
            device.upload_geometry(mesh, inputs)?;
            info!(
                "Geometry uploaded: {} vertices, {} streams, indexed: {}",
                mesh.vertex_count(),
                mesh.streams.len(),
                mesh.indices.is_some()
            );
        }

        if let Some(rasterizer) = &self.scene.rasterizer {
            device.create_rasterizer_state(rasterizer)?;
        }

        self.apply_size(size.0, size.1)
    }

    /// Rebuilds the views, viewport and projection for a new client size.
    ///
    /// A zero dimension keeps the current views.
    pub fn resize(&mut self, width: u32, height: u32) -> FrameLoopResult<()> {
        self.transition("resize", LoopState::Resizing)?;
        let result = self.apply_size(width, height);
        self.state = LoopState::Running;
        if let Err(e) = &result {
            error!("Resize failed: {}", e);
        }
        result
    }

    fn apply_size(&mut self, width: u32, height: u32) -> FrameLoopResult<()> {
        if width == 0 || height == 0 {
            debug!("Ignoring resize to {}x{}", width, height);
            return Ok(());
        }
        let Some(device) = self.device.as_mut() else {
            return Err(FrameLoopError::InvalidState {
                operation: "resize",
                state: self.state,
            });
        };
        self.views_ready = false;
        device.resize_views(width, height, self.scene.depth_buffer)?;
        self.views_ready = true;
        self.size = (width, height);
        self.projection = self.config.projection.matrix(width, height);
        debug!("Resized to {}x{}", width, height);
        Ok(())
    }

    /// Clears, draws the scene once and presents.
    ///
    /// Returns `Ok(false)` without touching the device while inactive or while no views are
    /// bound, as after a failed resize. A failure drops the frame: it is logged and returned,
    /// and nothing is presented.
    pub fn render_frame(&mut self) -> FrameLoopResult<bool> {
        if self.state != LoopState::Running {
            return Err(FrameLoopError::InvalidState {
                operation: "render_frame",
                state: self.state,
            });
        }
        if !self.active || !self.views_ready {
            return Ok(false);
        }
        match self.draw_scene() {
            Ok(()) => Ok(true),
            Err(e) => {
                error!("Frame dropped: {}", e);
                Err(e)
            }
        }
    }

    fn draw_scene(&mut self) -> FrameLoopResult<()> {
        let Some(device) = self.device.as_mut() else {
            return Ok(());
        };
        device.clear(self.scene.clear_color);

        if self.scene.program.is_some() {
            let mut transforms = Transforms::new(self.scene.world_translation);
            transforms.projection = self.projection;
            device.upload_transform(&ConstantBuffer::from(transforms.world_view_projection()))?;
        }

        if let Some(mesh) = &self.scene.mesh {
            device.draw(mesh.draw_count(), mesh.indices.is_some())?;
        }

        device.present()
    }

    /// Per-frame hook run after each presented frame.
    pub fn update(&mut self) {
        self.frame_count += 1;
    }

    /// Releases every GPU object. Safe to call more than once.
    pub fn shutdown(&mut self) -> FrameLoopResult<()> {
        if self.state == LoopState::Terminated {
            return Ok(());
        }
        self.transition("shutdown", LoopState::ShuttingDown)?;
        self.release_device();
        self.state = LoopState::Terminated;
        info!("Shut down after {} frames", self.frame_count);
        info!("Log File Closed Successfully");
        Ok(())
    }

    fn release_device(&mut self) {
        self.views_ready = false;
        if let Some(mut device) = self.device.take() {
            device.release();
            debug!("{} GPU objects left after release", device.live_objects());
        }
    }
}

impl<D: RenderDevice> Drop for FrameLoop<D> {
    fn drop(&mut self) {
        if self.state.has_device() {
            self.release_device();
        }
    }
}
