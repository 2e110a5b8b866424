use super::compile_shader::blob_bytes;
use super::compile_shader::compile_flags;
use super::compile_shader::compile_shader;
use super::create_device::BACK_BUFFER_FORMAT;
use super::create_device::create_device;
use super::created;
use crate::device::RenderDevice;
use crate::driver_tier::DriverTier;
use crate::error::FrameLoopError;
use crate::error::FrameLoopResult;
use crate::error::StatusCode;
use crate::geometry::Mesh;
use crate::geometry::Semantic;
use crate::sample::RasterizerConfig;
use crate::shader::ProgramSource;
use crate::shader::ShaderStage;
use crate::transform::ConstantBuffer;
use tracing::debug;
use tracing::info;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;
use windows::core::*;

fn semantic_name(semantic: Semantic) -> PCSTR {
    match semantic {
        Semantic::Position => s!("POSITION"),
        Semantic::Color => s!("COLOR"),
        Semantic::Normal => s!("NORMAL"),
        Semantic::TexCoord => s!("TEXCOORD"),
    }
}

fn semantic_format(semantic: Semantic) -> DXGI_FORMAT {
    match semantic.components() {
        2 => DXGI_FORMAT_R32G32_FLOAT,
        _ => DXGI_FORMAT_R32G32B32_FLOAT,
    }
}

/// [`RenderDevice`] backed by an `ID3D11Device` and a single-buffered `IDXGISwapChain`.
///
/// Fields are declared in release order.
#[derive(Default)]
pub struct D3D11Device {
    render_target_view: Option<ID3D11RenderTargetView>,
    depth_stencil_view: Option<ID3D11DepthStencilView>,

    vertex_buffers: Vec<(Semantic, ID3D11Buffer)>,
    index_buffer: Option<ID3D11Buffer>,
    constant_buffer: Option<ID3D11Buffer>,
    bound_buffers: Vec<Option<ID3D11Buffer>>,
    bound_strides: Vec<u32>,

    vertex_shader: Option<ID3D11VertexShader>,
    pixel_shader: Option<ID3D11PixelShader>,
    input_layout: Option<ID3D11InputLayout>,
    rasterizer_state: Option<ID3D11RasterizerState>,

    context: Option<ID3D11DeviceContext>,
    swap_chain: Option<IDXGISwapChain>,
    device: Option<ID3D11Device>,

    sample_desc: DXGI_SAMPLE_DESC,
    debug_layer: bool,
}

impl D3D11Device {
    fn device(&self) -> FrameLoopResult<ID3D11Device> {
        self.device
            .clone()
            .ok_or(FrameLoopError::object_creation("device", StatusCode::FAIL))
    }

    fn context(&self) -> FrameLoopResult<ID3D11DeviceContext> {
        self.context
            .clone()
            .ok_or(FrameLoopError::object_creation("device context", StatusCode::FAIL))
    }

    fn create_buffer<T>(
        &self,
        object: &'static str,
        bind_flags: D3D11_BIND_FLAG,
        data: &[T],
    ) -> FrameLoopResult<ID3D11Buffer> {
        let device = self.device()?;
        let desc = D3D11_BUFFER_DESC {
            ByteWidth: std::mem::size_of_val(data) as u32,
            Usage: D3D11_USAGE_DEFAULT,
            BindFlags: bind_flags.0 as u32,
            ..Default::default()
        };
        let initial = D3D11_SUBRESOURCE_DATA {
            pSysMem: data.as_ptr() as *const _,
            ..Default::default()
        };
        let mut buffer = None;
        let result = unsafe { device.CreateBuffer(&desc, Some(&initial), Some(&mut buffer)) };
        created(object, result, buffer)
    }

    fn create_depth_stencil_view(
        &self,
        width: u32,
        height: u32,
    ) -> FrameLoopResult<ID3D11DepthStencilView> {
        let device = self.device()?;
        let texture_desc = D3D11_TEXTURE2D_DESC {
            Width: width,
            Height: height,
            MipLevels: 1,
            ArraySize: 1,
            Format: DXGI_FORMAT_D32_FLOAT,
            SampleDesc: self.sample_desc,
            Usage: D3D11_USAGE_DEFAULT,
            BindFlags: D3D11_BIND_DEPTH_STENCIL.0 as u32,
            ..Default::default()
        };
        let mut texture = None;
        let result = unsafe { device.CreateTexture2D(&texture_desc, None, Some(&mut texture)) };
        let texture: ID3D11Texture2D = created("depth texture", result, texture)?;

        // The view dimension has to agree with the texture's sample count.
        let view_dimension = if self.sample_desc.Count > 1 {
            D3D11_DSV_DIMENSION_TEXTURE2DMS
        } else {
            D3D11_DSV_DIMENSION_TEXTURE2D
        };
        let view_desc = D3D11_DEPTH_STENCIL_VIEW_DESC {
            Format: DXGI_FORMAT_D32_FLOAT,
            ViewDimension: view_dimension,
            ..Default::default()
        };
        let mut view = None;
        let result =
            unsafe { device.CreateDepthStencilView(&texture, Some(&view_desc), Some(&mut view)) };
        created("depth stencil view", result, view)
    }
}

impl RenderDevice for D3D11Device {
    type Surface = HWND;

    fn create(
        tier: DriverTier,
        surface: &HWND,
        size: (u32, u32),
        debug_layer: bool,
    ) -> FrameLoopResult<Self> {
        let created = create_device(tier, *surface, size, debug_layer)?;
        Ok(Self {
            context: Some(created.context),
            swap_chain: Some(created.swap_chain),
            device: Some(created.device),
            sample_desc: DXGI_SAMPLE_DESC {
                Count: 1,
                Quality: 0,
            },
            debug_layer: created.debug_layer,
            ..Default::default()
        })
    }

    fn compile_program(&mut self, source: &ProgramSource) -> FrameLoopResult<()> {
        let device = self.device()?;
        let flags = compile_flags();

        let vertex_blob = compile_shader(source.stage(ShaderStage::Vertex), ShaderStage::Vertex, flags)?;
        let vertex_bytecode = blob_bytes(&vertex_blob);
        let mut vertex_shader = None;
        let result = unsafe { device.CreateVertexShader(vertex_bytecode, None, Some(&mut vertex_shader)) };
        self.vertex_shader = Some(created("vertex shader", result, vertex_shader)?);

        let pixel_blob = compile_shader(source.stage(ShaderStage::Pixel), ShaderStage::Pixel, flags)?;
        let mut pixel_shader = None;
        let result =
            unsafe { device.CreatePixelShader(blob_bytes(&pixel_blob), None, Some(&mut pixel_shader)) };
        self.pixel_shader = Some(created("pixel shader", result, pixel_shader)?);

        // One stream per slot, each tightly packed.
        let input_element_descs: Vec<D3D11_INPUT_ELEMENT_DESC> = source
            .inputs
            .iter()
            .enumerate()
            .map(|(slot, semantic)| D3D11_INPUT_ELEMENT_DESC {
                SemanticName: semantic_name(*semantic),
                SemanticIndex: 0,
                Format: semantic_format(*semantic),
                InputSlot: slot as u32,
                AlignedByteOffset: 0,
                InputSlotClass: D3D11_INPUT_PER_VERTEX_DATA,
                InstanceDataStepRate: 0,
            })
            .collect();
        if !input_element_descs.is_empty() {
            let mut input_layout = None;
            let result = unsafe {
                device.CreateInputLayout(&input_element_descs, vertex_bytecode, Some(&mut input_layout))
            };
            self.input_layout = Some(created("input layout", result, input_layout)?);
        }
        Ok(())
    }

    fn create_constant_buffer(&mut self) -> FrameLoopResult<()> {
        let device = self.device()?;
        let desc = D3D11_BUFFER_DESC {
            ByteWidth: std::mem::size_of::<ConstantBuffer>() as u32,
            Usage: D3D11_USAGE_DEFAULT,
            BindFlags: D3D11_BIND_CONSTANT_BUFFER.0 as u32,
            ..Default::default()
        };
        let mut buffer = None;
        let result = unsafe { device.CreateBuffer(&desc, None, Some(&mut buffer)) };
        self.constant_buffer = Some(created("constant buffer", result, buffer)?);
        Ok(())
    }

    fn upload_geometry(&mut self, mesh: &Mesh, inputs: &[Semantic]) -> FrameLoopResult<()> {
        for stream in &mesh.streams {
            let buffer = self.create_buffer("vertex buffer", D3D11_BIND_VERTEX_BUFFER, &stream.data)?;
            self.vertex_buffers.push((stream.semantic, buffer));
        }
        if let Some(indices) = &mesh.indices {
            self.index_buffer = Some(self.create_buffer("index buffer", D3D11_BIND_INDEX_BUFFER, indices)?);
        }

        for stream in mesh.streams_for(inputs)? {
            let buffer = self
                .vertex_buffers
                .iter()
                .find(|(semantic, _)| *semantic == stream.semantic)
                .map(|(_, buffer)| buffer.clone());
            self.bound_buffers.push(buffer);
            self.bound_strides.push(stream.stride());
        }
        Ok(())
    }

    fn create_rasterizer_state(&mut self, config: &RasterizerConfig) -> FrameLoopResult<()> {
        let device = self.device()?;
        let desc = D3D11_RASTERIZER_DESC {
            FillMode: if config.wireframe {
                D3D11_FILL_WIREFRAME
            } else {
                D3D11_FILL_SOLID
            },
            CullMode: if config.cull_back_faces {
                D3D11_CULL_BACK
            } else {
                D3D11_CULL_NONE
            },
            FrontCounterClockwise: FALSE,
            DepthClipEnable: config.depth_clip.into(),
            ..Default::default()
        };
        let mut state = None;
        let result = unsafe { device.CreateRasterizerState(&desc, Some(&mut state)) };
        let state = created("rasterizer state", result, state)?;
        unsafe { self.context()?.RSSetState(&state) };
        self.rasterizer_state = Some(state);
        Ok(())
    }

    fn resize_views(&mut self, width: u32, height: u32, depth: bool) -> FrameLoopResult<()> {
        let device = self.device()?;
        let context = self.context()?;
        let swap_chain = self
            .swap_chain
            .clone()
            .ok_or(FrameLoopError::object_creation("swap chain", StatusCode::FAIL))?;

        // The back buffer cannot be resized while a view still references it.
        unsafe { context.OMSetRenderTargets(None, None) };
        self.render_target_view = None;
        self.depth_stencil_view = None;

        unsafe {
            swap_chain.ResizeBuffers(1, width, height, BACK_BUFFER_FORMAT, DXGI_SWAP_CHAIN_FLAG(0))
        }
        .map_err(|e| FrameLoopError::SwapChainResize {
            width,
            height,
            status: e.into(),
        })?;

        let back_buffer: ID3D11Texture2D = unsafe { swap_chain.GetBuffer(0) }
            .map_err(|e| FrameLoopError::object_creation("back buffer", e))?;
        let mut render_target_view = None;
        let result = unsafe {
            device.CreateRenderTargetView(&back_buffer, None, Some(&mut render_target_view))
        };
        let render_target_view = created("render target view", result, render_target_view)?;

        let depth_stencil_view = if depth {
            Some(self.create_depth_stencil_view(width, height)?)
        } else {
            None
        };

        unsafe {
            context.OMSetRenderTargets(
                Some(&[Some(render_target_view.clone())]),
                depth_stencil_view.as_ref(),
            );
            context.RSSetViewports(Some(&[D3D11_VIEWPORT {
                TopLeftX: 0.0,
                TopLeftY: 0.0,
                Width: width as f32,
                Height: height as f32,
                MinDepth: 0.0,
                MaxDepth: 1.0,
            }]));
        }

        self.render_target_view = Some(render_target_view);
        self.depth_stencil_view = depth_stencil_view;
        Ok(())
    }

    fn clear(&mut self, color: [f32; 4]) {
        let Some(context) = &self.context else {
            return;
        };
        unsafe {
            if let Some(render_target_view) = &self.render_target_view {
                context.ClearRenderTargetView(render_target_view, &color);
            }
            if let Some(depth_stencil_view) = &self.depth_stencil_view {
                context.ClearDepthStencilView(depth_stencil_view, D3D11_CLEAR_DEPTH.0 as u32, 1.0, 0);
            }
        }
    }

    fn upload_transform(&mut self, constants: &ConstantBuffer) -> FrameLoopResult<()> {
        let context = self.context()?;
        if let Some(constant_buffer) = &self.constant_buffer {
            unsafe {
                context.UpdateSubresource(
                    constant_buffer,
                    0,
                    None,
                    constants as *const ConstantBuffer as *const _,
                    0,
                    0,
                );
            }
        }
        Ok(())
    }

    fn draw(&mut self, count: u32, indexed: bool) -> FrameLoopResult<()> {
        let context = self.context()?;
        let offsets = vec![0u32; self.bound_buffers.len()];
        unsafe {
            context.IASetInputLayout(self.input_layout.as_ref());
            context.IASetPrimitiveTopology(D3D11_PRIMITIVE_TOPOLOGY_TRIANGLELIST);
            if !self.bound_buffers.is_empty() {
                context.IASetVertexBuffers(
                    0,
                    self.bound_buffers.len() as u32,
                    Some(self.bound_buffers.as_ptr()),
                    Some(self.bound_strides.as_ptr()),
                    Some(offsets.as_ptr()),
                );
            }
            context.VSSetShader(self.vertex_shader.as_ref(), None);
            context.PSSetShader(self.pixel_shader.as_ref(), None);
            if let Some(constant_buffer) = &self.constant_buffer {
                context.VSSetConstantBuffers(0, Some(&[Some(constant_buffer.clone())]));
            }
            match (&self.index_buffer, indexed) {
                (Some(index_buffer), true) => {
                    context.IASetIndexBuffer(index_buffer, DXGI_FORMAT_R16_UINT, 0);
                    context.DrawIndexed(count, 0, 0);
                }
                _ => context.Draw(count, 0),
            }
        }
        Ok(())
    }

    fn present(&mut self) -> FrameLoopResult<()> {
        let swap_chain = self
            .swap_chain
            .as_ref()
            .ok_or(FrameLoopError::object_creation("swap chain", StatusCode::FAIL))?;
        unsafe { swap_chain.Present(0, DXGI_PRESENT(0)) }
            .ok()
            .map_err(|e| FrameLoopError::Present { status: e.into() })
    }

    fn release(&mut self) {
        if let Some(context) = &self.context {
            unsafe {
                context.ClearState();
                context.Flush();
            }
        }

        self.render_target_view = None;
        self.depth_stencil_view = None;

        self.bound_buffers.clear();
        self.bound_strides.clear();
        self.vertex_buffers.clear();
        self.index_buffer = None;
        self.constant_buffer = None;

        self.input_layout = None;
        self.pixel_shader = None;
        self.vertex_shader = None;
        self.rasterizer_state = None;

        self.context = None;
        self.swap_chain = None;

        if self.debug_layer {
            if let Some(debug) = self
                .device
                .as_ref()
                .and_then(|device| device.cast::<ID3D11Debug>().ok())
            {
                info!("Reporting live D3D11 objects to the debugger");
                let _ = unsafe { debug.ReportLiveDeviceObjects(D3D11_RLDO_DETAIL) };
            }
        }
        self.device = None;
        debug!("D3D11 objects released");
    }

    fn live_objects(&self) -> usize {
        [
            self.render_target_view.is_some(),
            self.depth_stencil_view.is_some(),
            self.index_buffer.is_some(),
            self.constant_buffer.is_some(),
            self.vertex_shader.is_some(),
            self.pixel_shader.is_some(),
            self.input_layout.is_some(),
            self.rasterizer_state.is_some(),
            self.context.is_some(),
            self.swap_chain.is_some(),
            self.device.is_some(),
        ]
        .into_iter()
        .filter(|live| *live)
        .count()
            + self.vertex_buffers.len()
    }
}
