use crate::driver_tier::DriverTier;
use crate::error::FrameLoopError;
use crate::error::FrameLoopResult;
use crate::error::StatusCode;
use tracing::debug;
use tracing::warn;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Direct3D::*;
use windows::Win32::Graphics::Direct3D11::*;
use windows::Win32::Graphics::Dxgi::Common::*;
use windows::Win32::Graphics::Dxgi::*;

pub const BACK_BUFFER_FORMAT: DXGI_FORMAT = DXGI_FORMAT_R8G8B8A8_UNORM;

pub fn driver_type(tier: DriverTier) -> D3D_DRIVER_TYPE {
    match tier {
        DriverTier::Hardware => D3D_DRIVER_TYPE_HARDWARE,
        DriverTier::Warp => D3D_DRIVER_TYPE_WARP,
        DriverTier::Software => D3D_DRIVER_TYPE_SOFTWARE,
        DriverTier::Reference => D3D_DRIVER_TYPE_REFERENCE,
        DriverTier::Null => D3D_DRIVER_TYPE_NULL,
    }
}

pub fn swap_chain_desc(hwnd: HWND, size: (u32, u32)) -> DXGI_SWAP_CHAIN_DESC {
    DXGI_SWAP_CHAIN_DESC {
        BufferDesc: DXGI_MODE_DESC {
            Width: size.0,
            Height: size.1,
            RefreshRate: DXGI_RATIONAL {
                Numerator: 60,
                Denominator: 1,
            },
            Format: BACK_BUFFER_FORMAT,
            ..Default::default()
        },
        SampleDesc: DXGI_SAMPLE_DESC {
            Count: 1,
            Quality: 0,
        },
        BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
        BufferCount: 1,
        OutputWindow: hwnd,
        Windowed: true.into(),
        ..Default::default()
    }
}

/// The pieces `D3D11CreateDeviceAndSwapChain` hands back.
pub struct CreatedDevice {
    pub swap_chain: IDXGISwapChain,
    pub device: ID3D11Device,
    pub context: ID3D11DeviceContext,
    pub feature_level: D3D_FEATURE_LEVEL,
    pub debug_layer: bool,
}

// Create D3D11 Device, immediate context and swap chain on one driver tier
pub fn create_device(
    tier: DriverTier,
    hwnd: HWND,
    size: (u32, u32),
    debug_layer: bool,
) -> FrameLoopResult<CreatedDevice> {
    if debug_layer {
        match create_device_with_flags(tier, hwnd, size, D3D11_CREATE_DEVICE_DEBUG) {
            Ok(mut created) => {
                created.debug_layer = true;
                return Ok(created);
            }
            Err(e) if e.status() == Some(StatusCode(DXGI_ERROR_SDK_COMPONENT_MISSING.0)) => {
                warn!("D3D11 debug layer unavailable, continuing without it");
            }
            Err(e) => return Err(e),
        }
    }
    create_device_with_flags(tier, hwnd, size, D3D11_CREATE_DEVICE_FLAG(0))
}

fn create_device_with_flags(
    tier: DriverTier,
    hwnd: HWND,
    size: (u32, u32),
    flags: D3D11_CREATE_DEVICE_FLAG,
) -> FrameLoopResult<CreatedDevice> {
    let feature_levels = [D3D_FEATURE_LEVEL_11_0];
    let desc = swap_chain_desc(hwnd, size);

    let mut swap_chain: Option<IDXGISwapChain> = None;
    let mut device: Option<ID3D11Device> = None;
    let mut context: Option<ID3D11DeviceContext> = None;
    let mut feature_level = D3D_FEATURE_LEVEL_11_0;

    unsafe {
        D3D11CreateDeviceAndSwapChain(
            None,
            driver_type(tier),
            HMODULE::default(),
            flags,
            Some(&feature_levels),
            D3D11_SDK_VERSION,
            Some(&desc),
            Some(&mut swap_chain),
            Some(&mut device),
            Some(&mut feature_level),
            Some(&mut context),
        )
    }
    .map_err(|e| FrameLoopError::object_creation("device and swap chain", e))?;

    match (swap_chain, device, context) {
        (Some(swap_chain), Some(device), Some(context)) => {
            debug!(
                "{} driver gave feature level 0x{:X}",
                tier, feature_level.0
            );
            Ok(CreatedDevice {
                swap_chain,
                device,
                context,
                feature_level,
                debug_layer: false,
            })
        }
        _ => Err(FrameLoopError::object_creation(
            "device and swap chain",
            StatusCode::FAIL,
        )),
    }
}
