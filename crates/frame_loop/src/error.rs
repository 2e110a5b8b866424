use crate::driver_tier::DriverTier;
use crate::shader::ShaderStage;
use crate::state::LoopState;
use std::path::PathBuf;

pub type FrameLoopResult<T> = core::result::Result<T, FrameLoopError>;

/// HRESULT-style status code returned by the graphics runtime.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(pub i32);

impl StatusCode {
    /// `E_FAIL`, used when the runtime handed back no object and no code.
    pub const FAIL: StatusCode = StatusCode(0x8000_4005_u32 as i32);

    pub fn is_failure(self) -> bool {
        self.0 < 0
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08X}", self.0 as u32)
    }
}

impl std::fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StatusCode({})", self)
    }
}

#[cfg(windows)]
impl From<windows::core::Error> for StatusCode {
    fn from(error: windows::core::Error) -> Self {
        Self(error.code().0)
    }
}

#[cfg(windows)]
impl From<windows::core::HRESULT> for StatusCode {
    fn from(hr: windows::core::HRESULT) -> Self {
        Self(hr.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FrameLoopError {
    #[error("no driver tier could create a device (tried {tried:?}, last status {status})")]
    DeviceCreation {
        tried: Vec<DriverTier>,
        status: StatusCode,
    },

    #[error("swap chain buffer resize to {width}x{height} failed with {status}")]
    SwapChainResize {
        width: u32,
        height: u32,
        status: StatusCode,
    },

    #[error("{stage} shader compilation failed: {diagnostics}")]
    ShaderCompile {
        stage: ShaderStage,
        diagnostics: String,
        status: StatusCode,
    },

    #[error("failed to read shader source {path:?}")]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("creating {object} failed with {status}")]
    ObjectCreation {
        object: &'static str,
        status: StatusCode,
    },

    #[error("vertex shader expects {semantic} but the mesh has no such stream")]
    InputLayoutMismatch { semantic: &'static str },

    #[error("cannot build a sphere with {stacks} stacks and {slices} slices")]
    SphereParameters { stacks: u16, slices: u16 },

    #[error("present failed with {status}")]
    Present { status: StatusCode },

    #[error("{operation} is not allowed while {state:?}")]
    InvalidState {
        operation: &'static str,
        state: LoopState,
    },
}

impl FrameLoopError {
    pub fn object_creation(object: &'static str, status: impl Into<StatusCode>) -> Self {
        Self::ObjectCreation {
            object,
            status: status.into(),
        }
    }

    /// The runtime status code carried by this error, if it came from the GPU side.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::DeviceCreation { status, .. }
            | Self::SwapChainResize { status, .. }
            | Self::ShaderCompile { status, .. }
            | Self::ObjectCreation { status, .. }
            | Self::Present { status } => Some(*status),
            Self::ShaderSource { .. }
            | Self::InputLayoutMismatch { .. }
            | Self::SphereParameters { .. }
            | Self::InvalidState { .. } => None,
        }
    }
}
