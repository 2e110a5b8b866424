pub mod compile_shader;
pub mod create_device;
pub mod device;

pub use device::D3D11Device;

use crate::error::FrameLoopError;
use crate::error::FrameLoopResult;
use crate::error::StatusCode;

/// Unwraps a COM out-parameter, mapping both a failed call and a missing object to
/// [`FrameLoopError::ObjectCreation`].
pub(crate) fn created<T>(
    object: &'static str,
    result: windows::core::Result<()>,
    out: Option<T>,
) -> FrameLoopResult<T> {
    result.map_err(|e| FrameLoopError::object_creation(object, e))?;
    out.ok_or(FrameLoopError::ObjectCreation {
        object,
        status: StatusCode::FAIL,
    })
}
