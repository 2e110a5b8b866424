use crate::error::FrameLoopError;
use crate::error::FrameLoopResult;
use crate::error::StatusCode;
use crate::shader::ENTRY_POINT;
use crate::shader::ShaderStage;
use std::ffi::CString;
use windows::Win32::Graphics::Direct3D::Fxc::*;
use windows::Win32::Graphics::Direct3D::*;
use windows::core::*;

pub fn compile_flags() -> u32 {
    if cfg!(debug_assertions) {
        D3DCOMPILE_DEBUG | D3DCOMPILE_SKIP_OPTIMIZATION
    } else {
        0
    }
}

// Helper to compile shaders from source text
pub fn compile_shader(source: &str, stage: ShaderStage, flags: u32) -> FrameLoopResult<ID3DBlob> {
    let source_name = CString::new(stage.source_name()).unwrap_or_default();
    let entry_point = CString::new(ENTRY_POINT).unwrap_or_default();
    let target = CString::new(stage.target()).unwrap_or_default();

    let mut shader_blob = None;
    let mut error_blob = None;
    let result = unsafe {
        D3DCompile(
            source.as_ptr() as *const _,
            source.len(),
            PCSTR(source_name.as_ptr() as *const u8),
            None, // Defines
            None, // Include handler
            PCSTR(entry_point.as_ptr() as *const u8),
            PCSTR(target.as_ptr() as *const u8),
            flags,
            0, // Effect flags
            &mut shader_blob,
            Some(&mut error_blob),
        )
    };

    match (result, shader_blob) {
        (Ok(()), Some(blob)) => Ok(blob),
        (result, _) => {
            let diagnostics = error_blob
                .as_ref()
                .map(|error| {
                    String::from_utf8_lossy(blob_bytes(error))
                        .trim_end_matches('\0')
                        .trim()
                        .to_string()
                })
                .unwrap_or_default();
            Err(FrameLoopError::ShaderCompile {
                stage,
                diagnostics,
                status: result.err().map(StatusCode::from).unwrap_or(StatusCode::FAIL),
            })
        }
    }
}

pub fn blob_bytes(blob: &ID3DBlob) -> &[u8] {
    unsafe { std::slice::from_raw_parts(blob.GetBufferPointer() as *const u8, blob.GetBufferSize()) }
}
