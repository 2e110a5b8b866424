use windows::Win32::UI::WindowsAndMessaging::RegisterClassExW;
use windows::Win32::UI::WindowsAndMessaging::WNDCLASSEXW;
use windows::core::Param;
use windows::core::ParamValue;
use windows::core::PCWSTR;

/// Equivalent to the MAKEINTATOM macro in C/C++.
/// The low-order word is the atom, and the high-order word is zero.
///
/// https://learn.microsoft.com/en-us/windows/win32/api/winbase/nf-winbase-makeintatom
#[allow(non_snake_case)]
pub fn MAKEINTATOM(atom: u16) -> PCWSTR {
    PCWSTR(atom as usize as *const u16)
}

/// A registered window class, usable anywhere a class name is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassIdAtom(u16);

impl Param<PCWSTR> for &ClassIdAtom {
    unsafe fn param(self) -> ParamValue<PCWSTR> {
        ParamValue::Owned(MAKEINTATOM(self.0))
    }
}

pub fn register_window_class(class: &WNDCLASSEXW) -> eyre::Result<ClassIdAtom> {
    let atom = unsafe { RegisterClassExW(class) };
    if atom == 0 {
        eyre::bail!(
            "RegisterClassExW failed: {}",
            std::io::Error::last_os_error()
        );
    }
    Ok(ClassIdAtom(atom))
}
