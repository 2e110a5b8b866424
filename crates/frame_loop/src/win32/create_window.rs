use super::window_class::WindowHandler;
use super::window_class_id::ClassIdAtom;
use widestring::U16CStr;
use windows::Win32::Foundation::*;
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::*;

/// Creates an overlapped window whose client area is `client_size`.
///
/// `handler` is handed to the window procedure through `lpCreateParams` and must outlive the
/// window. The window procedure only reads through it.
pub fn create_window<W: WindowHandler>(
    our_module: HMODULE,
    class: &ClassIdAtom,
    client_size: (u32, u32),
    title: &U16CStr,
    handler: *const W,
) -> eyre::Result<HWND> {
    let mut window_rect = RECT {
        left: 0,
        top: 0,
        right: client_size.0 as i32,
        bottom: client_size.1 as i32,
    };
    // Calculates the required size of the window rectangle, based on the desired size of the client rectangle.
    unsafe { AdjustWindowRect(&mut window_rect, WS_OVERLAPPEDWINDOW, false)? };

    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            class,
            PCWSTR(title.as_ptr()),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            window_rect.right - window_rect.left,
            window_rect.bottom - window_rect.top,
            None,                    // no parent window
            None,                    // no menus
            Some(our_module.into()), // Use instance from GetModuleHandleW
            Some(handler as _),
        )
    }?;
    Ok(hwnd)
}
