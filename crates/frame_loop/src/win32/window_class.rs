use windows::Win32::Foundation::*;
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::*;

/// Per-window state the window procedure forwards messages to.
///
/// Only a shared reference is ever handed out. Win32 calls made while handling one message
/// can send another message to the same window before `handle` returns, so mutable state
/// belongs behind a `RefCell`.
pub trait WindowHandler {
    const CLASS_NAME: PCWSTR;

    /// Returns `Some` when the message is fully handled, `None` to fall through to
    /// `DefWindowProcW`.
    fn handle(&self, hwnd: HWND, message: u32, wparam: WPARAM, lparam: LPARAM)
    -> Option<LRESULT>;
}

pub fn create_window_class_struct<W: WindowHandler>(instance: HMODULE) -> eyre::Result<WNDCLASSEXW> {
    // WNDCLASSEXW - https://learn.microsoft.com/en-us/windows/win32/api/winuser/ns-winuser-wndclassexw
    let wc = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW | CS_OWNDC,
        lpfnWndProc: Some(wndproc::<W>),
        hInstance: instance.into(),
        hCursor: unsafe { LoadCursorW(None, IDC_ARROW)? },
        lpszClassName: W::CLASS_NAME,
        ..Default::default()
    };
    Ok(wc)
}

extern "system" fn wndproc<W: WindowHandler>(
    window: HWND,
    message: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if message == WM_CREATE {
        unsafe {
            let create_struct: &CREATESTRUCTW = &*(lparam.0 as *const CREATESTRUCTW);
            SetWindowLongPtrW(window, GWLP_USERDATA, create_struct.lpCreateParams as _);
        }
        return LRESULT(0);
    }

    if message == WM_NCDESTROY {
        // Last message for this window; nothing may reach the handler after it.
        unsafe { SetWindowLongPtrW(window, GWLP_USERDATA, 0) };
        return unsafe { DefWindowProcW(window, message, wparam, lparam) };
    }

    let user_data = unsafe { GetWindowLongPtrW(window, GWLP_USERDATA) };
    // We can get messages before WM_CREATE or after WM_DESTROY.
    let handled = std::ptr::NonNull::<W>::new(user_data as *mut W).and_then(|handler| {
        // A panic must not unwind across the FFI boundary.
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| unsafe {
            handler.as_ref().handle(window, message, wparam, lparam)
        }))
        .unwrap_or(None)
    });

    if message == WM_DESTROY {
        unsafe { PostQuitMessage(0) };
        return LRESULT(0);
    }

    match handled {
        Some(result) => result,
        None => unsafe { DefWindowProcW(window, message, wparam, lparam) },
    }
}
