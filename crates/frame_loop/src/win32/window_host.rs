use crate::fullscreen::ScreenRect;
use crate::fullscreen::WindowHost;
use tracing::warn;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::UI::WindowsAndMessaging::*;

/// [`WindowHost`] over a real `HWND`.
pub struct Win32Window(pub HWND);

impl WindowHost for Win32Window {
    type Placement = WINDOWPLACEMENT;

    fn style(&self) -> u32 {
        unsafe { GetWindowLongW(self.0, GWL_STYLE) as u32 }
    }

    fn set_style(&mut self, style: u32) {
        unsafe { SetWindowLongW(self.0, GWL_STYLE, style as i32) };
    }

    fn placement(&self) -> Option<WINDOWPLACEMENT> {
        let mut placement = WINDOWPLACEMENT {
            length: std::mem::size_of::<WINDOWPLACEMENT>() as u32,
            ..Default::default()
        };
        unsafe { GetWindowPlacement(self.0, &mut placement) }
            .ok()
            .map(|()| placement)
    }

    fn set_placement(&mut self, placement: &WINDOWPLACEMENT) {
        if let Err(e) = unsafe { SetWindowPlacement(self.0, placement) } {
            warn!("SetWindowPlacement failed: {}", e);
        }
    }

    fn monitor_rect(&self) -> Option<ScreenRect> {
        let monitor = unsafe { MonitorFromWindow(self.0, MONITOR_DEFAULTTOPRIMARY) };
        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        unsafe { GetMonitorInfoW(monitor, &mut info) }
            .as_bool()
            .then_some(ScreenRect {
                left: info.rcMonitor.left,
                top: info.rcMonitor.top,
                right: info.rcMonitor.right,
                bottom: info.rcMonitor.bottom,
            })
    }

    fn cover(&mut self, rect: ScreenRect) {
        let result = unsafe {
            SetWindowPos(
                self.0,
                Some(HWND_TOP),
                rect.left,
                rect.top,
                rect.width(),
                rect.height(),
                SWP_NOZORDER | SWP_FRAMECHANGED,
            )
        };
        if let Err(e) = result {
            warn!("SetWindowPos failed: {}", e);
        }
    }

    fn reframe(&mut self) {
        let result = unsafe {
            SetWindowPos(
                self.0,
                Some(HWND_TOP),
                0,
                0,
                0,
                0,
                SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_FRAMECHANGED,
            )
        };
        if let Err(e) = result {
            warn!("SetWindowPos failed: {}", e);
        }
    }

    fn show_cursor(&mut self, show: bool) {
        unsafe { ShowCursor(show) };
    }
}
