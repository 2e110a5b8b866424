use tracing::debug;

/// `WS_OVERLAPPEDWINDOW`: caption, system menu, thick frame, minimize and maximize boxes.
pub const WS_OVERLAPPEDWINDOW: u32 = 0x00CF_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// The window calls a fullscreen toggle needs.
pub trait WindowHost {
    type Placement: Clone;

    fn style(&self) -> u32;
    fn set_style(&mut self, style: u32);
    fn placement(&self) -> Option<Self::Placement>;
    fn set_placement(&mut self, placement: &Self::Placement);
    /// Bounds of the primary monitor.
    fn monitor_rect(&self) -> Option<ScreenRect>;
    /// Moves the window on top and stretches it over `rect`.
    fn cover(&mut self, rect: ScreenRect);
    /// Re-evaluates the frame after a style change without moving or sizing.
    fn reframe(&mut self);
    fn show_cursor(&mut self, show: bool);
}

/// Borderless fullscreen by stripping the overlapped-window bits and covering the monitor.
#[derive(Debug, Clone)]
pub struct FullscreenToggle<P> {
    fullscreen: bool,
    saved_style: u32,
    saved_placement: Option<P>,
}

impl<P> Default for FullscreenToggle<P> {
    fn default() -> Self {
        Self {
            fullscreen: false,
            saved_style: 0,
            saved_placement: None,
        }
    }
}

impl<P: Clone> FullscreenToggle<P> {
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn toggle<H>(&mut self, host: &mut H)
    where
        H: WindowHost<Placement = P>,
    {
        if self.fullscreen {
            self.leave(host);
        } else {
            self.enter(host);
        }
    }

    /// Leaves fullscreen if needed. Used before the window goes away.
    pub fn restore<H>(&mut self, host: &mut H)
    where
        H: WindowHost<Placement = P>,
    {
        if self.fullscreen {
            self.leave(host);
        }
    }

    fn enter<H>(&mut self, host: &mut H)
    where
        H: WindowHost<Placement = P>,
    {
        self.saved_style = host.style();
        self.saved_placement = None;
        if self.saved_style & WS_OVERLAPPEDWINDOW != 0 {
            if let (Some(placement), Some(rect)) = (host.placement(), host.monitor_rect()) {
                self.saved_placement = Some(placement);
                host.set_style(self.saved_style & !WS_OVERLAPPEDWINDOW);
                host.cover(rect);
                debug!("Entered fullscreen at {}x{}", rect.width(), rect.height());
            }
        }
        host.show_cursor(false);
        self.fullscreen = true;
    }

    fn leave<H>(&mut self, host: &mut H)
    where
        H: WindowHost<Placement = P>,
    {
        if let Some(placement) = &self.saved_placement {
            host.set_placement(placement);
        }
        host.set_style(self.saved_style | WS_OVERLAPPEDWINDOW);
        host.reframe();
        host.show_cursor(true);
        self.fullscreen = false;
        debug!("Left fullscreen");
    }
}
