use crate::config::FrameLoopConfig;
use crate::config::build_command_line;
use crate::d3d11::D3D11Device;
use crate::driver_tier::DriverTier;
use crate::frame_loop::FrameLoop;
use crate::fullscreen::FullscreenToggle;
use crate::logging::init_logging;
use crate::sample::Sample;
use crate::sample::Scene;
use crate::state::LoopState;
use crate::win32::create_window::create_window;
use crate::win32::window_class::WindowHandler;
use crate::win32::window_class::create_window_class_struct;
use crate::win32::window_class_id::register_window_class;
use crate::win32::window_host::Win32Window;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use tracing::error;
use tracing::info;
use widestring::U16CString;
use windows::Win32::Foundation::*;
use windows::Win32::System::LibraryLoader::*;
use windows::Win32::UI::Input::KeyboardAndMouse::*;
use windows::Win32::UI::WindowsAndMessaging::*;
use windows::core::*;

/// Everything the window procedure reaches through `GWLP_USERDATA`.
struct AppContext {
    frame_loop: RefCell<FrameLoop<D3D11Device>>,
    fullscreen: RefCell<FullscreenToggle<WINDOWPLACEMENT>>,
}

impl AppContext {
    /// Runs `f` unless the frame loop is already borrowed further up the stack.
    fn with_frame_loop(&self, message: u32, f: impl FnOnce(&mut FrameLoop<D3D11Device>)) {
        match self.frame_loop.try_borrow_mut() {
            Ok(mut frame_loop) => f(&mut frame_loop),
            Err(_) => debug!("Frame loop busy, skipping message {:#06x}", message),
        }
    }

    fn restore_windowed(&self, hwnd: HWND) {
        if let Ok(mut fullscreen) = self.fullscreen.try_borrow_mut() {
            fullscreen.restore(&mut Win32Window(hwnd));
        }
    }
}

impl WindowHandler for AppContext {
    const CLASS_NAME: PCWSTR = w!("D3D11App");

    fn handle(
        &self,
        hwnd: HWND,
        message: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> Option<LRESULT> {
        match message {
            WM_SETFOCUS => self.with_frame_loop(message, |frame_loop| frame_loop.set_active(true)),
            WM_KILLFOCUS => {
                self.with_frame_loop(message, |frame_loop| frame_loop.set_active(false))
            }
            WM_SIZE => {
                let width = (lparam.0 & 0xFFFF) as u32;
                let height = ((lparam.0 >> 16) & 0xFFFF) as u32;
                self.with_frame_loop(message, |frame_loop| {
                    if frame_loop.state() == LoopState::Running {
                        // Failures are logged; frames stop until a resize succeeds.
                        let _ = frame_loop.resize(width, height);
                    }
                });
            }
            WM_KEYDOWN => match VIRTUAL_KEY(wparam.0 as u16) {
                VK_ESCAPE => {
                    let posted = unsafe { PostMessageW(Some(hwnd), WM_CLOSE, WPARAM(0), LPARAM(0)) };
                    if let Err(e) = posted {
                        error!("PostMessageW failed: {}", e);
                    }
                }
                VK_F => {
                    if let Ok(mut fullscreen) = self.fullscreen.try_borrow_mut() {
                        fullscreen.toggle(&mut Win32Window(hwnd));
                    }
                }
                _ => {}
            },
            // The window procedure posts the quit message.
            WM_DESTROY => self.restore_windowed(hwnd),
            _ => return None,
        }
        Some(LRESULT(0))
    }
}

fn message_box(hwnd: Option<HWND>, text: &str) {
    let text = U16CString::from_str_truncate(text);
    unsafe {
        MessageBoxW(
            hwnd,
            PCWSTR(text.as_ptr()),
            w!("Error"),
            MB_OK | MB_ICONERROR,
        )
    };
}

/// Runs a sample until its window is closed.
///
/// Startup failures are shown in a message box and returned.
pub fn run_sample<S: Sample>(sample: S) -> eyre::Result<()> {
    let command_line = build_command_line();
    let mut config = FrameLoopConfig {
        window_size: sample.window_size(),
        ..Default::default()
    };
    command_line.apply(&mut config);

    if let Err(e) = init_logging(&config) {
        message_box(None, &format!("{e:#}"));
    }
    info!("Starting {}", sample.title());

    let size = config.window_size;
    let mut title = sample.title();
    if config.driver_tiers.tiers().first() == Some(&DriverTier::Warp) {
        title.push_str(" (WARP)");
    }

    let app = Rc::new(AppContext {
        frame_loop: RefCell::new(FrameLoop::new(config, Scene::from_sample(&sample))),
        fullscreen: RefCell::default(),
    });

    let our_module: HMODULE = unsafe { GetModuleHandleW(None)? };
    let window_class = create_window_class_struct::<AppContext>(our_module)?;
    let class = register_window_class(&window_class)?;
    let title = U16CString::from_str_truncate(&title);
    // `app` outlives the window: the loop below only ends after WM_DESTROY.
    let hwnd = create_window(our_module, &class, size, &title, Rc::as_ptr(&app))?;

    let initialized = app.frame_loop.borrow_mut().initialize(&hwnd, size);
    if let Err(e) = initialized {
        message_box(Some(hwnd), &format!("Initialization failed\n\n{e}"));
        _ = unsafe { DestroyWindow(hwnd) };
        return Err(e.into());
    }

    unsafe {
        _ = ShowWindow(hwnd, SW_SHOW);
        _ = SetForegroundWindow(hwnd);
        _ = SetFocus(Some(hwnd));
    }

    // Drain pending messages, and render one frame whenever the queue is empty.
    let mut message = MSG::default();
    loop {
        if unsafe { PeekMessageW(&mut message, None, 0, 0, PM_REMOVE) }.as_bool() {
            if message.message == WM_QUIT {
                break;
            }
            unsafe {
                _ = TranslateMessage(&message);
                DispatchMessageW(&message);
            }
        } else {
            let mut frame_loop = app.frame_loop.borrow_mut();
            if frame_loop.is_active() && matches!(frame_loop.render_frame(), Ok(true)) {
                frame_loop.update();
            }
        }
    }

    app.frame_loop.borrow_mut().shutdown()?;
    Ok(())
}
