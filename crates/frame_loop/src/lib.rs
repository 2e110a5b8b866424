pub mod config;
pub mod device;
pub mod driver_tier;
pub mod error;
pub mod frame_loop;
pub mod fullscreen;
pub mod geometry;
pub mod logging;
pub mod sample;
pub mod shader;
pub mod sphere;
pub mod state;
pub mod transform;

#[cfg(windows)]
pub mod d3d11;
#[cfg(windows)]
pub mod sample_runner;
#[cfg(windows)]
pub mod win32;

pub use config::FrameLoopConfig;
pub use config::SampleCommandLine;
pub use device::RenderDevice;
pub use driver_tier::DriverTier;
pub use driver_tier::DriverTierList;
pub use error::FrameLoopError;
pub use error::FrameLoopResult;
pub use frame_loop::FrameLoop;
pub use sample::RasterizerConfig;
pub use sample::Sample;
pub use sample::Scene;
pub use state::LoopState;

#[cfg(windows)]
pub use sample_runner::run_sample;
