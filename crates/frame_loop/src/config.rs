use crate::driver_tier::DriverTier;
use crate::driver_tier::DriverTierList;
use crate::transform::Projection;
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_LOG_FILE: &str = "Log.txt";

#[derive(Debug, Clone, PartialEq)]
pub struct FrameLoopConfig {
    /// Client-area size used for the swap chain and the warm-up resize.
    pub window_size: (u32, u32),
    pub driver_tiers: DriverTierList,
    pub projection: Projection,
    pub log_file: PathBuf,
    /// Ask for the D3D11 debug layer. Dropped with a warning when not installed.
    pub debug_layer: bool,
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            window_size: (800, 600),
            driver_tiers: DriverTierList::default(),
            projection: Projection::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            debug_layer: cfg!(debug_assertions),
        }
    }
}

/// Command line arguments for sample initialization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleCommandLine {
    pub use_warp_device: bool,
    pub driver_tiers: Option<DriverTierList>,
    pub debug_layer: bool,
    pub log_file: Option<PathBuf>,
}

impl SampleCommandLine {
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut command_line = SampleCommandLine::default();
        for arg in args {
            let arg = arg.as_ref();
            let flag = arg.trim_start_matches(['-', '/']);
            if flag.eq_ignore_ascii_case("warp") {
                command_line.use_warp_device = true;
            } else if flag.eq_ignore_ascii_case("debug") {
                command_line.debug_layer = true;
            } else if let Some(list) = strip_prefix_ignore_case(flag, "driver=") {
                match list.parse::<DriverTierList>() {
                    Ok(tiers) if !tiers.tiers().is_empty() => {
                        command_line.driver_tiers = Some(tiers)
                    }
                    Ok(_) => warn!("Ignoring empty driver list"),
                    Err(e) => warn!("Ignoring {}: {}", arg, e),
                }
            } else if let Some(path) = strip_prefix_ignore_case(flag, "log=") {
                command_line.log_file = Some(PathBuf::from(path));
            }
        }
        command_line
    }

    pub fn apply(&self, config: &mut FrameLoopConfig) {
        if let Some(tiers) = &self.driver_tiers {
            config.driver_tiers = tiers.clone();
        }
        if self.use_warp_device {
            config.driver_tiers.prefer(DriverTier::Warp);
        }
        if self.debug_layer {
            config.debug_layer = true;
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = log_file.clone();
        }
    }
}

/// Builds a SampleCommandLine from the process arguments
pub fn build_command_line() -> SampleCommandLine {
    SampleCommandLine::parse(std::env::args().skip(1))
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    if value.len() >= prefix.len() && value[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}
