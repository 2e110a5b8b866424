use crate::error::FrameLoopError;
use crate::error::FrameLoopResult;
use crate::error::StatusCode;
use std::str::FromStr;
use tracing::debug;
use tracing::info;

/// The execution backend the graphics runtime uses to realize a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverTier {
    Hardware,
    Warp,
    Software,
    Reference,
    Null,
}

impl DriverTier {
    pub const ALL: [DriverTier; 5] = [
        DriverTier::Hardware,
        DriverTier::Warp,
        DriverTier::Software,
        DriverTier::Reference,
        DriverTier::Null,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DriverTier::Hardware => "hardware",
            DriverTier::Warp => "warp",
            DriverTier::Software => "software",
            DriverTier::Reference => "reference",
            DriverTier::Null => "null",
        }
    }
}

impl std::fmt::Display for DriverTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown driver tier {0:?}, expected one of hardware, warp, software, reference, null")]
pub struct UnknownDriverTier(pub String);

impl FromStr for DriverTier {
    type Err = UnknownDriverTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        DriverTier::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownDriverTier(s.to_string()))
    }
}

/// Ordered preference list of driver tiers. The first tier that yields a device wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverTierList(Vec<DriverTier>);

impl Default for DriverTierList {
    fn default() -> Self {
        Self(DriverTier::ALL.to_vec())
    }
}

impl DriverTierList {
    pub fn new(tiers: impl IntoIterator<Item = DriverTier>) -> Self {
        let mut list = Vec::new();
        for tier in tiers {
            if !list.contains(&tier) {
                list.push(tier);
            }
        }
        Self(list)
    }

    pub fn tiers(&self) -> &[DriverTier] {
        &self.0
    }

    /// Moves `tier` to the front, adding it if absent.
    pub fn prefer(&mut self, tier: DriverTier) {
        self.0.retain(|t| *t != tier);
        self.0.insert(0, tier);
    }

    /// Walks the list in order and returns the first tier `create` succeeds on.
    ///
    /// Every failure is logged at debug level. If nothing succeeds the error names every
    /// tier tried and the last status code seen.
    pub fn select_first<T>(
        &self,
        mut create: impl FnMut(DriverTier) -> FrameLoopResult<T>,
    ) -> FrameLoopResult<(DriverTier, T)> {
        let mut last_status = StatusCode::FAIL;
        for &tier in &self.0 {
            match create(tier) {
                Ok(value) => {
                    info!("Device created with {} driver", tier);
                    return Ok((tier, value));
                }
                Err(e) => {
                    debug!("{} driver unavailable: {}", tier, e);
                    if let Some(status) = e.status() {
                        last_status = status;
                    }
                }
            }
        }
        Err(FrameLoopError::DeviceCreation {
            tried: self.0.clone(),
            status: last_status,
        })
    }
}

impl FromStr for DriverTierList {
    type Err = UnknownDriverTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tiers = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(DriverTier::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DriverTierList::new(tiers))
    }
}
