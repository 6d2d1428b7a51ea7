use std::fmt;
use std::ops::{Add, Sub};

pub use kurbo::Point;

/// Milliseconds since the start of a pass or of a timer host's clock.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Millis(pub u64);

impl Millis {
    /// Zero duration.
    pub const ZERO: Self = Self(0);

    /// Build from whole seconds.
    pub fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    /// Underlying millisecond count.
    pub fn get(self) -> u64 {
        self.0
    }

    /// `self - other`, clamped at zero.
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Convert to a std duration (used by real-time drivers).
    pub fn as_duration(self) -> std::time::Duration {
        std::time::Duration::from_millis(self.0)
    }
}

impl Add for Millis {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Millis {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Scheduler generation. Timer tokens carry the epoch they were armed under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct Epoch(pub u64);

impl Epoch {
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Layout partition that selects which node position the drawing layer uses.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ViewportClass {
    /// Phone-sized layouts.
    Narrow,
    /// Tablet and desktop layouts.
    #[default]
    Wide,
}

impl ViewportClass {
    /// Width (css px) at which layouts switch from narrow to wide.
    pub const DEFAULT_BREAKPOINT_PX: u32 = 768;

    /// Classify a viewport width. Widths at or above `breakpoint_px` are wide.
    pub fn from_width(width_px: u32, breakpoint_px: u32) -> Self {
        if width_px >= breakpoint_px {
            Self::Wide
        } else {
            Self::Narrow
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
