use std::fmt;

/// Largest frame index offered by the node UI. Not enforced by the nodes themselves.
pub const MAX_FRAME_HINT: u64 = 9_999_999;

/// Zero-based frame number within an image sequence.
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
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Decimal rendering left-padded with zeros to at least `width` digits.
    ///
    /// Numbers wider than `width` are never truncated.
    pub fn zero_padded(self, width: usize) -> String {
        format!("{:0width$}", self.0)
    }
}

impl From<u64> for FrameIndex {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
