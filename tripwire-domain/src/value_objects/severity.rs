// Severity value object
// 1 = sus, 5 = blatant. 0 is reserved for a passing result.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const MIN_SEVERITY: u8 = 1;
pub const MAX_SEVERITY: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Severity(u8);

impl Severity {
    pub const NONE: Severity = Severity(0);

    /// Clamps any requested level into `[1, 5]`.
    pub fn clamped(level: i32) -> Self {
        Severity(level.clamp(MIN_SEVERITY as i32, MAX_SEVERITY as i32) as u8)
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn as_str(self) -> &'static str {
        match self.0 {
            0 => "NONE",
            1 => "SUS",
            2 => "LOW",
            3 => "MEDIUM",
            4 => "HIGH",
            _ => "BLATANT",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_levels() {
        assert_eq!(Severity::clamped(-3).level(), 1);
        assert_eq!(Severity::clamped(0).level(), 1);
        assert_eq!(Severity::clamped(3).level(), 3);
        assert_eq!(Severity::clamped(42).level(), 5);
        assert_eq!(Severity::NONE.level(), 0);
    }

    #[test]
    fn labels_follow_levels() {
        assert_eq!(Severity::NONE.as_str(), "NONE");
        assert_eq!(Severity::clamped(1).as_str(), "SUS");
        assert_eq!(Severity::clamped(3).as_str(), "MEDIUM");
        assert_eq!(Severity::clamped(9).as_str(), "BLATANT");
    }
}
