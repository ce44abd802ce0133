use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// A balance patch identifier such as `14.21`.
///
/// Ordering follows release sequence: major first, then minor, so `14.9`
/// sorts before `14.10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PatchVersion {
    pub major: u16,
    pub minor: u16,
}

impl PatchVersion {
    pub fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Extract the patch from a full client build string, e.g.
    /// `14.21.623.5511` -> `14.21`.
    pub fn from_game_version(game_version: &str) -> Result<Self, EngineError> {
        let mut parts = game_version.trim().split('.');
        let invalid = || EngineError::InvalidPatchVersion(game_version.to_string());

        let major = parts
            .next()
            .and_then(|p| p.parse::<u16>().ok())
            .ok_or_else(invalid)?;
        let minor = parts
            .next()
            .and_then(|p| p.parse::<u16>().ok())
            .ok_or_else(invalid)?;

        Ok(Self { major, minor })
    }
}

impl fmt::Display for PatchVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for PatchVersion {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_game_version(s)
    }
}

impl TryFrom<String> for PatchVersion {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PatchVersion> for String {
    fn from(value: PatchVersion) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_major_minor_from_build_string() {
        let v = PatchVersion::from_game_version("14.21.623.5511").unwrap();
        assert_eq!(v, PatchVersion::new(14, 21));
        assert_eq!(v.to_string(), "14.21");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("unknown".parse::<PatchVersion>().is_err());
        assert!("14".parse::<PatchVersion>().is_err());
        assert!("14.x".parse::<PatchVersion>().is_err());
    }

    #[test]
    fn test_orders_by_release_sequence() {
        let a: PatchVersion = "14.9".parse().unwrap();
        let b: PatchVersion = "14.10".parse().unwrap();
        let c: PatchVersion = "15.1".parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_serializes_as_string() {
        let v = PatchVersion::new(14, 21);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"14.21\"");
        let back: PatchVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
