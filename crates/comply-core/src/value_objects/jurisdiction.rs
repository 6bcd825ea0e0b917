//! Jurisdiction - closed union over supported state codes
//!
//! Modeled as a tagged union rather than a string-keyed lookup so adding a
//! jurisdiction is a compile-time-checked change. Unsupported codes map to
//! the explicit `Other` fallback variant instead of silently no-oping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A US jurisdiction with a tracked cannabis regulatory program
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Jurisdiction {
    Montana,
    Colorado,
    California,
    Washington,
    Oklahoma,
    Michigan,
    /// Any state without a dedicated citation pattern table
    Other(String),
}

impl Jurisdiction {
    /// Resolve a two-letter state code (case-insensitive)
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "MT" => Self::Montana,
            "CO" => Self::Colorado,
            "CA" => Self::California,
            "WA" => Self::Washington,
            "OK" => Self::Oklahoma,
            "MI" => Self::Michigan,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Montana => "MT",
            Self::Colorado => "CO",
            Self::California => "CA",
            Self::Washington => "WA",
            Self::Oklahoma => "OK",
            Self::Michigan => "MI",
            Self::Other(code) => code,
        }
    }

    /// Whether this jurisdiction has a dedicated citation pattern table
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Jurisdiction::from_code("MT"), Jurisdiction::Montana);
        assert_eq!(Jurisdiction::from_code("co"), Jurisdiction::Colorado);
        assert_eq!(Jurisdiction::from_code(" wa "), Jurisdiction::Washington);
        assert_eq!(
            Jurisdiction::from_code("VT"),
            Jurisdiction::Other("VT".to_string())
        );
    }

    #[test]
    fn test_code_roundtrip() {
        for code in ["MT", "CO", "CA", "WA", "OK", "MI"] {
            let j = Jurisdiction::from_code(code);
            assert!(j.is_supported());
            assert_eq!(j.code(), code);
        }
        assert!(!Jurisdiction::from_code("XX").is_supported());
    }
}
