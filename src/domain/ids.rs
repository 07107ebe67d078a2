//! Domain identifier types with validation
//!
//! Newtype wrapper for the land-title primary key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Land title identifier newtype wrapper
///
/// Opaque primary key of a title in the target store. The warehouse delivers
/// it as a string; the only rule is that it is non-blank.
///
/// # Examples
///
/// ```
/// use titlesync::domain::ids::TitleId;
/// use std::str::FromStr;
///
/// let id = TitleId::from_str("2091834").unwrap();
/// assert_eq!(id.as_str(), "2091834");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TitleId(String);

impl TitleId {
    /// Creates a new TitleId from a string
    ///
    /// Returns `Err` if the identifier is empty or whitespace only.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Title ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the title ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TitleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TitleId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TitleId> for String {
    fn from(id: TitleId) -> Self {
        id.0
    }
}

impl AsRef<str> for TitleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_id_valid() {
        let id = TitleId::new("TGL12345").unwrap();
        assert_eq!(id.as_str(), "TGL12345");
        assert_eq!(id.to_string(), "TGL12345");
    }

    #[test]
    fn test_title_id_blank() {
        assert!(TitleId::new("").is_err());
        assert!(TitleId::new("   ").is_err());
    }

    #[test]
    fn test_title_id_serde_rejects_blank() {
        let ok: TitleId = serde_json::from_str("\"17\"").unwrap();
        assert_eq!(ok.into_inner(), "17");

        let err = serde_json::from_str::<TitleId>("\"\"");
        assert!(err.is_err());
    }
}
