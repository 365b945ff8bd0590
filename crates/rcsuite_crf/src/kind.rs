//! Common Robustness Failure classes.

use crate::error::CrfError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Class of injected fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CrfKind {
    /// Event identifier replaced with an unexpected one
    #[serde(rename = "WM")]
    WrongMessage,
    /// Payload replaced with a malformed one
    #[serde(rename = "WP")]
    WrongPayload,
    /// Event replaced with a timeout marker
    #[serde(rename = "MM")]
    MissingMessage,
}

impl CrfKind {
    /// All kinds in tag order
    pub const ALL: [CrfKind; 3] = [Self::WrongMessage, Self::WrongPayload, Self::MissingMessage];

    /// Short tag: `WM`, `WP` or `MM`
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::WrongMessage => "WM",
            Self::WrongPayload => "WP",
            Self::MissingMessage => "MM",
        }
    }
}

impl fmt::Display for CrfKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CrfKind {
    type Err = CrfError;

    /// Parse a tag, ignoring case and surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
            .ok_or_else(|| CrfError::UnknownKind(s.to_string()))
    }
}
