//! Error types for pathfinder configuration.

use std::fmt;

/// Errors reported when building a pathfinder.
///
/// Search itself never fails: an unreachable goal is an absent path and an
/// out-of-range index is an absent cell. Only configuration can be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A selector string did not name a supported option.
    InvalidConfiguration {
        /// Which setting was being parsed, e.g. `"cost function"`.
        what: &'static str,
        /// The rejected input.
        value: String,
    },
}

impl PathError {
    pub(crate) fn invalid(what: &'static str, value: &str) -> Self {
        Self::InvalidConfiguration {
            what,
            value: value.to_owned(),
        }
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { what, value } => {
                write!(f, "unsupported {what} \u{201c}{value}\u{201d}")
            }
        }
    }
}

impl std::error::Error for PathError {}
