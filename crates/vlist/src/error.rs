#![forbid(unsafe_code)]

//! Configuration errors.

use std::fmt;

/// Error raised when a list is configured with values the engine cannot lay out.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A strategy tag outside `fixed | variable | dynamic`.
    UnknownStrategy(String),
    /// Fixed item height must be finite and greater than zero.
    InvalidItemHeight(f64),
    /// Dynamic placeholder height must be finite and greater than zero.
    InvalidEstimatedHeight(f64),
    /// Container height must be finite and non-negative.
    InvalidContainerHeight(f64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStrategy(tag) => write!(
                f,
                "unknown layout strategy {tag:?} (expected fixed, variable or dynamic)"
            ),
            Self::InvalidItemHeight(h) => {
                write!(f, "fixed item height must be finite and > 0, got {h}")
            }
            Self::InvalidEstimatedHeight(h) => {
                write!(f, "estimated item height must be finite and > 0, got {h}")
            }
            Self::InvalidContainerHeight(h) => {
                write!(f, "container height must be finite and >= 0, got {h}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Standard result type for vlist APIs.
pub type Result<T> = std::result::Result<T, Error>;
