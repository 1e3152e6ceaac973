//! Fatal generation errors.
//!
//! Everything the engine can recover from (no part fits, catalog exhausted,
//! collisions) stays an `Option` or a [`Resolution`](crate::resolver::Resolution).
//! Only the conditions below abort a session.

use crate::geometry::Coords;
use crate::part::PartError;

#[derive(Debug)]
pub enum GenError {
    InvalidConfig(String),
    /// A built-in part failed its load-time checks.
    InvalidPart(PartError),
    /// The entrance catalog holds nothing that can start a dungeon.
    NoEntranceParts,
    /// No starting piece fit at `start` within the retry bound.
    StartPlacement { start: Coords, attempts: u32 },
}

impl From<PartError> for GenError {
    fn from(e: PartError) -> Self {
        GenError::InvalidPart(e)
    }
}

impl std::fmt::Display for GenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            GenError::InvalidPart(e) => write!(f, "Invalid built-in part: {}", e),
            GenError::NoEntranceParts => write!(f, "No part in the catalog can start a dungeon"),
            GenError::StartPlacement { start, attempts } => write!(
                f,
                "Failed to place a starting piece at {} after {} attempts",
                start, attempts
            ),
        }
    }
}

impl std::error::Error for GenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenError::InvalidPart(e) => Some(e),
            _ => None,
        }
    }
}
