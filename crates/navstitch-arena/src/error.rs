//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// No segment can hold the requested cell range.
    CapacityExceeded {
        /// Number of cells requested.
        requested: usize,
        /// Cell capacity of the arena at the time of the request.
        capacity: usize,
    },
    /// The mesh slab is full.
    MeshLimitReached {
        /// Configured maximum.
        limit: u32,
    },
    /// An [`ArenaConfig`](crate::ArenaConfig) value is out of range.
    InvalidConfig {
        /// What was wrong.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} cells, capacity {capacity} cells"
                )
            }
            Self::MeshLimitReached { limit } => {
                write!(f, "mesh limit of {limit} reached")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid arena config: {reason}")
            }
        }
    }
}

impl Error for ArenaError {}
