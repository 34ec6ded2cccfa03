//! Errors surfaced by the stitch manager.
//!
//! Only loading can fail. Unloading, stitching and every handle query
//! report absence structurally instead.

use std::error::Error;
use std::fmt;

use navstitch_arena::ArenaError;
use navstitch_core::{CellPos, LoadError, MeshGuid};

/// A mesh could not be loaded, or the manager could not be built.
#[derive(Clone, Debug, PartialEq)]
pub enum StitchError {
    /// The blob failed validation or could not be fetched.
    Load(LoadError),
    /// The arena or mesh slab is full, or its config is invalid.
    Arena(ArenaError),
    /// A blob with the same guid is already resident.
    AlreadyLoaded {
        /// The duplicate guid.
        guid: MeshGuid,
    },
    /// The blob was generated with a different cell size or agent than
    /// the meshes already loaded.
    Incompatible {
        /// The rejected blob.
        guid: MeshGuid,
    },
    /// A cell of the blob sits where a loaded cell already is.
    Overlap {
        /// The rejected blob.
        guid: MeshGuid,
        /// First overlapping position.
        pos: CellPos,
    },
    /// A [`StitchConfig`](crate::StitchConfig) value is out of range.
    InvalidConfig {
        /// What was wrong.
        reason: String,
    },
}

impl fmt::Display for StitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "load failed: {e}"),
            Self::Arena(e) => write!(f, "arena: {e}"),
            Self::AlreadyLoaded { guid } => write!(f, "mesh {guid} is already loaded"),
            Self::Incompatible { guid } => write!(
                f,
                "mesh {guid} was generated with different cell size or entity parameters"
            ),
            Self::Overlap { guid, pos } => {
                write!(f, "mesh {guid} overlaps loaded data at cell {pos}")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid stitch config: {reason}"),
        }
    }
}

impl Error for StitchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Arena(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LoadError> for StitchError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

impl From<ArenaError> for StitchError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_expose_source() {
        let err = StitchError::from(LoadError::EmptyMesh);
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "load failed: mesh has no cells");
        let err = StitchError::AlreadyLoaded { guid: MeshGuid(1) };
        assert!(err.source().is_none());
    }
}
