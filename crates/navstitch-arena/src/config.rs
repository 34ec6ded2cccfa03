//! Arena configuration parameters.

use crate::error::ArenaError;

/// Configuration for the wrapper arena.
///
/// Controls cell segment sizing and the mesh limit. Checked once by
/// [`validate`](Self::validate) when the stitch manager is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Number of cell wrappers per segment.
    ///
    /// Default: 4096. A single mesh's cells must fit in one segment, so
    /// this also caps the cell count of any one blob.
    pub segment_size: u32,

    /// Maximum number of cell segments.
    ///
    /// Default: 64, for 262_144 resident cells at the default segment size.
    pub max_segments: u16,

    /// Maximum number of simultaneously loaded meshes.
    ///
    /// Default: 1024.
    pub max_meshes: u32,
}

impl ArenaConfig {
    /// Default cells per segment.
    pub const DEFAULT_SEGMENT_SIZE: u32 = 4096;

    /// Default maximum segment count.
    pub const DEFAULT_MAX_SEGMENTS: u16 = 64;

    /// Default maximum loaded meshes.
    pub const DEFAULT_MAX_MESHES: u32 = 1024;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            segment_size: Self::DEFAULT_SEGMENT_SIZE,
            max_segments: Self::DEFAULT_MAX_SEGMENTS,
            max_meshes: Self::DEFAULT_MAX_MESHES,
        }
    }

    /// Total cell capacity across all segments.
    pub fn cell_capacity(&self) -> usize {
        self.segment_size as usize * self.max_segments as usize
    }

    /// Reject zero-sized limits.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.segment_size == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "segment_size must be at least 1".into(),
            });
        }
        if self.max_segments == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "max_segments must be at least 1".into(),
            });
        }
        if self.max_meshes == 0 || self.max_meshes == u32::MAX {
            return Err(ArenaError::InvalidConfig {
                reason: format!("max_meshes must be in 1..{}", u32::MAX),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}
