//! Stitch manager configuration.

use navstitch_arena::ArenaConfig;

use crate::error::StitchError;

/// Configuration for a [`StitchManager`](crate::StitchManager).
#[derive(Clone, Debug, PartialEq)]
pub struct StitchConfig {
    /// Arena sizing for cell wrappers and the mesh limit.
    pub arena: ArenaConfig,

    /// Stitch every adjacent loaded mesh as part of each load.
    ///
    /// Default: `false`. With it off, the streaming driver decides which
    /// pairs to stitch through
    /// [`stitch_boundary`](crate::StitchManager::stitch_boundary) or
    /// [`stitch_neighbours`](crate::StitchManager::stitch_neighbours).
    pub auto_stitch: bool,

    /// Largest altitude difference between the endpoints of two boundary
    /// edges that still lets them link.
    ///
    /// Default: 0.5. Ground-plane coordinates must match exactly.
    pub altitude_tolerance: f32,
}

impl StitchConfig {
    /// Default altitude tolerance.
    pub const DEFAULT_ALTITUDE_TOLERANCE: f32 = 0.5;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            arena: ArenaConfig::default(),
            auto_stitch: false,
            altitude_tolerance: Self::DEFAULT_ALTITUDE_TOLERANCE,
        }
    }

    /// Enable or disable stitching on load.
    pub fn with_auto_stitch(mut self, auto_stitch: bool) -> Self {
        self.auto_stitch = auto_stitch;
        self
    }

    /// Check arena limits and the tolerance.
    pub fn validate(&self) -> Result<(), StitchError> {
        self.arena.validate()?;
        if !self.altitude_tolerance.is_finite() || self.altitude_tolerance < 0.0 {
            return Err(StitchError::InvalidConfig {
                reason: format!(
                    "altitude_tolerance must be finite and non-negative, got {}",
                    self.altitude_tolerance
                ),
            });
        }
        Ok(())
    }
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self::new()
    }
}
