//! Generation parameters and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted placement half-extent. Keeps the occupancy grid, which
/// spans the placed rooms plus a margin, at a sane allocation size.
pub const MAX_DIMENSION_LIMIT: i32 = 1024;

/// Tunable inputs of a generation run. `Default` mirrors the values the CLI
/// advertises.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenConfig {
    /// Number of chambers to place.
    pub room_count: u32,
    /// Half-extent of the square region room origins are drawn from.
    pub max_dimension: i32,
    /// Smallest room edge, in cells.
    pub min_room_size: i32,
    /// Room edges are drawn from `[min_room_size, max_room_size)`.
    pub max_room_size: i32,
    /// Lower bound of the extra-link fraction.
    pub min_extra_links: f32,
    /// Upper bound of the extra-link fraction.
    pub max_extra_links: f32,
    /// World units per grid cell, carried through to the emitted record.
    pub cell_size: f32,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            room_count: 12,
            max_dimension: 30,
            min_room_size: 4,
            max_room_size: 10,
            min_extra_links: 0.1,
            max_extra_links: 0.25,
            cell_size: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("room_count must be at least 1")]
    NoRooms,
    #[error("max_dimension ({0}) must be in 1..={MAX_DIMENSION_LIMIT}")]
    DimensionRange(i32),
    #[error("room sizes must satisfy 1 <= min ({min}) <= max ({max})")]
    RoomSizeRange { min: i32, max: i32 },
    #[error(
        "max_dimension ({max_dimension}) leaves no placement range for \
         max_room_size ({max_room_size})"
    )]
    PlacementRangeEmpty {
        max_dimension: i32,
        max_room_size: i32,
    },
    #[error("extra-link fractions must satisfy 0 <= min ({min}) <= max ({max}) <= 1")]
    ExtraLinkRange { min: f32, max: f32 },
    #[error("cell_size ({0}) must be positive and finite")]
    BadCellSize(f32),
}

impl GenConfig {
    /// Reject parameter sets the pipeline cannot run to completion on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.room_count == 0 {
            return Err(ConfigError::NoRooms);
        }
        if !(1..=MAX_DIMENSION_LIMIT).contains(&self.max_dimension) {
            return Err(ConfigError::DimensionRange(self.max_dimension));
        }
        if self.min_room_size < 1 || self.max_room_size < self.min_room_size {
            return Err(ConfigError::RoomSizeRange {
                min: self.min_room_size,
                max: self.max_room_size,
            });
        }
        // Origins come from [-max_dimension, max_dimension - max_room_size).
        if 2 * self.max_dimension <= self.max_room_size {
            return Err(ConfigError::PlacementRangeEmpty {
                max_dimension: self.max_dimension,
                max_room_size: self.max_room_size,
            });
        }
        if !self.min_extra_links.is_finite()
            || !self.max_extra_links.is_finite()
            || self.min_extra_links < 0.0
            || self.max_extra_links < self.min_extra_links
            || self.max_extra_links > 1.0
        {
            return Err(ConfigError::ExtraLinkRange {
                min: self.min_extra_links,
                max: self.max_extra_links,
            });
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::BadCellSize(self.cell_size));
        }
        Ok(())
    }
}
