//! Failure kinds a generation run can report.

use thiserror::Error;

use crate::config::ConfigError;
use crate::types::RoomId;

/// A failed run is abandoned where it stopped; callers retry with a fresh
/// generator and a new seed.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Room separation was still finding overlaps after the pass cap.
    /// Coincident room centers can never push apart, so this is the escape
    /// hatch for degenerate placements.
    #[error("room separation did not settle after {passes} passes")]
    SeparationDiverged { passes: u32 },
    /// The triangulation left part of the layout unreachable, so no spanning
    /// tree exists. Collinear room centers are the usual culprit.
    #[error("room graph is not connected; {connected} of {total} rooms reachable")]
    DisconnectedLayout { connected: usize, total: usize },
    /// A triangulation collaborator emitted a triad with out-of-range or
    /// repeated corners.
    #[error(
        "triad {triad_index} has invalid corners {corners:?} for {point_count} points"
    )]
    InvalidTriangulation {
        triad_index: usize,
        corners: [usize; 3],
        point_count: usize,
    },
    /// Extra-link sampling kept drawing edges that were already present.
    #[error("no new link found after {attempts} samples")]
    LinkSamplingExhausted { attempts: u32 },
    /// The route search exhausted the whole grid without reaching the
    /// destination room.
    #[error("no corridor route from {from:?} to {to:?}")]
    NoCorridorRoute { from: RoomId, to: RoomId },
}
