//! Random room placement and the pairwise separation resolver.

use slotmap::SecondaryMap;

use crate::config::GenConfig;
use crate::error::GenerationError;
use crate::room::{RoomArena, insert_room};
use crate::seed::GenRng;
use crate::types::{RoomId, RoomKind};

/// Separation pass cap. Layouts that have not settled by now never will;
/// rooms with coincident centers push neither way.
pub(crate) const MAX_SEPARATION_PASSES: u32 = 10_000;

/// Draw one chamber. Origin components come from
/// `[-max_dimension, max_dimension - max_room_size)` and edges from
/// `[min_room_size, max_room_size)`, in the order x, y, width, height.
pub(crate) fn place_room(config: &GenConfig, rng: &mut GenRng, arena: &mut RoomArena) -> RoomId {
    let origin_low = -config.max_dimension;
    let origin_high = config.max_dimension - config.max_room_size;
    let x = rng.range_i32(origin_low, origin_high);
    let y = rng.range_i32(origin_low, origin_high);
    let width = rng.range_i32(config.min_room_size, config.max_room_size);
    let height = rng.range_i32(config.min_room_size, config.max_room_size);
    insert_room(arena, x, y, width, height, RoomKind::Chamber)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PassOutcome {
    /// A full pass found no overlapping pair.
    Settled,
    /// At least one pair was pushed; run another pass.
    Unsettled,
}

/// Iterative separation: every pass visits each room pair in id order and
/// pushes overlapping pairs one cell apart. The pushed flag hands momentum
/// to the most recently moved room so chains resolve instead of oscillating.
pub(crate) struct Separator {
    ids: Vec<RoomId>,
    pushed: SecondaryMap<RoomId, bool>,
    passes: u32,
}

impl Separator {
    pub(crate) fn new(arena: &RoomArena) -> Self {
        let ids: Vec<RoomId> = arena.keys().collect();
        let mut pushed = SecondaryMap::new();
        for &id in &ids {
            pushed.insert(id, false);
        }
        Self {
            ids,
            pushed,
            passes: 0,
        }
    }

    /// One full pass over every pair.
    pub(crate) fn pass(&mut self, arena: &mut RoomArena) -> Result<PassOutcome, GenerationError> {
        if self.passes >= MAX_SEPARATION_PASSES {
            return Err(GenerationError::SeparationDiverged {
                passes: self.passes,
            });
        }
        self.passes += 1;

        let mut any_overlap = false;
        for first in 0..self.ids.len() {
            for second in (first + 1)..self.ids.len() {
                let a = self.ids[first];
                let b = self.ids[second];
                if !arena[a].overlaps(&arena[b]) {
                    continue;
                }
                any_overlap = true;
                self.resolve_pair(arena, a, b);
            }
        }

        Ok(if any_overlap {
            PassOutcome::Unsettled
        } else {
            PassOutcome::Settled
        })
    }

    fn resolve_pair(&mut self, arena: &mut RoomArena, a: RoomId, b: RoomId) {
        let a_pushed = self.pushed[a];
        let b_pushed = self.pushed[b];
        if a_pushed && b_pushed {
            // Both mid-push: cancel rather than ping-pong.
            self.pushed[a] = false;
            self.pushed[b] = false;
        } else if b_pushed {
            self.push(arena, b, a);
        } else if a_pushed {
            self.push(arena, a, b);
        } else if arena[a].center_sq_mag() < arena[b].center_sq_mag() {
            self.push(arena, a, b);
        } else {
            self.push(arena, b, a);
        }
    }

    /// The pusher stands still and sheds its flag; the target moves and
    /// becomes the pusher for the next encounter.
    fn push(&mut self, arena: &mut RoomArena, pusher: RoomId, target: RoomId) {
        let pusher_center = arena[pusher].center();
        arena[target].push_away_from(pusher_center);
        self.pushed[pusher] = false;
        self.pushed[target] = true;
    }
}
