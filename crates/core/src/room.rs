//! Rooms, their arena, and the geometric predicates separation relies on.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::types::{Cell, RoomId, RoomKind};

/// Cells of clearance the overlap test demands between rooms. The buffer is
/// applied on the low side of each axis only, matching how walls and the
/// corridor margin consume that space later.
pub const ROOM_BUFFER: i32 = 3;

pub type RoomArena = SlotMap<RoomId, Room>;

/// An axis-aligned rectangle of cells. `x`/`y` is the minimum corner;
/// `width`/`height` are always positive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub kind: RoomKind,
}

impl Room {
    /// Exclusive x bound.
    pub fn max_x(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive y bound.
    pub fn max_y(&self) -> i32 {
        self.y + self.height
    }

    /// Fractional center in cell coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }

    /// The cell containing the center, rounding half-cells down.
    pub fn center_cell(&self) -> Cell {
        Cell {
            x: self.x + self.width / 2,
            y: self.y + self.height / 2,
        }
    }

    pub fn contains_cell(&self, cell: Cell) -> bool {
        (self.x..self.max_x()).contains(&cell.x) && (self.y..self.max_y()).contains(&cell.y)
    }

    /// Buffered overlap test driving separation. Rooms closer than
    /// [`ROOM_BUFFER`] on both axes still count as overlapping.
    pub fn overlaps(&self, other: &Room) -> bool {
        spans_overlap(
            self.x - ROOM_BUFFER,
            self.max_x(),
            other.x - ROOM_BUFFER,
            other.max_x(),
        ) && spans_overlap(
            self.y - ROOM_BUFFER,
            self.max_y(),
            other.y - ROOM_BUFFER,
            other.max_y(),
        )
    }

    /// Squared distance of the center from the origin. Separation uses it to
    /// pick which of two fresh overlapping rooms yields.
    pub(crate) fn center_sq_mag(&self) -> f64 {
        let (x, y) = self.center();
        x * x + y * y
    }

    /// One separation step: move a unit away from `pusher_center` along the
    /// axis with the larger center delta. An exact tie steps on both axes.
    pub(crate) fn push_away_from(&mut self, pusher_center: (f64, f64)) {
        let (center_x, center_y) = self.center();
        let (pusher_x, pusher_y) = pusher_center;
        let delta_x = (pusher_x - center_x).abs();
        let delta_y = (pusher_y - center_y).abs();
        if delta_x >= delta_y {
            if pusher_x > center_x {
                self.x -= 1;
            } else if pusher_x < center_x {
                self.x += 1;
            }
        }
        if delta_y >= delta_x {
            if pusher_y > center_y {
                self.y -= 1;
            } else if pusher_y < center_y {
                self.y += 1;
            }
        }
    }
}

fn spans_overlap(low_a: i32, high_a: i32, low_b: i32, high_b: i32) -> bool {
    low_a < high_b && low_b < high_a
}

/// Manhattan distance between fractional centers, truncated to whole cells.
/// Spanning-tree growth weighs candidate edges with this.
pub(crate) fn center_distance(a: &Room, b: &Room) -> i32 {
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    ((ax - bx).abs() + (ay - by).abs()) as i32
}

/// Insert a room and patch its id with the key the arena assigned.
pub(crate) fn insert_room(
    arena: &mut RoomArena,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    kind: RoomKind,
) -> RoomId {
    let id = arena.insert(Room {
        id: RoomId::default(),
        x,
        y,
        width,
        height,
        kind,
    });
    arena[id].id = id;
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(x: i32, y: i32, width: i32, height: i32) -> Room {
        Room {
            id: RoomId::default(),
            x,
            y,
            width,
            height,
            kind: RoomKind::Chamber,
        }
    }

    #[test]
    fn center_handles_odd_sizes_and_negative_origins() {
        assert_eq!(room(0, 0, 4, 4).center(), (2.0, 2.0));
        assert_eq!(room(-3, 1, 3, 5).center(), (-1.5, 3.5));
        assert_eq!(room(-3, 1, 3, 5).center_cell(), Cell { x: -2, y: 3 });
    }

    #[test]
    fn center_cell_is_floor_of_fractional_center() {
        // width 3 centers at x + 1.5; the cell is x + 1.
        let odd = room(4, 4, 3, 3);
        assert_eq!(odd.center_cell(), Cell { x: 5, y: 5 });
        let even = room(4, 4, 4, 4);
        assert_eq!(even.center_cell(), Cell { x: 6, y: 6 });
    }

    #[test]
    fn overlap_includes_the_buffer_zone() {
        let a = room(0, 0, 4, 4);
        // Two cells of daylight on x: still overlapping under the buffer.
        assert!(a.overlaps(&room(6, 0, 4, 4)));
        // Exactly ROOM_BUFFER cells apart: clear.
        assert!(!a.overlaps(&room(7, 0, 4, 4)));
        // Far on y even though x overlaps.
        assert!(!a.overlaps(&room(0, 7, 4, 4)));
    }

    #[test]
    fn push_moves_along_the_larger_axis_only() {
        let mut target = room(10, 0, 4, 4);
        // Pusher center west of the target: x delta dominates.
        target.push_away_from((2.0, 2.0));
        assert_eq!((target.x, target.y), (11, 0));
    }

    #[test]
    fn push_tie_steps_on_both_axes() {
        let mut target = room(1, 1, 4, 4);
        target.push_away_from((2.0, 2.0));
        assert_eq!((target.x, target.y), (2, 2));
    }

    #[test]
    fn push_from_coincident_center_does_not_move() {
        let mut target = room(0, 0, 4, 4);
        target.push_away_from((2.0, 2.0));
        assert_eq!((target.x, target.y), (0, 0));
    }

    #[test]
    fn center_distance_truncates_fractions() {
        // Centers (1.5, 1.5) and (7.0, 1.5): distance 5.5 truncates to 5.
        assert_eq!(center_distance(&room(0, 0, 3, 3), &room(5, 0, 4, 3)), 5);
        assert_eq!(center_distance(&room(0, 0, 4, 4), &room(0, 0, 4, 4)), 0);
    }

    #[test]
    fn insert_room_patches_the_arena_key() {
        let mut arena = RoomArena::with_key();
        let id = insert_room(&mut arena, 1, 2, 3, 4, RoomKind::Corridor);
        assert_eq!(arena[id].id, id);
        assert_eq!(arena[id].kind, RoomKind::Corridor);
    }
}
