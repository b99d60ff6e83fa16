//! Dense occupancy grid the corridor router runs on.

use crate::room::{Room, RoomArena};
use crate::types::RoomId;

/// Empty border kept around the outermost rooms so routes and walls have
/// space to work in.
pub(crate) const GRID_MARGIN: i32 = 5;

/// Cell ownership over the bounding box of every placed room plus
/// [`GRID_MARGIN`] on each side. Accessing a cell outside the box is a bug
/// and panics.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
    width: usize,
    cells: Vec<Option<RoomId>>,
}

impl Grid {
    /// Size the grid to the arena and mark every room's footprint.
    pub(crate) fn from_arena(arena: &RoomArena) -> Self {
        debug_assert!(!arena.is_empty(), "grid needs at least one room");
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for room in arena.values() {
            min_x = min_x.min(room.x);
            min_y = min_y.min(room.y);
            max_x = max_x.max(room.max_x());
            max_y = max_y.max(room.max_y());
        }

        let min_x = min_x - GRID_MARGIN;
        let min_y = min_y - GRID_MARGIN;
        let max_x = max_x + GRID_MARGIN;
        let max_y = max_y + GRID_MARGIN;
        let width = (max_x - min_x) as usize;
        let height = (max_y - min_y) as usize;
        let mut grid = Self {
            min_x,
            min_y,
            max_x,
            max_y,
            width,
            cells: vec![None; width * height],
        };
        for room in arena.values() {
            grid.add_room(room);
        }
        grid
    }

    pub(crate) fn add_room(&mut self, room: &Room) {
        for y in room.y..room.max_y() {
            for x in room.x..room.max_x() {
                let index = self.index(x, y);
                self.cells[index] = Some(room.id);
            }
        }
    }

    pub(crate) fn owner(&self, x: i32, y: i32) -> Option<RoomId> {
        self.cells[self.index(x, y)]
    }

    pub(crate) fn claim(&mut self, x: i32, y: i32, id: RoomId) {
        let index = self.index(x, y);
        self.cells[index] = Some(id);
    }

    pub(crate) fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }

    fn index(&self, x: i32, y: i32) -> usize {
        assert!(self.contains(x, y), "grid access out of bounds at ({x}, {y})");
        (y - self.min_y) as usize * self.width + (x - self.min_x) as usize
    }
}
