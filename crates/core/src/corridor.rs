//! Turns routed paths into corridor rooms and rings finished rooms with
//! walls.

use crate::grid::Grid;
use crate::pathfind::PathCell;
use crate::room::{RoomArena, insert_room};
use crate::types::{Cell, RoomId, RoomKind};

/// Carve the unowned stretches of a routed path into corridor rooms, one per
/// straight run. A run ends when the path enters owned ground, changes
/// direction, or stops. Returns the new ids in carve order.
pub(crate) fn carve_corridors(
    path: &[PathCell],
    arena: &mut RoomArena,
    grid: &mut Grid,
) -> Vec<RoomId> {
    let mut carved = Vec::new();
    // First and last cell of the straight run being collected.
    let mut run: Option<(PathCell, PathCell)> = None;

    for &step in path {
        if grid.owner(step.cell.x, step.cell.y).is_some() {
            if let Some((first, last)) = run.take() {
                carved.push(flush_run(first.cell, last.cell, arena, grid));
            }
            continue;
        }
        match run {
            None => run = Some((step, step)),
            Some((first, last)) => {
                if step.dir != first.dir {
                    carved.push(flush_run(first.cell, last.cell, arena, grid));
                    run = Some((step, step));
                } else {
                    run = Some((first, step));
                }
            }
        }
    }
    if let Some((first, last)) = run {
        carved.push(flush_run(first.cell, last.cell, arena, grid));
    }
    carved
}

/// A run becomes the axis-aligned rectangle spanning its endpoints: always
/// one cell wide, claimed on the grid like any other room.
fn flush_run(first: Cell, last: Cell, arena: &mut RoomArena, grid: &mut Grid) -> RoomId {
    let id = insert_room(
        arena,
        first.x.min(last.x),
        first.y.min(last.y),
        (first.x - last.x).abs() + 1,
        (first.y - last.y).abs() + 1,
        RoomKind::Corridor,
    );
    let room = arena[id].clone();
    grid.add_room(&room);
    id
}

/// Claim every still-unowned cell on the one-cell perimeter of `id` and
/// record it as a wall. Cells already owned, by a neighboring room or by an
/// earlier wall, are left alone, so the scan is idempotent.
pub(crate) fn raise_walls(id: RoomId, arena: &RoomArena, grid: &mut Grid, walls: &mut Vec<Cell>) {
    let room = &arena[id];
    let (min_x, min_y) = (room.x, room.y);
    let (max_x, max_y) = (room.max_x(), room.max_y());

    for x in (min_x - 1)..=max_x {
        claim_wall(x, min_y - 1, id, grid, walls);
        claim_wall(x, max_y, id, grid, walls);
    }
    for y in (min_y - 1)..=max_y {
        claim_wall(min_x - 1, y, id, grid, walls);
        claim_wall(max_x, y, id, grid, walls);
    }
}

fn claim_wall(x: i32, y: i32, id: RoomId, grid: &mut Grid, walls: &mut Vec<Cell>) {
    if grid.owner(x, y).is_some() {
        return;
    }
    grid.claim(x, y, id);
    walls.push(Cell { x, y });
}
