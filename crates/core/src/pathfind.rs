//! Cost-weighted route search between two rooms on the occupancy grid.
//!
//! Rooms being linked and existing corridors cost nothing to walk, so routes
//! funnel through geometry that is already carved instead of cutting fresh
//! ground. Unrelated rooms carry a near-prohibitive cost and are only ever
//! crossed when nothing else reaches.

use crate::error::GenerationError;
use crate::grid::Grid;
use crate::room::RoomArena;
use crate::types::{Cell, Direction, RoomId, RoomKind};

const STEP_COST: i64 = 1;
const TURN_PENALTY: i64 = 2;
const FOREIGN_ROOM_COST: i64 = i32::MAX as i64;

/// One accepted step of a route. `dir` is the direction the step was entered
/// from; the start cell has none. Corridor extraction groups runs by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PathCell {
    pub(crate) cell: Cell,
    pub(crate) dir: Option<Direction>,
}

/// Search nodes live in one pool; the open and closed lists hold indices
/// into it and parents are indices too, so rebuilding the path is a walk
/// back through the pool.
#[derive(Clone, Copy, Debug)]
struct PathNode {
    x: i32,
    y: i32,
    dir: Option<Direction>,
    cost: i64,
    heuristic: i64,
    parent: Option<usize>,
}

impl PathNode {
    fn full_cost(&self) -> i64 {
        self.cost + self.heuristic
    }
}

/// Best-first route from the center cell of `from` to the center cell of
/// `to`, both ends included. Fails only if the whole grid is exhausted
/// without touching the goal.
pub(crate) fn route_between(
    grid: &Grid,
    arena: &RoomArena,
    from: RoomId,
    to: RoomId,
) -> Result<Vec<PathCell>, GenerationError> {
    let start = arena[from].center_cell();
    let goal = arena[to].center_cell();
    let search = RouteSearch {
        grid,
        arena,
        from,
        to,
        goal,
        nodes: vec![PathNode {
            x: start.x,
            y: start.y,
            dir: None,
            cost: 0,
            heuristic: manhattan(start.x, start.y, goal),
            parent: None,
        }],
        open: vec![0],
        closed: Vec::new(),
    };
    search.run()
}

struct RouteSearch<'a> {
    grid: &'a Grid,
    arena: &'a RoomArena,
    from: RoomId,
    to: RoomId,
    goal: Cell,
    nodes: Vec<PathNode>,
    open: Vec<usize>,
    closed: Vec<usize>,
}

impl RouteSearch<'_> {
    fn run(mut self) -> Result<Vec<PathCell>, GenerationError> {
        while let Some(current) = self.pop_cheapest() {
            if self.nodes[current].x == self.goal.x && self.nodes[current].y == self.goal.y {
                return Ok(self.reconstruct(current));
            }
            self.closed.push(current);
            self.expand(current);
        }
        Err(GenerationError::NoCorridorRoute {
            from: self.from,
            to: self.to,
        })
    }

    /// Lowest cost-plus-heuristic entry; the earliest inserted wins ties.
    fn pop_cheapest(&mut self) -> Option<usize> {
        if self.open.is_empty() {
            return None;
        }
        let mut best = 0;
        for position in 1..self.open.len() {
            if self.nodes[self.open[position]].full_cost() < self.nodes[self.open[best]].full_cost()
            {
                best = position;
            }
        }
        Some(self.open.remove(best))
    }

    fn expand(&mut self, current: usize) {
        const OFFSETS: [(i32, i32, Direction); 4] = [
            (-1, 0, Direction::West),
            (1, 0, Direction::East),
            (0, -1, Direction::South),
            (0, 1, Direction::North),
        ];
        let (current_x, current_y) = (self.nodes[current].x, self.nodes[current].y);
        for (dx, dy, dir) in OFFSETS {
            let x = current_x + dx;
            let y = current_y + dy;
            if !self.grid.contains(x, y) {
                continue;
            }
            self.consider(current, x, y, dir);
        }
    }

    /// Queue a candidate step unless the same cell is already queued or
    /// expanded at least as cheaply. A strictly cheaper rerun evicts the
    /// stale entry, including closed ones.
    fn consider(&mut self, parent: usize, x: i32, y: i32, dir: Direction) {
        let heuristic = manhattan(x, y, self.goal);
        let cost = self.step_cost(parent, x, y, dir, heuristic);

        if let Some(position) = self
            .open
            .iter()
            .position(|&index| self.nodes[index].x == x && self.nodes[index].y == y)
        {
            if self.nodes[self.open[position]].cost <= cost {
                return;
            }
            self.open.remove(position);
        }
        if let Some(position) = self
            .closed
            .iter()
            .position(|&index| self.nodes[index].x == x && self.nodes[index].y == y)
        {
            if self.nodes[self.closed[position]].cost <= cost {
                return;
            }
            self.closed.remove(position);
        }

        self.nodes.push(PathNode {
            x,
            y,
            dir: Some(dir),
            cost,
            heuristic,
            parent: Some(parent),
        });
        self.open.push(self.nodes.len() - 1);
    }

    /// Cell pricing: the two rooms being linked and any corridor are free,
    /// other rooms cost nearly the i32 ceiling, and empty ground pays one
    /// per step plus two per turn.
    fn step_cost(&self, parent: usize, x: i32, y: i32, dir: Direction, heuristic: i64) -> i64 {
        match self.grid.owner(x, y) {
            Some(owner) if owner == self.from || owner == self.to => 0,
            Some(owner) if self.arena[owner].kind == RoomKind::Corridor => 0,
            Some(_) => FOREIGN_ROOM_COST - heuristic,
            None => {
                let parent_node = &self.nodes[parent];
                let mut cost = parent_node.cost + STEP_COST;
                if parent_node.dir != Some(dir) {
                    cost += TURN_PENALTY;
                }
                cost
            }
        }
    }

    fn reconstruct(&self, goal_index: usize) -> Vec<PathCell> {
        let mut path = Vec::new();
        let mut cursor = Some(goal_index);
        while let Some(index) = cursor {
            let node = &self.nodes[index];
            path.push(PathCell {
                cell: Cell {
                    x: node.x,
                    y: node.y,
                },
                dir: node.dir,
            });
            cursor = node.parent;
        }
        path.reverse();
        path
    }
}

fn manhattan(x: i32, y: i32, goal: Cell) -> i64 {
    i64::from((x - goal.x).abs()) + i64::from((y - goal.y).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::room::insert_room;

    fn arena_of(rects: &[(i32, i32, i32, i32, RoomKind)]) -> (RoomArena, Vec<RoomId>) {
        let mut arena = RoomArena::with_key();
        let ids = rects
            .iter()
            .map(|&(x, y, width, height, kind)| {
                insert_room(&mut arena, x, y, width, height, kind)
            })
            .collect();
        (arena, ids)
    }

    fn cells(path: &[PathCell]) -> Vec<(i32, i32)> {
        path.iter().map(|step| (step.cell.x, step.cell.y)).collect()
    }

    #[test]
    fn aligned_rooms_route_straight() {
        let (arena, ids) = arena_of(&[
            (0, 0, 2, 2, RoomKind::Chamber),
            (10, 0, 2, 2, RoomKind::Chamber),
        ]);
        let grid = Grid::from_arena(&arena);
        let path = route_between(&grid, &arena, ids[0], ids[1]).expect("route exists");
        let steps = cells(&path);
        assert_eq!(steps.first(), Some(&(1, 1)));
        assert_eq!(steps.last(), Some(&(11, 1)));
        assert_eq!(steps.len(), 11, "straight line from (1,1) to (11,1)");
        assert!(steps.iter().all(|&(_, y)| y == 1), "route left the y=1 line");
        assert_eq!(path[0].dir, None, "start cell carries no direction");
    }

    #[test]
    fn route_to_the_same_room_is_a_single_cell() {
        let (arena, ids) = arena_of(&[(0, 0, 3, 3, RoomKind::Chamber)]);
        let grid = Grid::from_arena(&arena);
        let path = route_between(&grid, &arena, ids[0], ids[0]).expect("trivial route");
        assert_eq!(cells(&path), vec![(1, 1)]);
        assert_eq!(path[0].dir, None);
    }

    #[test]
    fn existing_corridors_attract_the_route() {
        // A corridor already runs along y=6 between the two chambers. The
        // free ride beats the shorter empty-ground line.
        let (arena, ids) = arena_of(&[
            (0, 0, 2, 2, RoomKind::Chamber),
            (8, 6, 2, 2, RoomKind::Chamber),
            (0, 6, 8, 2, RoomKind::Corridor),
        ]);
        let grid = Grid::from_arena(&arena);
        let path = route_between(&grid, &arena, ids[0], ids[1]).expect("route exists");
        let steps = cells(&path);
        assert!(
            steps.contains(&(5, 6)),
            "route skipped the corridor: {steps:?}"
        );
        assert_eq!(steps.last(), Some(&(9, 7)));
    }

    #[test]
    fn unrelated_rooms_are_detoured_around() {
        let (arena, ids) = arena_of(&[
            (0, 0, 2, 2, RoomKind::Chamber),
            (10, 0, 2, 2, RoomKind::Chamber),
            (4, -2, 3, 6, RoomKind::Chamber),
        ]);
        let grid = Grid::from_arena(&arena);
        let path = route_between(&grid, &arena, ids[0], ids[1]).expect("route exists");
        for step in &path {
            assert_ne!(
                grid.owner(step.cell.x, step.cell.y),
                Some(ids[2]),
                "route crossed the unrelated room at {:?}",
                step.cell
            );
        }
        let steps = cells(&path);
        assert_eq!(steps.first(), Some(&(1, 1)));
        assert_eq!(steps.last(), Some(&(11, 1)));
    }

    #[test]
    fn consecutive_path_cells_are_adjacent() {
        let (arena, ids) = arena_of(&[
            (0, 0, 3, 3, RoomKind::Chamber),
            (9, 7, 4, 3, RoomKind::Chamber),
        ]);
        let grid = Grid::from_arena(&arena);
        let path = route_between(&grid, &arena, ids[0], ids[1]).expect("route exists");
        for pair in path.windows(2) {
            let dx = (pair[1].cell.x - pair[0].cell.x).abs();
            let dy = (pair[1].cell.y - pair[0].cell.y).abs();
            assert_eq!(dx + dy, 1, "non-adjacent steps {pair:?}");
            assert!(pair[1].dir.is_some(), "non-start cell missing a direction");
        }
    }
}
