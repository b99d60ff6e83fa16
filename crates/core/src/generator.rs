//! Phase-driven pipeline from seed and parameters to a finished dungeon.

use crate::config::{ConfigError, GenConfig};
use crate::corridor::{carve_corridors, raise_walls};
use crate::error::GenerationError;
use crate::graph::{AugmentStep, LinkAugmenter, RoomGraph, SpanningTreeBuilder, TreeStep};
use crate::grid::Grid;
use crate::layout::{PassOutcome, Separator, place_room};
use crate::model::Dungeon;
use crate::pathfind::route_between;
use crate::room::{Room, RoomArena};
use crate::seed::GenRng;
use crate::triangulate::{DelaunayTriangulator, Point, Triad, Triangulator};
use crate::types::{Cell, RoomId};

/// Pipeline stages in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    PlaceRooms,
    SeparateRooms,
    Triangulate,
    BuildGraph,
    GrowSpanningTree,
    AddExtraLinks,
    BuildGrid,
    CarveCorridors,
    RaiseWalls,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// One unit of the named phase ran.
    Progressed { phase: Phase },
    /// Everything is built; [`DungeonGenerator::into_dungeon`] will yield
    /// the record.
    Finished,
}

enum PhaseState {
    PlaceRooms,
    SeparateRooms {
        separator: Separator,
    },
    Triangulate,
    BuildGraph {
        point_ids: Vec<RoomId>,
        triads: Vec<Triad>,
    },
    GrowSpanningTree {
        builder: SpanningTreeBuilder,
    },
    AddExtraLinks {
        augmenter: LinkAugmenter,
    },
    BuildGrid,
    CarveCorridors {
        edges: Vec<(RoomId, RoomId)>,
        next: usize,
    },
    RaiseWalls {
        order: Vec<RoomId>,
        next: usize,
    },
    Finished,
}

/// Cooperative dungeon builder. Each [`step`](Self::step) runs one unit of
/// work, small enough to interleave with a frame loop or progress UI;
/// [`run`](Self::run) drives the whole pipeline in one call. All randomness
/// comes from the seed, so equal seed and config always rebuild the same
/// dungeon. A failed step abandons the run; retries are fresh generators
/// with a new seed.
pub struct DungeonGenerator {
    config: GenConfig,
    seed: u64,
    triangulator: Box<dyn Triangulator>,
    placement_rng: GenRng,
    links_rng: GenRng,
    rooms: RoomArena,
    full_graph: RoomGraph,
    link_graph: RoomGraph,
    grid: Option<Grid>,
    walls: Vec<Cell>,
    state: PhaseState,
}

impl DungeonGenerator {
    pub fn new(config: GenConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_triangulator(config, seed, Box::new(DelaunayTriangulator))
    }

    /// Same pipeline with a caller-supplied triangulation collaborator.
    pub fn with_triangulator(
        config: GenConfig,
        seed: u64,
        triangulator: Box<dyn Triangulator>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            placement_rng: GenRng::placement_stream(seed),
            links_rng: GenRng::links_stream(seed),
            config,
            seed,
            triangulator,
            rooms: RoomArena::with_key(),
            full_graph: RoomGraph::new(),
            link_graph: RoomGraph::new(),
            grid: None,
            walls: Vec::new(),
            state: PhaseState::PlaceRooms,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            PhaseState::PlaceRooms => Phase::PlaceRooms,
            PhaseState::SeparateRooms { .. } => Phase::SeparateRooms,
            PhaseState::Triangulate => Phase::Triangulate,
            PhaseState::BuildGraph { .. } => Phase::BuildGraph,
            PhaseState::GrowSpanningTree { .. } => Phase::GrowSpanningTree,
            PhaseState::AddExtraLinks { .. } => Phase::AddExtraLinks,
            PhaseState::BuildGrid => Phase::BuildGrid,
            PhaseState::CarveCorridors { .. } => Phase::CarveCorridors,
            PhaseState::RaiseWalls { .. } => Phase::RaiseWalls,
            PhaseState::Finished => Phase::Finished,
        }
    }

    /// Rooms placed so far, corridors included once carving starts.
    pub fn rooms(&self) -> &RoomArena {
        &self.rooms
    }

    /// Wall cells raised so far.
    pub fn walls(&self) -> &[Cell] {
        &self.walls
    }

    /// The triangulation-backed graph, empty until the build-graph phase.
    pub fn full_graph(&self) -> &RoomGraph {
        &self.full_graph
    }

    /// The spanning tree plus extra links, empty until tree growth finishes.
    pub fn link_graph(&self) -> &RoomGraph {
        &self.link_graph
    }

    /// Run one unit of pipeline work.
    pub fn step(&mut self) -> Result<StepOutcome, GenerationError> {
        match &mut self.state {
            PhaseState::PlaceRooms => {
                place_room(&self.config, &mut self.placement_rng, &mut self.rooms);
                if self.rooms.len() as u32 == self.config.room_count {
                    self.state = PhaseState::SeparateRooms {
                        separator: Separator::new(&self.rooms),
                    };
                }
                Ok(StepOutcome::Progressed {
                    phase: Phase::PlaceRooms,
                })
            }
            PhaseState::SeparateRooms { separator } => {
                if separator.pass(&mut self.rooms)? == PassOutcome::Settled {
                    self.state = PhaseState::Triangulate;
                }
                Ok(StepOutcome::Progressed {
                    phase: Phase::SeparateRooms,
                })
            }
            PhaseState::Triangulate => {
                let point_ids: Vec<RoomId> = self.rooms.keys().collect();
                let points: Vec<Point> = point_ids
                    .iter()
                    .map(|&id| {
                        let (x, y) = self.rooms[id].center();
                        Point { x, y }
                    })
                    .collect();
                let triads = self.triangulator.triangulate(&points);
                self.state = PhaseState::BuildGraph { point_ids, triads };
                Ok(StepOutcome::Progressed {
                    phase: Phase::Triangulate,
                })
            }
            PhaseState::BuildGraph { point_ids, triads } => {
                self.full_graph = RoomGraph::from_triangulation(point_ids, triads)?;
                self.state = PhaseState::GrowSpanningTree {
                    builder: SpanningTreeBuilder::new(&self.full_graph),
                };
                Ok(StepOutcome::Progressed {
                    phase: Phase::BuildGraph,
                })
            }
            PhaseState::GrowSpanningTree { builder } => {
                if builder.step(&self.full_graph, &self.rooms)? == TreeStep::Complete {
                    self.link_graph = builder.take_tree();
                    self.state = PhaseState::AddExtraLinks {
                        augmenter: LinkAugmenter::new(
                            &self.full_graph,
                            &self.link_graph,
                            self.config.min_extra_links,
                            self.config.max_extra_links,
                        ),
                    };
                }
                Ok(StepOutcome::Progressed {
                    phase: Phase::GrowSpanningTree,
                })
            }
            PhaseState::AddExtraLinks { augmenter } => {
                let outcome =
                    augmenter.step(&self.full_graph, &mut self.link_graph, &mut self.links_rng)?;
                if outcome == AugmentStep::Complete {
                    self.state = PhaseState::BuildGrid;
                }
                Ok(StepOutcome::Progressed {
                    phase: Phase::AddExtraLinks,
                })
            }
            PhaseState::BuildGrid => {
                self.grid = Some(Grid::from_arena(&self.rooms));
                self.state = PhaseState::CarveCorridors {
                    edges: link_edges(&self.link_graph),
                    next: 0,
                };
                Ok(StepOutcome::Progressed {
                    phase: Phase::BuildGrid,
                })
            }
            PhaseState::CarveCorridors { edges, next } => {
                if *next < edges.len() {
                    let (from, to) = edges[*next];
                    *next += 1;
                    let grid = self.grid.as_mut().expect("grid is built before corridors");
                    let path = route_between(grid, &self.rooms, from, to)?;
                    carve_corridors(&path, &mut self.rooms, grid);
                } else {
                    self.state = PhaseState::RaiseWalls {
                        order: self.rooms.keys().collect(),
                        next: 0,
                    };
                }
                Ok(StepOutcome::Progressed {
                    phase: Phase::CarveCorridors,
                })
            }
            PhaseState::RaiseWalls { order, next } => {
                if *next < order.len() {
                    let id = order[*next];
                    *next += 1;
                    let grid = self.grid.as_mut().expect("grid is built before walls");
                    raise_walls(id, &self.rooms, grid, &mut self.walls);
                } else {
                    self.state = PhaseState::Finished;
                }
                Ok(StepOutcome::Progressed {
                    phase: Phase::RaiseWalls,
                })
            }
            PhaseState::Finished => Ok(StepOutcome::Finished),
        }
    }

    /// Drive every remaining phase and emit the record.
    pub fn run(mut self) -> Result<Dungeon, GenerationError> {
        while self.step()? != StepOutcome::Finished {}
        Ok(self.finish())
    }

    /// The finished record, or `None` while phases remain.
    pub fn into_dungeon(self) -> Option<Dungeon> {
        if let PhaseState::Finished = self.state {
            Some(self.finish())
        } else {
            None
        }
    }

    fn finish(self) -> Dungeon {
        let mut rooms: Vec<Room> = self.rooms.into_iter().map(|(_, room)| room).collect();
        rooms.sort_by_key(|room| room.id);
        Dungeon {
            seed: self.seed,
            cell_size: self.config.cell_size,
            rooms,
            walls: self.walls,
        }
    }
}

/// Each undirected link once, routed from the higher room id to the lower.
fn link_edges(graph: &RoomGraph) -> Vec<(RoomId, RoomId)> {
    let mut edges = Vec::new();
    for from in graph.nodes() {
        for &to in graph.neighbors(from) {
            if from > to {
                edges.push((from, to));
            }
        }
    }
    edges
}

/// Generate a complete dungeon in one call.
pub fn generate(config: &GenConfig, seed: u64) -> Result<Dungeon, GenerationError> {
    DungeonGenerator::new(config.clone(), seed)?.run()
}
