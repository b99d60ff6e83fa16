pub mod config;
pub mod error;
pub mod generator;
pub mod graph;
pub mod model;
pub mod room;
pub mod triangulate;
pub mod types;

mod corridor;
mod grid;
mod layout;
mod pathfind;
mod seed;

pub use config::{ConfigError, GenConfig, MAX_DIMENSION_LIMIT};
pub use error::GenerationError;
pub use generator::{DungeonGenerator, Phase, StepOutcome, generate};
pub use graph::{RoomGraph, minimum_spanning_tree};
pub use model::Dungeon;
pub use room::{ROOM_BUFFER, Room, RoomArena};
pub use triangulate::{DelaunayTriangulator, Point, Triad, Triangulator};
pub use types::*;
