//! The emitted dungeon record and its stable fingerprint.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::room::Room;
use crate::types::{Cell, RoomKind};

/// Everything a consumer needs to reproduce or render a generated layout.
/// Positions and sizes are in cells; multiply by `cell_size` for world
/// units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    /// The seed the layout was built from.
    pub seed: u64,
    /// World units per cell, carried through from the config.
    pub cell_size: f32,
    /// Every room of the run in id order, carved corridors included.
    pub rooms: Vec<Room>,
    /// Wall cells in the order they were raised.
    pub walls: Vec<Cell>,
}

impl Dungeon {
    pub fn chambers(&self) -> impl Iterator<Item = &Room> {
        self.rooms
            .iter()
            .filter(|room| room.kind == RoomKind::Chamber)
    }

    pub fn corridors(&self) -> impl Iterator<Item = &Room> {
        self.rooms
            .iter()
            .filter(|room| room.kind == RoomKind::Corridor)
    }

    /// Bounding box over rooms and walls: minimum cell, then exclusive
    /// maximum. `None` for an empty record.
    pub fn bounds(&self) -> Option<(Cell, Cell)> {
        if self.rooms.is_empty() && self.walls.is_empty() {
            return None;
        }
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for room in &self.rooms {
            min_x = min_x.min(room.x);
            min_y = min_y.min(room.y);
            max_x = max_x.max(room.max_x());
            max_y = max_y.max(room.max_y());
        }
        for wall in &self.walls {
            min_x = min_x.min(wall.x);
            min_y = min_y.min(wall.y);
            max_x = max_x.max(wall.x + 1);
            max_y = max_y.max(wall.y + 1);
        }
        Some((
            Cell { x: min_x, y: min_y },
            Cell { x: max_x, y: max_y },
        ))
    }

    /// Stable little-endian encoding of the layout geometry. The seed and
    /// cell size are left out on purpose: equal bytes mean equal layouts.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for (ordinal, room) in self.rooms.iter().enumerate() {
            bytes.extend((ordinal as u32).to_le_bytes());
            bytes.extend(room.x.to_le_bytes());
            bytes.extend(room.y.to_le_bytes());
            bytes.extend(room.width.to_le_bytes());
            bytes.extend(room.height.to_le_bytes());
            bytes.push(match room.kind {
                RoomKind::Chamber => 0,
                RoomKind::Corridor => 1,
            });
        }
        bytes.extend((self.walls.len() as u32).to_le_bytes());
        for wall in &self.walls {
            bytes.extend(wall.x.to_le_bytes());
            bytes.extend(wall.y.to_le_bytes());
        }
        bytes
    }

    /// xxh3 of [`canonical_bytes`](Self::canonical_bytes), handy for quick
    /// layout comparison in logs.
    pub fn layout_hash(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoomId;

    fn record() -> Dungeon {
        Dungeon {
            seed: 9,
            cell_size: 1.5,
            rooms: vec![
                Room {
                    id: RoomId::default(),
                    x: -2,
                    y: 0,
                    width: 4,
                    height: 3,
                    kind: RoomKind::Chamber,
                },
                Room {
                    id: RoomId::default(),
                    x: 5,
                    y: 1,
                    width: 3,
                    height: 1,
                    kind: RoomKind::Corridor,
                },
            ],
            walls: vec![Cell { x: -3, y: -1 }, Cell { x: 8, y: 2 }],
        }
    }

    #[test]
    fn kind_filters_split_the_room_list() {
        let dungeon = record();
        assert_eq!(dungeon.chambers().count(), 1);
        assert_eq!(dungeon.corridors().count(), 1);
    }

    #[test]
    fn bounds_cover_rooms_and_walls() {
        let (min, max) = record().bounds().expect("non-empty record");
        assert_eq!((min.x, min.y), (-3, -1));
        assert_eq!((max.x, max.y), (9, 3));
    }

    #[test]
    fn empty_record_has_no_bounds() {
        let empty = Dungeon {
            seed: 0,
            cell_size: 1.0,
            rooms: Vec::new(),
            walls: Vec::new(),
        };
        assert_eq!(empty.bounds(), None);
    }

    #[test]
    fn canonical_bytes_track_geometry_not_seed() {
        let dungeon = record();
        let mut reseeded = dungeon.clone();
        reseeded.seed = 1_000;
        reseeded.cell_size = 4.0;
        assert_eq!(dungeon.canonical_bytes(), reseeded.canonical_bytes());
        assert_eq!(dungeon.layout_hash(), reseeded.layout_hash());

        let mut moved = dungeon.clone();
        moved.rooms[0].x += 1;
        assert_ne!(dungeon.canonical_bytes(), moved.canonical_bytes());

        let mut rekinded = dungeon.clone();
        rekinded.rooms[1].kind = RoomKind::Chamber;
        assert_ne!(dungeon.canonical_bytes(), rekinded.canonical_bytes());
    }
}
