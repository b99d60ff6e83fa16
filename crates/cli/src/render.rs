//! ASCII projection of a finished layout.

use warren_core::{Cell, Dungeon, RoomKind};

const EMPTY_GLYPH: char = ' ';
const CHAMBER_GLYPH: char = '.';
const CORRIDOR_GLYPH: char = ',';
const WALL_GLYPH: char = '#';

/// Rows come out top-down with the highest y first, so north is up.
/// Trailing spaces are trimmed per row.
pub fn render_ascii(dungeon: &Dungeon) -> String {
    let Some((min, max)) = dungeon.bounds() else {
        return String::new();
    };
    let width = (max.x - min.x) as usize;
    let height = (max.y - min.y) as usize;
    let mut glyphs = vec![EMPTY_GLYPH; width * height];

    for room in &dungeon.rooms {
        let glyph = match room.kind {
            RoomKind::Chamber => CHAMBER_GLYPH,
            RoomKind::Corridor => CORRIDOR_GLYPH,
        };
        for y in room.y..room.max_y() {
            for x in room.x..room.max_x() {
                glyphs[index(min, width, x, y)] = glyph;
            }
        }
    }
    for wall in &dungeon.walls {
        glyphs[index(min, width, wall.x, wall.y)] = WALL_GLYPH;
    }

    let mut out = String::with_capacity((width + 1) * height);
    for row in (0..height).rev() {
        let line: String = glyphs[row * width..(row + 1) * width].iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn index(min: Cell, width: usize, x: i32, y: i32) -> usize {
    (y - min.y) as usize * width + (x - min.x) as usize
}

#[cfg(test)]
mod tests {
    use warren_core::{Room, RoomId};

    use super::*;

    fn chamber(x: i32, y: i32, width: i32, height: i32) -> Room {
        Room {
            id: RoomId::default(),
            x,
            y,
            width,
            height,
            kind: RoomKind::Chamber,
        }
    }

    fn ring_of(room: &Room) -> Vec<Cell> {
        let mut walls = Vec::new();
        for x in (room.x - 1)..=room.max_x() {
            walls.push(Cell { x, y: room.y - 1 });
            walls.push(Cell { x, y: room.max_y() });
        }
        for y in room.y..room.max_y() {
            walls.push(Cell { x: room.x - 1, y });
            walls.push(Cell { x: room.max_x(), y });
        }
        walls
    }

    #[test]
    fn empty_record_renders_empty() {
        let dungeon = Dungeon {
            seed: 0,
            cell_size: 1.0,
            rooms: Vec::new(),
            walls: Vec::new(),
        };
        assert_eq!(render_ascii(&dungeon), "");
    }

    #[test]
    fn ringed_chamber_renders_as_a_boxed_floor() {
        let room = chamber(0, 0, 3, 2);
        let walls = ring_of(&room);
        let dungeon = Dungeon {
            seed: 0,
            cell_size: 1.0,
            rooms: vec![room],
            walls,
        };
        assert_eq!(render_ascii(&dungeon), "#####\n#...#\n#...#\n#####\n");
    }

    #[test]
    fn corridors_use_their_own_glyph() {
        let dungeon = Dungeon {
            seed: 0,
            cell_size: 1.0,
            rooms: vec![
                chamber(0, 0, 2, 1),
                Room {
                    id: RoomId::default(),
                    x: 2,
                    y: 0,
                    width: 3,
                    height: 1,
                    kind: RoomKind::Corridor,
                },
            ],
            walls: Vec::new(),
        };
        assert_eq!(render_ascii(&dungeon), "..,,,\n");
    }

    #[test]
    fn north_is_up() {
        // Two single-cell rooms stacked vertically; the higher y renders
        // first.
        let dungeon = Dungeon {
            seed: 0,
            cell_size: 1.0,
            rooms: vec![chamber(0, 0, 1, 1), chamber(1, 1, 1, 1)],
            walls: Vec::new(),
        };
        assert_eq!(render_ascii(&dungeon), " .\n.\n");
    }
}
