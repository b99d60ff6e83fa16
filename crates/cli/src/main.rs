use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use warren_core::{Dungeon, GenConfig, generate};

mod render;
mod seed;

/// Generate a seeded dungeon layout and print or export it.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generation seed; omitted means a fresh random layout
    #[arg(long)]
    seed: Option<u64>,

    /// Number of chambers to place
    #[arg(long, default_value_t = 12)]
    rooms: u32,

    /// Half-extent of the placement square, in cells
    #[arg(long, default_value_t = 30)]
    max_dimension: i32,

    /// Smallest room edge, in cells
    #[arg(long, default_value_t = 4)]
    min_room_size: i32,

    /// Room edges are drawn below this bound
    #[arg(long, default_value_t = 10)]
    max_room_size: i32,

    /// Lower bound on the extra-link fraction
    #[arg(long, default_value_t = 0.1)]
    min_extra_links: f32,

    /// Upper bound on the extra-link fraction
    #[arg(long, default_value_t = 0.25)]
    max_extra_links: f32,

    /// World units per grid cell in the exported record
    #[arg(long, default_value_t = 1.0)]
    cell_size: f32,

    /// Write the dungeon as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Skip the ASCII map
    #[arg(long)]
    no_map: bool,
}

impl Args {
    fn config(&self) -> GenConfig {
        GenConfig {
            room_count: self.rooms,
            max_dimension: self.max_dimension,
            min_room_size: self.min_room_size,
            max_room_size: self.max_room_size,
            min_extra_links: self.min_extra_links,
            max_extra_links: self.max_extra_links,
            cell_size: self.cell_size,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(seed::generate_runtime_seed);

    let dungeon = generate(&args.config(), seed)
        .with_context(|| format!("generation failed for seed {seed}"))?;

    if !args.no_map {
        print!("{}", render::render_ascii(&dungeon));
    }
    println!(
        "seed {seed}: {} chambers, {} corridors, {} wall cells, layout hash {:016x}",
        dungeon.chambers().count(),
        dungeon.corridors().count(),
        dungeon.walls.len(),
        dungeon.layout_hash()
    );

    if let Some(path) = args.json.as_deref() {
        write_json(path, &dungeon)?;
        println!("wrote {}", path.display());
    }

    Ok(())
}

fn write_json(path: &Path, dungeon: &Dungeon) -> Result<()> {
    let payload =
        serde_json::to_string_pretty(dungeon).context("failed to serialize the dungeon")?;
    fs::write(path, payload).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_map_onto_the_generation_config() {
        let args = Args::try_parse_from([
            "warren",
            "--seed",
            "7",
            "--rooms",
            "6",
            "--max-dimension",
            "20",
            "--min-room-size",
            "3",
            "--max-room-size",
            "8",
            "--min-extra-links",
            "0.2",
            "--max-extra-links",
            "0.4",
            "--cell-size",
            "2.5",
        ])
        .expect("flags parse");
        assert_eq!(args.seed, Some(7));
        let config = args.config();
        assert_eq!(config.room_count, 6);
        assert_eq!(config.max_dimension, 20);
        assert_eq!(config.min_room_size, 3);
        assert_eq!(config.max_room_size, 8);
        assert_eq!(config.min_extra_links, 0.2);
        assert_eq!(config.max_extra_links, 0.4);
        assert_eq!(config.cell_size, 2.5);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn defaults_form_a_valid_config() {
        let args = Args::try_parse_from(["warren"]).expect("no flags needed");
        assert_eq!(args.seed, None);
        assert!(!args.no_map);
        assert_eq!(args.config(), GenConfig::default());
    }

    #[test]
    fn exported_json_round_trips() {
        let config = GenConfig {
            room_count: 4,
            max_dimension: 14,
            min_room_size: 3,
            max_room_size: 6,
            ..GenConfig::default()
        };
        let dungeon = match generate(&config, 51) {
            Ok(dungeon) => dungeon,
            // Degenerate layouts abort cleanly; nothing to export then.
            Err(_) => return,
        };

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("dungeon.json");
        write_json(&path, &dungeon).expect("export succeeds");

        let payload = fs::read_to_string(&path).expect("file readable");
        let parsed: Dungeon = serde_json::from_str(&payload).expect("payload parses");
        assert_eq!(parsed, dungeon);
    }
}
