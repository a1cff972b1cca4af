//! Inspect and generate grass field files.
//!
//! Usage:
//!   grass_tool scatter --out meadow.vgf [--config grass.json] [--extent 32] [--seed 7]
//!   grass_tool stats meadow.vgf [--config grass.json]
//!   grass_tool rechunk meadow.vgf 8 [--config grass.json]

use std::path::{Path, PathBuf};
use std::time::Instant;

use glam::Vec3;
use verdant::core::Result;
use verdant::grass::{GrassConfig, GrassField};

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  grass_tool scatter --out <file> [--config <json>] [--extent <m>] [--seed <n>]");
    eprintln!("  grass_tool stats <file> [--config <json>]");
    eprintln!("  grass_tool rechunk <file> <chunk_size> [--config <json>]");
    std::process::exit(2);
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn load_config(args: &[String]) -> Result<GrassConfig> {
    match flag(args, "--config") {
        Some(path) => GrassConfig::load_sync(Path::new(path)),
        None => Ok(GrassConfig::default()),
    }
}

/// Gentle rolling ground so scattered fields are not perfectly flat
fn rolling_ground(x: f32, z: f32) -> Option<f32> {
    Some((x * 0.15).sin() * 0.8 + (z * 0.11).cos() * 0.6)
}

fn scatter(args: &[String]) -> Result<()> {
    let Some(out) = flag(args, "--out") else { usage() };
    let mut config = load_config(args)?;
    let extent: f32 = flag(args, "--extent").and_then(|v| v.parse().ok()).unwrap_or(32.0);
    if let Some(seed) = flag(args, "--seed").and_then(|v| v.parse().ok()) {
        config.brush.seed = seed;
    }

    let mut field = GrassField::new(config);
    let step = field.brush().radius.max(0.5);
    let start = Instant::now();
    let mut strokes = 0usize;

    let mut z = -extent;
    while z <= extent {
        let mut x = -extent;
        while x <= extent {
            if let Some(y) = rolling_ground(x, z) {
                field.stroke(Vec3::new(x, y, z), &rolling_ground);
                strokes += 1;
            }
            x += step;
        }
        z += step;
    }

    println!(
        "Scattered {} points with {} strokes in {:.2}s",
        field.index().point_count(), strokes, start.elapsed().as_secs_f64()
    );
    field.save_to_file(Path::new(out))
}

fn stats(args: &[String]) -> Result<()> {
    let Some(path) = args.get(1).map(PathBuf::from) else { usage() };
    let field = GrassField::load_from_file(&path, load_config(args)?)?;
    let index = field.index();

    println!("=== {} ===", path.display());
    println!("Chunk size:   {:?}", index.layout().size());
    println!("Points:       {}", index.point_count());
    println!("Chunks:       {}", index.chunk_count());
    if index.chunk_count() > 0 {
        let bounds = index.total_bounds();
        let largest = index.chunks().map(|(_, p)| p.len()).max().unwrap_or(0);
        println!("Bounds:       {:?} .. {:?}", bounds.min, bounds.max);
        println!("Avg/chunk:    {:.1}", index.point_count() as f64 / index.chunk_count() as f64);
        println!("Max/chunk:    {}", largest);
    }
    Ok(())
}

fn rechunk(args: &[String]) -> Result<()> {
    let (Some(path), Some(size)) = (args.get(1), args.get(2).and_then(|s| s.parse::<f32>().ok())) else {
        usage()
    };
    let path = PathBuf::from(path);
    let mut config = load_config(args)?;
    config.chunk_size = [size; 3];

    let mut field = GrassField::load_from_file(&path, config)?;
    println!(
        "Rechunked to {:?}: {} points in {} chunks",
        field.index().layout().size(), field.index().point_count(), field.index().chunk_count()
    );
    field.save_to_file(&path)
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("scatter") => scatter(&args),
        Some("stats") => stats(&args),
        Some("rechunk") => rechunk(&args),
        _ => usage(),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
