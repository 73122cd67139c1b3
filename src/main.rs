//! Voxel world generator
//!
//! Generates (or restores) the configured world, meshes it and optionally
//! writes every chunk back to disk.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use directories::ProjectDirs;

use voxelgen::{ChunkStore, DEFAULT_CONFIG_FILE, WorldGrid, WorldSettings};

/// Chunked voxel terrain generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World settings file (TOML). Defaults to ./world.toml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding chunk records; saved chunks there are restored
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Override the world seed
    #[arg(long)]
    seed: Option<i32>,

    /// Write every chunk to the save directory after meshing
    #[arg(long, default_value_t = false)]
    save: bool,

    /// Override the chunk edge length in blocks
    #[arg(long)]
    size: Option<usize>,
}

fn load_settings(args: &Args) -> Result<WorldSettings, voxelgen::ConfigError> {
    let mut settings = match &args.config {
        Some(path) => WorldSettings::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            WorldSettings::load(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => WorldSettings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(size) = args.size {
        settings.chunk_size = size;
    }
    Ok(settings)
}

fn default_save_dir() -> PathBuf {
    ProjectDirs::from("", "", "voxelgen")
        .map(|dirs| dirs.data_dir().join("chunks"))
        .unwrap_or_else(|| PathBuf::from("chunks"))
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = load_settings(&args)?;
    tracing::info!(
        "World {}x{}x{} chunks of {} blocks, seed {}",
        settings.world_size.x,
        settings.world_size.y,
        settings.world_size.z,
        settings.chunk_size,
        settings.seed
    );

    let store = match (&args.save_dir, args.save) {
        (Some(dir), _) => Some(ChunkStore::new(dir)),
        (None, true) => Some(ChunkStore::new(default_save_dir())),
        (None, false) => None,
    };

    let mut world = WorldGrid::new(settings, store)?;
    world.generate()?;
    world.mesh();

    let stats = world.stats();
    tracing::info!(
        "{} chunks ({} restored), {} solid quads, {} fluid quads",
        stats.chunks,
        stats.restored,
        stats.solid_quads,
        stats.fluid_quads
    );

    if args.save {
        world.save_all()?;
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
