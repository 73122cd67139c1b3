// World constants
pub const DEFAULT_CHUNK_SIZE: usize = 32;
pub const DEFAULT_WORLD_SIZE_X: u32 = 7;
pub const DEFAULT_WORLD_SIZE_Y: u32 = 4;
pub const DEFAULT_WORLD_SIZE_Z: u32 = 7;
pub const DEFAULT_SEED: i32 = 2137;
// Inclusive: blocks at this height are still water.
pub const WATER_LEVEL: i32 = 65;

// Height layers
pub const SURFACE_MAX_HEIGHT: f32 = 150.0;
pub const SURFACE_SMOOTH: f32 = 0.01;
pub const SURFACE_OCTAVES: u32 = 4;
pub const STONE_MAX_HEIGHT: f32 = 145.0;
pub const STONE_SMOOTH: f32 = 0.02;
pub const STONE_OCTAVES: u32 = 5;
pub const BEDROCK_MAX_HEIGHT: f32 = 5.0;
pub const BEDROCK_SMOOTH: f32 = 0.08;
pub const BEDROCK_OCTAVES: u32 = 2;
pub const HEIGHT_PERSISTENCE: f32 = 0.5;

// Density thresholds (compared against [0, 1] fractal noise, not percentages)
pub const CAVE_PROBABILITY: f32 = 0.43;
pub const CAVE_SMOOTH: f32 = 0.09;
pub const CAVE_OCTAVES: u32 = 3;

pub const DIAMOND_PROBABILITY: f32 = 0.38;
pub const DIAMOND_SMOOTH: f32 = 0.06;
pub const DIAMOND_OCTAVES: u32 = 3;
pub const DIAMOND_MAX_HEIGHT: i32 = 50;

pub const REDSTONE_PROBABILITY: f32 = 0.41;
pub const REDSTONE_SMOOTH: f32 = 0.06;
pub const REDSTONE_OCTAVES: u32 = 3;
pub const REDSTONE_MAX_HEIGHT: i32 = 30;

pub const WOODBASE_PROBABILITY: f32 = 0.36;
pub const WOODBASE_SMOOTH: f32 = 0.4;
pub const WOODBASE_OCTAVES: u32 = 2;

// Tree shape, relative to the woodbase block
pub const TRUNK_HEIGHT: i32 = 2;
pub const CANOPY_LAYERS: i32 = 2;
pub const CANOPY_RADIUS: i32 = 1;

// Save format
pub const CHUNK_FILE_EXTENSION: &str = "vxc";
pub const DEFAULT_CONFIG_FILE: &str = "world.toml";
