// Core module with blocks, chunks and vertex layout
pub mod core;

// Render module with mesh building
pub mod render;

// World module with noise, terrain generation and the chunk grid
pub mod world;

// Configuration
pub mod utils;

// Other modules
pub mod constants;
pub mod error;
pub mod save;

// Re-exports
pub use constants::*;
pub use crate::core::{Block, BlockGrid, BlockType, Chunk, ChunkCoord, ChunkStatus, Face, GenerationStage, Vertex};
pub use error::{ConfigError, PersistenceError};
pub use render::{ChunkMesh, MeshData, add_quad, build_chunk_mesh};
pub use save::{ChunkStore, SavedChunk, decode_blocks, encode_chunk};
pub use utils::settings::{
    DensityLayer, HeightLayer, OreLayer, TerrainSettings, WorldExtent, WorldSettings,
};
pub use world::{ChunkView, NoiseField, TerrainGenerator, WorldGrid, WorldStats};
