//! World generation and management modules
//! Contains noise sampling, terrain generation, and the chunk grid.

pub mod generator;
pub mod grid;
pub mod noise;

// Re-export commonly used types
pub use generator::{ColumnHeights, TerrainGenerator};
pub use grid::{ChunkView, WorldGrid, WorldStats};
pub use noise::NoiseField;
