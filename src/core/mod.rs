//! Core data structures for the world
//! Contains blocks, faces, chunks, and the vertex layout.

pub mod block;
pub mod chunk;
pub mod face;
pub mod vertex;

// Re-export commonly used types
pub use block::{Block, BlockType};
pub use chunk::{BlockGrid, Chunk, ChunkCoord, ChunkStatus, GenerationStage};
pub use face::Face;
pub use vertex::Vertex;
