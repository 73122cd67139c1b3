//! Rendering-related modules
//! Contains face-culled mesh building for chunks.

pub mod mesh;

// Re-export commonly used types
pub use mesh::{ChunkMesh, MeshData, add_quad, build_chunk_mesh};
