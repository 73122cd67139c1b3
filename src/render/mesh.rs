//! Face-culled chunk meshing.
//!
//! Each visible block face becomes one quad. Quads are collected per block
//! and then merged into a single vertex/index buffer per batch, so a chunk
//! hands the renderer exactly two draws: solid terrain and fluid.

use glam::{IVec3, Vec3};

use crate::core::block::BlockType;
use crate::core::face::Face;
use crate::core::vertex::Vertex;
use crate::world::grid::ChunkView;

/// Triangle list geometry for one batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Appends `other`, shifting its indices past the vertices already present.
    pub fn append(&mut self, other: &MeshData) {
        let base_idx = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices
            .extend(other.indices.iter().map(|index| index + base_idx));
    }

    /// Concatenates many small meshes into one buffer.
    pub fn combine<'a>(parts: impl IntoIterator<Item = &'a MeshData>) -> MeshData {
        let mut combined = MeshData::default();
        for part in parts {
            combined.append(part);
        }
        combined
    }
}

/// The two geometry batches produced for a chunk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub solid: MeshData,
    pub fluid: MeshData,
}

impl ChunkMesh {
    pub fn quad_count(&self) -> usize {
        self.solid.quad_count() + self.fluid.quad_count()
    }
}

pub fn add_quad(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    corners: [Vec3; 4],
    normal: Vec3,
) {
    const UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let base_idx = vertices.len() as u32;
    for (corner, uv) in corners.iter().zip(UVS) {
        vertices.push(Vertex {
            position: corner.to_array(),
            normal: normal.to_array(),
            uv,
        });
    }
    indices.extend_from_slice(&[
        base_idx,
        base_idx + 1,
        base_idx + 2,
        base_idx,
        base_idx + 2,
        base_idx + 3,
    ]);
}

/// Quads for the visible faces of one block, positioned in world space.
///
/// A face is visible when the neighbouring block exists and the block type
/// rules allow it. Missing neighbours (outside the world) count as opaque.
fn block_quads(view: &ChunkView, local: IVec3, block: BlockType) -> MeshData {
    let mut mesh = MeshData::default();
    let min_corner = (view.chunk().origin() + local).as_vec3();

    for face in Face::ALL {
        let visible = view
            .neighbor_block(local, face)
            .is_some_and(|neighbor| block.should_render_face_against(neighbor));
        if !visible {
            continue;
        }
        let corners = face.corners().map(|corner| min_corner + corner);
        add_quad(&mut mesh.vertices, &mut mesh.indices, corners, face.normal());
    }

    mesh
}

/// Builds the solid and fluid batches for the chunk at the centre of `view`.
pub fn build_chunk_mesh(view: &ChunkView) -> ChunkMesh {
    let mut solid_parts = Vec::new();
    let mut fluid_parts = Vec::new();
    let grid = view.chunk().grid();

    for (local, &block) in grid.positions().zip(grid.as_slice()) {
        if block == BlockType::Air {
            continue;
        }
        let quads = block_quads(view, local, block);
        if quads.is_empty() {
            continue;
        }
        if block.is_fluid() {
            fluid_parts.push(quads);
        } else {
            solid_parts.push(quads);
        }
    }

    ChunkMesh {
        solid: MeshData::combine(&solid_parts),
        fluid: MeshData::combine(&fluid_parts),
    }
}
