use glam::{IVec3, UVec3};
use serde::{Deserialize, Serialize};

use crate::core::block::{Block, BlockType};
use crate::core::face::Face;
use crate::error::PersistenceError;
use crate::render::mesh::ChunkMesh;
use crate::save::ChunkStore;
use crate::world::generator::TerrainGenerator;

/// Integer position of a chunk in the world grid (not in blocks).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        ChunkCoord { x, y, z }
    }

    pub fn offset(self, face: Face) -> Self {
        let step = face.offset();
        ChunkCoord::new(self.x + step.x, self.y + step.y, self.z + step.z)
    }

    pub fn face_neighbors(self) -> [ChunkCoord; 6] {
        Face::ALL.map(|face| self.offset(face))
    }

    /// World-space position of the chunk's minimum corner.
    pub fn origin(self, chunk_size: usize) -> IVec3 {
        IVec3::new(self.x, self.y, self.z) * chunk_size as i32
    }
}

/// Where a chunk is in its mesh lifecycle.
///
/// `NotInitialized -> Created` on the first mesh build, `Created ->
/// NeedToBeRedrawn` on invalidation, back to `Created` on rebuild. `Keep` is
/// terminal and exempts the chunk from redraw sweeps.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ChunkStatus {
    #[default]
    NotInitialized,
    Created,
    NeedToBeRedrawn,
    Keep,
}

/// Where a chunk's block data came from.
///
/// `Empty -> Terrain -> Vegetated` for fresh chunks, `Empty -> Restored` for
/// chunks read back from storage. Trees only grow from `Terrain`, which is what
/// makes vegetation a one-shot pass.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum GenerationStage {
    #[default]
    Empty,
    Terrain,
    Vegetated,
    Restored,
}

/// Dense cube of blocks, indexed `x + n * (y + n * z)`.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockGrid {
    size: usize,
    blocks: Vec<BlockType>,
}

impl BlockGrid {
    pub fn filled(size: usize, block: BlockType) -> Self {
        BlockGrid {
            size,
            blocks: vec![block; size * size * size],
        }
    }

    /// Wraps an existing (z, y, x)-ordered block list. `None` when the length is not `size³`.
    pub fn from_blocks(size: usize, blocks: Vec<BlockType>) -> Option<Self> {
        (blocks.len() == size * size * size).then_some(BlockGrid { size, blocks })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, local: IVec3) -> bool {
        let n = self.size as i32;
        local.cmpge(IVec3::ZERO).all() && local.cmplt(IVec3::splat(n)).all()
    }

    fn index(&self, local: IVec3) -> Option<usize> {
        if !self.contains(local) {
            return None;
        }
        let n = self.size;
        Some(local.x as usize + n * (local.y as usize + n * local.z as usize))
    }

    pub fn get(&self, local: IVec3) -> Option<BlockType> {
        self.index(local).map(|i| self.blocks[i])
    }

    /// Writes a block; returns false (and writes nothing) outside the grid.
    pub fn set(&mut self, local: IVec3, block: BlockType) -> bool {
        match self.index(local) {
            Some(i) => {
                self.blocks[i] = block;
                true
            }
            None => false,
        }
    }

    /// Blocks in storage order: z outermost, x fastest.
    pub fn as_slice(&self) -> &[BlockType] {
        &self.blocks
    }

    pub fn positions(&self) -> impl Iterator<Item = IVec3> + use<> {
        let n = self.size as i32;
        (0..n).flat_map(move |z| (0..n).flat_map(move |y| (0..n).map(move |x| IVec3::new(x, y, z))))
    }
}

pub struct Chunk {
    coord: ChunkCoord,
    origin: IVec3,
    grid: BlockGrid,
    status: ChunkStatus,
    stage: GenerationStage,
    mesh: Option<ChunkMesh>,
}

impl Chunk {
    pub fn new(coord: ChunkCoord, chunk_size: usize) -> Self {
        Chunk {
            coord,
            origin: coord.origin(chunk_size),
            grid: BlockGrid::filled(chunk_size, BlockType::Air),
            status: ChunkStatus::NotInitialized,
            stage: GenerationStage::Empty,
            mesh: None,
        }
    }

    /// Fills the chunk from storage when a record exists, otherwise from the generator.
    ///
    /// Leaves the chunk `NotInitialized`, waiting for its first mesh build.
    pub fn build(
        &mut self,
        generator: &TerrainGenerator,
        store: Option<&ChunkStore>,
    ) -> Result<(), PersistenceError> {
        let saved = match store {
            Some(store) => store.load(self.origin, self.size())?,
            None => None,
        };
        self.build_from(generator, saved);
        Ok(())
    }

    /// Like `build`, with the stored record (if any) already read.
    pub fn build_from(&mut self, generator: &TerrainGenerator, saved: Option<BlockGrid>) {
        match saved {
            Some(grid) => self.restore(grid),
            None => {
                self.generate_terrain(generator);
                self.grow_trees(generator);
            }
        }

        self.status = ChunkStatus::NotInitialized;
        self.mesh = None;
    }

    pub fn generate_terrain(&mut self, generator: &TerrainGenerator) {
        self.grid = generator.generate_blocks(self.origin, self.size());
        self.stage = GenerationStage::Terrain;
    }

    /// Runs the vegetation pass once. Returns whether anything was grown.
    pub fn grow_trees(&mut self, generator: &TerrainGenerator) -> bool {
        if self.stage != GenerationStage::Terrain {
            return false;
        }
        generator.grow_trees(&mut self.grid);
        self.stage = GenerationStage::Vegetated;
        true
    }

    pub fn restore(&mut self, grid: BlockGrid) {
        debug_assert_eq!(grid.size(), self.size());
        self.grid = grid;
        self.stage = GenerationStage::Restored;
    }

    /// Stores a freshly built mesh and marks the chunk as drawn.
    pub fn install_mesh(&mut self, mesh: ChunkMesh) {
        self.mesh = Some(mesh);
        if self.status != ChunkStatus::Keep {
            self.status = ChunkStatus::Created;
        }
    }

    pub fn invalidate(&mut self) {
        if self.status != ChunkStatus::Keep {
            self.status = ChunkStatus::NeedToBeRedrawn;
        }
    }

    pub fn keep(&mut self) {
        self.status = ChunkStatus::Keep;
    }

    pub fn needs_mesh(&self) -> bool {
        !matches!(self.status, ChunkStatus::Created | ChunkStatus::Keep)
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn status(&self) -> ChunkStatus {
        self.status
    }

    pub fn stage(&self) -> GenerationStage {
        self.stage
    }

    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    pub fn grid(&self) -> &BlockGrid {
        &self.grid
    }

    pub fn get_block(&self, local: IVec3) -> Option<BlockType> {
        self.grid.get(local)
    }

    pub fn block(&self, x: u32, y: u32, z: u32) -> Option<Block> {
        let local = UVec3::new(x, y, z);
        self.grid.get(local.as_ivec3()).map(|kind| Block { kind, local })
    }

    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        self.grid
            .positions()
            .zip(self.grid.as_slice().iter().copied())
            .map(|(pos, kind)| Block {
                kind,
                local: pos.as_uvec3(),
            })
    }

    pub(crate) fn set_block(&mut self, local: IVec3, block: BlockType) -> bool {
        self.grid.set(local, block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::settings::WorldSettings;

    fn flat_generator() -> TerrainGenerator {
        let mut settings = WorldSettings::flat(4, 2, 1);
        settings.terrain.woodbase.probability = 1.1;
        TerrainGenerator::new(&settings)
    }

    #[test]
    fn grid_bounds_and_order() {
        let mut grid = BlockGrid::filled(3, BlockType::Air);
        assert!(grid.set(IVec3::new(1, 0, 0), BlockType::Stone));
        assert!(grid.set(IVec3::new(0, 0, 1), BlockType::Dirt));
        assert!(!grid.set(IVec3::new(3, 0, 0), BlockType::Dirt));
        assert!(!grid.set(IVec3::new(0, -1, 0), BlockType::Dirt));

        assert_eq!(grid.as_slice()[1], BlockType::Stone);
        assert_eq!(grid.as_slice()[9], BlockType::Dirt);
        assert_eq!(grid.get(IVec3::new(0, 3, 0)), None);

        let positions: Vec<_> = grid.positions().take(4).collect();
        assert_eq!(positions[1], IVec3::new(1, 0, 0));
        assert_eq!(positions[3], IVec3::new(0, 1, 0));
    }

    #[test]
    fn from_blocks_rejects_wrong_length() {
        assert!(BlockGrid::from_blocks(2, vec![BlockType::Air; 8]).is_some());
        assert!(BlockGrid::from_blocks(2, vec![BlockType::Air; 7]).is_none());
    }

    #[test]
    fn coord_neighbors_and_origin() {
        let coord = ChunkCoord::new(1, 0, -2);
        assert_eq!(coord.origin(16), IVec3::new(16, 0, -32));
        let neighbors = coord.face_neighbors();
        assert!(neighbors.contains(&ChunkCoord::new(0, 0, -2)));
        assert!(neighbors.contains(&ChunkCoord::new(1, -1, -2)));
        assert!(neighbors.contains(&ChunkCoord::new(1, 0, -1)));
        assert!(!neighbors.contains(&coord));
    }

    #[test]
    fn status_machine() {
        let mut chunk = Chunk::new(ChunkCoord::default(), 4);
        chunk.build(&flat_generator(), None).unwrap();
        assert_eq!(chunk.status(), ChunkStatus::NotInitialized);
        assert!(chunk.needs_mesh());

        chunk.install_mesh(ChunkMesh::default());
        assert_eq!(chunk.status(), ChunkStatus::Created);
        assert!(!chunk.needs_mesh());

        chunk.invalidate();
        assert_eq!(chunk.status(), ChunkStatus::NeedToBeRedrawn);

        chunk.install_mesh(ChunkMesh::default());
        assert_eq!(chunk.status(), ChunkStatus::Created);
    }

    #[test]
    fn keep_is_terminal() {
        let mut chunk = Chunk::new(ChunkCoord::default(), 4);
        chunk.keep();
        chunk.invalidate();
        assert_eq!(chunk.status(), ChunkStatus::Keep);
        chunk.install_mesh(ChunkMesh::default());
        assert_eq!(chunk.status(), ChunkStatus::Keep);
        assert!(!chunk.needs_mesh());
    }

    #[test]
    fn vegetation_runs_once() {
        let generator = flat_generator();
        let mut chunk = Chunk::new(ChunkCoord::default(), 8);
        assert!(!chunk.grow_trees(&generator));

        chunk.generate_terrain(&generator);
        assert_eq!(chunk.stage(), GenerationStage::Terrain);
        assert!(chunk.grow_trees(&generator));
        assert_eq!(chunk.stage(), GenerationStage::Vegetated);

        let after_first = chunk.grid().clone();
        assert!(!chunk.grow_trees(&generator));
        assert_eq!(chunk.grid(), &after_first);
    }

    #[test]
    fn blocks_iterator_reports_local_positions() {
        let mut chunk = Chunk::new(ChunkCoord::new(2, 0, 0), 2);
        chunk.set_block(IVec3::new(1, 1, 0), BlockType::Sand);
        let sand: Vec<_> = chunk
            .blocks()
            .filter(|b| b.kind == BlockType::Sand)
            .collect();
        assert_eq!(sand.len(), 1);
        assert_eq!(sand[0].local, UVec3::new(1, 1, 0));
        assert_eq!(chunk.block(1, 1, 0).map(|b| b.kind), Some(BlockType::Sand));
        assert_eq!(chunk.block(2, 0, 0), None);
        assert_eq!(chunk.origin(), IVec3::new(4, 0, 0));
    }
}
