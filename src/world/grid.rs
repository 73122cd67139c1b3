//! The bounded world: every chunk in the configured extent, generated in one
//! pass and meshed in a second.

use std::time::Instant;

use glam::IVec3;
use rustc_hash::FxHashMap;

use crate::core::block::BlockType;
use crate::core::chunk::{Chunk, ChunkCoord, GenerationStage};
use crate::core::face::Face;
use crate::error::{ConfigError, PersistenceError};
use crate::render::mesh::build_chunk_mesh;
use crate::save::ChunkStore;
use crate::utils::settings::{WorldExtent, WorldSettings};
use crate::world::generator::TerrainGenerator;

/// A chunk together with its six face neighbours, for meshing.
///
/// Neighbours are indexed by `Face as usize`; `None` means the neighbour lies
/// outside the world.
pub struct ChunkView<'a> {
    chunk: &'a Chunk,
    neighbors: [Option<&'a Chunk>; 6],
}

impl<'a> ChunkView<'a> {
    pub fn new(chunk: &'a Chunk, neighbors: [Option<&'a Chunk>; 6]) -> Self {
        ChunkView { chunk, neighbors }
    }

    pub fn chunk(&self) -> &'a Chunk {
        self.chunk
    }

    pub fn block(&self, local: IVec3) -> Option<BlockType> {
        self.chunk.get_block(local)
    }

    /// The block across `face` from `local`, stepping into the neighbouring
    /// chunk when `local` sits on the boundary.
    pub fn neighbor_block(&self, local: IVec3, face: Face) -> Option<BlockType> {
        let target = local + face.offset();
        if self.chunk.grid().contains(target) {
            return self.chunk.get_block(target);
        }
        let neighbor = self.neighbors[face as usize]?;
        let size = neighbor.size() as i32;
        neighbor.get_block(target.rem_euclid(IVec3::splat(size)))
    }
}

/// Chunk and quad totals, for logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub chunks: usize,
    pub meshed: usize,
    pub restored: usize,
    pub solid_quads: usize,
    pub fluid_quads: usize,
}

pub struct WorldGrid {
    settings: WorldSettings,
    generator: TerrainGenerator,
    store: Option<ChunkStore>,
    chunks: FxHashMap<ChunkCoord, Chunk>,
}

impl WorldGrid {
    /// Allocates an empty chunk for every coordinate in the extent.
    ///
    /// With a `store`, `generate` restores saved chunks instead of generating them.
    pub fn new(settings: WorldSettings, store: Option<ChunkStore>) -> Result<Self, ConfigError> {
        settings.validate()?;
        let generator = TerrainGenerator::new(&settings);

        let mut chunks = FxHashMap::default();
        chunks.reserve(settings.world_size.chunk_count());
        for coord in coords_in(settings.world_size) {
            chunks.insert(coord, Chunk::new(coord, settings.chunk_size));
        }

        Ok(WorldGrid {
            settings,
            generator,
            store,
            chunks,
        })
    }

    /// Fills every chunk with blocks. Must finish before `mesh`, since faces
    /// on chunk borders look into the neighbours.
    ///
    /// Every stored record is read before any chunk is touched, so a failed
    /// load leaves the whole world as it was.
    pub fn generate(&mut self) -> Result<(), PersistenceError> {
        let start = Instant::now();
        let size = self.settings.chunk_size;

        let mut saved = Vec::with_capacity(self.chunks.len());
        for coord in coords_in(self.settings.world_size) {
            let record = match &self.store {
                Some(store) => store.load(coord.origin(size), size)?,
                None => None,
            };
            saved.push((coord, record));
        }

        for (coord, record) in saved {
            if let Some(chunk) = self.chunks.get_mut(&coord) {
                chunk.build_from(&self.generator, record);
            }
        }

        let restored = self
            .chunks
            .values()
            .filter(|c| c.stage() == GenerationStage::Restored)
            .count();
        tracing::info!(
            "Generated {} chunks ({} restored) in {} ms",
            self.chunks.len(),
            restored,
            start.elapsed().as_millis()
        );
        Ok(())
    }

    /// Builds meshes for every chunk that is not `Created` or `Keep`.
    /// Returns how many were rebuilt.
    pub fn mesh(&mut self) -> usize {
        let start = Instant::now();
        let pending: Vec<ChunkCoord> = coords_in(self.settings.world_size)
            .filter(|coord| self.chunks.get(coord).is_some_and(Chunk::needs_mesh))
            .collect();

        for &coord in &pending {
            self.build_mesh(coord);
        }

        tracing::info!(
            "Meshed {} chunks in {} ms",
            pending.len(),
            start.elapsed().as_millis()
        );
        pending.len()
    }

    /// Rebuilds one chunk's mesh regardless of status. False when `coord` is out of range.
    pub fn build_mesh(&mut self, coord: ChunkCoord) -> bool {
        let Some(mesh) = self.view(coord).map(|view| build_chunk_mesh(&view)) else {
            return false;
        };
        match self.chunks.get_mut(&coord) {
            Some(chunk) => {
                chunk.install_mesh(mesh);
                true
            }
            None => false,
        }
    }

    /// Marks `coord` and its in-range face neighbours for redraw.
    pub fn invalidate_neighbors(&mut self, coord: ChunkCoord) {
        let targets = std::iter::once(coord).chain(coord.face_neighbors());
        for target in targets {
            if let Some(chunk) = self.chunks.get_mut(&target) {
                chunk.invalidate();
            }
        }
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn chunk_at(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunk_at_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn view(&self, coord: ChunkCoord) -> Option<ChunkView<'_>> {
        let chunk = self.chunks.get(&coord)?;
        let neighbors = Face::ALL.map(|face| self.chunks.get(&coord.offset(face)));
        Some(ChunkView::new(chunk, neighbors))
    }

    /// Block at a world-space position, if it lies inside the world.
    pub fn block_at(&self, world: IVec3) -> Option<BlockType> {
        let size = self.settings.chunk_size as i32;
        let c = world.div_euclid(IVec3::splat(size));
        self.chunks
            .get(&ChunkCoord::new(c.x, c.y, c.z))?
            .get_block(world.rem_euclid(IVec3::splat(size)))
    }

    /// Writes every chunk to the store. Returns the number written, 0 without a store.
    pub fn save_all(&self) -> Result<usize, PersistenceError> {
        let Some(store) = &self.store else {
            tracing::warn!("No chunk store configured, nothing saved");
            return Ok(0);
        };

        let start = Instant::now();
        for coord in coords_in(self.settings.world_size) {
            if let Some(chunk) = self.chunks.get(&coord) {
                store.save(chunk)?;
            }
        }
        tracing::info!(
            "Saved {} chunks to {} in {} ms",
            self.chunks.len(),
            store.dir().display(),
            start.elapsed().as_millis()
        );
        Ok(self.chunks.len())
    }

    pub fn stats(&self) -> WorldStats {
        let mut stats = WorldStats {
            chunks: self.chunks.len(),
            ..WorldStats::default()
        };
        for chunk in self.chunks.values() {
            if chunk.stage() == GenerationStage::Restored {
                stats.restored += 1;
            }
            if let Some(mesh) = chunk.mesh() {
                stats.meshed += 1;
                stats.solid_quads += mesh.solid.quad_count();
                stats.fluid_quads += mesh.fluid.quad_count();
            }
        }
        stats
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    pub fn store(&self) -> Option<&ChunkStore> {
        self.store.as_ref()
    }
}

/// Chunk coordinates of the extent, x outermost then y then z.
fn coords_in(extent: WorldExtent) -> impl Iterator<Item = ChunkCoord> {
    let (sx, sy, sz) = (extent.x as i32, extent.y as i32, extent.z as i32);
    (0..sx).flat_map(move |x| {
        (0..sy).flat_map(move |y| (0..sz).map(move |z| ChunkCoord::new(x, y, z)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chunk::ChunkStatus;

    fn small_world(store: Option<ChunkStore>) -> WorldGrid {
        let mut settings = WorldSettings::flat(4, 2, 1);
        settings.world_size = WorldExtent { x: 2, y: 2, z: 1 };
        WorldGrid::new(settings, store).unwrap()
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut settings = WorldSettings::flat(4, 2, 1);
        settings.chunk_size = 0;
        assert!(matches!(
            WorldGrid::new(settings, None),
            Err(ConfigError::ZeroChunkSize)
        ));

        let mut settings = WorldSettings::flat(64, 2, 1);
        settings.world_size.z = i32::MAX as u32;
        assert!(matches!(
            WorldGrid::new(settings, None),
            Err(ConfigError::WorldTooLarge { .. })
        ));
    }

    #[test]
    fn lookups_outside_extent_are_none() {
        let world = small_world(None);
        assert_eq!(world.chunks().count(), 4);
        assert!(world.chunk_at(ChunkCoord::new(1, 1, 0)).is_some());
        assert!(world.chunk_at(ChunkCoord::new(2, 0, 0)).is_none());
        assert!(world.chunk_at(ChunkCoord::new(-1, 0, 0)).is_none());
        assert!(world.view(ChunkCoord::new(0, 0, 1)).is_none());
        assert_eq!(world.block_at(IVec3::new(-1, 0, 0)), None);
        assert_eq!(world.block_at(IVec3::new(0, 8, 0)), None);
    }

    #[test]
    fn view_crosses_into_neighbors() {
        let mut world = small_world(None);
        world.generate().unwrap();

        let view = world.view(ChunkCoord::new(0, 0, 0)).unwrap();
        // Grass top of chunk (0,0,0) is at y = 2; above it is air
        assert_eq!(view.neighbor_block(IVec3::new(3, 2, 0), Face::PosX), Some(BlockType::Grass));
        assert_eq!(view.neighbor_block(IVec3::new(0, 3, 0), Face::PosY), Some(BlockType::Air));
        assert_eq!(view.neighbor_block(IVec3::new(0, 2, 0), Face::NegX), None);
        assert_eq!(view.neighbor_block(IVec3::new(0, 2, 0), Face::NegZ), None);
        assert_eq!(world.block_at(IVec3::new(5, 1, 2)), Some(BlockType::Stone));
    }

    #[test]
    fn mesh_skips_created_and_kept_chunks() {
        let mut world = small_world(None);
        world.generate().unwrap();
        assert_eq!(world.mesh(), 4);
        assert_eq!(world.mesh(), 0);

        world.chunk_at_mut(ChunkCoord::new(1, 1, 0)).unwrap().keep();
        world.invalidate_neighbors(ChunkCoord::new(0, 0, 0));

        let status = |w: &WorldGrid, c| w.chunk_at(c).unwrap().status();
        assert_eq!(status(&world, ChunkCoord::new(0, 0, 0)), ChunkStatus::NeedToBeRedrawn);
        assert_eq!(status(&world, ChunkCoord::new(1, 0, 0)), ChunkStatus::NeedToBeRedrawn);
        assert_eq!(status(&world, ChunkCoord::new(0, 1, 0)), ChunkStatus::NeedToBeRedrawn);
        assert_eq!(status(&world, ChunkCoord::new(1, 1, 0)), ChunkStatus::Keep);

        assert_eq!(world.mesh(), 3);
        assert_eq!(status(&world, ChunkCoord::new(0, 0, 0)), ChunkStatus::Created);
    }

    #[test]
    fn saved_world_is_restored() {
        let dir = tempfile::tempdir().unwrap();
        let mut world = small_world(Some(ChunkStore::new(dir.path())));
        world.generate().unwrap();
        assert_eq!(world.stats().restored, 0);
        assert_eq!(world.save_all().unwrap(), 4);

        let mut reloaded = small_world(Some(ChunkStore::new(dir.path())));
        reloaded.generate().unwrap();
        assert_eq!(reloaded.stats().restored, 4);
        for chunk in world.chunks() {
            let other = reloaded.chunk_at(chunk.coord()).unwrap();
            assert_eq!(other.grid(), chunk.grid());
            assert_eq!(other.stage(), GenerationStage::Restored);
        }
    }

    #[test]
    fn failed_load_leaves_world_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = ChunkStore::new(dir.path());
        // Last chunk in generation order holds a corrupt record
        let corrupt = ChunkCoord::new(1, 1, 0).origin(4);
        std::fs::write(store.path_for(corrupt), b"not a chunk record").unwrap();

        let mut world = small_world(Some(store));
        assert!(matches!(world.generate(), Err(PersistenceError::BadMagic)));
        for chunk in world.chunks() {
            assert_eq!(chunk.stage(), GenerationStage::Empty);
            assert!(chunk.grid().as_slice().iter().all(|&b| b == BlockType::Air));
        }
    }

    #[test]
    fn save_without_store_is_noop() {
        let mut world = small_world(None);
        world.generate().unwrap();
        assert_eq!(world.save_all().unwrap(), 0);
    }
}
