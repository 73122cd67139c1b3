//! Deterministic terrain generation using layered FastNoiseLite fields
//!
//! Block types are a pure function of world coordinates and the terrain
//! settings, so chunks can be generated in any order and still agree at
//! their shared borders.

use glam::IVec3;

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::BlockGrid;
use crate::utils::settings::{HeightLayer, TerrainSettings, WorldSettings};
use crate::world::noise::NoiseField;

/// Layer heights of one world column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnHeights {
    pub bedrock: i32,
    pub stone: i32,
    pub surface: i32,
}

/// Chunk generator with one noise field per terrain layer
pub struct TerrainGenerator {
    noise_bedrock: NoiseField,
    noise_stone: NoiseField,
    noise_surface: NoiseField,
    noise_cave: NoiseField,
    noise_diamond: NoiseField,
    noise_redstone: NoiseField,
    noise_woodbase: NoiseField,
    terrain: TerrainSettings,
}

impl TerrainGenerator {
    pub fn new(settings: &WorldSettings) -> Self {
        let seed = settings.seed;
        TerrainGenerator {
            noise_bedrock: NoiseField::new(seed),
            noise_stone: NoiseField::new(seed.wrapping_add(1)),
            noise_surface: NoiseField::new(seed.wrapping_add(2)),
            noise_cave: NoiseField::new(seed.wrapping_add(3)),
            noise_diamond: NoiseField::new(seed.wrapping_add(4)),
            noise_redstone: NoiseField::new(seed.wrapping_add(5)),
            noise_woodbase: NoiseField::new(seed.wrapping_add(6)),
            terrain: settings.terrain.clone(),
        }
    }

    pub fn terrain(&self) -> &TerrainSettings {
        &self.terrain
    }

    fn layer_height(noise: &NoiseField, layer: &HeightLayer, x: i32, z: i32) -> i32 {
        let value = noise.sample_2d(
            x as f32,
            z as f32,
            layer.smoothing,
            layer.octaves,
            layer.persistence,
        );
        layer.base + (value * layer.amplitude).floor() as i32
    }

    pub fn column(&self, x: i32, z: i32) -> ColumnHeights {
        ColumnHeights {
            bedrock: Self::layer_height(&self.noise_bedrock, &self.terrain.bedrock, x, z),
            stone: Self::layer_height(&self.noise_stone, &self.terrain.stone, x, z),
            surface: Self::layer_height(&self.noise_surface, &self.terrain.surface, x, z),
        }
    }

    /// Block type at a world position. First matching layer wins, then caves carve.
    pub fn determine_block_type(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.classify(self.column(x, z), x, y, z)
    }

    fn classify(&self, column: ColumnHeights, x: i32, y: i32, z: i32) -> BlockType {
        let t = &self.terrain;
        let (fx, fy, fz) = (x as f32, y as f32, z as f32);

        let block = if y <= column.bedrock {
            BlockType::Bedrock
        } else if y <= column.stone {
            if y < t.diamond.max_height
                && self
                    .noise_diamond
                    .sample(fx, fy, fz, t.diamond.smoothing, t.diamond.octaves)
                    < t.diamond.probability
            {
                BlockType::Diamond
            } else if y < t.redstone.max_height
                && self
                    .noise_redstone
                    .sample(fx, fy, fz, t.redstone.smoothing, t.redstone.octaves)
                    < t.redstone.probability
            {
                BlockType::Redstone
            } else {
                BlockType::Stone
            }
        } else if y == column.surface {
            let woodbase = self
                .noise_woodbase
                .sample(fx, fy, fz, t.woodbase.smoothing, t.woodbase.octaves);
            if woodbase < t.woodbase.probability {
                BlockType::Woodbase
            } else {
                BlockType::Grass
            }
        } else if y < column.surface {
            BlockType::Dirt
        } else if y <= t.water_level {
            BlockType::Water
        } else {
            BlockType::Air
        };

        if block != BlockType::Water
            && self
                .noise_cave
                .sample(fx, fy, fz, t.caves.smoothing, t.caves.octaves)
                < t.caves.probability
        {
            return BlockType::Air;
        }

        block
    }

    /// Fills a whole chunk whose minimum corner sits at `origin`.
    pub fn generate_blocks(&self, origin: IVec3, size: usize) -> BlockGrid {
        let n = size as i32;
        let mut grid = BlockGrid::filled(size, BlockType::Air);

        // Pre-compute column heights, shared by every y in the column
        let mut columns = Vec::with_capacity(size * size);
        for lz in 0..n {
            for lx in 0..n {
                columns.push(self.column(origin.x + lx, origin.z + lz));
            }
        }

        for local in grid.positions() {
            let column = columns[(local.x + local.z * n) as usize];
            let world = origin + local;
            let block = self.classify(column, world.x, world.y, world.z);
            if block != BlockType::Air {
                grid.set(local, block);
            }
        }

        grid
    }

    /// Grows a tree on every woodbase block. Returns the number of trees.
    ///
    /// Trees whose trunk or canopy would leave the grid are skipped whole, so
    /// a tree is either complete or absent.
    pub fn grow_trees(&self, grid: &mut BlockGrid) -> usize {
        let mut grown = 0;
        for base in grid.positions() {
            if grid.get(base) != Some(BlockType::Woodbase) {
                continue;
            }
            if !tree_cells(base).all(|(cell, _)| grid.contains(cell)) {
                continue;
            }
            for (cell, block) in tree_cells(base) {
                grid.set(cell, block);
            }
            grown += 1;
        }
        grown
    }
}

/// Trunk, canopy and capstone of a tree rooted on `base`.
fn tree_cells(base: IVec3) -> impl Iterator<Item = (IVec3, BlockType)> {
    let trunk = (1..=TRUNK_HEIGHT).map(move |dy| (base + IVec3::new(0, dy, 0), BlockType::Wood));

    let canopy_bottom = TRUNK_HEIGHT + 1;
    let canopy = (canopy_bottom..canopy_bottom + CANOPY_LAYERS).flat_map(move |dy| {
        (-CANOPY_RADIUS..=CANOPY_RADIUS).flat_map(move |dx| {
            (-CANOPY_RADIUS..=CANOPY_RADIUS)
                .map(move |dz| (base + IVec3::new(dx, dy, dz), BlockType::Leaves))
        })
    });

    let capstone = std::iter::once((
        base + IVec3::new(0, canopy_bottom + CANOPY_LAYERS, 0),
        BlockType::Leaves,
    ));

    trunk.chain(canopy).chain(capstone)
}
