use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::*;
use crate::error::ConfigError;

/// Largest accepted chunk edge; a chunk is `size³` blocks held in memory.
pub const MAX_CHUNK_SIZE: usize = 512;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WorldSettings {
    pub chunk_size: usize,
    pub world_size: WorldExtent,
    pub seed: i32,
    pub terrain: TerrainSettings,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            world_size: WorldExtent::default(),
            seed: DEFAULT_SEED,
            terrain: TerrainSettings::default(),
        }
    }
}

impl WorldSettings {
    /// Reads settings from a TOML file and validates them.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: WorldSettings = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Flat terrain: grass at `surface`, water up to `water_level`, no caves,
    /// ores or trees.
    pub fn flat(chunk_size: usize, surface: i32, water_level: i32) -> Self {
        let defaults = TerrainSettings::default();
        let level = |base| HeightLayer {
            base,
            amplitude: 0.0,
            ..defaults.surface
        };
        let off = |layer: DensityLayer| DensityLayer {
            probability: 0.0,
            ..layer
        };

        Self {
            chunk_size,
            world_size: WorldExtent { x: 1, y: 1, z: 1 },
            seed: DEFAULT_SEED,
            terrain: TerrainSettings {
                water_level,
                bedrock: level(surface - 2),
                stone: level(surface - 1),
                surface: level(surface),
                caves: off(defaults.caves),
                diamond: OreLayer {
                    probability: 0.0,
                    ..defaults.diamond
                },
                redstone: OreLayer {
                    probability: 0.0,
                    ..defaults.redstone
                },
                woodbase: off(defaults.woodbase),
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::ChunkSizeTooLarge(self.chunk_size));
        }
        if !self.world_size.fits_block_space(self.chunk_size) {
            return Err(ConfigError::WorldTooLarge {
                extent: self.world_size,
                chunk_size: self.chunk_size,
            });
        }
        self.terrain.validate()
    }
}

/// World extent in chunks along each axis.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct WorldExtent {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Default for WorldExtent {
    fn default() -> Self {
        Self {
            x: DEFAULT_WORLD_SIZE_X,
            y: DEFAULT_WORLD_SIZE_Y,
            z: DEFAULT_WORLD_SIZE_Z,
        }
    }
}

impl WorldExtent {
    pub fn chunk_count(&self) -> usize {
        self.x as usize * self.y as usize * self.z as usize
    }

    /// Whether every block coordinate of the world fits in an `i32`.
    pub fn fits_block_space(&self, chunk_size: usize) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|&axis| axis as i64 * chunk_size as i64 <= i32::MAX as i64)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(from = "TerrainPatch")]
pub struct TerrainSettings {
    pub water_level: i32,
    pub bedrock: HeightLayer,
    pub stone: HeightLayer,
    pub surface: HeightLayer,
    pub caves: DensityLayer,
    pub diamond: OreLayer,
    pub redstone: OreLayer,
    pub woodbase: DensityLayer,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            water_level: WATER_LEVEL,
            bedrock: HeightLayer {
                base: 0,
                amplitude: BEDROCK_MAX_HEIGHT,
                smoothing: BEDROCK_SMOOTH,
                octaves: BEDROCK_OCTAVES,
                persistence: HEIGHT_PERSISTENCE,
            },
            stone: HeightLayer {
                base: 0,
                amplitude: STONE_MAX_HEIGHT,
                smoothing: STONE_SMOOTH,
                octaves: STONE_OCTAVES,
                persistence: HEIGHT_PERSISTENCE,
            },
            surface: HeightLayer {
                base: 0,
                amplitude: SURFACE_MAX_HEIGHT,
                smoothing: SURFACE_SMOOTH,
                octaves: SURFACE_OCTAVES,
                persistence: HEIGHT_PERSISTENCE,
            },
            caves: DensityLayer {
                probability: CAVE_PROBABILITY,
                smoothing: CAVE_SMOOTH,
                octaves: CAVE_OCTAVES,
            },
            diamond: OreLayer {
                probability: DIAMOND_PROBABILITY,
                smoothing: DIAMOND_SMOOTH,
                octaves: DIAMOND_OCTAVES,
                max_height: DIAMOND_MAX_HEIGHT,
            },
            redstone: OreLayer {
                probability: REDSTONE_PROBABILITY,
                smoothing: REDSTONE_SMOOTH,
                octaves: REDSTONE_OCTAVES,
                max_height: REDSTONE_MAX_HEIGHT,
            },
            woodbase: DensityLayer {
                probability: WOODBASE_PROBABILITY,
                smoothing: WOODBASE_SMOOTH,
                octaves: WOODBASE_OCTAVES,
            },
        }
    }
}

impl TerrainSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        self.bedrock.validate("bedrock")?;
        self.stone.validate("stone")?;
        self.surface.validate("surface")?;
        self.caves.validate("caves")?;
        self.diamond.validate("diamond")?;
        self.redstone.validate("redstone")?;
        self.woodbase.validate("woodbase")
    }
}

/// A 2D height map: `base + floor(fbm(x, z) * amplitude)`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct HeightLayer {
    pub base: i32,
    pub amplitude: f32,
    pub smoothing: f32,
    pub octaves: u32,
    pub persistence: f32,
}

impl HeightLayer {
    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.octaves == 0 {
            return Err(ConfigError::ZeroOctaves(name));
        }
        if !(self.amplitude.is_finite() && self.smoothing.is_finite() && self.persistence.is_finite()) {
            return Err(ConfigError::NonFinite(name));
        }
        Ok(())
    }
}

/// A 3D density threshold: the rule fires where `fbm(x, y, z) < probability`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct DensityLayer {
    pub probability: f32,
    pub smoothing: f32,
    pub octaves: u32,
}

impl DensityLayer {
    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.octaves == 0 {
            return Err(ConfigError::ZeroOctaves(name));
        }
        if !(self.probability.is_finite() && self.smoothing.is_finite()) {
            return Err(ConfigError::NonFinite(name));
        }
        Ok(())
    }
}

/// Ore vein threshold, only below `max_height` (exclusive).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct OreLayer {
    pub probability: f32,
    pub smoothing: f32,
    pub octaves: u32,
    pub max_height: i32,
}

impl OreLayer {
    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.octaves == 0 {
            return Err(ConfigError::ZeroOctaves(name));
        }
        if !(self.probability.is_finite() && self.smoothing.is_finite()) {
            return Err(ConfigError::NonFinite(name));
        }
        Ok(())
    }
}

// A `[terrain]` table as written in the file. Every key is optional and
// falls back to the default of the layer it belongs to.
#[derive(Deserialize, Default)]
#[serde(default)]
struct TerrainPatch {
    water_level: Option<i32>,
    bedrock: HeightPatch,
    stone: HeightPatch,
    surface: HeightPatch,
    caves: DensityPatch,
    diamond: OrePatch,
    redstone: OrePatch,
    woodbase: DensityPatch,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct HeightPatch {
    base: Option<i32>,
    amplitude: Option<f32>,
    smoothing: Option<f32>,
    octaves: Option<u32>,
    persistence: Option<f32>,
}

impl HeightPatch {
    fn over(self, layer: HeightLayer) -> HeightLayer {
        HeightLayer {
            base: self.base.unwrap_or(layer.base),
            amplitude: self.amplitude.unwrap_or(layer.amplitude),
            smoothing: self.smoothing.unwrap_or(layer.smoothing),
            octaves: self.octaves.unwrap_or(layer.octaves),
            persistence: self.persistence.unwrap_or(layer.persistence),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct DensityPatch {
    probability: Option<f32>,
    smoothing: Option<f32>,
    octaves: Option<u32>,
}

impl DensityPatch {
    fn over(self, layer: DensityLayer) -> DensityLayer {
        DensityLayer {
            probability: self.probability.unwrap_or(layer.probability),
            smoothing: self.smoothing.unwrap_or(layer.smoothing),
            octaves: self.octaves.unwrap_or(layer.octaves),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct OrePatch {
    probability: Option<f32>,
    smoothing: Option<f32>,
    octaves: Option<u32>,
    max_height: Option<i32>,
}

impl OrePatch {
    fn over(self, layer: OreLayer) -> OreLayer {
        OreLayer {
            probability: self.probability.unwrap_or(layer.probability),
            smoothing: self.smoothing.unwrap_or(layer.smoothing),
            octaves: self.octaves.unwrap_or(layer.octaves),
            max_height: self.max_height.unwrap_or(layer.max_height),
        }
    }
}

impl From<TerrainPatch> for TerrainSettings {
    fn from(patch: TerrainPatch) -> Self {
        let defaults = TerrainSettings::default();
        TerrainSettings {
            water_level: patch.water_level.unwrap_or(defaults.water_level),
            bedrock: patch.bedrock.over(defaults.bedrock),
            stone: patch.stone.over(defaults.stone),
            surface: patch.surface.over(defaults.surface),
            caves: patch.caves.over(defaults.caves),
            diamond: patch.diamond.over(defaults.diamond),
            redstone: patch.redstone.over(defaults.redstone),
            woodbase: patch.woodbase.over(defaults.woodbase),
        }
    }
}
