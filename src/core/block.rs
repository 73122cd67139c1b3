use glam::UVec3;
use serde::{Deserialize, Serialize};

/// Every block kind the generator can produce.
///
/// The discriminant doubles as the on-disk code, so new kinds go at the end.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockType {
    #[default]
    Air = 0,
    Bedrock = 1,
    Stone = 2,
    Dirt = 3,
    Grass = 4,
    Sand = 5,
    Water = 6,
    Wood = 7,
    Leaves = 8,
    Diamond = 9,
    Redstone = 10,
    Woodbase = 11,
}

impl BlockType {
    pub const ALL: [BlockType; 12] = [
        BlockType::Air,
        BlockType::Bedrock,
        BlockType::Stone,
        BlockType::Dirt,
        BlockType::Grass,
        BlockType::Sand,
        BlockType::Water,
        BlockType::Wood,
        BlockType::Leaves,
        BlockType::Diamond,
        BlockType::Redstone,
        BlockType::Woodbase,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn is_solid(&self) -> bool {
        !matches!(self, BlockType::Air | BlockType::Water)
    }

    pub fn is_fluid(&self) -> bool {
        *self == BlockType::Water
    }

    /// Whether the face of `self` that touches `neighbor` is visible.
    pub fn should_render_face_against(&self, neighbor: BlockType) -> bool {
        match *self {
            BlockType::Air => false,
            // Water only shows its surface against air, never between
            // water blocks or against terrain it is resting on
            BlockType::Water => neighbor == BlockType::Air,
            // Solid blocks render faces against water so underwater terrain is visible
            _ => !neighbor.is_solid(),
        }
    }
}

/// A block value together with its position inside the owning chunk.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Block {
    pub kind: BlockType,
    pub local: UVec3,
}
