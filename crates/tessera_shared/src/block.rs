use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

pub const ATLAS_TILES: u32 = 16;
pub const ATLAS_DIVIDER: f32 = 1.0 / ATLAS_TILES as f32;

const fn atlas_pos(x: u8, y: u8) -> u8 {
    (x << 4) | y
}

/// Voxel material. The byte packs the block's atlas tile as `(x << 4) | y`,
/// which is also the value written to chunk files.
#[repr(transparent)]
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Pod,
    Zeroable,
)]
pub struct BlockId(pub u8);

impl BlockId {
    pub const AIR: Self = Self(atlas_pos(0, 15));
    pub const GRASS: Self = Self(atlas_pos(3, 0));
    pub const DIRT: Self = Self(atlas_pos(2, 0));
    pub const STONE: Self = Self(atlas_pos(1, 0));
    pub const COBBLE: Self = Self(atlas_pos(0, 1));
    pub const WOOD: Self = Self(atlas_pos(4, 1));
    pub const PLANKS: Self = Self(atlas_pos(4, 0));
    pub const COBWEB: Self = Self(atlas_pos(11, 0));
    pub const ROSE: Self = Self(atlas_pos(12, 0));
    pub const DANDELION: Self = Self(atlas_pos(13, 0));
    pub const SAPLING: Self = Self(atlas_pos(15, 0));

    pub const ALL: [Self; 11] = [
        Self::AIR,
        Self::GRASS,
        Self::DIRT,
        Self::STONE,
        Self::COBBLE,
        Self::WOOD,
        Self::PLANKS,
        Self::COBWEB,
        Self::ROSE,
        Self::DANDELION,
        Self::SAPLING,
    ];

    pub fn traits(self) -> BlockTraits {
        match self {
            Self::AIR => BlockTraits::GAS,
            Self::COBWEB | Self::ROSE | Self::DANDELION | Self::SAPLING => BlockTraits::FOLIAGE,
            _ => BlockTraits::SOLID,
        }
    }

    pub fn is_gas(self) -> bool {
        self.traits().contains(BlockTraits::GAS)
    }

    pub fn is_solid(self) -> bool {
        self.traits().contains(BlockTraits::SOLID)
    }

    /// Cross-shaped plants and webs: neither solid nor gas.
    pub fn is_foliage(self) -> bool {
        self.traits().contains(BlockTraits::FOLIAGE)
    }

    pub fn atlas_tile(self) -> UVec2 {
        UVec2::new(u32::from((self.0 >> 4) & 0x0F), u32::from(self.0 & 0x0F))
    }

    pub fn atlas_uv(self, local_uv: Vec2) -> Vec2 {
        (local_uv + self.atlas_tile().as_vec2()) * ATLAS_DIVIDER
    }

    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::AIR => "air",
            Self::GRASS => "grass",
            Self::DIRT => "dirt",
            Self::STONE => "stone",
            Self::COBBLE => "cobble",
            Self::WOOD => "wood",
            Self::PLANKS => "planks",
            Self::COBWEB => "cobweb",
            Self::ROSE => "rose",
            Self::DANDELION => "dandelion",
            Self::SAPLING => "sapling",
            _ => return None,
        };
        Some(name)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|block| block.name() == Some(name))
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::AIR
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct BlockTraits: u8 {
        const GAS = 1 << 0;
        const SOLID = 1 << 1;
        const FOLIAGE = 1 << 2;
    }
}
