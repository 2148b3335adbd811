use serde::{Deserialize, Serialize};

use crate::block::BlockId;
use crate::chunk::ChunkData;
use crate::coords::{BlockIndex, ChunkPos, CHUNK_VOLUME};

/// Thickness of each terrain band, stacked from y = 0 upward:
/// stone, then dirt, then grass, then air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrataLayers {
    #[serde(default = "default_layer_depth")]
    pub stone: u8,
    #[serde(default = "default_layer_depth")]
    pub dirt: u8,
    #[serde(default = "default_layer_depth")]
    pub grass: u8,
}

impl StrataLayers {
    /// No terrain at all: every generated chunk is air.
    pub const EMPTY: Self = Self {
        stone: 0,
        dirt: 0,
        grass: 0,
    };

    /// Height of the top of the terrain, where the first air block starts.
    pub fn surface_height(&self) -> i32 {
        i32::from(self.stone) + i32::from(self.dirt) + i32::from(self.grass)
    }
}

impl Default for StrataLayers {
    fn default() -> Self {
        Self {
            stone: default_layer_depth(),
            dirt: default_layer_depth(),
            grass: default_layer_depth(),
        }
    }
}

fn default_layer_depth() -> u8 {
    1
}

/// Flat-world terrain rule. The block at a voxel depends on its height only;
/// horizontal position is ignored on purpose.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrataGenerator {
    pub layers: StrataLayers,
}

impl StrataGenerator {
    pub fn new(layers: StrataLayers) -> Self {
        Self { layers }
    }

    pub fn block_at_height(&self, y: i32) -> BlockId {
        let stone_top = i32::from(self.layers.stone);
        let dirt_top = stone_top + i32::from(self.layers.dirt);
        let grass_top = self.layers.surface_height();

        if y < 0 {
            BlockId::AIR
        } else if y < stone_top {
            BlockId::STONE
        } else if y < dirt_top {
            BlockId::DIRT
        } else if y < grass_top {
            BlockId::GRASS
        } else {
            BlockId::AIR
        }
    }

    pub fn generate_chunk(&self, _chunk_pos: ChunkPos) -> ChunkData {
        let mut chunk = ChunkData::new_empty();
        for offset in 0..CHUNK_VOLUME {
            let index = BlockIndex::from_int(offset);
            chunk.set_index(offset, self.block_at_height(index.y));
        }
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::{StrataGenerator, StrataLayers};
    use crate::block::BlockId;
    use crate::coords::{BlockIndex, ChunkPos, CHUNK_AREA, CHUNK_VOLUME};

    #[test]
    fn default_strata_stack_stone_dirt_grass_then_air() {
        let generator = StrataGenerator::default();
        assert_eq!(generator.block_at_height(0), BlockId::STONE);
        assert_eq!(generator.block_at_height(1), BlockId::DIRT);
        assert_eq!(generator.block_at_height(2), BlockId::GRASS);
        assert_eq!(generator.block_at_height(3), BlockId::AIR);
        assert_eq!(generator.block_at_height(63), BlockId::AIR);
    }

    #[test]
    fn generated_chunk_fills_whole_layers() {
        let generator = StrataGenerator::new(StrataLayers {
            stone: 4,
            dirt: 2,
            grass: 1,
        });
        let chunk = generator.generate_chunk(ChunkPos::new(0, 0));

        assert_eq!(chunk.count_of(BlockId::STONE), 4 * CHUNK_AREA);
        assert_eq!(chunk.count_of(BlockId::DIRT), 2 * CHUNK_AREA);
        assert_eq!(chunk.count_of(BlockId::GRASS), CHUNK_AREA);
        assert_eq!(chunk.count_of(BlockId::AIR), CHUNK_VOLUME - 7 * CHUNK_AREA);
        assert_eq!(chunk.get(BlockIndex::new(7, 6, 3)), Some(BlockId::GRASS));
    }

    #[test]
    fn terrain_ignores_horizontal_position() {
        let generator = StrataGenerator::default();
        let origin = generator.generate_chunk(ChunkPos::new(0, 0));
        let far_away = generator.generate_chunk(ChunkPos::new(-4096, 1024));
        assert_eq!(origin, far_away);
    }

    #[test]
    fn empty_layers_generate_air() {
        let chunk = StrataGenerator::new(StrataLayers::EMPTY).generate_chunk(ChunkPos::default());
        assert_eq!(chunk.count_of(BlockId::AIR), CHUNK_VOLUME);
        assert_eq!(StrataLayers::EMPTY.surface_height(), 0);
    }

    #[test]
    fn surface_height_is_the_first_air_layer() {
        let layers = StrataLayers {
            stone: 5,
            dirt: 3,
            grass: 1,
        };
        let generator = StrataGenerator::new(layers);
        assert_eq!(layers.surface_height(), 9);
        assert_eq!(generator.block_at_height(layers.surface_height() - 1), BlockId::GRASS);
        assert_eq!(generator.block_at_height(layers.surface_height()), BlockId::AIR);
        assert_eq!(StrataLayers::default().surface_height(), 3);
    }
}
