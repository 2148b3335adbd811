use crate::block::BlockId;
use crate::coords::{BlockIndex, CHUNK_VOLUME};

/// Dense voxel array of one chunk, laid out in `BlockIndex::to_int` order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkData {
    pub blocks: Box<[BlockId; CHUNK_VOLUME]>,
}

impl ChunkData {
    pub fn new_empty() -> Self {
        Self::new_filled(BlockId::AIR)
    }

    pub fn new_filled(block: BlockId) -> Self {
        Self {
            blocks: Box::new([block; CHUNK_VOLUME]),
        }
    }

    /// Rebuilds a chunk from its raw on-disk bytes. Returns `None` unless exactly
    /// one byte per voxel is supplied.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != CHUNK_VOLUME {
            return None;
        }

        let mut chunk = Self::new_empty();
        chunk
            .blocks
            .copy_from_slice(bytemuck::cast_slice::<u8, BlockId>(bytes));
        Some(chunk)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.blocks.as_slice())
    }

    pub fn get(&self, index: BlockIndex) -> Option<BlockId> {
        index.checked_int().map(|offset| self.blocks[offset])
    }

    /// Writes `block` at `index`; returns `false` and leaves the chunk untouched
    /// when the index is out of range.
    pub fn set(&mut self, index: BlockIndex, block: BlockId) -> bool {
        match index.checked_int() {
            Some(offset) => {
                self.blocks[offset] = block;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: BlockIndex) -> bool {
        self.set(index, BlockId::AIR)
    }

    pub fn get_index(&self, index: usize) -> BlockId {
        self.blocks[index]
    }

    pub fn set_index(&mut self, index: usize, block: BlockId) {
        self.blocks[index] = block;
    }

    /// Iterates non-gas voxels with their chunk-local index.
    pub fn occupied(&self) -> impl Iterator<Item = (BlockIndex, BlockId)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| !block.is_gas())
            .map(|(offset, block)| (BlockIndex::from_int(offset), *block))
    }

    pub fn count_of(&self, block: BlockId) -> usize {
        self.blocks.iter().filter(|candidate| **candidate == block).count()
    }
}

impl Default for ChunkData {
    fn default() -> Self {
        Self::new_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::ChunkData;
    use crate::block::BlockId;
    use crate::coords::{BlockIndex, CHUNK_VOLUME};

    #[test]
    fn chunk_creation_and_get_set_work() {
        let mut chunk = ChunkData::new_empty();
        let index = BlockIndex::new(3, 40, 11);
        assert_eq!(chunk.get(index), Some(BlockId::AIR));

        assert!(chunk.set(index, BlockId::STONE));
        assert_eq!(chunk.get(index), Some(BlockId::STONE));
        assert_eq!(chunk.get_index(index.to_int()), BlockId::STONE);

        chunk.set_index(0, BlockId::PLANKS);
        assert_eq!(chunk.get_index(0), BlockId::PLANKS);

        assert!(chunk.remove(index));
        assert_eq!(chunk.get(index), Some(BlockId::AIR));
    }

    #[test]
    fn out_of_range_access_is_rejected() {
        let mut chunk = ChunkData::new_filled(BlockId::DIRT);
        let outside = BlockIndex::new(0, 64, 0);
        assert_eq!(chunk.get(outside), None);
        assert!(!chunk.set(outside, BlockId::AIR));
        assert!(!chunk.set(BlockIndex::new(-1, 0, 0), BlockId::AIR));
        assert_eq!(chunk.count_of(BlockId::DIRT), CHUNK_VOLUME);
    }

    #[test]
    fn raw_bytes_reproduce_the_voxel_array() {
        let mut original = ChunkData::new_filled(BlockId::STONE);
        original.set(BlockIndex::new(0, 0, 0), BlockId::GRASS);
        original.set(BlockIndex::new(15, 63, 15), BlockId::SAPLING);

        let bytes = original.as_bytes();
        assert_eq!(bytes.len(), CHUNK_VOLUME);
        assert_eq!(bytes[0], BlockId::GRASS.0);

        let decoded = ChunkData::from_bytes(bytes).expect("decode full chunk");
        assert_eq!(decoded, original);
        assert!(ChunkData::from_bytes(&bytes[1..]).is_none());
    }

    #[test]
    fn occupied_skips_air() {
        let mut chunk = ChunkData::new_empty();
        chunk.set(BlockIndex::new(1, 0, 1), BlockId::COBBLE);
        chunk.set(BlockIndex::new(2, 5, 3), BlockId::ROSE);

        let occupied: Vec<_> = chunk.occupied().collect();
        assert_eq!(
            occupied,
            vec![
                (BlockIndex::new(1, 0, 1), BlockId::COBBLE),
                (BlockIndex::new(2, 5, 3), BlockId::ROSE),
            ]
        );
    }
}
