use std::ops::{Add, AddAssign, Sub, SubAssign};

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

pub const CHUNK_WIDTH: usize = 16;
pub const CHUNK_HEIGHT: usize = 64;
pub const CHUNK_AREA: usize = CHUNK_WIDTH * CHUNK_WIDTH;
pub const CHUNK_VOLUME: usize = CHUNK_AREA * CHUNK_HEIGHT;

pub const CHUNK_WIDTH_I32: i32 = CHUNK_WIDTH as i32;
pub const CHUNK_HEIGHT_I32: i32 = CHUNK_HEIGHT as i32;

/// Range of chunk counts whose origins still fit in an `i32` block coordinate.
pub const MIN_CHUNK_COORD: i32 = i32::MIN / CHUNK_WIDTH_I32;
pub const MAX_CHUNK_COORD: i32 = i32::MAX / CHUNK_WIDTH_I32;

pub const CHUNK_EXTENT: Vec3 = Vec3::new(CHUNK_WIDTH as f32, CHUNK_HEIGHT as f32, CHUNK_WIDTH as f32);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockIndex {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// World-space origin of a chunk. Always a multiple of `CHUNK_WIDTH` on both axes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

/// Grid-relative chunk slot, valid only inside `[0, width)²`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkIndex {
    pub x: i32,
    pub z: i32,
}

fn div_rem_floor(value: i32, divisor: i32) -> (i32, i32) {
    let mut q = value / divisor;
    let mut r = value % divisor;
    if r < 0 {
        q -= 1;
        r += divisor;
    }
    (q, r)
}

impl BlockIndex {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn is_valid(&self) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.z >= 0
            && self.x < CHUNK_WIDTH_I32
            && self.y < CHUNK_HEIGHT_I32
            && self.z < CHUNK_WIDTH_I32
    }

    /// Linear offset into a chunk's block array. The index must be valid.
    pub fn to_int(&self) -> usize {
        debug_assert!(self.is_valid(), "block index out of bounds: {self:?}");
        self.x as usize + self.z as usize * CHUNK_WIDTH + self.y as usize * CHUNK_AREA
    }

    pub fn checked_int(&self) -> Option<usize> {
        self.is_valid().then(|| self.to_int())
    }

    pub fn from_int(index: usize) -> Self {
        debug_assert!(index < CHUNK_VOLUME, "chunk block offset out of bounds: {index}");
        Self {
            x: (index % CHUNK_WIDTH) as i32,
            y: (index / CHUNK_AREA) as i32,
            z: ((index / CHUNK_WIDTH) % CHUNK_WIDTH) as i32,
        }
    }

    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn from_ivec3(value: IVec3) -> Self {
        Self::new(value.x, value.y, value.z)
    }

    pub fn as_ivec3(&self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    pub fn as_vec3(&self) -> Vec3 {
        self.as_ivec3().as_vec3()
    }

    pub fn from_vec3(world: Vec3) -> Self {
        Self::from_ivec3(world.floor().as_ivec3())
    }

    pub fn chunk_pos(&self) -> ChunkPos {
        let (chunk_x, _) = div_rem_floor(self.x, CHUNK_WIDTH_I32);
        let (chunk_z, _) = div_rem_floor(self.z, CHUNK_WIDTH_I32);
        ChunkPos {
            x: chunk_x * CHUNK_WIDTH_I32,
            z: chunk_z * CHUNK_WIDTH_I32,
        }
    }

    /// Index relative to `chunk_pos`. May be invalid when the block lies outside that chunk.
    pub fn to_index(&self, chunk_pos: ChunkPos) -> BlockIndex {
        BlockIndex::new(self.x - chunk_pos.x, self.y, self.z - chunk_pos.z)
    }

    pub fn from_index(chunk_pos: ChunkPos, index: BlockIndex) -> Self {
        Self::new(chunk_pos.x + index.x, index.y, chunk_pos.z + index.z)
    }
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk-count offset of this origin. Exact because origins are width-aligned.
    pub fn to_index(&self) -> ChunkIndex {
        ChunkIndex::new(self.x / CHUNK_WIDTH_I32, self.z / CHUNK_WIDTH_I32)
    }

    pub fn from_index(index: ChunkIndex) -> Self {
        Self::new(index.x * CHUNK_WIDTH_I32, index.z * CHUNK_WIDTH_I32)
    }

    /// Origin of the chunk containing an arbitrary world point. Points beyond
    /// the representable range saturate to the outermost chunk.
    pub fn from_world(world: Vec3) -> Self {
        let axis = |value: f32| {
            let chunk = (value / CHUNK_WIDTH as f32).floor() as i32;
            chunk.clamp(MIN_CHUNK_COORD, MAX_CHUNK_COORD) * CHUNK_WIDTH_I32
        };
        Self::new(axis(world.x), axis(world.z))
    }

    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.x as f32, 0.0, self.z as f32)
    }
}

impl ChunkIndex {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub const fn is_valid(&self, width: i32) -> bool {
        self.x >= 0 && self.z >= 0 && self.x < width && self.z < width
    }

    /// Row-major slot in a `width × width` grid. The index must be valid.
    pub fn to_int(&self, width: i32) -> usize {
        debug_assert!(self.is_valid(width), "chunk index {self:?} outside width {width}");
        (self.x + self.z * width) as usize
    }

    pub fn from_int(index: usize, width: i32) -> Self {
        let index = index as i32;
        Self::new(index % width, index / width)
    }
}

macro_rules! impl_component_ops {
    ($ty:ident { $($field:ident),+ }) => {
        impl Add for $ty {
            type Output = $ty;

            fn add(self, rhs: Self) -> Self::Output {
                $ty { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl AddAssign for $ty {
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl Sub for $ty {
            type Output = $ty;

            fn sub(self, rhs: Self) -> Self::Output {
                $ty { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl SubAssign for $ty {
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }
    };
}

impl_component_ops!(BlockIndex { x, y, z });
impl_component_ops!(BlockPos { x, y, z });
impl_component_ops!(ChunkPos { x, z });
impl_component_ops!(ChunkIndex { x, z });
