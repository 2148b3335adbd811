use std::io;

use glam::Vec3;
use rayon::prelude::*;
use tessera_core::jobs::JobSystem;
use tessera_shared::block::BlockId;
use tessera_shared::chunk::ChunkData;
use tessera_shared::coords::{
    BlockIndex, BlockPos, ChunkIndex, ChunkPos, CHUNK_EXTENT, CHUNK_VOLUME, CHUNK_WIDTH_I32,
    MAX_CHUNK_COORD, MIN_CHUNK_COORD,
};
use tessera_shared::geometry::Quad;
use tessera_shared::physics::{Plane, AABB};
use tessera_shared::worldgen::StrataGenerator;
use tracing::{debug, info};

use crate::mesher::{mesh_chunk, BlockProbe};
use crate::persistence::ChunkSource;
use crate::settings::WorldSettings;

/// Surface geometry of one chunk. `revision` changes on every re-mesh so a
/// renderer can tell when its uploaded copy is stale.
#[derive(Debug, Clone, Default)]
pub struct ChunkMesh {
    pub quads: Vec<Quad>,
    pub revision: u64,
}

#[derive(Debug, Clone)]
pub struct Chunk {
    pub data: ChunkData,
    pub mesh: ChunkMesh,
}

impl Chunk {
    fn new(data: ChunkData) -> Self {
        Self {
            data,
            mesh: ChunkMesh::default(),
        }
    }
}

struct GridProbe<'a> {
    chunks: &'a [Chunk],
    first: ChunkPos,
    width: i32,
}

impl BlockProbe for GridProbe<'_> {
    fn block_at(&self, pos: BlockPos) -> Option<BlockId> {
        let (chunk, block) = locate_in_grid(self.first, self.width, pos)?;
        self.chunks[chunk.to_int(self.width)].data.get(block)
    }
}

fn locate_in_grid(first: ChunkPos, width: i32, pos: BlockPos) -> Option<(ChunkIndex, BlockIndex)> {
    let chunk_pos = pos.chunk_pos();
    let offset = ChunkPos::new(
        chunk_pos.x.checked_sub(first.x)?,
        chunk_pos.z.checked_sub(first.z)?,
    );
    let chunk = offset.to_index();
    if !chunk.is_valid(width) {
        return None;
    }
    let block = pos.to_index(chunk_pos);
    block.is_valid().then_some((chunk, block))
}

/// Square grid of `(2R+1)²` chunks centered on the chunk that contains the
/// world center. Slots are stored row-major by `ChunkIndex`.
pub struct World {
    render_distance: u32,
    world_center: Vec3,
    chunks: Vec<Chunk>,
    scratch: Vec<Option<Chunk>>,
    lookup: Vec<BlockId>,
    source: ChunkSource,
    jobs: JobSystem,
    mesh_revision: u64,
}

impl World {
    /// Builds the world and runs a full regenerate around `world_center`.
    pub fn new(source: ChunkSource, jobs: JobSystem, render_distance: u32, world_center: Vec3) -> Self {
        let mut world = Self {
            render_distance,
            world_center,
            chunks: Vec::new(),
            scratch: Vec::new(),
            lookup: Vec::new(),
            source,
            jobs,
            mesh_revision: 0,
        };
        world.set_render_distance(render_distance);
        world
    }

    pub fn from_settings(settings: &WorldSettings) -> io::Result<Self> {
        let jobs = JobSystem::new(settings.worker_threads)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, format!("failed to start workers: {err}")))?;
        let source = ChunkSource::open(settings.chunk_dir(), StrataGenerator::new(settings.strata))?;
        Ok(Self::new(
            source,
            jobs,
            settings.render_distance,
            settings.world_center,
        ))
    }

    pub fn render_distance(&self) -> u32 {
        self.render_distance
    }

    pub fn width(&self) -> i32 {
        self.render_distance as i32 * 2 + 1
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn world_center(&self) -> Vec3 {
        self.world_center
    }

    pub fn source(&self) -> &ChunkSource {
        &self.source
    }

    /// Chunk containing the world center, pulled in from the edge of the
    /// coordinate range far enough that the grid and its one-chunk border
    /// stay addressable.
    pub fn center_chunk_pos(&self) -> ChunkPos {
        let margin = self.render_distance as i32 + 1;
        let index = ChunkPos::from_world(self.world_center).to_index();
        let keep_inside = |value: i32| value.clamp(MIN_CHUNK_COORD + margin, MAX_CHUNK_COORD - margin);
        ChunkPos::from_index(ChunkIndex::new(keep_inside(index.x), keep_inside(index.z)))
    }

    /// Origin of the chunk in slot (0, 0).
    pub fn first_chunk_pos(&self) -> ChunkPos {
        let offset = self.render_distance as i32 * CHUNK_WIDTH_I32;
        self.center_chunk_pos() - ChunkPos::new(offset, offset)
    }

    pub fn chunk_position(&self, index: ChunkIndex) -> ChunkPos {
        self.first_chunk_pos() + ChunkPos::from_index(index)
    }

    pub fn block_world_position(&self, chunk: ChunkIndex, block: BlockIndex) -> BlockPos {
        BlockPos::from_index(self.chunk_position(chunk), block)
    }

    /// Grid slot and local index of a world block, or `None` outside the grid
    /// or the vertical range.
    pub fn locate(&self, pos: BlockPos) -> Option<(ChunkIndex, BlockIndex)> {
        locate_in_grid(self.first_chunk_pos(), self.width(), pos)
    }

    pub fn world_block_at(&self, pos: BlockPos) -> Option<BlockId> {
        let (chunk, block) = self.locate(pos)?;
        self.chunk(chunk).data.get(block)
    }

    /// The index must lie inside the grid; use [`World::get_chunk`] otherwise.
    pub fn chunk(&self, index: ChunkIndex) -> &Chunk {
        &self.chunks[index.to_int(self.width())]
    }

    pub fn chunk_linear(&self, index: usize) -> &Chunk {
        &self.chunks[index]
    }

    pub fn get_chunk(&self, index: ChunkIndex) -> Option<&Chunk> {
        let width = self.width();
        index
            .is_valid(width)
            .then(|| &self.chunks[index.to_int(width)])
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Every chunk's voxels back to back in slot order, for renderers that
    /// sample the whole grid at once.
    pub fn lookup_buffer(&self) -> &[BlockId] {
        &self.lookup
    }

    /// True when any corner of the chunk's box lies in front of `plane`.
    pub fn chunk_visible(&self, plane: &Plane, index: usize) -> bool {
        let origin = self
            .chunk_position(ChunkIndex::from_int(index, self.width()))
            .as_vec3();
        AABB::new(origin, origin + CHUNK_EXTENT)
            .corners()
            .iter()
            .any(|corner| plane.in_front(*corner))
    }

    /// Resizes the grid and rebuilds every chunk: load-or-generate all slots,
    /// then mesh all slots, then refresh the lookup buffer.
    pub fn set_render_distance(&mut self, render_distance: u32) {
        self.render_distance = render_distance;
        let width = self.width();
        let count = (width * width) as usize;
        let first = self.first_chunk_pos();

        let source = &self.source;
        let data: Vec<ChunkData> = self.jobs.install(|| {
            (0..count)
                .into_par_iter()
                .map(|slot| source.generate_or_load(first + ChunkPos::from_index(ChunkIndex::from_int(slot, width))))
                .collect()
        });
        self.chunks = data.into_iter().map(Chunk::new).collect();

        let slots: Vec<usize> = (0..count).collect();
        self.mesh_slots(&slots);
        self.rebuild_lookup();

        info!(
            "Regenerated {}x{} chunks around {:?}",
            width, width, self.center_chunk_pos()
        );
    }

    /// Moves the grid so it is centered on the chunk containing `center`.
    /// Chunks that stay in view keep their voxels and geometry; only slots
    /// that come into view are loaded and meshed.
    pub fn set_world_center(&mut self, center: Vec3) {
        let old_center = self.center_chunk_pos();
        self.world_center = center;
        let new_center = self.center_chunk_pos();
        if new_center == old_center {
            return;
        }

        let delta = new_center.to_index() - old_center.to_index();
        let width = self.width();
        let count = self.chunks.len();
        let first = self.first_chunk_pos();

        self.scratch.clear();
        self.scratch.extend(self.chunks.drain(..).map(Some));

        let exposed: Vec<usize> = (0..count)
            .filter(|slot| !(ChunkIndex::from_int(*slot, width) + delta).is_valid(width))
            .collect();

        let source = &self.source;
        let generated: Vec<(usize, ChunkData)> = self.jobs.install(|| {
            exposed
                .par_iter()
                .map(|slot| {
                    let pos = first + ChunkPos::from_index(ChunkIndex::from_int(*slot, width));
                    (*slot, source.generate_or_load(pos))
                })
                .collect()
        });
        let mut generated = generated.into_iter().peekable();

        let mut chunks = Vec::with_capacity(count);
        for slot in 0..count {
            let source_index = ChunkIndex::from_int(slot, width) + delta;
            let reused = source_index
                .is_valid(width)
                .then(|| self.scratch[source_index.to_int(width)].take())
                .flatten();
            let chunk = match reused {
                Some(chunk) => chunk,
                None => match generated.next_if(|(generated_slot, _)| *generated_slot == slot) {
                    Some((_, data)) => Chunk::new(data),
                    None => Chunk::new(
                        self.source
                            .generate_or_load(first + ChunkPos::from_index(ChunkIndex::from_int(slot, width))),
                    ),
                },
            };
            chunks.push(chunk);
        }
        self.chunks = chunks;
        self.scratch.clear();

        self.mesh_slots(&exposed);
        self.rebuild_lookup();

        info!(
            "Shifted world by ({}, {}) chunks to {:?}, {} exposed",
            delta.x,
            delta.z,
            new_center,
            exposed.len()
        );
    }

    /// Writes `block` into one chunk, then re-meshes and re-saves only that
    /// chunk. Returns `false` when either index is out of range.
    pub fn place_block(&mut self, chunk: ChunkIndex, block: BlockIndex, id: BlockId) -> bool {
        let width = self.width();
        if !chunk.is_valid(width) {
            return false;
        }
        let slot = chunk.to_int(width);
        if !self.chunks[slot].data.set(block, id) {
            return false;
        }

        self.mesh_slots(&[slot]);
        let pos = self.chunk_position(chunk);
        self.source.save(pos, &self.chunks[slot].data);
        self.rebuild_lookup();
        debug!("Set block {:?} in chunk {:?} to {:?}", block, pos, id);
        true
    }

    pub fn remove_block(&mut self, chunk: ChunkIndex, block: BlockIndex) -> bool {
        self.place_block(chunk, block, BlockId::AIR)
    }

    fn mesh_slots(&mut self, slots: &[usize]) {
        if slots.is_empty() {
            return;
        }

        let width = self.width();
        let probe = GridProbe {
            chunks: &self.chunks,
            first: self.first_chunk_pos(),
            width,
        };
        let meshes: Vec<Vec<Quad>> = self.jobs.install(|| {
            slots
                .par_iter()
                .map(|slot| {
                    let pos = probe.first + ChunkPos::from_index(ChunkIndex::from_int(*slot, width));
                    mesh_chunk(pos, &probe.chunks[*slot].data, &probe)
                })
                .collect()
        });

        for (slot, quads) in slots.iter().zip(meshes) {
            self.mesh_revision += 1;
            self.chunks[*slot].mesh = ChunkMesh {
                quads,
                revision: self.mesh_revision,
            };
        }
    }

    fn rebuild_lookup(&mut self) {
        self.lookup.clear();
        self.lookup.reserve(self.chunks.len() * CHUNK_VOLUME);
        for chunk in &self.chunks {
            self.lookup.extend_from_slice(chunk.data.blocks.as_slice());
        }
    }
}

impl BlockProbe for World {
    fn block_at(&self, pos: BlockPos) -> Option<BlockId> {
        self.world_block_at(pos)
    }
}
