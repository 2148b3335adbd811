use glam::Vec3;
use rayon::prelude::*;
use tessera_shared::block::BlockId;
use tessera_shared::chunk::ChunkData;
use tessera_shared::coords::{BlockIndex, BlockPos, ChunkPos, CHUNK_VOLUME};
use tessera_shared::geometry::{cube_quads, foliage_quads, Quad};

/// Probes sample the cell containing `point + PROBE_NUDGE`, which keeps
/// integer-aligned template positions from landing on a cell boundary.
const PROBE_NUDGE: f32 = 0.1;

const AXIS_NEIGHBORS: [BlockPos; 6] = [
    BlockPos::new(1, 0, 0),
    BlockPos::new(-1, 0, 0),
    BlockPos::new(0, 1, 0),
    BlockPos::new(0, -1, 0),
    BlockPos::new(0, 0, 1),
    BlockPos::new(0, 0, -1),
];

/// World lookup the mesher uses to see across chunk boundaries.
pub trait BlockProbe: Sync {
    fn block_at(&self, pos: BlockPos) -> Option<BlockId>;

    /// Positions with no block (outside the loaded world) count as open.
    fn is_solid(&self, pos: BlockPos) -> bool {
        self.block_at(pos).is_some_and(BlockId::is_solid)
    }
}

impl<F> BlockProbe for F
where
    F: Fn(BlockPos) -> Option<BlockId> + Sync,
{
    fn block_at(&self, pos: BlockPos) -> Option<BlockId> {
        self(pos)
    }
}

fn probe_cell(point: Vec3) -> BlockPos {
    BlockPos::from_vec3(point + Vec3::splat(PROBE_NUDGE))
}

/// Ambient term for a vertex: the share of the six axis neighbors of its cell
/// that are open, scaled to 0..=255.
pub fn ambient_at(cell: BlockPos, probe: &dyn BlockProbe) -> u8 {
    let open = AXIS_NEIGHBORS
        .iter()
        .filter(|offset| !probe.is_solid(cell + **offset))
        .count();
    (255.0 * open as f32 / AXIS_NEIGHBORS.len() as f32).round() as u8
}

fn emit_template(template: &Quad, block_pos: BlockPos, block: BlockId, probe: &dyn BlockProbe) -> Quad {
    let origin = block_pos.as_vec3();
    let mut quad = *template;
    for vertex in quad.vertices_mut() {
        let position = vertex.position() + origin;
        vertex.position = position.to_array();
        vertex.ambient = ambient_at(probe_cell(position), probe);
        vertex.block = block;
    }
    quad
}

/// Foliage is all-or-nothing: the whole cross is emitted as soon as any
/// axis neighbor is open.
fn foliage_block_quads(block_pos: BlockPos, block: BlockId, probe: &dyn BlockProbe, out: &mut Vec<Quad>) {
    let enclosed = AXIS_NEIGHBORS
        .iter()
        .all(|offset| probe.is_solid(block_pos + *offset));
    if enclosed {
        return;
    }

    out.extend(
        foliage_quads()
            .iter()
            .map(|template| emit_template(template, block_pos, block, probe)),
    );
}

fn cube_block_quads(block_pos: BlockPos, block: BlockId, probe: &dyn BlockProbe, out: &mut Vec<Quad>) {
    let origin = block_pos.as_vec3();
    for template in cube_quads() {
        let facing = probe_cell(origin + template.normal());
        if probe.is_solid(facing) {
            continue;
        }
        out.push(emit_template(template, block_pos, block, probe));
    }
}

pub fn block_quads(block_pos: BlockPos, block: BlockId, probe: &dyn BlockProbe) -> Vec<Quad> {
    let mut quads = Vec::new();
    if block.is_gas() {
        return quads;
    }

    if block.is_foliage() {
        foliage_block_quads(block_pos, block, probe, &mut quads);
    } else {
        cube_block_quads(block_pos, block, probe, &mut quads);
    }
    quads
}

/// Builds the surface geometry of one chunk.
///
/// Every voxel is processed as its own task on the current rayon pool and
/// writes into a private buffer; buffers are concatenated in block-index
/// order, so the output is deterministic for a given chunk and probe.
pub fn mesh_chunk(chunk_pos: ChunkPos, chunk: &ChunkData, probe: &dyn BlockProbe) -> Vec<Quad> {
    (0..CHUNK_VOLUME)
        .into_par_iter()
        .flat_map_iter(|offset| {
            let block = chunk.get_index(offset);
            let block_pos = BlockPos::from_index(chunk_pos, BlockIndex::from_int(offset));
            block_quads(block_pos, block, probe)
        })
        .collect()
}
