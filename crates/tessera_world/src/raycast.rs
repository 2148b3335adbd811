use glam::Vec3;
use tessera_shared::block::BlockId;
use tessera_shared::coords::{BlockIndex, BlockPos, ChunkIndex, CHUNK_EXTENT};
use tessera_shared::physics::{Ray, AABB};

use crate::world::World;

const AXIS_DIRECTIONS: [Vec3; 6] = [
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::Z,
    Vec3::NEG_Z,
];

/// A picked block and the outward normal of the face the ray struck.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HitPayload {
    pub chunk: ChunkIndex,
    pub block: BlockIndex,
    pub normal: Vec3,
}

impl World {
    /// Closest non-gas block the ray touches strictly closer than `reach`.
    ///
    /// Chunk boxes that the ray crosses are collected first, then every
    /// occupied block inside them is tested. When two blocks are hit at
    /// exactly the same distance the one visited first wins, which follows
    /// slot order and then block-index order.
    pub fn cast_ray(&self, ray: &Ray, reach: f32) -> Option<HitPayload> {
        let width = self.width();
        let candidates = (0..self.chunk_count()).filter(|slot| {
            let origin = self
                .chunk_position(ChunkIndex::from_int(*slot, width))
                .as_vec3();
            ray.intersect_aabb(&AABB::new(origin, origin + CHUNK_EXTENT))
                .is_some()
        });

        let mut best: Option<(f32, HitPayload)> = None;
        for slot in candidates {
            let chunk = ChunkIndex::from_int(slot, width);
            for (block, _) in self.chunk_linear(slot).data.occupied() {
                let aabb = AABB::unit_block(self.block_world_position(chunk, block).as_vec3());
                let Some(point) = ray.intersect_aabb(&aabb) else {
                    continue;
                };

                let distance = point.distance(ray.origin);
                if !distance.is_finite()
                    || distance >= reach
                    || best.is_some_and(|(closest, _)| distance >= closest)
                {
                    continue;
                }
                best = Some((
                    distance,
                    HitPayload {
                        chunk,
                        block,
                        normal: aabb.face_normal(point),
                    },
                ));
            }
        }
        best.map(|(_, hit)| hit)
    }

    /// Steps from the hit block one cell along the axis that best matches the
    /// hit normal, i.e. the empty cell in front of the picked face. `None`
    /// when that cell is outside the grid or the height range.
    pub fn adjust_by_normal(&self, hit: &HitPayload) -> Option<HitPayload> {
        let mut direction = AXIS_DIRECTIONS[0];
        let mut best_dot = f32::NEG_INFINITY;
        for candidate in AXIS_DIRECTIONS {
            let dot = candidate.dot(hit.normal);
            if dot > best_dot {
                best_dot = dot;
                direction = candidate;
            }
        }

        let target = self.block_world_position(hit.chunk, hit.block).as_vec3() + direction;
        let (chunk, block) = self.locate(BlockPos::from_vec3(target))?;
        Some(HitPayload {
            chunk,
            block,
            normal: hit.normal,
        })
    }

    pub fn break_block(&mut self, hit: &HitPayload) -> bool {
        self.remove_block(hit.chunk, hit.block)
    }

    /// Places `block` in the cell in front of the picked face and returns
    /// where it went.
    pub fn place_against(&mut self, hit: &HitPayload, block: BlockId) -> Option<HitPayload> {
        let target = self.adjust_by_normal(hit)?;
        self.place_block(target.chunk, target.block, block)
            .then_some(target)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use tessera_core::jobs::JobSystem;
    use tessera_shared::block::BlockId;
    use tessera_shared::coords::{BlockIndex, ChunkIndex};
    use tessera_shared::physics::Ray;
    use tessera_shared::worldgen::{StrataGenerator, StrataLayers};

    use super::HitPayload;
    use crate::persistence::ChunkSource;
    use crate::world::World;

    fn empty_world() -> World {
        World::new(
            ChunkSource::in_memory(StrataGenerator::new(StrataLayers::EMPTY)),
            JobSystem::new(Some(2)).expect("build job system"),
            1,
            Vec3::ZERO,
        )
    }

    #[test]
    fn empty_world_has_nothing_to_hit() {
        let world = empty_world();
        let ray = Ray::new(Vec3::new(0.5, 10.0, 0.5), Vec3::NEG_Y);
        assert!(world.cast_ray(&ray, 100.0).is_none());
    }

    #[test]
    fn closest_block_wins_and_reach_is_respected() {
        let mut world = empty_world();
        let center = ChunkIndex::new(1, 1);
        assert!(world.place_block(center, BlockIndex::new(4, 2, 4), BlockId::STONE));
        assert!(world.place_block(center, BlockIndex::new(4, 6, 4), BlockId::PLANKS));

        let ray = Ray::new(Vec3::new(4.5, 20.0, 4.5), Vec3::NEG_Y);
        let hit = world.cast_ray(&ray, 30.0).expect("ray should hit");
        assert_eq!(hit.block, BlockIndex::new(4, 6, 4));
        assert_eq!(hit.normal, Vec3::Y);

        assert!(world.cast_ray(&ray, 12.9).is_none());
        // The planks top sits exactly 13 below the origin.
        assert!(world.cast_ray(&ray, 13.0).is_none());
        assert!(world.cast_ray(&ray, 13.01).is_some());
    }

    #[test]
    fn ray_without_direction_picks_nothing() {
        let mut world = empty_world();
        assert!(world.place_block(ChunkIndex::new(1, 1), BlockIndex::new(1, 1, 1), BlockId::STONE));
        let stuck = Ray::new(Vec3::new(1.5, 1.5, 1.5), Vec3::ZERO);
        assert!(world.cast_ray(&stuck, 10.0).is_none());
    }

    #[test]
    fn side_hits_report_axis_normals() {
        let mut world = empty_world();
        assert!(world.place_block(ChunkIndex::new(1, 1), BlockIndex::new(0, 0, 0), BlockId::COBBLE));

        let from_negative_x = Ray::new(Vec3::new(-3.0, 0.5, 0.25), Vec3::X);
        let hit = world.cast_ray(&from_negative_x, 10.0).expect("hit from -x");
        assert_eq!(hit.normal, Vec3::NEG_X);

        let from_positive_z = Ray::new(Vec3::new(0.7, 0.2, 4.0), Vec3::NEG_Z);
        let hit = world.cast_ray(&from_positive_z, 10.0).expect("hit from +z");
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn foliage_is_pickable() {
        let mut world = empty_world();
        assert!(world.place_block(ChunkIndex::new(0, 0), BlockIndex::new(8, 1, 8), BlockId::DANDELION));
        let ray = Ray::new(Vec3::new(-7.5, 8.0, -7.5), Vec3::NEG_Y);
        let hit = world.cast_ray(&ray, 10.0).expect("foliage hit");
        assert_eq!(hit.chunk, ChunkIndex::new(0, 0));
        assert_eq!(hit.block, BlockIndex::new(8, 1, 8));
    }

    #[test]
    fn adjust_by_normal_crosses_chunk_borders() {
        let world = empty_world();
        let hit = HitPayload {
            chunk: ChunkIndex::new(1, 1),
            block: BlockIndex::new(15, 3, 7),
            normal: Vec3::new(0.9, 0.3, 0.1),
        };
        let adjusted = world.adjust_by_normal(&hit).expect("cell inside grid");
        assert_eq!(adjusted.chunk, ChunkIndex::new(2, 1));
        assert_eq!(adjusted.block, BlockIndex::new(0, 3, 7));

        let top = HitPayload {
            block: BlockIndex::new(2, 63, 2),
            normal: Vec3::Y,
            ..hit
        };
        assert!(world.adjust_by_normal(&top).is_none());

        let edge = HitPayload {
            chunk: ChunkIndex::new(0, 1),
            block: BlockIndex::new(0, 3, 3),
            normal: Vec3::NEG_X,
        };
        assert!(world.adjust_by_normal(&edge).is_none());
    }

    #[test]
    fn place_against_and_break_block_edit_the_picked_cells() {
        let mut world = empty_world();
        let center = ChunkIndex::new(1, 1);
        assert!(world.place_block(center, BlockIndex::new(3, 0, 3), BlockId::DIRT));

        let ray = Ray::new(Vec3::new(3.5, 10.0, 3.5), Vec3::NEG_Y);
        let hit = world.cast_ray(&ray, 20.0).expect("hit dirt");
        let placed = world.place_against(&hit, BlockId::PLANKS).expect("placed above");
        assert_eq!(placed.block, BlockIndex::new(3, 1, 3));
        assert_eq!(world.chunk(center).data.get(placed.block), Some(BlockId::PLANKS));

        let hit = world.cast_ray(&ray, 20.0).expect("hit planks");
        assert_eq!(hit.block, BlockIndex::new(3, 1, 3));
        assert!(world.break_block(&hit));
        assert_eq!(world.chunk(center).data.get(hit.block), Some(BlockId::AIR));
    }
}
