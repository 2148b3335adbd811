use glam::Vec3;
use tessera_shared::coords::BlockPos;

use crate::mesher::BlockProbe;

/// Distance from the observer's feet to the camera.
pub const EYE_HEIGHT: f32 = 1.65;

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Body {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
        }
    }

    pub fn from_eye(eye: Vec3) -> Self {
        Self::new(eye - Vec3::Y * EYE_HEIGHT)
    }

    pub fn eye(&self) -> Vec3 {
        self.position + Vec3::Y * EYE_HEIGHT
    }

    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        self.velocity.y += gravity * dt;
        self.position += self.velocity * dt;
    }
}

/// Lifts a body whose feet sank into a solid block onto the top of that block
/// and stops its vertical motion. Returns whether a correction happened.
pub fn resolve_ground_collision(probe: &dyn BlockProbe, body: &mut Body) -> bool {
    if !probe.is_solid(BlockPos::from_vec3(body.position)) {
        return false;
    }

    body.position.y = (body.position.y + 1.0).floor();
    body.velocity.y = 0.0;
    true
}
