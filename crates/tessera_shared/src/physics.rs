use glam::Vec3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Unit box occupied by the block whose minimum corner is `origin`.
    pub fn unit_block(origin: Vec3) -> Self {
        Self::new(origin, origin + Vec3::ONE)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Outward axis normal of the face closest to `point`, found by snapping
    /// `point - center` to its dominant axis relative to the box extent.
    pub fn face_normal(&self, point: Vec3) -> Vec3 {
        let half = (self.max - self.min) * 0.5;
        let offset = (point - self.center()) / half.max(Vec3::splat(f32::EPSILON));
        let abs = offset.abs();
        if abs.x >= abs.y && abs.x >= abs.z {
            Vec3::new(offset.x.signum(), 0.0, 0.0)
        } else if abs.y >= abs.z {
            Vec3::new(0.0, offset.y.signum(), 0.0)
        } else {
            Vec3::new(0.0, 0.0, offset.z.signum())
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test. Returns the point where the ray enters `aabb`, or where it
    /// leaves when the origin is already inside. Boxes behind the origin miss,
    /// and a ray without a direction hits nothing.
    pub fn intersect_aabb(&self, aabb: &AABB) -> Option<Vec3> {
        if self.direction == Vec3::ZERO {
            return None;
        }

        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let direction = self.direction[axis];
            let (min, max) = (aabb.min[axis], aabb.max[axis]);

            if direction == 0.0 {
                if origin < min || origin > max {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t0 = (min - origin) * inv;
            let mut t1 = (max - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        if t_far < 0.0 {
            return None;
        }

        let t = if t_near >= 0.0 { t_near } else { t_far };
        t.is_finite().then(|| self.at(t))
    }
}

/// Half-space used for frustum tests; `normal` points to the visible side.
#[derive(Debug, Copy, Clone)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

impl Plane {
    pub fn new(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            point,
        }
    }

    pub fn in_front(&self, position: Vec3) -> bool {
        (position - self.point).dot(self.normal) > 0.0
    }
}
