use std::sync::OnceLock;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::block::BlockId;

/// The only texture coordinates block meshes use, addressed by `Vertex::texture`.
pub const TEXTURE_CORNERS: [Vec2; 4] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
];

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    /// Index into `TEXTURE_CORNERS`.
    pub texture: u8,
    /// 0 is fully occluded, 255 fully open.
    pub ambient: u8,
    pub block: BlockId,
    _padding: u8,
}
const _: [(); 16] = [(); std::mem::size_of::<Vertex>()];

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Quad {
    pub triangles: [Triangle; 2],
}

impl Vertex {
    pub fn new(position: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            texture: nearest_texture_corner(uv),
            ambient: 0,
            block: BlockId::AIR,
            _padding: 0,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

impl Triangle {
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self { vertices: [a, b, c] }
    }

    /// Unit normal from counter-clockwise winding `(b - a) × (c - a)`.
    pub fn normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices.map(|vertex| vertex.position());
        (b - a).cross(c - a).normalize_or_zero()
    }

    fn mirrored_z(mut self) -> Self {
        for vertex in &mut self.vertices {
            vertex.position[2] = 1.0 - vertex.position[2];
        }
        self
    }

    fn reversed(mut self) -> Self {
        self.vertices.swap(0, 2);
        self
    }
}

impl Quad {
    pub fn new(first: Triangle, second: Triangle) -> Self {
        Self {
            triangles: [first, second],
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.triangles[0].normal()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.triangles.iter().flat_map(|triangle| triangle.vertices.iter())
    }

    pub fn vertices_mut(&mut self) -> impl Iterator<Item = &mut Vertex> {
        self.triangles
            .iter_mut()
            .flat_map(|triangle| triangle.vertices.iter_mut())
    }
}

/// Index of the canonical corner closest to `uv` (first wins on ties).
pub fn nearest_texture_corner(uv: Vec2) -> u8 {
    let mut best = 0u8;
    let mut best_distance = f32::INFINITY;
    for (index, corner) in TEXTURE_CORNERS.iter().enumerate() {
        let distance = uv.distance(*corner);
        if distance < best_distance {
            best_distance = distance;
            best = index as u8;
        }
    }
    best
}

#[derive(Copy, Clone)]
struct CubeFace {
    normal: Vec3,
    u: Vec3,
    v: Vec3,
}

// u × v == normal for every face, so both triangles wind outward.
const CUBE_FACES: [CubeFace; 6] = [
    // +X
    CubeFace {
        normal: Vec3::X,
        u: Vec3::Y,
        v: Vec3::Z,
    },
    // -X
    CubeFace {
        normal: Vec3::NEG_X,
        u: Vec3::Z,
        v: Vec3::Y,
    },
    // +Y
    CubeFace {
        normal: Vec3::Y,
        u: Vec3::Z,
        v: Vec3::X,
    },
    // -Y
    CubeFace {
        normal: Vec3::NEG_Y,
        u: Vec3::X,
        v: Vec3::Z,
    },
    // +Z
    CubeFace {
        normal: Vec3::Z,
        u: Vec3::X,
        v: Vec3::Y,
    },
    // -Z
    CubeFace {
        normal: Vec3::NEG_Z,
        u: Vec3::Y,
        v: Vec3::X,
    },
];

fn face_uv(face: &CubeFace, position: Vec3) -> Vec2 {
    if face.normal.y != 0.0 {
        Vec2::new(position.x, position.z)
    } else if face.normal.x != 0.0 {
        Vec2::new(position.z, 1.0 - position.y)
    } else {
        Vec2::new(position.x, 1.0 - position.y)
    }
}

fn build_cube_quads() -> Vec<Quad> {
    CUBE_FACES
        .iter()
        .map(|face| {
            // Faces with a positive normal sit on the far side of the unit cube.
            let base = face.normal.max(Vec3::ZERO);
            let corners = [base, base + face.u, base + face.u + face.v, base + face.v];
            let [p0, p1, p2, p3] = corners.map(|corner| Vertex::new(corner, face_uv(face, corner)));
            Quad::new(Triangle::new(p0, p1, p2), Triangle::new(p0, p2, p3))
        })
        .collect()
}

fn build_foliage_quads() -> Vec<Quad> {
    let near = (2.0f32.sqrt() - 1.0) / (2.0 * 2.0f32.sqrt());
    let far = 1.0 - near;

    let upper = Triangle::new(
        Vertex::new(Vec3::new(near, 0.0, near), Vec2::new(0.0, 1.0)),
        Vertex::new(Vec3::new(near, 1.0, near), Vec2::new(0.0, 0.0)),
        Vertex::new(Vec3::new(far, 1.0, far), Vec2::new(1.0, 0.0)),
    );
    let lower = Triangle::new(
        Vertex::new(Vec3::new(near, 0.0, near), Vec2::new(0.0, 1.0)),
        Vertex::new(Vec3::new(far, 1.0, far), Vec2::new(1.0, 0.0)),
        Vertex::new(Vec3::new(far, 0.0, far), Vec2::new(1.0, 1.0)),
    );

    let mut quads = Vec::with_capacity(4);
    quads.push(Quad::new(upper, lower));

    let (upper, lower) = (upper.mirrored_z(), lower.mirrored_z());
    quads.push(Quad::new(upper, lower));

    let (upper, lower) = (upper.reversed(), lower.reversed());
    quads.push(Quad::new(upper, lower));

    let (upper, lower) = (upper.mirrored_z(), lower.mirrored_z());
    quads.push(Quad::new(upper, lower));

    quads
}

/// Six faces of a unit cube with its origin at the minimum corner, ordered
/// +X, -X, +Y, -Y, +Z, -Z.
pub fn cube_quads() -> &'static [Quad] {
    static QUADS: OnceLock<Vec<Quad>> = OnceLock::new();
    QUADS.get_or_init(build_cube_quads)
}

/// Two diagonal planes, each emitted with both windings.
pub fn foliage_quads() -> &'static [Quad] {
    static QUADS: OnceLock<Vec<Quad>> = OnceLock::new();
    QUADS.get_or_init(build_foliage_quads)
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::{cube_quads, foliage_quads, nearest_texture_corner, Quad, TEXTURE_CORNERS};

    fn face_center(quad: &Quad) -> Vec3 {
        let sum: Vec3 = quad.vertices().map(|vertex| vertex.position()).sum();
        sum / 6.0
    }

    #[test]
    fn nearest_corner_snaps_to_canonical_uvs() {
        for (index, corner) in TEXTURE_CORNERS.iter().enumerate() {
            assert_eq!(usize::from(nearest_texture_corner(*corner)), index);
        }
        assert_eq!(nearest_texture_corner(Vec2::new(0.9, 0.2)), 2);
        assert_eq!(nearest_texture_corner(Vec2::new(0.1, 0.8)), 0);
    }

    #[test]
    fn cube_template_has_one_outward_quad_per_axis_direction() {
        let quads = cube_quads();
        assert_eq!(quads.len(), 6);

        let expected = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
        for (quad, normal) in quads.iter().zip(expected) {
            assert!((quad.normal() - normal).length() < 1e-6);
            assert!((quad.triangles[1].normal() - normal).length() < 1e-6);

            let outward = face_center(quad) - Vec3::splat(0.5);
            assert!(outward.dot(normal) > 0.49, "face {normal} is not on the cube surface");
            for vertex in quad.vertices() {
                let position = vertex.position();
                assert!(position.cmpge(Vec3::ZERO).all() && position.cmple(Vec3::ONE).all());
                assert!(vertex.texture < 4);
            }
        }
    }

    #[test]
    fn cube_faces_cover_all_four_texture_corners() {
        for quad in cube_quads() {
            let mut seen = [false; 4];
            for vertex in quad.vertices() {
                seen[usize::from(vertex.texture)] = true;
            }
            assert_eq!(seen, [true; 4]);
        }
    }

    #[test]
    fn foliage_template_spans_both_diagonals_with_both_windings() {
        let quads = foliage_quads();
        assert_eq!(quads.len(), 4);

        let near = (2.0f32.sqrt() - 1.0) / (2.0 * 2.0f32.sqrt());
        for quad in quads {
            for vertex in quad.vertices() {
                let position = vertex.position();
                assert!(position.x >= near - 1e-6 && position.x <= 1.0 - near + 1e-6);
                assert!(position.z >= near - 1e-6 && position.z <= 1.0 - near + 1e-6);
                assert!(position.y == 0.0 || position.y == 1.0);
            }
            assert!(quad.normal().y.abs() < 1e-6);
        }

        assert!((quads[0].normal() + quads[3].normal()).length() < 1e-5);
        assert!((quads[1].normal() + quads[2].normal()).length() < 1e-5);
        assert!(quads[0].normal().dot(quads[1].normal()).abs() < 1e-5);
    }
}
