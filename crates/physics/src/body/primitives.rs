use super::{Face, PolyhedronBuilder};
use crate::geometry::Triangle;
use crate::types::Vec3;

/// Ready-made convex solids, centred on the local origin (the pyramid
/// stands on it).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Primitive {
    /// Edge length `size`.
    Cube,
    /// Square base of side `size` in the y = 0 plane, apex `size` above it.
    Pyramid,
    /// Vertices `size / 2` out along each axis.
    Octahedron,
    /// Regular tetrahedron inscribed in the cube of edge `size`.
    Tetrahedron,
}

impl Primitive {
    pub const ALL: [Self; 4] = [Self::Cube, Self::Pyramid, Self::Octahedron, Self::Tetrahedron];

    /// Surface of the solid scaled by `size` and shifted to `origin`.
    pub fn builder(self, size: f64, origin: Vec3) -> PolyhedronBuilder {
        let (points, faces) = match self {
            Self::Cube => cube(size),
            Self::Pyramid => pyramid(size),
            Self::Octahedron => octahedron(size),
            Self::Tetrahedron => tetrahedron(size),
        };
        let faces = faces
            .iter()
            .map(|&[a, b, c]| Face::new(Triangle::new(points[a], points[b], points[c])))
            .collect();
        PolyhedronBuilder::new(points, faces).with_origin(origin)
    }
}

type Surface = (Vec<Vec3>, Vec<[usize; 3]>);

fn quad(a: usize, b: usize, c: usize, d: usize) -> [[usize; 3]; 2] {
    [[a, b, c], [a, c, d]]
}

fn cube(size: f64) -> Surface {
    let h = size / 2.0;
    // bit 0 selects +x, bit 1 +y, bit 2 +z
    let points = (0..8)
        .map(|i| {
            let pick = |bit: usize| if i & bit == 0 { -h } else { h };
            Vec3::new(pick(1), pick(2), pick(4))
        })
        .collect();
    let faces = [
        quad(0, 2, 6, 4),
        quad(1, 3, 7, 5),
        quad(0, 1, 5, 4),
        quad(2, 3, 7, 6),
        quad(0, 1, 3, 2),
        quad(4, 5, 7, 6),
    ]
    .concat();
    (points, faces)
}

fn pyramid(size: f64) -> Surface {
    let h = size / 2.0;
    let points = vec![
        Vec3::new(-h, 0.0, -h),
        Vec3::new(h, 0.0, -h),
        Vec3::new(h, 0.0, h),
        Vec3::new(-h, 0.0, h),
        Vec3::new(0.0, size, 0.0),
    ];
    let mut faces = quad(0, 1, 2, 3).to_vec();
    faces.extend([[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]]);
    (points, faces)
}

fn octahedron(size: f64) -> Surface {
    let h = size / 2.0;
    let points = vec![
        Vec3::new(h, 0.0, 0.0),
        Vec3::new(-h, 0.0, 0.0),
        Vec3::new(0.0, h, 0.0),
        Vec3::new(0.0, -h, 0.0),
        Vec3::new(0.0, 0.0, h),
        Vec3::new(0.0, 0.0, -h),
    ];
    let mut faces = Vec::with_capacity(8);
    for x in [0, 1] {
        for y in [2, 3] {
            for z in [4, 5] {
                faces.push([x, y, z]);
            }
        }
    }
    (points, faces)
}

fn tetrahedron(size: f64) -> Surface {
    let h = size / 2.0;
    let points = vec![
        Vec3::new(h, h, h),
        Vec3::new(h, -h, -h),
        Vec3::new(-h, h, -h),
        Vec3::new(-h, -h, h),
    ];
    let faces = vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    (points, faces)
}
