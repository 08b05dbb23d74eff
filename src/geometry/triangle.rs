use crate::geometry::{WorldPoint, WorldVector};

/// Shading properties of a triangle, carried through to the GPU buffers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: WorldVector,
    pub emission_color: WorldVector,
    pub emission_strength: f32,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            color: WorldVector::new(0.7, 0.7, 0.7),
            emission_color: WorldVector::zeros(),
            emission_strength: 0.0,
        }
    }
}

/// A mesh triangle: vertex positions, per-vertex normals, the precomputed
/// centroid and a material. Triangles live in one contiguous table and are
/// addressed by `u32` index everywhere in the builder.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [WorldPoint; 3],
    pub normals: [WorldVector; 3],
    pub centroid: WorldPoint,
    pub material: Material,
}

impl Triangle {
    pub fn new(
        vertices: [WorldPoint; 3],
        normals: [WorldVector; 3],
        material: Material,
    ) -> Triangle {
        let centroid = WorldPoint::from(
            (vertices[0].coords + vertices[1].coords + vertices[2].coords) / 3.0,
        );
        Triangle {
            vertices,
            normals,
            centroid,
            material,
        }
    }
}
