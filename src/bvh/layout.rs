use bytemuck::{Pod, Zeroable};

use crate::geometry::Triangle;

/// Material in the upload layout: 32 bytes, both vec3 fields padded to 16
/// by the adjacent scalar.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuMaterial {
    pub color: [f32; 3],
    pub emission_strength: f32,
    pub emission_color: [f32; 3],
    _pad: f32,
}

/// Triangle record in the upload layout: 144 bytes, every vec3 field padded
/// to a 16-byte unit. The field order is part of the binary contract with
/// the compute shader; reordering or repacking breaks the consumer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuTriangle {
    pub v1: [f32; 3],
    _pad1: f32,
    pub v2: [f32; 3],
    _pad2: f32,
    pub v3: [f32; 3],
    _pad3: f32,
    pub na: [f32; 3],
    _pad4: f32,
    pub nb: [f32; 3],
    _pad5: f32,
    pub nc: [f32; 3],
    _pad6: f32,
    pub centroid: [f32; 3],
    _pad7: f32,
    pub material: GpuMaterial,
}

impl From<&Triangle> for GpuTriangle {
    fn from(triangle: &Triangle) -> GpuTriangle {
        GpuTriangle {
            v1: triangle.vertices[0].into(),
            _pad1: 0.0,
            v2: triangle.vertices[1].into(),
            _pad2: 0.0,
            v3: triangle.vertices[2].into(),
            _pad3: 0.0,
            na: triangle.normals[0].into(),
            _pad4: 0.0,
            nb: triangle.normals[1].into(),
            _pad5: 0.0,
            nc: triangle.normals[2].into(),
            _pad6: 0.0,
            centroid: triangle.centroid.into(),
            _pad7: 0.0,
            material: GpuMaterial {
                color: triangle.material.color.into(),
                emission_strength: triangle.material.emission_strength,
                emission_color: triangle.material.emission_color.into(),
                _pad: 0.0,
            },
        }
    }
}

/// Packs the triangle table for buffer upload.
pub fn pack_triangles(triangles: &[Triangle]) -> Vec<GpuTriangle> {
    triangles.iter().map(GpuTriangle::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bvh::Node;
    use crate::geometry::{Material, WorldPoint, WorldVector};
    use assert2::assert;
    use std::mem::offset_of;

    #[test]
    fn record_sizes_match_the_buffer_contract() {
        assert!(size_of::<GpuMaterial>() == 32);
        assert!(size_of::<GpuTriangle>() == 144);
        assert!(size_of::<Node>() == 64);
    }

    #[test]
    fn triangle_field_offsets_are_16_byte_units() {
        assert!(offset_of!(GpuTriangle, v1) == 0);
        assert!(offset_of!(GpuTriangle, v2) == 16);
        assert!(offset_of!(GpuTriangle, v3) == 32);
        assert!(offset_of!(GpuTriangle, na) == 48);
        assert!(offset_of!(GpuTriangle, nb) == 64);
        assert!(offset_of!(GpuTriangle, nc) == 80);
        assert!(offset_of!(GpuTriangle, centroid) == 96);
        assert!(offset_of!(GpuTriangle, material) == 112);
        assert!(offset_of!(GpuMaterial, emission_color) == 16);
    }

    #[test]
    fn node_field_offsets_match_the_shader_struct() {
        assert!(offset_of!(Node, leaf_primitives) == 0);
        assert!(offset_of!(Node, min) == 32);
        assert!(offset_of!(Node, child1) == 44);
        assert!(offset_of!(Node, max) == 48);
        assert!(offset_of!(Node, child2) == 60);
    }

    #[test]
    fn packing_copies_the_fields() {
        let triangle = Triangle::new(
            [
                WorldPoint::new(1.0, 2.0, 3.0),
                WorldPoint::new(4.0, 5.0, 6.0),
                WorldPoint::new(7.0, 8.0, 9.0),
            ],
            [WorldVector::new(0.0, 0.0, 1.0); 3],
            Material::default(),
        );

        let packed = pack_triangles(std::slice::from_ref(&triangle));

        assert!(packed.len() == 1);
        assert!(packed[0].v2 == [4.0, 5.0, 6.0]);
        assert!(packed[0].nc == [0.0, 0.0, 1.0]);
        assert!(packed[0].centroid == [4.0, 5.0, 6.0]);
        assert!(packed[0].material.color == [0.7, 0.7, 0.7]);
        assert!(bytemuck::bytes_of(&packed[0]).len() == 144);
    }
}
