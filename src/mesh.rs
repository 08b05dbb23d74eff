use std::{fs, path::Path};

use thiserror::Error;

use crate::geometry::{Material, Triangle, WorldPoint, WorldVector};

#[derive(Debug, Error)]
pub enum ObjLoadError {
    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse file: {0}")]
    ParseError(#[from] wavefront_obj::ParseError),
}

/// Loads all triangles of an OBJ file into the flat triangle table consumed
/// by the builder.
///
/// Non-triangle primitives (points, lines) are skipped, never reported as
/// errors. Vertices without a normal reference get the geometric plane
/// normal of their triangle.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Vec<Triangle>, ObjLoadError> {
    let content = fs::read_to_string(path)?;
    let parsed = wavefront_obj::obj::parse(content)?;
    Ok(triangles_from_objects(parsed))
}

fn triangles_from_objects(obj: wavefront_obj::obj::ObjSet) -> Vec<Triangle> {
    let mut triangles = Vec::new();

    for o in obj.objects.into_iter() {
        for geometry in o.geometry {
            for shape in geometry.shapes {
                let wavefront_obj::obj::Primitive::Triangle(a, b, c) = shape.primitive else {
                    log::debug!("skipping non-triangle primitive");
                    continue;
                };

                let position = |vtindex: (usize, Option<usize>, Option<usize>)| {
                    let vertex = &o.vertices[vtindex.0];
                    WorldPoint::new(vertex.x as f32, vertex.y as f32, vertex.z as f32)
                };
                let vertices = [position(a), position(b), position(c)];

                let fallback = plane_normal(&vertices);
                let normal = |vtindex: (usize, Option<usize>, Option<usize>)| {
                    vtindex.2.map_or(fallback, |i| {
                        let n = &o.normals[i];
                        WorldVector::new(n.x as f32, n.y as f32, n.z as f32).normalize()
                    })
                };
                let normals = [normal(a), normal(b), normal(c)];

                triangles.push(Triangle::new(vertices, normals, Material::default()));
            }
        }
    }

    log::info!("{} triangles loaded", triangles.len());
    triangles
}

/// Unit normal of the triangle plane; zero for degenerate triangles.
fn plane_normal(vertices: &[WorldPoint; 3]) -> WorldVector {
    (vertices[1] - vertices[0])
        .cross(&(vertices[2] - vertices[0]))
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(WorldVector::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{assert, let_assert};
    use std::io::Write as _;

    const TWO_TRIANGLES: &str = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
v 1.0 1.0 0.0
vn 0.0 0.0 1.0
f 1//1 2//1 3//1
f 2//1 4//1 3//1
";

    fn parse(source: &str) -> Vec<Triangle> {
        triangles_from_objects(wavefront_obj::obj::parse(source.to_string()).unwrap())
    }

    #[test]
    fn loads_triangles_with_normals() {
        let triangles = parse(TWO_TRIANGLES);

        assert!(triangles.len() == 2);
        assert!(triangles[0].vertices[0] == WorldPoint::new(0.0, 0.0, 0.0));
        assert!(triangles[0].vertices[1] == WorldPoint::new(1.0, 0.0, 0.0));
        for triangle in &triangles {
            for normal in &triangle.normals {
                assert!(*normal == WorldVector::new(0.0, 0.0, 1.0));
            }
            assert!(triangle.material == Material::default());
        }
    }

    #[test]
    fn missing_normals_fall_back_to_plane_normal() {
        let triangles = parse(
            "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
f 1 2 3
",
        );

        assert!(triangles.len() == 1);
        for normal in &triangles[0].normals {
            assert!(*normal == WorldVector::new(0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn centroid_is_precomputed() {
        let triangles = parse(TWO_TRIANGLES);
        let expected = WorldPoint::new(1.0 / 3.0, 1.0 / 3.0, 0.0);
        assert!((triangles[0].centroid - expected).norm() <= 1e-6);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = load_obj("definitely/not/here.obj");
        let_assert!(Err(ObjLoadError::ReadError(_)) = result);
    }

    #[test]
    fn unparsable_content_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "v 1.0 2.0").unwrap();
        let result = load_obj(file.path());
        let_assert!(Err(ObjLoadError::ParseError(_)) = result);
    }
}
