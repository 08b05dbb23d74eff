use crate::geometry::{WorldPoint, WorldVector};

/// Axis-aligned bounding box given by its two corners.
///
/// The box containing nothing is the inverted sentinel (`min` at positive
/// infinity, `max` at negative infinity). Growing the sentinel by any point
/// produces a regular box, so it works as the seed of min/max folds, but
/// callers must not treat its corners as coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: WorldPoint,
    pub max: WorldPoint,
}

impl Aabb {
    pub fn new(min: WorldPoint, max: WorldPoint) -> Aabb {
        Aabb { min, max }
    }

    /// The inverted sentinel box, neutral element of `grow` and `union`.
    pub fn empty() -> Aabb {
        Aabb {
            min: WorldPoint::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: WorldPoint::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Extends the box to contain `point`.
    pub fn grow(&mut self, point: &WorldPoint) {
        self.min = self.min.coords.inf(&point.coords).into();
        self.max = self.max.coords.sup(&point.coords).into();
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.coords.inf(&other.min.coords).into(),
            max: self.max.coords.sup(&other.max.coords).into(),
        }
    }

    pub fn size(&self) -> WorldVector {
        self.max - self.min
    }

    pub fn center(&self) -> WorldPoint {
        WorldPoint::from((self.min.coords + self.max.coords) * 0.5)
    }

    /// Total area of the six faces, `2*(w*h + w*d + h*d)`.
    pub fn surface_area(&self) -> f32 {
        let size = self.size();
        2.0 * (size.x * size.y + size.x * size.z + size.y * size.z)
    }

    pub fn contains(&self, point: &WorldPoint) -> bool {
        (0..3).all(|axis| self.min[axis] <= point[axis] && point[axis] <= self.max[axis])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use proptest::prelude::*;
    use test_strategy::proptest;

    fn simple_float() -> BoxedStrategy<f32> {
        any::<i32>().prop_map(|n| n as f32 * 1e-3).boxed()
    }

    fn coordinates() -> impl Strategy<Value = [f32; 3]> {
        [simple_float(), simple_float(), simple_float()]
    }

    fn grow_all(points: &[[f32; 3]]) -> Aabb {
        let mut aabb = Aabb::empty();
        for c in points {
            aabb.grow(&WorldPoint::new(c[0], c[1], c[2]));
        }
        aabb
    }

    #[test]
    fn empty_box_is_inverted_sentinel() {
        let empty = Aabb::empty();
        assert!(empty.is_empty());
        for axis in 0..3 {
            assert!(empty.min[axis] == f32::INFINITY);
            assert!(empty.max[axis] == f32::NEG_INFINITY);
        }
    }

    #[proptest]
    fn grown_box_contains_every_input_point(
        #[strategy(proptest::collection::vec(coordinates(), 1..32))] points: Vec<[f32; 3]>,
    ) {
        let aabb = grow_all(&points);

        assert!(!aabb.is_empty());
        for axis in 0..3 {
            assert!(aabb.min[axis] <= aabb.max[axis]);
        }
        for c in &points {
            assert!(aabb.contains(&WorldPoint::new(c[0], c[1], c[2])));
        }
    }

    #[proptest]
    fn union_contains_both_corners(
        #[strategy(proptest::collection::vec(coordinates(), 1..8))] a: Vec<[f32; 3]>,
        #[strategy(proptest::collection::vec(coordinates(), 1..8))] b: Vec<[f32; 3]>,
    ) {
        let box_a = grow_all(&a);
        let box_b = grow_all(&b);
        let merged = box_a.union(&box_b);

        assert!(merged.contains(&box_a.min));
        assert!(merged.contains(&box_a.max));
        assert!(merged.contains(&box_b.min));
        assert!(merged.contains(&box_b.max));
    }

    #[test]
    fn grow_from_single_point() {
        let point = WorldPoint::new(1.0, -2.0, 3.0);
        let mut aabb = Aabb::empty();
        aabb.grow(&point);

        assert!(aabb.min == point);
        assert!(aabb.max == point);
        assert!(aabb.surface_area() == 0.0);
    }

    #[test]
    fn surface_area_of_a_box() {
        let mut aabb = Aabb::empty();
        aabb.grow(&WorldPoint::new(0.0, 0.0, 0.0));
        aabb.grow(&WorldPoint::new(2.0, 3.0, 4.0));

        // 2 * (2*3 + 2*4 + 3*4)
        assert!(aabb.surface_area() == 52.0);
        assert!(aabb.size() == WorldVector::new(2.0, 3.0, 4.0));
        assert!(aabb.center() == WorldPoint::new(1.0, 1.5, 2.0));
    }
}
