use std::cmp::Reverse;

use itertools::Itertools as _;
use ordered_float::OrderedFloat;

use crate::bvh::{Heuristic, LEAF_TRIANGLE_LIMIT};
use crate::geometry::{Aabb, Triangle};

/// Bucket count of the approximate surface-area heuristic; also the
/// triangle count above which it kicks in.
const SAH_BUCKETS: usize = 16;

/// Fixed per-box traversal cost in the surface-area cost model.
const SAH_TRAVERSAL_COST: f32 = 0.125;

/// Bounding box of the triangles selected by `indices`, folded over all
/// three vertices of each. Order-independent; the empty set folds to the
/// inverted sentinel box.
pub fn compute_aabb(indices: &[u32], triangles: &[Triangle]) -> Aabb {
    let mut aabb = Aabb::empty();
    for &index in indices {
        for vertex in &triangles[index as usize].vertices {
            aabb.grow(vertex);
        }
    }
    aabb
}

/// One side of a settled split.
#[derive(Clone, Debug)]
pub struct SplitSide {
    pub indices: Vec<u32>,
    pub aabb: Aabb,
    pub is_leaf: bool,
}

impl SplitSide {
    fn new(indices: Vec<u32>, triangles: &[Triangle]) -> SplitSide {
        let aabb = compute_aabb(&indices, triangles);
        let is_leaf = indices.len() <= LEAF_TRIANGLE_LIMIT;
        SplitSide {
            indices,
            aabb,
            is_leaf,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PartitionOutput {
    pub left: SplitSide,
    pub right: SplitSide,
}

/// Splits `indices` into two disjoint subsets according to `heuristic`.
/// Together the two sides always hold exactly the input index set.
pub fn partition(
    parent_aabb: &Aabb,
    indices: Vec<u32>,
    triangles: &[Triangle],
    heuristic: Heuristic,
) -> PartitionOutput {
    match heuristic {
        Heuristic::ObjectMedianSplit => {
            axis_sweep_split(parent_aabb, indices, triangles, SplitPoint::CentroidMedian)
        }
        Heuristic::SpatialMiddleSplit => {
            axis_sweep_split(parent_aabb, indices, triangles, SplitPoint::BoxMidpoint)
        }
        Heuristic::SurfaceAreaHeuristic => {
            surface_area_split(parent_aabb, indices, triangles, false)
        }
        Heuristic::SurfaceAreaHeuristicBuckets => {
            surface_area_split(parent_aabb, indices, triangles, true)
        }
    }
}

enum SplitPoint {
    CentroidMedian,
    BoxMidpoint,
}

/// Object-median and spatial-middle splits: pick a split value on the
/// longest axis, compare centroids against it, retry shorter axes while a
/// side stays empty.
fn axis_sweep_split(
    parent_aabb: &Aabb,
    indices: Vec<u32>,
    triangles: &[Triangle],
    split_point: SplitPoint,
) -> PartitionOutput {
    let extent = parent_aabb.size();
    let mut left = Vec::new();
    let mut right = Vec::new();

    let axes = (0..3usize).sorted_by_key(|&axis| Reverse(OrderedFloat(extent[axis])));
    for axis in axes {
        let split_value = match split_point {
            SplitPoint::CentroidMedian => centroid_median(&indices, triangles, axis),
            SplitPoint::BoxMidpoint => parent_aabb.min[axis] + extent[axis] * 0.5,
        };

        left.clear();
        right.clear();
        for &index in &indices {
            if triangles[index as usize].centroid[axis] < split_value {
                left.push(index);
            } else {
                right.push(index);
            }
        }

        // The last attempt is kept even when one side stays empty; the
        // fallback below decides whether that is acceptable.
        if !left.is_empty() && !right.is_empty() {
            break;
        }
    }

    // Degenerate input: no axis separates the centroids and the non-empty
    // side is still over the leaf limit. Halving the unsorted input keeps
    // the build terminating at the cost of geometrically overlapping
    // children.
    if (left.is_empty() && right.len() > LEAF_TRIANGLE_LIMIT)
        || (right.is_empty() && left.len() > LEAF_TRIANGLE_LIMIT)
    {
        let mid = indices.len() / 2;
        left = indices[..mid].to_vec();
        right = indices[mid..].to_vec();
    }

    PartitionOutput {
        left: SplitSide::new(left, triangles),
        right: SplitSide::new(right, triangles),
    }
}

/// Median centroid component along `axis`; mean of the two middle values
/// for even counts.
fn centroid_median(indices: &[u32], triangles: &[Triangle], axis: usize) -> f32 {
    let components: Vec<f32> = indices
        .iter()
        .map(|&index| triangles[index as usize].centroid[axis])
        .sorted_by_key(|&component| OrderedFloat(component))
        .collect();

    let middle = components.len() / 2;
    if components.len() % 2 == 0 {
        (components[middle - 1] + components[middle]) / 2.0
    } else {
        components[middle]
    }
}

/// Shared implementation of the exact and bucketed surface-area heuristics.
///
/// Scans candidate split positions in centroid order on all three axes and
/// keeps the cheapest. The comparison is strict, so the first axis and
/// position reaching the minimum win ties; this keeps the output
/// reproducible.
fn surface_area_split(
    parent_aabb: &Aabb,
    mut indices: Vec<u32>,
    triangles: &[Triangle],
    use_buckets: bool,
) -> PartitionOutput {
    let parent_surface_area = parent_aabb.surface_area();

    let mut best_cost = f32::INFINITY;
    let mut best_axis = 0;
    let mut best_index = indices.len() / 2;

    for axis in 0..3 {
        sort_by_centroid(&mut indices, triangles, axis);

        // Candidate positions always leave at least one triangle on the
        // left. Bucketing trades optimality for a fixed candidate count on
        // large sets.
        let step = if use_buckets && indices.len() > SAH_BUCKETS {
            indices.len() / SAH_BUCKETS
        } else {
            1
        };

        for split_index in (step..indices.len()).step_by(step) {
            let (left, right) = indices.split_at(split_index);
            let left_surface_area = compute_aabb(left, triangles).surface_area();
            let right_surface_area = compute_aabb(right, triangles).surface_area();

            // PBRT-style expected cost: a per-box constant plus primitive
            // tests weighted by the probability of a ray entering each
            // child, approximated by relative surface area.
            let cost = SAH_TRAVERSAL_COST
                + (left.len() as f32 * left_surface_area
                    + right.len() as f32 * right_surface_area)
                    / parent_surface_area;

            if cost < best_cost {
                best_cost = cost;
                best_axis = axis;
                best_index = split_index;
            }
        }
    }

    sort_by_centroid(&mut indices, triangles, best_axis);
    let right = indices.split_off(best_index);

    PartitionOutput {
        left: SplitSide::new(indices, triangles),
        right: SplitSide::new(right, triangles),
    }
}

fn sort_by_centroid(indices: &mut [u32], triangles: &[Triangle], axis: usize) {
    indices.sort_by_key(|&index| OrderedFloat(triangles[index as usize].centroid[axis]));
}
