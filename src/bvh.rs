mod building;
mod layout;
mod printing;

use std::collections::VecDeque;
use std::path::Path;

use bytemuck::{Pod, Zeroable};

use crate::geometry::{Aabb, Triangle, WorldPoint};
use crate::mesh;

pub use building::{PartitionOutput, SplitSide, compute_aabb, partition};
pub use layout::{GpuMaterial, GpuTriangle, pack_triangles};

/// Maximum number of triangles a leaf node can hold directly.
pub const LEAF_TRIANGLE_LIMIT: usize = 2;

/// Sentinel value of child and primitive index fields.
pub const NO_INDEX: i32 = -1;

/// Partitioning strategy used when splitting a node's triangle set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// Split at the median centroid along the longest workable axis.
    ObjectMedianSplit,
    /// Split at the box midpoint along the longest workable axis.
    SpatialMiddleSplit,
    /// Minimize the surface-area cost over every candidate position.
    SurfaceAreaHeuristic,
    /// Surface-area cost over every 16th candidate position.
    SurfaceAreaHeuristicBuckets,
}

/// One leaf primitive slot. Only the first lane carries an index; the rest
/// widens the slot to a full 16-byte unit as the compute buffer layout
/// requires.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct PrimitiveSlot {
    index: i32,
    _pad: [i32; 3],
}

impl PrimitiveSlot {
    pub const EMPTY: PrimitiveSlot = PrimitiveSlot {
        index: NO_INDEX,
        _pad: [0; 3],
    };

    fn new(index: u32) -> PrimitiveSlot {
        PrimitiveSlot {
            index: index as i32,
            _pad: [0; 3],
        }
    }

    pub fn get(&self) -> Option<u32> {
        (self.index >= 0).then(|| self.index as u32)
    }
}

/// One node of the flat hierarchy.
///
/// A node is a leaf iff both child indices are `NO_INDEX`; internal nodes
/// have exactly two valid children. Every node carries its own bounding box.
/// Field order and the slot padding are a binary contract with the compute
/// shader (every vec3 is padded to 16 bytes by the adjacent index field);
/// reordering fields breaks the consumer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Node {
    pub leaf_primitives: [PrimitiveSlot; LEAF_TRIANGLE_LIMIT],
    pub min: WorldPoint,
    pub child1: i32,
    pub max: WorldPoint,
    pub child2: i32,
}

impl Node {
    /// Fresh unconnected node covering `aabb`.
    pub fn new(aabb: &Aabb) -> Node {
        Node {
            leaf_primitives: [PrimitiveSlot::EMPTY; LEAF_TRIANGLE_LIMIT],
            min: aabb.min,
            child1: NO_INDEX,
            max: aabb.max,
            child2: NO_INDEX,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.min, self.max)
    }

    pub fn is_leaf(&self) -> bool {
        self.child1 == NO_INDEX && self.child2 == NO_INDEX
    }

    pub fn children(&self) -> [Option<usize>; 2] {
        [self.child1, self.child2].map(|child| (child >= 0).then(|| child as usize))
    }

    /// Triangle indices stored in the leaf slots.
    pub fn leaf_triangles(&self) -> impl Iterator<Item = u32> + '_ {
        self.leaf_primitives.iter().filter_map(|slot| slot.get())
    }

    /// Fills the leaf slots from `indices`.
    ///
    /// Indices beyond the slot capacity are dropped. `build` never passes
    /// more than the limit because the leaf flag is derived from the same
    /// constant; the guard covers direct callers.
    pub fn set_leaf_triangles(&mut self, indices: &[u32]) {
        if indices.len() > LEAF_TRIANGLE_LIMIT {
            log::warn!(
                "leaf overflow: dropping {} of {} triangle indices",
                indices.len() - LEAF_TRIANGLE_LIMIT,
                indices.len()
            );
        }
        for (slot, &index) in self.leaf_primitives.iter_mut().zip(indices) {
            *slot = PrimitiveSlot::new(index);
        }
    }
}

/// Finished hierarchy: the flat node array (root always at slot 0), the
/// triangle table it indexes into and the measured tree depth.
///
/// Immutable once built; the render stage reads it concurrently without
/// locking for the rest of the program run. A changed mesh means a wholesale
/// rebuild.
#[derive(Clone, Debug, PartialEq)]
pub struct BvhData {
    pub nodes: Vec<Node>,
    pub triangles: Vec<Triangle>,
    pub depth: u32,
}

impl BvhData {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Raw bytes of the node array, laid out for direct buffer upload.
    pub fn node_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }

    /// Triangle table packed into the 16-byte-aligned upload layout.
    pub fn packed_triangles(&self) -> Vec<GpuTriangle> {
        pack_triangles(&self.triangles)
    }
}

/// Loads `path` and builds the hierarchy with `heuristic`.
///
/// A load failure is not fatal: the diagnostic is logged and the result is
/// the degenerate single-node tree of the empty mesh. Callers must handle a
/// zero-triangle hierarchy.
pub fn construct(path: impl AsRef<Path>, heuristic: Heuristic) -> BvhData {
    let path = path.as_ref();
    let triangles = match mesh::load_obj(path) {
        Ok(triangles) => triangles,
        Err(err) => {
            log::error!("Error loading the model {}: {}", path.display(), err);
            Vec::new()
        }
    };
    build(triangles, heuristic)
}

/// Builds the flat hierarchy over an already loaded triangle table.
///
/// Breadth-first over an explicit work queue; children are appended to the
/// node array in queue order, so slot indices are assigned at append time
/// and each parent's child fields are written exactly once.
pub fn build(triangles: Vec<Triangle>, heuristic: Heuristic) -> BvhData {
    let indices: Vec<u32> = (0..triangles.len() as u32).collect();
    let mut nodes = vec![Node::new(&compute_aabb(&indices, &triangles))];

    let mut queue = VecDeque::new();
    if !triangles.is_empty() {
        queue.push_back((0usize, indices));
    }

    while let Some((node_index, node_indices)) = queue.pop_front() {
        let parent_aabb = nodes[node_index].aabb();
        let output = partition(&parent_aabb, node_indices, &triangles, heuristic);

        let first_child = nodes.len();
        for (offset, side) in [output.left, output.right].into_iter().enumerate() {
            let mut child = Node::new(&side.aabb);
            if side.is_leaf {
                child.set_leaf_triangles(&side.indices);
            } else {
                queue.push_back((first_child + offset, side.indices));
            }
            nodes.push(child);
        }
        nodes[node_index].child1 = first_child as i32;
        nodes[node_index].child2 = (first_child + 1) as i32;
    }

    let depth = tree_depth(&nodes, 0);
    BvhData {
        nodes,
        triangles,
        depth,
    }
}

/// Longest root-to-leaf edge count, walked depth-first over the flat array.
/// A leaf has depth 0; a node with a single valid child (not produced by
/// `build`) takes the depth of that branch.
pub fn tree_depth(nodes: &[Node], node_index: usize) -> u32 {
    let mut depth = 0;
    for child in nodes[node_index].children().into_iter().flatten() {
        depth = depth.max(1 + tree_depth(nodes, child));
    }
    depth
}
