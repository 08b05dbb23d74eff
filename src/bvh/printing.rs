use itertools::Itertools as _;

use crate::bvh::BvhData;
use crate::util::Stats;

impl BvhData {
    /// Dumps the whole tree to stdout, one node per line.
    pub fn print_tree(&self) {
        self.print_recursive(0, 0);
    }

    pub fn print_statistics(&self) {
        println!("Nodes: {}", self.node_count());
        println!("Triangles: {}", self.triangle_count());
        println!("Depth: {}", self.depth);
        println!("Leaf fill: {}", self.leaf_fill_statistics());
    }

    fn leaf_fill_statistics(&self) -> Stats {
        let mut stats = Stats::default();
        stats.add_samples(
            self.nodes
                .iter()
                .filter(|node| node.is_leaf())
                .map(|node| node.leaf_triangles().count()),
        );
        stats
    }

    fn print_recursive(&self, indent: usize, node_index: usize) {
        let node = &self.nodes[node_index];
        println!(
            "{}- {}{}: ({}, {}, {})-({}, {}, {}) [{}]",
            "  ".repeat(indent),
            if node.is_leaf() { "L" } else { "I" },
            node_index,
            node.min.x,
            node.min.y,
            node.min.z,
            node.max.x,
            node.max.y,
            node.max.z,
            node.leaf_triangles().map(|index| index.to_string()).join(", "),
        );

        for child in node.children().into_iter().flatten() {
            self.print_recursive(indent + 1, child);
        }
    }
}
