pub mod bvh;
pub mod geometry;
pub mod mesh;
mod util;

pub use bvh::{BvhData, Heuristic, Node, build, construct};
pub use mesh::{ObjLoadError, load_obj};
