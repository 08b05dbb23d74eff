mod aabb;
mod triangle;

pub use aabb::Aabb;
pub use triangle::{Material, Triangle};

pub type WorldPoint = nalgebra::Point3<f32>;
pub type WorldVector = nalgebra::Vector3<f32>;
