mod aabb;
mod ray;
mod ray_box_intersection;
mod ray_sphere_intersection;
mod ray_triangle_intersection;
mod sphere;
mod transform;
mod triangle;
mod triangle_intersection;

pub use aabb::AABB;
pub use ray::{Ray, SegmentDistance};
pub use sphere::Sphere;
pub use transform::{SingularMatrix, TransformExt};
pub use triangle::Triangle;
pub use triangle_intersection::triangles_intersect;

pub type FloatType = f64;

pub type WorldPoint = nalgebra::Point3<FloatType>;
pub type WorldVector = nalgebra::Vector3<FloatType>;
pub type WorldMatrix = nalgebra::Matrix4<FloatType>;
pub type WorldRotation = nalgebra::UnitQuaternion<FloatType>;
pub type WorldBox = AABB<WorldPoint>;

pub const EPSILON: FloatType = 1e-9;
