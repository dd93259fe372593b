pub mod bounding;
pub mod camera;
pub mod geometry;
pub mod raycaster;
pub mod scene;

pub use camera::{Camera, CameraView, Projection};
pub use raycaster::{Intersection, RaycastError, Raycaster};
pub use scene::{MeshNode, SceneNode};
