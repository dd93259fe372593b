mod demo;
mod mesh;

pub use demo::demo_scene;
pub use mesh::{MeshNode, cuboid_triangles, quad_triangles};

use crate::geometry::WorldMatrix;
use crate::raycaster::{Intersection, Raycaster};

/// Node of a scene hierarchy that can be picked with a [`Raycaster`].
pub trait SceneNode: Sized {
    /// Invisible nodes are skipped together with their whole subtree.
    fn is_visible(&self) -> bool;

    fn children(&self) -> &[Self];

    /// Local to world transform, including all ancestors.
    fn world_matrix(&self) -> WorldMatrix;

    /// Appends hits of this node alone (not its children) to `intersects`.
    /// Order of the appended hits does not matter, the raycaster sorts them.
    fn raycast<'a>(
        &'a self,
        raycaster: &Raycaster,
        intersects: &mut Vec<Intersection<'a, Self>>,
    );
}
