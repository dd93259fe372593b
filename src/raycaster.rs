use assert2::debug_assert;
use bon::bon;
use nalgebra::Point2;
use ordered_float::OrderedFloat;
use thiserror::Error;

use crate::camera::{CameraView, ProjectionKind};
use crate::geometry::{FloatType, Ray, SingularMatrix, TransformExt as _, WorldPoint, WorldVector};
use crate::scene::SceneNode;

/// Point in normalized device coordinates, both axes in [-1, 1].
pub type NdcPoint = Point2<FloatType>;

#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum RaycastError {
    #[error(transparent)]
    SingularMatrix(#[from] SingularMatrix),
    #[error("Casting rays from {0:?} cameras is not supported")]
    UnsupportedProjection(ProjectionKind),
    #[error("Screen point does not unproject to a usable ray direction")]
    DegenerateUnprojection,
}

/// Single ray hit, as reported by a scene node.
#[derive(Debug)]
pub struct Intersection<'a, N> {
    /// World space hit point
    pub target: WorldPoint,
    pub normal: WorldVector,
    pub object: &'a N,
    /// Distance from the ray origin
    pub distance: FloatType,
}

impl<N> Clone for Intersection<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for Intersection<'_, N> {}

/// Reusable traversal stack for [`Raycaster::intersect_object_with_cache`].
/// Empty between calls.
pub struct TraversalCache<'a, N> {
    stack: Vec<&'a N>,
}

impl<N> Default for TraversalCache<'_, N> {
    fn default() -> Self {
        TraversalCache { stack: Vec::new() }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Raycaster {
    pub ray: Ray,
    /// Hits closer than this are ignored by the nodes
    pub near: FloatType,
    /// Hits further than this are ignored by the nodes
    pub far: FloatType,
}

impl Default for Raycaster {
    fn default() -> Self {
        Raycaster::builder().build()
    }
}

#[bon]
impl Raycaster {
    #[builder]
    pub fn new(
        #[builder(default)] ray: Ray,
        #[builder(default = 0.0)] near: FloatType,
        #[builder(default = FloatType::INFINITY)] far: FloatType,
    ) -> Self {
        Raycaster { ray, near, far }
    }
}

impl Raycaster {
    pub fn set_ray(&mut self, origin: WorldPoint, direction: WorldVector) {
        self.ray.set(origin, direction);
    }

    /// Points the ray from the camera through the screen point and copies
    /// the camera clip distances. Leaves the raycaster unchanged on error.
    pub fn set_from_camera(
        &mut self,
        coords: &NdcPoint,
        camera: &impl CameraView,
    ) -> Result<(), RaycastError> {
        match camera.projection().kind() {
            ProjectionKind::Perspective => {
                let origin = camera.world_matrix().position();
                let inverse = camera.view_projection_matrix().try_inverse_transform()?;
                let target = inverse
                    .project_point(&WorldPoint::new(coords.x, coords.y, 0.5))
                    .ok_or(RaycastError::DegenerateUnprojection)?;
                self.ray = Ray::try_new_normalized(origin, target - origin)
                    .ok_or(RaycastError::DegenerateUnprojection)?;
                self.near = camera.near();
                self.far = camera.far();
                Ok(())
            }
            kind @ ProjectionKind::Orthographic => {
                tracing::warn!(
                    ?kind,
                    "Setting the ray from an orthographic camera is not supported"
                );
                Err(RaycastError::UnsupportedProjection(kind))
            }
        }
    }

    /// Collects hits of the node and, if `recursive`, of all its descendants,
    /// sorted by distance. Invisible nodes hide their whole subtree.
    pub fn intersect_object<'a, N: SceneNode>(
        &self,
        node: &'a N,
        recursive: bool,
    ) -> Vec<Intersection<'a, N>> {
        self.intersect_object_with_cache(node, recursive, &mut TraversalCache::default())
    }

    pub fn intersect_object_with_cache<'a, N: SceneNode>(
        &self,
        node: &'a N,
        recursive: bool,
        cache: &mut TraversalCache<'a, N>,
    ) -> Vec<Intersection<'a, N>> {
        let mut intersects = Vec::new();
        self.collect(node, recursive, cache, &mut intersects);
        sort_by_distance(&mut intersects);
        intersects
    }

    /// Same as [`Raycaster::intersect_object`] for several roots, in a single sorted list.
    pub fn intersect_objects<'a, N: SceneNode>(
        &self,
        nodes: impl IntoIterator<Item = &'a N>,
        recursive: bool,
    ) -> Vec<Intersection<'a, N>> {
        let mut cache = TraversalCache::default();
        let mut intersects = Vec::new();
        for node in nodes {
            self.collect(node, recursive, &mut cache, &mut intersects);
        }
        sort_by_distance(&mut intersects);
        intersects
    }

    /// Depth first pre-order walk, appends unsorted hits.
    fn collect<'a, N: SceneNode>(
        &self,
        root: &'a N,
        recursive: bool,
        cache: &mut TraversalCache<'a, N>,
        intersects: &mut Vec<Intersection<'a, N>>,
    ) {
        debug_assert!(cache.stack.is_empty());
        let initial_len = intersects.len();
        let mut visited = 0usize;

        cache.stack.push(root);
        while let Some(node) = cache.stack.pop() {
            if !node.is_visible() {
                tracing::trace!("Skipping invisible subtree");
                continue;
            }

            visited += 1;
            let before = intersects.len();
            node.raycast(self, intersects);
            tracing::trace!(hits = intersects.len() - before, "Node raycast");

            if recursive {
                // Reversed, so that the first child is visited first
                cache.stack.extend(node.children().iter().rev());
            }
        }

        tracing::debug!(
            visited,
            hits = intersects.len() - initial_len,
            recursive,
            "Raycast traversal finished"
        );
    }
}

/// Stable, so equal distances keep their traversal order.
fn sort_by_distance<N>(intersects: &mut [Intersection<'_, N>]) {
    intersects.sort_by_key(|intersection| OrderedFloat(intersection.distance));
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::camera::{Camera, Projection};
    use crate::geometry::{WorldMatrix, WorldRotation};
    use assert2::{assert, let_assert};
    use std::cell::Cell;

    /// Node that reports fixed distances and counts its raycasts.
    struct FakeNode {
        name: &'static str,
        visible: bool,
        distances: Vec<FloatType>,
        children: Vec<FakeNode>,
        calls: Cell<usize>,
    }

    impl FakeNode {
        fn new(name: &'static str, distances: &[FloatType], children: Vec<FakeNode>) -> FakeNode {
            FakeNode {
                name,
                visible: true,
                distances: distances.to_vec(),
                children,
                calls: Cell::new(0),
            }
        }

        fn hidden(mut self) -> FakeNode {
            self.visible = false;
            self
        }
    }

    impl SceneNode for FakeNode {
        fn is_visible(&self) -> bool {
            self.visible
        }

        fn children(&self) -> &[Self] {
            &self.children
        }

        fn world_matrix(&self) -> WorldMatrix {
            WorldMatrix::identity()
        }

        fn raycast<'a>(
            &'a self,
            raycaster: &Raycaster,
            intersects: &mut Vec<Intersection<'a, Self>>,
        ) {
            self.calls.set(self.calls.get() + 1);
            intersects.extend(self.distances.iter().map(|&distance| Intersection {
                target: raycaster.ray.at(distance),
                normal: WorldVector::z(),
                object: self,
                distance,
            }));
        }
    }

    fn distances<N>(intersects: &[Intersection<'_, N>]) -> Vec<FloatType> {
        intersects.iter().map(|i| i.distance).collect()
    }

    fn names(intersects: &[Intersection<'_, FakeNode>]) -> Vec<&'static str> {
        intersects.iter().map(|i| i.object.name).collect()
    }

    #[test]
    fn sorted_by_distance() {
        let root = FakeNode::new("root", &[5.0, 1.0, 3.0], vec![]);
        let result = Raycaster::default().intersect_object(&root, true);
        assert!(distances(&result) == vec![1.0, 3.0, 5.0]);
        assert!(result[0].target == WorldPoint::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn children_merged_and_sorted() {
        let root = FakeNode::new(
            "root",
            &[4.0],
            vec![
                FakeNode::new("a", &[2.0], vec![FakeNode::new("a1", &[1.0], vec![])]),
                FakeNode::new("b", &[3.0], vec![]),
            ],
        );
        let result = Raycaster::default().intersect_object(&root, true);
        assert!(names(&result) == vec!["a1", "a", "b", "root"]);
    }

    #[test]
    fn equal_distances_keep_preorder() {
        let root = FakeNode::new(
            "root",
            &[1.0],
            vec![
                FakeNode::new("a", &[1.0], vec![FakeNode::new("a1", &[1.0], vec![])]),
                FakeNode::new("b", &[1.0], vec![]),
            ],
        );
        let result = Raycaster::default().intersect_object(&root, true);
        assert!(names(&result) == vec!["root", "a", "a1", "b"]);
    }

    #[test]
    fn invisible_subtree_suppressed() {
        let root = FakeNode::new(
            "root",
            &[4.0],
            vec![
                FakeNode::new("a", &[2.0], vec![FakeNode::new("a1", &[1.0], vec![])])
                    .hidden(),
                FakeNode::new("b", &[3.0], vec![]),
            ],
        );
        let result = Raycaster::default().intersect_object(&root, true);
        assert!(names(&result) == vec!["b", "root"]);
        assert!(root.children[0].calls.get() == 0);
        assert!(root.children[0].children[0].calls.get() == 0);
    }

    #[test]
    fn invisible_root() {
        let root = FakeNode::new("root", &[4.0], vec![FakeNode::new("a", &[2.0], vec![])])
            .hidden();
        assert!(
            Raycaster::default()
                .intersect_object(&root, true)
                .is_empty()
        );
    }

    #[test]
    fn non_recursive_visits_only_root() {
        let root = FakeNode::new("root", &[4.0], vec![FakeNode::new("a", &[2.0], vec![])]);
        let result = Raycaster::default().intersect_object(&root, false);
        assert!(names(&result) == vec!["root"]);
        assert!(root.calls.get() == 1);
        assert!(root.children[0].calls.get() == 0);
    }

    #[test]
    fn several_roots() {
        let a = FakeNode::new("a", &[3.0], vec![FakeNode::new("a1", &[0.5], vec![])]);
        let b = FakeNode::new("b", &[1.0], vec![]);
        let result = Raycaster::default().intersect_objects([&a, &b], true);
        assert!(names(&result) == vec!["a1", "b", "a"]);
    }

    #[test]
    fn cache_is_reusable() {
        let root = FakeNode::new("root", &[2.0], vec![FakeNode::new("a", &[1.0], vec![])]);
        let raycaster = Raycaster::default();
        let mut cache = TraversalCache::default();
        for _ in 0..3 {
            let result = raycaster.intersect_object_with_cache(&root, true, &mut cache);
            assert!(distances(&result) == vec![1.0, 2.0]);
        }
        assert!(root.calls.get() == 3);
    }

    /// Deep chains do not recurse on the call stack.
    #[test]
    fn deep_hierarchy() {
        let mut node = FakeNode::new("leaf", &[1.0], vec![]);
        for _ in 0..100_000 {
            node = FakeNode::new("inner", &[], vec![node]);
        }
        {
            let result = Raycaster::default().intersect_object(&node, true);
            assert!(names(&result) == vec!["leaf"]);
        }

        // Dropping a deeply nested Vec tree recurses, unroll it first
        let mut children = std::mem::take(&mut node.children);
        while let Some(mut child) = children.pop() {
            children.append(&mut child.children);
        }
    }

    #[test]
    fn from_perspective_camera() {
        let_assert!(
            Ok(camera) = Camera::builder()
                .position(WorldPoint::new(0.0, 0.0, 10.0))
                .near(0.5)
                .far(100.0)
                .projection(Projection::Perspective {
                    fovy: std::f64::consts::FRAC_PI_2,
                    aspect: 2.0,
                })
                .build()
        );

        let mut raycaster = Raycaster::default();
        let_assert!(Ok(()) = raycaster.set_from_camera(&NdcPoint::new(0.0, 0.0), &camera));
        assert!(raycaster.ray.origin == WorldPoint::new(0.0, 0.0, 10.0));
        assert!((raycaster.ray.direction - WorldVector::new(0.0, 0.0, -1.0)).norm() < 1e-9);
        assert!(raycaster.near == 0.5);
        assert!(raycaster.far == 100.0);

        // Top edge of a 90 degree frustum
        let_assert!(Ok(()) = raycaster.set_from_camera(&NdcPoint::new(0.0, 1.0), &camera));
        let expected = WorldVector::new(0.0, 1.0, -1.0).normalize();
        assert!((raycaster.ray.direction - expected).norm() < 1e-9);
    }

    #[test]
    fn from_rotated_camera() {
        let_assert!(
            Ok(camera) = Camera::builder()
                .rotation(WorldRotation::from_axis_angle(
                    &WorldVector::y_axis(),
                    std::f64::consts::FRAC_PI_2
                ))
                .projection(Projection::Perspective {
                    fovy: 1.0,
                    aspect: 1.0,
                })
                .build()
        );
        let mut raycaster = Raycaster::default();
        let_assert!(Ok(()) = raycaster.set_from_camera(&NdcPoint::origin(), &camera));
        assert!((raycaster.ray.direction - WorldVector::new(-1.0, 0.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn orthographic_camera_is_unsupported() {
        let_assert!(
            Ok(camera) = Camera::builder()
                .near(0.1)
                .far(10.0)
                .projection(Projection::Orthographic {
                    left: -1.0,
                    right: 1.0,
                    bottom: -1.0,
                    top: 1.0,
                })
                .build()
        );
        let mut raycaster = Raycaster::builder().near(0.25).build();
        let before = raycaster;
        let_assert!(
            Err(RaycastError::UnsupportedProjection(ProjectionKind::Orthographic)) =
                raycaster.set_from_camera(&NdcPoint::origin(), &camera)
        );
        assert!(raycaster == before);
    }

    /// Camera with hand picked matrices.
    struct FixedView {
        world_matrix: WorldMatrix,
        view_projection_matrix: WorldMatrix,
    }

    impl CameraView for FixedView {
        fn near(&self) -> FloatType {
            1.0
        }

        fn far(&self) -> FloatType {
            10.0
        }

        fn projection(&self) -> Projection {
            Projection::Perspective {
                fovy: 1.0,
                aspect: 1.0,
            }
        }

        fn world_matrix(&self) -> WorldMatrix {
            self.world_matrix
        }

        fn view_projection_matrix(&self) -> WorldMatrix {
            self.view_projection_matrix
        }
    }

    fn custom_raycaster() -> Raycaster {
        Raycaster::builder()
            .ray(Ray::new(WorldPoint::new(1.0, 2.0, 3.0), WorldVector::x()))
            .near(0.25)
            .far(7.0)
            .build()
    }

    #[test]
    fn singular_view_projection() {
        let camera = FixedView {
            world_matrix: WorldMatrix::identity(),
            view_projection_matrix: WorldMatrix::zeros(),
        };
        let mut raycaster = custom_raycaster();
        let_assert!(
            Err(RaycastError::SingularMatrix(SingularMatrix)) =
                raycaster.set_from_camera(&NdcPoint::origin(), &camera)
        );
        assert!(raycaster == custom_raycaster());
    }

    #[test]
    fn unprojects_to_infinity() {
        // Inverse maps the w of (0, 0, 0.5) to exactly zero
        #[rustfmt::skip]
        let inverse = WorldMatrix::new(
            1.0, 0.0, 0.0,  0.0,
            0.0, 1.0, 0.0,  0.0,
            0.0, 0.0, 1.0,  0.0,
            0.0, 0.0, -2.0, 1.0,
        );
        let_assert!(Some(view_projection) = inverse.try_inverse());
        let camera = FixedView {
            world_matrix: WorldMatrix::identity(),
            view_projection_matrix: view_projection,
        };
        let mut raycaster = custom_raycaster();
        let_assert!(
            Err(RaycastError::DegenerateUnprojection) =
                raycaster.set_from_camera(&NdcPoint::origin(), &camera)
        );
        assert!(raycaster == custom_raycaster());
    }

    #[test]
    fn unprojects_onto_camera_position() {
        let camera = FixedView {
            world_matrix: WorldMatrix::new_translation(&WorldVector::new(0.0, 0.0, 0.5)),
            view_projection_matrix: WorldMatrix::identity(),
        };
        let mut raycaster = custom_raycaster();
        let_assert!(
            Err(RaycastError::DegenerateUnprojection) =
                raycaster.set_from_camera(&NdcPoint::origin(), &camera)
        );
        assert!(raycaster == custom_raycaster());
    }

    #[test]
    fn builder_defaults() {
        let raycaster = Raycaster::builder().build();
        assert!(raycaster == Raycaster::default());
        assert!(raycaster.near == 0.0);
        assert!(raycaster.far == FloatType::INFINITY);
        assert!(raycaster.ray.direction == -WorldVector::z());
    }
}
