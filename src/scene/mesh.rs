use bon::bon;

use crate::bounding::Bounding;
use crate::geometry::{
    FloatType, TransformExt as _, Triangle, WorldBox, WorldMatrix, WorldPoint, WorldRotation,
    WorldVector,
};
use crate::raycaster::{Intersection, Raycaster};
use crate::scene::SceneNode;

/// Triangle mesh with its own transform, pickable by a raycaster.
///
/// World matrices are cached. After building or changing a hierarchy call
/// [`MeshNode::update_world_matrices`] on its root.
#[derive(Clone, Debug)]
pub struct MeshNode {
    name: String,
    visible: bool,
    local_matrix: WorldMatrix,
    world_matrix: WorldMatrix,
    /// Local space
    triangles: Vec<Triangle<WorldPoint>>,
    /// Local space
    bounding: Option<Bounding>,
    children: Vec<MeshNode>,
}

#[bon]
impl MeshNode {
    #[builder]
    pub fn new(
        #[builder(into, default)] name: String,
        #[builder(default = true)] visible: bool,
        #[builder(default = WorldPoint::origin())] position: WorldPoint,
        #[builder(default = WorldRotation::identity())] rotation: WorldRotation,
        #[builder(default = WorldVector::repeat(1.0))] scale: WorldVector,
        #[builder(default)] triangles: Vec<Triangle<WorldPoint>>,
        bounding: Option<Bounding>,
        #[builder(default)] children: Vec<MeshNode>,
    ) -> Self {
        let local_matrix = WorldMatrix::compose(&position, &rotation, &scale);
        MeshNode {
            name,
            visible,
            local_matrix,
            world_matrix: local_matrix,
            triangles,
            bounding,
            children,
        }
    }
}

impl MeshNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_transform(
        &mut self,
        position: &WorldPoint,
        rotation: &WorldRotation,
        scale: &WorldVector,
    ) {
        self.local_matrix = WorldMatrix::compose(position, rotation, scale);
    }

    pub fn local_matrix(&self) -> &WorldMatrix {
        &self.local_matrix
    }

    pub fn triangles(&self) -> &[Triangle<WorldPoint>] {
        &self.triangles
    }

    pub fn bounding(&self) -> Option<&Bounding> {
        self.bounding.as_ref()
    }

    pub fn set_bounding(&mut self, bounding: Option<Bounding>) {
        self.bounding = bounding;
    }

    /// Sets the bounding volume to the local box around all triangles.
    pub fn compute_bounding_box(&mut self) {
        let bounding_box =
            WorldBox::from_points(self.triangles.iter().flat_map(|triangle| triangle.iter()));
        self.bounding = Some(bounding_box.into());
    }

    pub fn add_child(&mut self, child: MeshNode) {
        self.children.push(child);
    }

    pub fn children_mut(&mut self) -> &mut [MeshNode] {
        &mut self.children
    }

    /// Recomputes the cached world matrices of this subtree with `parent` as the
    /// transform above it.
    pub fn update_world_matrices(&mut self, parent: &WorldMatrix) {
        let mut stack = vec![(self, *parent)];
        while let Some((node, parent_matrix)) = stack.pop() {
            node.world_matrix = parent_matrix * node.local_matrix;
            let world_matrix = node.world_matrix;
            stack.extend(node.children.iter_mut().map(|child| (child, world_matrix)));
        }
    }
}

impl SceneNode for MeshNode {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn world_matrix(&self) -> WorldMatrix {
        self.world_matrix
    }

    fn raycast<'a>(
        &'a self,
        raycaster: &Raycaster,
        intersects: &mut Vec<Intersection<'a, Self>>,
    ) {
        let ray = &raycaster.ray;

        if let Some(bounding) = &self.bounding {
            if !bounding.transformed(&self.world_matrix).intersects_ray(ray) {
                tracing::trace!(name = %self.name, "Bounding volume missed");
                return;
            }
        }

        for triangle in &self.triangles {
            let triangle = triangle.transformed(&self.world_matrix);
            let Some(target) = triangle.intersect_ray(ray, false) else {
                continue;
            };

            let distance = (target - ray.origin).norm();
            if distance < raycaster.near || distance > raycaster.far {
                continue;
            }

            intersects.push(Intersection {
                target,
                normal: triangle.compute_normal(),
                object: self,
                distance,
            });
        }
    }
}

/// Two counter clockwise triangles spanning `-half..half` in the local xz plane,
/// facing +y.
pub fn quad_triangles(half_width: FloatType, half_depth: FloatType) -> Vec<Triangle<WorldPoint>> {
    let a = WorldPoint::new(-half_width, 0.0, half_depth);
    let b = WorldPoint::new(half_width, 0.0, half_depth);
    let c = WorldPoint::new(half_width, 0.0, -half_depth);
    let d = WorldPoint::new(-half_width, 0.0, -half_depth);
    vec![Triangle::new(a, b, c), Triangle::new(a, c, d)]
}

/// Twelve outward facing triangles of a box centered on the local origin.
pub fn cuboid_triangles(half_extents: &WorldVector) -> Vec<Triangle<WorldPoint>> {
    let corners = WorldBox::new(
        WorldPoint::from(-*half_extents),
        WorldPoint::from(*half_extents),
    )
    .corners();

    // Corner index bits: 4 = +x, 2 = +y, 1 = +z
    #[rustfmt::skip]
    const FACES: [[usize; 4]; 6] = [
        [4, 6, 7, 5], // +x
        [0, 1, 3, 2], // -x
        [2, 3, 7, 6], // +y
        [0, 4, 5, 1], // -y
        [1, 5, 7, 3], // +z
        [0, 2, 6, 4], // -z
    ];

    FACES
        .iter()
        .flat_map(|[a, b, c, d]| {
            [
                Triangle::new(corners[*a], corners[*b], corners[*c]),
                Triangle::new(corners[*a], corners[*c], corners[*d]),
            ]
        })
        .collect()
}
