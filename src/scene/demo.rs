use crate::geometry::{WorldMatrix, WorldPoint, WorldRotation, WorldVector};
use crate::scene::{MeshNode, cuboid_triangles, quad_triangles};

/// Ground quad with a few boxes on it, one of them floating.
/// World matrices are up to date.
pub fn demo_scene() -> MeshNode {
    let boxes = [
        ("box_left", WorldPoint::new(-3.0, 1.0, -2.0), 0.0, WorldVector::repeat(1.0)),
        ("box_center", WorldPoint::new(0.0, 0.75, 0.0), 0.6, WorldVector::repeat(0.5)),
        ("tower", WorldPoint::new(3.0, 2.0, -4.0), 0.3, WorldVector::new(0.75, 2.0, 0.75)),
    ];

    let children = boxes
        .into_iter()
        .map(|(name, position, angle, half_extents)| {
            let mut node = MeshNode::builder()
                .name(name)
                .position(position)
                .rotation(WorldRotation::from_axis_angle(&WorldVector::y_axis(), angle))
                .triangles(cuboid_triangles(&half_extents))
                .build();
            node.compute_bounding_box();
            node
        })
        .collect();

    let mut ground = MeshNode::builder()
        .name("ground")
        .triangles(quad_triangles(10.0, 10.0))
        .children(children)
        .build();
    ground.compute_bounding_box();
    ground.update_world_matrices(&WorldMatrix::identity());
    ground
}
