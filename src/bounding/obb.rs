use arrayvec::ArrayVec;
use nalgebra::Matrix3;

use crate::geometry::{
    EPSILON, FloatType, Ray, TransformExt as _, WorldBox, WorldMatrix, WorldPoint, WorldRotation,
    WorldVector,
};

/// Oriented bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Obb {
    pub center: WorldPoint,
    /// Half size along each of the box axes, non negative.
    pub half_extents: WorldVector,
    /// Columns are the orthonormal box axes.
    pub rotation: Matrix3<FloatType>,
}

impl Default for Obb {
    fn default() -> Self {
        Obb {
            center: WorldPoint::origin(),
            half_extents: WorldVector::zeros(),
            rotation: Matrix3::identity(),
        }
    }
}

impl Obb {
    pub fn new(center: WorldPoint, half_extents: WorldVector, rotation: &WorldRotation) -> Obb {
        Obb {
            center,
            half_extents,
            rotation: rotation.to_rotation_matrix().into_inner(),
        }
    }

    pub fn from_aabb(b: &WorldBox) -> Obb {
        Obb {
            center: b.center(),
            half_extents: b.size() / 2.0,
            rotation: Matrix3::identity(),
        }
    }

    pub fn axis(&self, i: usize) -> WorldVector {
        self.rotation.column(i).into_owned()
    }

    /// Coordinates of the point in the box frame, relative to the center.
    pub fn to_local(&self, point: &WorldPoint) -> WorldVector {
        self.rotation.tr_mul(&(point - self.center))
    }

    /// The box in its own frame.
    pub fn local_box(&self) -> WorldBox {
        WorldBox::new(
            WorldPoint::from(-self.half_extents),
            WorldPoint::from(self.half_extents),
        )
    }

    pub fn closest_point(&self, point: &WorldPoint) -> WorldPoint {
        let local = self.to_local(point);
        let clamped = local.zip_map(&self.half_extents, |x, h| x.clamp(-h, h));
        self.center + self.rotation * clamped
    }

    pub fn contains_point(&self, point: &WorldPoint) -> bool {
        let local = self.to_local(point);
        local
            .iter()
            .zip(self.half_extents.iter())
            .all(|(x, h)| x.abs() <= *h)
    }

    /// Transforms the center and each half extent scaled axis by the matrix.
    /// The box stays exact under rotations, translations and scales along its own axes.
    pub fn apply_matrix(&mut self, matrix: &WorldMatrix) {
        let linear = matrix.linear_part();
        self.center = matrix.transform_point(&self.center);

        for i in 0..3 {
            let axis = self.axis(i);
            let scaled = linear * (axis * self.half_extents[i]);
            let half = scaled.norm();
            let new_axis = if half > 0.0 {
                scaled / half
            } else {
                (linear * axis).try_normalize(0.0).unwrap_or(axis)
            };
            self.half_extents[i] = half;
            self.rotation.set_column(i, &new_axis);
        }
    }

    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        let local_ray = Ray::new(
            WorldPoint::from(self.to_local(&ray.origin)),
            self.rotation.tr_mul(&ray.direction),
        );
        local_ray.intersects_box(&self.local_box())
    }

    /// Half length of the projection of the box onto the axis.
    fn projected_radius(&self, axis: &WorldVector) -> FloatType {
        (0..3)
            .map(|i| self.half_extents[i] * axis.dot(&self.rotation.column(i)).abs())
            .sum()
    }

    /// Separating axis test over the face normals of both boxes
    /// and the cross products of their edge directions.
    pub fn intersects_obb(&self, other: &Obb) -> bool {
        let mut axes = ArrayVec::<WorldVector, 15>::new();
        for i in 0..3 {
            axes.push(self.axis(i));
            axes.push(other.axis(i));
        }
        for i in 0..3 {
            for j in 0..3 {
                let cross = self.axis(i).cross(&other.axis(j));
                // Near parallel edges give no new axis, the face normals cover them
                if cross.norm_squared() > EPSILON {
                    axes.push(cross);
                }
            }
        }

        let offset = other.center - self.center;
        axes.iter().all(|axis| {
            offset.dot(axis).abs() <= self.projected_radius(axis) + other.projected_radius(axis)
        })
    }
}
