use super::{FloatType, TransformExt as _, WorldBox, WorldMatrix, WorldPoint, WorldVector};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: WorldPoint,
    pub radius: FloatType,
}

impl Default for Sphere {
    fn default() -> Self {
        Sphere {
            center: WorldPoint::origin(),
            radius: 0.0,
        }
    }
}

impl Sphere {
    pub fn new(center: WorldPoint, radius: FloatType) -> Sphere {
        Sphere { center, radius }
    }

    pub fn radius_sq(&self) -> FloatType {
        self.radius * self.radius
    }

    pub fn contains_point(&self, point: &WorldPoint) -> bool {
        (point - self.center).norm_squared() <= self.radius_sq()
    }

    /// Transforms the center and scales the radius by the largest axis scale,
    /// so the result still encloses the transformed sphere under non-uniform scale.
    pub fn apply_matrix(&mut self, matrix: &WorldMatrix) {
        self.center = matrix.transform_point(&self.center);
        self.radius *= matrix.max_scale_on_axis();
    }

    pub fn bounding_box(&self) -> WorldBox {
        let r_vec = WorldVector::repeat(self.radius);
        WorldBox {
            min: self.center - r_vec,
            max: self.center + r_vec,
        }
    }
}
