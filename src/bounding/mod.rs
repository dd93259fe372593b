mod obb;

pub use obb::Obb;

use crate::geometry::{Ray, Sphere, WorldBox, WorldMatrix};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BoundingType {
    Aabb,
    Sphere,
    Obb,
}

/// Bounding volume of one of the supported shapes.
///
/// Any pair of volumes can be tested for overlap. Touching volumes overlap.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Bounding {
    Aabb(WorldBox),
    Sphere(Sphere),
    Obb(Obb),
}

impl From<WorldBox> for Bounding {
    fn from(value: WorldBox) -> Self {
        Bounding::Aabb(value)
    }
}

impl From<Sphere> for Bounding {
    fn from(value: Sphere) -> Self {
        Bounding::Sphere(value)
    }
}

impl From<Obb> for Bounding {
    fn from(value: Obb) -> Self {
        Bounding::Obb(value)
    }
}

impl Bounding {
    pub fn bounding_type(&self) -> BoundingType {
        match self {
            Bounding::Aabb(_) => BoundingType::Aabb,
            Bounding::Sphere(_) => BoundingType::Sphere,
            Bounding::Obb(_) => BoundingType::Obb,
        }
    }

    pub fn intersects(&self, other: &Bounding) -> bool {
        match (self, other) {
            (Bounding::Sphere(a), Bounding::Sphere(b)) => spheres_intersect(a, b),
            (Bounding::Sphere(s), Bounding::Aabb(b)) | (Bounding::Aabb(b), Bounding::Sphere(s)) => {
                sphere_intersects_box(s, b)
            }
            (Bounding::Sphere(s), Bounding::Obb(o)) | (Bounding::Obb(o), Bounding::Sphere(s)) => {
                sphere_intersects_obb(s, o)
            }
            (Bounding::Aabb(a), Bounding::Aabb(b)) => a.intersects(b),
            (Bounding::Aabb(b), Bounding::Obb(o)) | (Bounding::Obb(o), Bounding::Aabb(b)) => {
                o.intersects_obb(&Obb::from_aabb(b))
            }
            (Bounding::Obb(a), Bounding::Obb(b)) => a.intersects_obb(b),
        }
    }

    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        match self {
            Bounding::Aabb(b) => ray.intersects_box(b),
            Bounding::Sphere(s) => ray.intersects_sphere(s),
            Bounding::Obb(o) => o.intersects_ray(ray),
        }
    }

    /// Moves the volume into the space of the matrix.
    /// Boxes and spheres keep their kind and grow to stay enclosing.
    pub fn apply_matrix(&mut self, matrix: &WorldMatrix) {
        match self {
            Bounding::Aabb(b) => b.apply_matrix(matrix),
            Bounding::Sphere(s) => s.apply_matrix(matrix),
            Bounding::Obb(o) => o.apply_matrix(matrix),
        }
    }

    pub fn transformed(&self, matrix: &WorldMatrix) -> Bounding {
        let mut result = *self;
        result.apply_matrix(matrix);
        result
    }

    pub fn copy_from(&mut self, src: &Bounding) {
        *self = *src;
    }
}

fn spheres_intersect(a: &Sphere, b: &Sphere) -> bool {
    let radius_sum = a.radius + b.radius;
    (a.center - b.center).norm_squared() <= radius_sum * radius_sum
}

fn sphere_intersects_box(s: &Sphere, b: &WorldBox) -> bool {
    b.distance_sq_to_point(&s.center) <= s.radius_sq()
}

fn sphere_intersects_obb(s: &Sphere, o: &Obb) -> bool {
    (o.closest_point(&s.center) - s.center).norm_squared() <= s.radius_sq()
}
