use super::{Ray, Sphere, WorldPoint};

impl Ray {
    /// Checks whether the ray passes within the sphere radius.
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        self.distance_sq_to_point(&sphere.center) <= sphere.radius_sq()
    }

    /// Calculates the first intersection point of the ray with the sphere.
    /// If the origin is inside the sphere, the exit point is returned.
    pub fn intersect_sphere(&self, sphere: &Sphere) -> Option<WorldPoint> {
        let to_center = sphere.center - self.origin;
        let tca = to_center.dot(&self.direction);
        let d2 = to_center.dot(&to_center) - tca * tca;
        let radius2 = sphere.radius_sq();

        if d2 > radius2 {
            return None;
        }

        let thc = (radius2 - d2).sqrt();

        let t0 = tca - thc;
        let t1 = tca + thc;

        if t0 < 0.0 && t1 < 0.0 {
            return None;
        }

        if t0 < 0.0 {
            Some(self.at(t1))
        } else {
            Some(self.at(t0))
        }
    }
}
