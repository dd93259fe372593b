use super::{Ray, Triangle, WorldPoint};

impl Ray {
    /// Calculates the ray intersection point with triangle `a`, `b`, `c`.
    /// With `backface_culling` only hits on the counter clockwise side count.
    ///
    /// Triple product variant of Möller–Trumbore, comparisons are scaled by
    /// `direction · normal` so that no division happens before a hit is certain.
    pub fn intersect_triangle(
        &self,
        a: &WorldPoint,
        b: &WorldPoint,
        c: &WorldPoint,
        backface_culling: bool,
    ) -> Option<WorldPoint> {
        let edge1 = b - a;
        let edge2 = c - a;
        let normal = edge1.cross(&edge2);

        let mut d_dot_n = self.direction.dot(&normal);
        let sign;

        if d_dot_n > 0.0 {
            if backface_culling {
                return None;
            }
            sign = 1.0;
        } else if d_dot_n < 0.0 {
            sign = -1.0;
            d_dot_n = -d_dot_n;
        } else {
            // Parallel, or degenerate triangle
            return None;
        }

        let diff = self.origin - a;

        let d_dot_q_x_e2 = sign * self.direction.dot(&diff.cross(&edge2));
        if d_dot_q_x_e2 < 0.0 {
            return None;
        }

        let d_dot_e1_x_q = sign * self.direction.dot(&edge1.cross(&diff));
        if d_dot_e1_x_q < 0.0 {
            return None;
        }

        if d_dot_q_x_e2 + d_dot_e1_x_q > d_dot_n {
            return None;
        }

        let q_dot_n = -sign * diff.dot(&normal);
        if q_dot_n < 0.0 {
            // Triangle is behind the origin
            return None;
        }

        Some(self.at(q_dot_n / d_dot_n))
    }
}

impl Triangle<WorldPoint> {
    pub fn intersect_ray(&self, ray: &Ray, backface_culling: bool) -> Option<WorldPoint> {
        ray.intersect_triangle(&self[0], &self[1], &self[2], backface_culling)
    }
}
