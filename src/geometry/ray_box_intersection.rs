use super::{FloatType, Ray, WorldBox, WorldPoint};

/// Sorted entry and exit distances of a ray through one slab.
/// The reciprocal is infinite for axis parallel rays, which makes the range
/// infinite when the origin is inside the slab and empty when it is outside.
/// An origin exactly on the slab plane gives NaN, which is skipped when merging.
fn slab(
    origin: FloatType,
    inv_direction: FloatType,
    min: FloatType,
    max: FloatType,
) -> (FloatType, FloatType) {
    if inv_direction >= 0.0 {
        ((min - origin) * inv_direction, (max - origin) * inv_direction)
    } else {
        ((max - origin) * inv_direction, (min - origin) * inv_direction)
    }
}

impl Ray {
    /// Returns the first point where the ray hits the box
    /// or the exit point if the ray starts inside.
    pub fn intersect_box(&self, b: &WorldBox) -> Option<WorldPoint> {
        let inv_direction = self.direction.map(|x| 1.0 / x);

        let (mut t_min, mut t_max) = slab(self.origin.x, inv_direction.x, b.min.x, b.max.x);

        for axis in 1..3 {
            let (axis_min, axis_max) = slab(
                self.origin[axis],
                inv_direction[axis],
                b.min[axis],
                b.max[axis],
            );

            if t_min > axis_max || axis_min > t_max {
                return None;
            }

            if axis_min > t_min || t_min.is_nan() {
                t_min = axis_min;
            }
            if axis_max < t_max || t_max.is_nan() {
                t_max = axis_max;
            }
        }

        if t_max < 0.0 {
            return None;
        }

        Some(self.at(if t_min >= 0.0 { t_min } else { t_max }))
    }

    pub fn intersects_box(&self, b: &WorldBox) -> bool {
        self.intersect_box(b).is_some()
    }
}
