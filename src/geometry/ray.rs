use super::{EPSILON, FloatType, TransformExt as _, WorldMatrix, WorldPoint, WorldVector};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Direction of the ray.
    /// Distance and intersection queries assume unit length, but it is not enforced.
    pub direction: WorldVector,
}

/// Closest approach between a ray and a line segment.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentDistance {
    pub distance_sq: FloatType,
    pub point_on_ray: WorldPoint,
    pub point_on_segment: WorldPoint,
}

impl Default for Ray {
    fn default() -> Self {
        Ray {
            origin: WorldPoint::origin(),
            direction: -WorldVector::z(),
        }
    }
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        Ray { origin, direction }
    }

    /// Creates a ray with normalized direction, `None` if the direction is zero.
    pub fn try_new_normalized(origin: WorldPoint, direction: WorldVector) -> Option<Ray> {
        let direction = direction.try_normalize(0.0)?;
        Some(Ray { origin, direction })
    }

    pub fn set(&mut self, origin: WorldPoint, direction: WorldVector) {
        self.origin = origin;
        self.direction = direction;
    }

    pub fn at(&self, t: FloatType) -> WorldPoint {
        self.origin + self.direction * t
    }

    /// Moves the ray by an affine transform. The direction stays normalized.
    pub fn apply_matrix(&mut self, matrix: &WorldMatrix) {
        self.origin = matrix.transform_point(&self.origin);
        self.direction = matrix.transform_direction(&self.direction);
    }

    pub fn transformed(&self, matrix: &WorldMatrix) -> Ray {
        let mut ray = *self;
        ray.apply_matrix(matrix);
        ray
    }

    /// Squared distance between the point and the closest point of the ray.
    /// Points behind the origin are measured to the origin.
    pub fn distance_sq_to_point(&self, point: &WorldPoint) -> FloatType {
        let direction_distance = (point - self.origin).dot(&self.direction);

        if direction_distance < 0.0 {
            return (self.origin - point).norm_squared();
        }

        (self.at(direction_distance) - point).norm_squared()
    }

    pub fn distance_to_point(&self, point: &WorldPoint) -> FloatType {
        self.distance_sq_to_point(point).sqrt()
    }

    /// Minimum squared distance between the ray and segment `v0`-`v1`,
    /// together with the closest points on both.
    ///
    /// Based on GteDistRaySegment.h from Geometric Tools.
    pub fn distance_sq_to_segment(&self, v0: &WorldPoint, v1: &WorldPoint) -> SegmentDistance {
        let segment_center = nalgebra::center(v0, v1);
        let segment_direction = (v1 - v0)
            .try_normalize(0.0)
            .unwrap_or_else(WorldVector::zeros);
        let diff = self.origin - segment_center;

        let segment_extent = (v1 - v0).norm() * 0.5;
        let a01 = -self.direction.dot(&segment_direction);
        let b0 = diff.dot(&self.direction);
        let b1 = -diff.dot(&segment_direction);
        let c = diff.norm_squared();
        let det = (1.0 - a01 * a01).abs();

        let s0;
        let s1;
        let distance_sq;

        // Rounding leaves det slightly above zero for parallel unit vectors
        if det > EPSILON {
            // The ray and segment are not parallel.
            let t0 = a01 * b1 - b0;
            let t1 = a01 * b0 - b1;
            let ext_det = segment_extent * det;

            if t0 >= 0.0 {
                if t1 >= -ext_det {
                    if t1 <= ext_det {
                        // Minimum at interior points of ray and segment.
                        let inv_det = 1.0 / det;
                        s0 = t0 * inv_det;
                        s1 = t1 * inv_det;
                        distance_sq =
                            s0 * (s0 + a01 * s1 + 2.0 * b0) + s1 * (a01 * s0 + s1 + 2.0 * b1) + c;
                    } else {
                        s1 = segment_extent;
                        s0 = (-(a01 * s1 + b0)).max(0.0);
                        distance_sq = -s0 * s0 + s1 * (s1 + 2.0 * b1) + c;
                    }
                } else {
                    s1 = -segment_extent;
                    s0 = (-(a01 * s1 + b0)).max(0.0);
                    distance_sq = -s0 * s0 + s1 * (s1 + 2.0 * b1) + c;
                }
            } else if t1 <= -ext_det {
                s0 = (-(-a01 * segment_extent + b0)).max(0.0);
                s1 = if s0 > 0.0 {
                    -segment_extent
                } else {
                    (-b1).clamp(-segment_extent, segment_extent)
                };
                distance_sq = -s0 * s0 + s1 * (s1 + 2.0 * b1) + c;
            } else if t1 <= ext_det {
                s0 = 0.0;
                s1 = (-b1).clamp(-segment_extent, segment_extent);
                distance_sq = s1 * (s1 + 2.0 * b1) + c;
            } else {
                s0 = (-(a01 * segment_extent + b0)).max(0.0);
                s1 = if s0 > 0.0 {
                    segment_extent
                } else {
                    (-b1).clamp(-segment_extent, segment_extent)
                };
                distance_sq = -s0 * s0 + s1 * (s1 + 2.0 * b1) + c;
            }
        } else {
            // Parallel, pick the segment end the ray is heading towards.
            s1 = if a01 > 0.0 {
                -segment_extent
            } else {
                segment_extent
            };
            s0 = (-(a01 * s1 + b0)).max(0.0);
            distance_sq = -s0 * s0 + s1 * (s1 + 2.0 * b1) + c;
        }

        SegmentDistance {
            distance_sq,
            point_on_ray: self.at(s0),
            point_on_segment: segment_center + segment_direction * s1,
        }
    }
}
