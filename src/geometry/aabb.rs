use num_traits::One;
use std::ops::{Add, Sub};

use nalgebra::{ClosedAddAssign, ClosedDivAssign, Point, Scalar};

use super::{FloatType, WorldMatrix, WorldPoint};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AABB<Point> {
    pub min: Point,
    pub max: Point,
}

impl<Point> AABB<Point> {
    pub fn new(min: Point, max: Point) -> AABB<Point> {
        AABB { min, max }
    }

    pub fn with_size<S>(min: Point, size: &S) -> AABB<Point>
    where
        for<'a> &'a Point: Add<&'a S, Output = Point>,
    {
        let max = &min + size;
        AABB { min, max }
    }

    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> AABB<Point2> {
        AABB {
            min: f(&self.min),
            max: f(&self.max),
        }
    }
}

impl<Point: Sub + Copy> AABB<Point> {
    pub fn size(&self) -> Point::Output {
        self.max - self.min
    }
}

impl<T: Scalar + ClosedAddAssign + ClosedDivAssign + One, const D: usize> AABB<Point<T, D>> {
    pub fn center(&self) -> Point<T, D> {
        let two = T::one() + T::one();
        let avg_coords = (&self.min.coords + &self.max.coords) / two;
        Point::from(avg_coords)
    }
}

impl AABB<WorldPoint> {
    /// Inverted box that any point expands. Only meaningful as a fold seed.
    pub const EMPTY: AABB<WorldPoint> = AABB {
        min: WorldPoint::new(FloatType::INFINITY, FloatType::INFINITY, FloatType::INFINITY),
        max: WorldPoint::new(
            FloatType::NEG_INFINITY,
            FloatType::NEG_INFINITY,
            FloatType::NEG_INFINITY,
        ),
    };

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.max[i] < self.min[i])
    }

    pub fn expand_by_point(&mut self, point: &WorldPoint) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Smallest box containing all points, `EMPTY` for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a WorldPoint>) -> AABB<WorldPoint> {
        let mut result = Self::EMPTY;
        for point in points {
            result.expand_by_point(point);
        }
        result
    }

    pub fn corners(&self) -> [WorldPoint; 8] {
        let (min, max) = (&self.min, &self.max);
        [
            WorldPoint::new(min.x, min.y, min.z),
            WorldPoint::new(min.x, min.y, max.z),
            WorldPoint::new(min.x, max.y, min.z),
            WorldPoint::new(min.x, max.y, max.z),
            WorldPoint::new(max.x, min.y, min.z),
            WorldPoint::new(max.x, min.y, max.z),
            WorldPoint::new(max.x, max.y, min.z),
            WorldPoint::new(max.x, max.y, max.z),
        ]
    }

    /// Box enclosing `src` after transforming all of its corners.
    /// Not tight under rotation.
    pub fn make_from(src: &AABB<WorldPoint>, matrix: &WorldMatrix) -> AABB<WorldPoint> {
        if src.is_empty() {
            return *src;
        }
        let corners = src.corners().map(|corner| matrix.transform_point(&corner));
        Self::from_points(&corners)
    }

    pub fn apply_matrix(&mut self, matrix: &WorldMatrix) {
        *self = Self::make_from(self, matrix);
    }

    pub fn contains_point(&self, point: &WorldPoint) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }

    pub fn clamp_point(&self, point: &WorldPoint) -> WorldPoint {
        point.sup(&self.min).inf(&self.max)
    }

    pub fn distance_sq_to_point(&self, point: &WorldPoint) -> FloatType {
        (self.clamp_point(point) - point).norm_squared()
    }

    /// Touching boxes intersect.
    pub fn intersects(&self, other: &AABB<WorldPoint>) -> bool {
        (0..3).all(|i| self.max[i] >= other.min[i] && self.min[i] <= other.max[i])
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{
        TransformExt as _, WorldRotation, WorldVector,
        test::{PositiveFloatWrapper, WorldPointWrapper},
    };
    use assert2::assert;
    use test_case::test_case;
    use test_strategy::proptest;

    fn unit_box() -> AABB<WorldPoint> {
        AABB::new([-1.0, -1.0, -1.0].into(), [1.0, 1.0, 1.0].into())
    }

    #[proptest]
    fn make_from_identity_is_exact(
        min: WorldPointWrapper,
        w: PositiveFloatWrapper,
        h: PositiveFloatWrapper,
        d: PositiveFloatWrapper,
    ) {
        let b = AABB::with_size(*min, &WorldVector::new(*w, *h, *d));
        let transformed = AABB::make_from(&b, &WorldMatrix::identity());
        assert!(transformed == b);
    }

    #[test]
    fn make_from_tracks_every_axis() {
        let b = AABB::new([0.0, 0.0, 0.0].into(), [1.0, 2.0, 3.0].into());
        let m = WorldMatrix::compose(
            &WorldPoint::new(10.0, 20.0, 30.0),
            &WorldRotation::identity(),
            &WorldVector::new(2.0, 3.0, 4.0),
        );
        let transformed = AABB::make_from(&b, &m);
        assert!(transformed.min == WorldPoint::new(10.0, 20.0, 30.0));
        assert!(transformed.max == WorldPoint::new(12.0, 26.0, 42.0));
    }

    #[test]
    fn make_from_rotation_grows() {
        let m = WorldMatrix::compose(
            &WorldPoint::origin(),
            &WorldRotation::from_axis_angle(&WorldVector::z_axis(), std::f64::consts::FRAC_PI_4),
            &WorldVector::repeat(1.0),
        );
        let transformed = AABB::make_from(&unit_box(), &m);
        let expected = std::f64::consts::SQRT_2;
        assert!((transformed.max.x - expected).abs() < 1e-9);
        assert!((transformed.min.y + expected).abs() < 1e-9);
        assert!((transformed.max.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_stays_empty() {
        let mut b = AABB::EMPTY;
        assert!(b.is_empty());
        b.apply_matrix(&WorldMatrix::new_translation(&WorldVector::new(1.0, 2.0, 3.0)));
        assert!(b.is_empty());
        assert!(!unit_box().is_empty());
    }

    #[test]
    fn from_points_is_tight() {
        let points = [
            WorldPoint::new(1.0, -2.0, 3.0),
            WorldPoint::new(-1.0, 5.0, 0.0),
            WorldPoint::new(0.0, 0.0, -7.0),
        ];
        let b = AABB::from_points(&points);
        assert!(b.min == WorldPoint::new(-1.0, -2.0, -7.0));
        assert!(b.max == WorldPoint::new(1.0, 5.0, 3.0));
        assert!(points.iter().all(|p| b.contains_point(p)));
    }

    #[test_case(0.5, 0.5, 0.5,   0.0 ; "inside")]
    #[test_case(3.0, 0.0, 0.0,   4.0 ; "face")]
    #[test_case(2.0, 2.0, 0.0,   2.0 ; "edge")]
    #[test_case(-2.0, -2.0, -2.0,   3.0 ; "corner")]
    fn distance_to_unit_box(x: f64, y: f64, z: f64, expected_sq: f64) {
        assert!(unit_box().distance_sq_to_point(&WorldPoint::new(x, y, z)) == expected_sq);
    }

    #[test_case(1.0, true ; "overlap")]
    #[test_case(2.0, true ; "touching")]
    #[test_case(3.5, false ; "apart")]
    fn box_overlap(offset: f64, expected: bool) {
        let other = AABB::new(
            WorldPoint::new(offset - 1.0, -1.0, -1.0),
            WorldPoint::new(offset + 1.0, 1.0, 1.0),
        );
        assert!(unit_box().intersects(&other) == expected);
        assert!(other.intersects(&unit_box()) == expected);
    }

    #[test]
    fn center_and_size() {
        let b = AABB::new(WorldPoint::new(1.0, 2.0, 3.0), WorldPoint::new(3.0, 6.0, 9.0));
        assert!(b.center() == WorldPoint::new(2.0, 4.0, 6.0));
        assert!(b.size() == WorldVector::new(2.0, 4.0, 6.0));
    }
}
