use std::ops::{Index, Sub};

use nalgebra::{
    ClosedAddAssign, ClosedDivAssign, ClosedMulAssign, ClosedSubAssign, DefaultAllocator, DimName,
    OPoint, OVector, Scalar, allocator::Allocator,
};
use num_traits::Zero;

use super::{WorldMatrix, WorldPoint, WorldVector, triangles_intersect};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle<Point>([Point; 3]);

impl<Point> Triangle<Point> {
    pub fn new(a: Point, b: Point, c: Point) -> Triangle<Point> {
        Triangle([a, b, c])
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Point> {
        self.0.iter()
    }

    pub fn vertices(&self) -> &[Point; 3] {
        &self.0
    }
}

impl<Point> Index<usize> for Triangle<Point> {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<Point> From<[Point; 3]> for Triangle<Point> {
    fn from(value: [Point; 3]) -> Self {
        Triangle(value)
    }
}

impl<Point> Triangle<Point> {
    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> Triangle<Point2> {
        Triangle([f(&self[0]), f(&self[1]), f(&self[2])])
    }
}

impl<T: Scalar, D: DimName> Triangle<OPoint<T, D>>
where
    DefaultAllocator: Allocator<D>,
    T: ClosedAddAssign + ClosedDivAssign + Zero + From<u16>,
{
    pub fn centroid(&self) -> OPoint<T, D> {
        OPoint {
            coords: self.0.iter().map(|p| &p.coords).sum::<OVector<T, D>>()
                / T::from(self.0.len() as u16),
        }
    }
}

impl<T: Scalar, D: DimName> Triangle<OPoint<T, D>>
where
    DefaultAllocator: Allocator<D>,
    for<'a> &'a OPoint<T, D>: Sub<Output = OVector<T, D>>,
{
    /// Returns edge vectors, coming from self[0]
    pub fn edges(&self) -> [OVector<T, D>; 2] {
        [&self.0[1] - &self.0[0], &self.0[2] - &self.0[0]]
    }
}

impl<T: Scalar, D: DimName> Triangle<OPoint<T, D>>
where
    DefaultAllocator: Allocator<D>,
    for<'a> &'a OPoint<T, D>: Sub<Output = OVector<T, D>>,
    T: ClosedAddAssign + ClosedSubAssign + ClosedMulAssign,
{
    /// Returns a normal vector of the triangle, not normalized.
    pub fn normal(&self) -> OVector<T, D> {
        let [e1, e2] = self.edges();
        e1.cross(&e2)
    }
}

impl Triangle<WorldPoint> {
    /// Unit normal `(c - b) x (a - b)`, zero vector for degenerate triangles.
    pub fn compute_normal(&self) -> WorldVector {
        let [a, b, c] = &self.0;
        (c - b)
            .cross(&(a - b))
            .try_normalize(0.0)
            .unwrap_or_else(WorldVector::zeros)
    }

    pub fn intersects_triangle(&self, other: &Triangle<WorldPoint>) -> bool {
        triangles_intersect(self, other)
    }

    /// Transforms all vertices in place.
    pub fn apply_matrix(&mut self, matrix: &WorldMatrix) {
        for vertex in self.0.iter_mut() {
            *vertex = matrix.transform_point(vertex);
        }
    }

    pub fn transformed(&self, matrix: &WorldMatrix) -> Triangle<WorldPoint> {
        self.map(|vertex| matrix.transform_point(vertex))
    }
}
