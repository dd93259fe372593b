//! Triangle-triangle overlap test of Devillers and Guigue.
//!
//! All sign decisions compare against exact zero. Inputs with exactly
//! representable coordinates (such as small integers) are decided exactly,
//! general floating point inputs can flip on near-touching configurations.

use itertools::iproduct;
use nalgebra::Point2;

use super::{FloatType, Triangle, WorldPoint, WorldVector};

type PlanePoint = Point2<FloatType>;

/// Signed volume of the tetrahedron, `det[a - d, b - d, c - d]`.
/// Positive when `d` is on the clockwise side of `a`, `b`, `c`.
fn orient(a: &WorldPoint, b: &WorldPoint, c: &WorldPoint, d: &WorldPoint) -> FloatType {
    (a - d).dot(&(b - d).cross(&(c - d)))
}

fn all_strictly_same_sign(values: &[FloatType; 3]) -> bool {
    values.iter().all(|&x| x > 0.0) || values.iter().all(|&x| x < 0.0)
}

/// Index of the only vertex lying on the plane, if the other two are
/// strictly on the same side of it.
fn single_touching_vertex(values: &[FloatType; 3]) -> Option<usize> {
    (0..3).find(|&i| values[i] == 0.0 && values[(i + 1) % 3] * values[(i + 2) % 3] > 0.0)
}

/// Index of the vertex alone on its side of the plane.
/// Vertices on the plane count towards the other side.
fn lone_vertex(values: &[FloatType; 3]) -> Option<usize> {
    (0..3).find(|&i| values[i] != 0.0 && values[(i + 1) % 3] * values[(i + 2) % 3] >= 0.0)
}

/// Boundary inclusive barycentric test for a point already known to be in the triangle plane.
fn contains_coplanar_point(triangle: &Triangle<WorldPoint>, point: &WorldPoint) -> bool {
    let v0 = triangle[2] - triangle[0];
    let v1 = triangle[1] - triangle[0];
    let v2 = point - triangle[0];

    let dot00 = v0.dot(&v0);
    let dot01 = v0.dot(&v1);
    let dot02 = v0.dot(&v2);
    let dot11 = v1.dot(&v1);
    let dot12 = v1.dot(&v2);

    let denominator = dot00 * dot11 - dot01 * dot01;
    if denominator <= 0.0 {
        return false;
    }

    let u = dot11 * dot02 - dot01 * dot12;
    let v = dot00 * dot12 - dot01 * dot02;

    u >= 0.0 && v >= 0.0 && u + v <= denominator
}

/// Coordinate pair spanning the plane with the normal,
/// dropping the axis of the largest normal component.
fn projection_axes(normal: &WorldVector) -> (usize, usize) {
    let n = normal.abs();
    if n.z >= n.x && n.z >= n.y {
        (0, 1)
    } else if n.x >= n.y {
        (1, 2)
    } else {
        (0, 2)
    }
}

fn direction(p1: &PlanePoint, p2: &PlanePoint, p: &PlanePoint) -> FloatType {
    (p.x - p1.x) * (p2.y - p1.y) - (p2.x - p1.x) * (p.y - p1.y)
}

fn on_segment(p1: &PlanePoint, p2: &PlanePoint, p: &PlanePoint) -> bool {
    p.x >= p1.x.min(p2.x) && p.x <= p1.x.max(p2.x) && p.y >= p1.y.min(p2.y) && p.y <= p1.y.max(p2.y)
}

fn opposite_signs(a: FloatType, b: FloatType) -> bool {
    (a > 0.0 && b < 0.0) || (a < 0.0 && b > 0.0)
}

/// Closed segments `p1`-`p2` and `p3`-`p4` share at least one point.
fn segments_intersect(p1: &PlanePoint, p2: &PlanePoint, p3: &PlanePoint, p4: &PlanePoint) -> bool {
    let d1 = direction(p3, p4, p1);
    let d2 = direction(p3, p4, p2);
    let d3 = direction(p1, p2, p3);
    let d4 = direction(p1, p2, p4);

    (opposite_signs(d1, d2) && opposite_signs(d3, d4))
        || (d1 == 0.0 && on_segment(p3, p4, p1))
        || (d2 == 0.0 && on_segment(p3, p4, p2))
        || (d3 == 0.0 && on_segment(p1, p2, p3))
        || (d4 == 0.0 && on_segment(p1, p2, p4))
}

fn coplanar_triangles_intersect(t1: &Triangle<WorldPoint>, t2: &Triangle<WorldPoint>) -> bool {
    let (i0, i1) = projection_axes(&t1.normal());
    let project = |p: &WorldPoint| PlanePoint::new(p[i0], p[i1]);
    let edges = |t: &Triangle<WorldPoint>| {
        let t = t.map(project);
        [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])]
    };

    if iproduct!(edges(t1), edges(t2)).any(|((a, b), (c, d))| segments_intersect(&a, &b, &c, &d)) {
        return true;
    }

    // No crossing edges, one triangle may still contain the other
    contains_coplanar_point(t2, &t1.centroid()) || contains_coplanar_point(t1, &t2.centroid())
}

/// Checks whether two triangles share at least one point. Touching counts.
///
/// Degenerate triangles do not span a plane and never intersect anything.
pub fn triangles_intersect(t1: &Triangle<WorldPoint>, t2: &Triangle<WorldPoint>) -> bool {
    if t1.normal() == WorldVector::zeros() || t2.normal() == WorldVector::zeros() {
        return false;
    }

    let [mut a1, mut b1, mut c1] = *t1.vertices();
    let [mut a2, mut b2, mut c2] = *t2.vertices();

    // Vertices of t2 against the plane of t1
    let mut t2_sides = [
        orient(&a1, &b1, &c1, &a2),
        orient(&a1, &b1, &c1, &b2),
        orient(&a1, &b1, &c1, &c2),
    ];

    if all_strictly_same_sign(&t2_sides) {
        return false;
    }
    if t2_sides.iter().all(|&x| x == 0.0) {
        return coplanar_triangles_intersect(t1, t2);
    }
    if let Some(i) = single_touching_vertex(&t2_sides) {
        return contains_coplanar_point(t1, &t2[i]);
    }

    // Vertices of t1 against the plane of t2
    let t1_sides = [
        orient(&a2, &b2, &c2, &a1),
        orient(&a2, &b2, &c2, &b1),
        orient(&a2, &b2, &c2, &c1),
    ];

    if all_strictly_same_sign(&t1_sides) {
        return false;
    }
    if let Some(i) = single_touching_vertex(&t1_sides) {
        return contains_coplanar_point(t2, &t1[i]);
    }

    // Rotate t1 so that its lone vertex comes first and lies on the positive side of t2
    if let Some(i) = lone_vertex(&t1_sides) {
        match i {
            1 => (a1, b1, c1) = (b1, c1, a1),
            2 => (a1, b1, c1) = (c1, a1, b1),
            _ => {}
        }
        if t1_sides[i] < 0.0 {
            std::mem::swap(&mut b2, &mut c2);
            t2_sides.swap(1, 2);
        }
    }

    // Same for t2 against t1
    if let Some(i) = lone_vertex(&t2_sides) {
        match i {
            1 => (a2, b2, c2) = (b2, c2, a2),
            2 => (a2, b2, c2) = (c2, a2, b2),
            _ => {}
        }
        if t2_sides[i] < 0.0 {
            std::mem::swap(&mut b1, &mut c1);
        }
    }

    // The intervals of both triangles on the planes intersection line overlap
    orient(&a1, &b1, &a2, &b2) <= 0.0 && orient(&a1, &c1, &c2, &a2) <= 0.0
}
