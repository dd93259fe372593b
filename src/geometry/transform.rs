use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
use thiserror::Error;

use super::{FloatType, WorldMatrix, WorldPoint, WorldRotation, WorldVector};

#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("Matrix is singular and cannot be inverted")]
pub struct SingularMatrix;

/// Transform helpers on top of nalgebra's 4x4 matrix.
/// All matrices are column major and act on column vectors.
pub trait TransformExt: Sized {
    /// Builds a transform that scales, then rotates, then translates.
    /// The result is always affine.
    fn compose(position: &WorldPoint, rotation: &WorldRotation, scale: &WorldVector) -> Self;

    /// OpenGL style perspective projection, `fovy` in radians.
    fn perspective(fovy: FloatType, aspect: FloatType, near: FloatType, far: FloatType) -> Self;

    /// OpenGL style orthographic projection.
    fn orthographic(
        left: FloatType,
        right: FloatType,
        bottom: FloatType,
        top: FloatType,
        near: FloatType,
        far: FloatType,
    ) -> Self;

    /// View matrix of an eye looking at `target`.
    fn look_at(eye: &WorldPoint, target: &WorldPoint, up: &WorldVector) -> Self;

    /// General inverse. Fails only if the determinant is exactly zero.
    fn try_inverse_transform(&self) -> Result<Self, SingularMatrix>;

    /// Transforms a point with the perspective divide.
    /// Returns `None` if the point maps to infinity (w == 0).
    fn project_point(&self, point: &WorldPoint) -> Option<WorldPoint>;

    /// Applies the linear part to a direction and normalizes the result.
    /// Directions collapsed by the matrix become zero vectors.
    fn transform_direction(&self, direction: &WorldVector) -> WorldVector;

    /// Translation part of the matrix.
    fn position(&self) -> WorldPoint;

    /// Length of the longest basis vector of the linear part.
    fn max_scale_on_axis(&self) -> FloatType;

    fn linear_part(&self) -> Matrix3<FloatType>;
}

impl TransformExt for WorldMatrix {
    fn compose(position: &WorldPoint, rotation: &WorldRotation, scale: &WorldVector) -> Self {
        Matrix4::new_translation(&position.coords)
            * rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(scale)
    }

    fn perspective(fovy: FloatType, aspect: FloatType, near: FloatType, far: FloatType) -> Self {
        let f = 1.0 / (fovy / 2.0).tan();
        let nf = 1.0 / (near - far);
        #[rustfmt::skip]
        let m = Matrix4::new(
            f / aspect, 0.0, 0.0,               0.0,
            0.0,        f,   0.0,               0.0,
            0.0,        0.0, (far + near) * nf, 2.0 * far * near * nf,
            0.0,        0.0, -1.0,              0.0,
        );
        m
    }

    fn orthographic(
        left: FloatType,
        right: FloatType,
        bottom: FloatType,
        top: FloatType,
        near: FloatType,
        far: FloatType,
    ) -> Self {
        let lr = 1.0 / (left - right);
        let bt = 1.0 / (bottom - top);
        let nf = 1.0 / (near - far);
        #[rustfmt::skip]
        let m = Matrix4::new(
            -2.0 * lr, 0.0,       0.0,      (left + right) * lr,
            0.0,       -2.0 * bt, 0.0,      (top + bottom) * bt,
            0.0,       0.0,       2.0 * nf, (far + near) * nf,
            0.0,       0.0,       0.0,      1.0,
        );
        m
    }

    fn look_at(eye: &WorldPoint, target: &WorldPoint, up: &WorldVector) -> Self {
        Matrix4::look_at_rh(eye, target, up)
    }

    fn try_inverse_transform(&self) -> Result<Self, SingularMatrix> {
        if self.determinant() == 0.0 {
            return Err(SingularMatrix);
        }
        self.try_inverse().ok_or(SingularMatrix)
    }

    fn project_point(&self, point: &WorldPoint) -> Option<WorldPoint> {
        let homogeneous: Vector4<FloatType> = self * point.to_homogeneous();
        Point3::from_homogeneous(homogeneous)
    }

    fn transform_direction(&self, direction: &WorldVector) -> WorldVector {
        (self.linear_part() * direction)
            .try_normalize(0.0)
            .unwrap_or_else(Vector3::zeros)
    }

    fn position(&self) -> WorldPoint {
        WorldPoint::from(self.fixed_view::<3, 1>(0, 3).into_owned())
    }

    fn max_scale_on_axis(&self) -> FloatType {
        self.linear_part()
            .column_iter()
            .map(|column| column.norm())
            .fold(0.0, FloatType::max)
    }

    fn linear_part(&self) -> Matrix3<FloatType> {
        self.fixed_view::<3, 3>(0, 0).into_owned()
    }
}
