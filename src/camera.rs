use assert2::assert;
use bon::bon;

use crate::geometry::{
    FloatType, SingularMatrix, TransformExt as _, WorldMatrix, WorldPoint, WorldRotation,
    WorldVector,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProjectionKind {
    Perspective,
    Orthographic,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Projection {
    /// Vertical field of view in radians and width / height ratio.
    Perspective { fovy: FloatType, aspect: FloatType },
    Orthographic {
        left: FloatType,
        right: FloatType,
        bottom: FloatType,
        top: FloatType,
    },
}

impl Projection {
    pub fn kind(&self) -> ProjectionKind {
        match self {
            Projection::Perspective { .. } => ProjectionKind::Perspective,
            Projection::Orthographic { .. } => ProjectionKind::Orthographic,
        }
    }

    pub fn matrix(&self, near: FloatType, far: FloatType) -> WorldMatrix {
        match *self {
            Projection::Perspective { fovy, aspect } => {
                WorldMatrix::perspective(fovy, aspect, near, far)
            }
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
            } => WorldMatrix::orthographic(left, right, bottom, top, near, far),
        }
    }
}

/// What a raycaster needs to know about a camera.
pub trait CameraView {
    fn near(&self) -> FloatType;
    fn far(&self) -> FloatType;
    fn projection(&self) -> Projection;
    /// Camera to world transform.
    fn world_matrix(&self) -> WorldMatrix;
    /// World to clip space transform.
    fn view_projection_matrix(&self) -> WorldMatrix;
}

/// Camera looking along its local -z axis with y up.
#[derive(Copy, Clone, Debug)]
pub struct Camera {
    near: FloatType,
    far: FloatType,
    projection: Projection,

    world_matrix: WorldMatrix,
    view_projection_matrix: WorldMatrix,
}

#[bon]
impl Camera {
    #[builder]
    pub fn new(
        #[builder(default = WorldPoint::origin())] position: WorldPoint,
        #[builder(default = WorldRotation::identity())] rotation: WorldRotation,
        #[builder(default = WorldVector::repeat(1.0))] scale: WorldVector,
        #[builder(default = 1.0)] near: FloatType,
        #[builder(default = 2000.0)] far: FloatType,
        projection: Projection,
    ) -> Result<Self, SingularMatrix> {
        assert!(far > near);
        if let Projection::Perspective { fovy, aspect } = projection {
            assert!(near > 0.0);
            assert!(fovy > 0.0);
            assert!(aspect > 0.0);
        }

        let world_matrix = WorldMatrix::compose(&position, &rotation, &scale);
        let view_matrix = world_matrix.try_inverse_transform()?;
        let projection_matrix = projection.matrix(near, far);

        Ok(Camera {
            near,
            far,
            projection,
            world_matrix,
            view_projection_matrix: projection_matrix * view_matrix,
        })
    }
}

impl Camera {
    pub fn position(&self) -> WorldPoint {
        self.world_matrix.position()
    }
}

impl CameraView for Camera {
    fn near(&self) -> FloatType {
        self.near
    }

    fn far(&self) -> FloatType {
        self.far
    }

    fn projection(&self) -> Projection {
        self.projection
    }

    fn world_matrix(&self) -> WorldMatrix {
        self.world_matrix
    }

    fn view_projection_matrix(&self) -> WorldMatrix {
        self.view_projection_matrix
    }
}
