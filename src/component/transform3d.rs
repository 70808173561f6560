use dbsdk_rs::math::Vector3;

/// Position, euler rotation (radians) & scale of an object
///
/// Rotation is kept as euler angles so individual axes can be interpolated by the animation timeline
#[derive(Clone, Copy)]
pub struct Transform3D {
    pub position: Vector3,
    pub scale: Vector3,
    pub rotation: Vector3
}

impl Transform3D {
    pub fn default() -> Transform3D {
        Transform3D {
            position: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Vector3::zero()
        }
    }

    pub fn with_position(self: &Self, new_position: Vector3) -> Transform3D {
        let mut result = *self;
        result.position = new_position;
        result
    }
}
