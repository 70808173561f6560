use dbsdk_rs::math::Vector3;

/// Box collider, relative to the entity's Transform3D position
#[derive(Clone, Copy)]
pub struct ColliderBounds {
    pub bounds_offset: Vector3,
    pub bounds_extents: Vector3,
}

/// Tags an entity as part of the static obstacle set. `order` is the insertion index during scene construction
#[derive(Clone, Copy)]
pub struct Obstacle {
    pub order: usize,
}

/// Additional child boxes of a compound obstacle, only tested by recursive ray queries
pub struct ColliderParts {
    pub parts: Vec<ColliderBounds>,
}

impl ColliderBounds {
    /// Bounds of a box whose origin sits in the middle of its top face
    pub fn box_hanging_from_top(size: Vector3) -> ColliderBounds {
        ColliderBounds {
            bounds_offset: Vector3::new(0.0, size.y * -0.5, 0.0),
            bounds_extents: size * 0.5,
        }
    }

    /// Like `box_hanging_from_top`, with the top face moved by `offset` from the entity's origin
    pub fn box_hanging_from_top_at(offset: Vector3, size: Vector3) -> ColliderBounds {
        let mut bounds = ColliderBounds::box_hanging_from_top(size);
        bounds.bounds_offset = bounds.bounds_offset + offset;
        bounds
    }

    pub fn min(self: &Self, position: &Vector3) -> Vector3 {
        *position + self.bounds_offset - self.bounds_extents
    }

    pub fn max(self: &Self, position: &Vector3) -> Vector3 {
        *position + self.bounds_offset + self.bounds_extents
    }
}
