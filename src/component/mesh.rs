use crate::component::transform3d::Transform3D;

/// Visible transforms of a character, consumed by the renderer after each tick
///
/// `body` is the whole model (position & facing written by the character system, scale by the animation timeline),
/// `mesh` is the model's child mesh, driven entirely by the animation timeline relative to `body`
#[derive(Clone, Copy)]
pub struct CharacterRig {
    pub body: Transform3D,
    pub mesh: Transform3D,
}

impl CharacterRig {
    pub fn default() -> CharacterRig {
        CharacterRig {
            body: Transform3D::default(),
            mesh: Transform3D::default(),
        }
    }
}
