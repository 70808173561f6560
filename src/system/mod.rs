pub mod anim_system;
pub mod character_system;
