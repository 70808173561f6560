pub mod charactercontroller;
pub mod collider;
pub mod mesh;
pub mod playerinput;
pub mod sequencer;
pub mod transform3d;
