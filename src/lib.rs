extern crate dbsdk_rs;
extern crate hecs;

pub mod anim_clip;
pub mod anim_timeline;
pub mod collision;
pub mod common;
pub mod component;
pub mod parse_utils;
pub mod scene;
pub mod stage;
pub mod system;

pub use component::playerinput::LogicalKey;
pub use scene::{SceneDesc, SceneError};
pub use stage::Stage;

/// Frame timing handed to systems by the frame driver
#[derive(Clone, Copy, Debug)]
pub struct TimeData {
    /// seconds since the previous tick
    pub delta_time: f32,
    pub total_time: f32,
}

impl TimeData {
    pub fn new() -> TimeData {
        TimeData {
            delta_time: 0.0,
            total_time: 0.0,
        }
    }

    /// Advances to the next frame
    pub fn step(self: &mut Self, delta_time: f32) {
        self.delta_time = delta_time;
        self.total_time += delta_time;
    }
}
