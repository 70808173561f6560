use std::collections::HashMap;

use lazy_static::lazy_static;

pub const CLIP_JUMP_START: &str = "jumpStart";
pub const CLIP_JUMP_PROCESS: &str = "jumpProcess";
pub const CLIP_JUMP_TOP: &str = "jumpTop";
pub const CLIP_JUMP_END: &str = "jumpEnd";
pub const CLIP_MOVE: &str = "move";
pub const CLIP_STOP: &str = "stop";

/// Which part of the character rig a tween drives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimTarget {
    Body,
    Mesh,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimProperty {
    Position,
    Rotation,
    Scale,
}

/// A single animatable vector property on the rig
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimChannel {
    pub target: AnimTarget,
    pub property: AnimProperty,
}

/// End value of a tween. Axes left as None are not touched
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Axes {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenDef {
    pub channel: AnimChannel,
    pub to: Axes,
    pub duration: f32,
}

/// Tweens which run together. The step is done once all of them are
#[derive(Clone, Debug, PartialEq)]
pub struct ClipStep {
    pub tweens: Vec<TweenDef>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClipDef {
    /// targets snapped back to rest (and whose tweens are dropped) before the clip starts
    pub resets: Vec<AnimTarget>,
    pub steps: Vec<ClipStep>,
}

impl AnimChannel {
    pub const fn new(target: AnimTarget, property: AnimProperty) -> AnimChannel {
        AnimChannel { target, property }
    }

    pub fn all_of(target: AnimTarget) -> [AnimChannel;3] {
        [
            AnimChannel::new(target, AnimProperty::Position),
            AnimChannel::new(target, AnimProperty::Rotation),
            AnimChannel::new(target, AnimProperty::Scale),
        ]
    }
}

impl Axes {
    pub fn xyz(x: f32, y: f32, z: f32) -> Axes {
        Axes { x: Some(x), y: Some(y), z: Some(z) }
    }

    pub fn y(y: f32) -> Axes {
        Axes { x: None, y: Some(y), z: None }
    }

    pub fn z(z: f32) -> Axes {
        Axes { x: None, y: None, z: Some(z) }
    }
}

impl ClipStep {
    /// Time until every tween in this step has finished
    pub fn duration(self: &Self) -> f32 {
        self.tweens.iter().fold(0.0, |acc, t| f32::max(acc, t.duration))
    }
}

impl ClipDef {
    pub fn duration(self: &Self) -> f32 {
        self.steps.iter().map(|s| s.duration()).sum()
    }

    /// Whether any step of this clip drives the given channel
    pub fn touches(self: &Self, channel: &AnimChannel) -> bool {
        self.steps.iter().any(|s| s.tweens.iter().any(|t| t.channel == *channel))
    }
}

fn tween(target: AnimTarget, property: AnimProperty, to: Axes, duration: f32) -> TweenDef {
    TweenDef {
        channel: AnimChannel::new(target, property),
        to,
        duration,
    }
}

fn body_scale(x: f32, y: f32, z: f32, duration: f32) -> ClipStep {
    ClipStep {
        tweens: vec![tween(AnimTarget::Body, AnimProperty::Scale, Axes::xyz(x, y, z), duration)]
    }
}

fn build_clip_library() -> HashMap<&'static str, ClipDef> {
    let mut clips = HashMap::new();

    // squash before take-off
    clips.insert(CLIP_JUMP_START, ClipDef {
        resets: Vec::new(),
        steps: vec![body_scale(1.2, 0.5, 1.2, 0.2)],
    });

    // stretch while rising
    clips.insert(CLIP_JUMP_PROCESS, ClipDef {
        resets: Vec::new(),
        steps: vec![body_scale(0.7, 1.5, 0.7, 0.2)],
    });

    clips.insert(CLIP_JUMP_TOP, ClipDef {
        resets: Vec::new(),
        steps: vec![body_scale(1.0, 1.0, 1.0, 0.2)],
    });

    // quick squash on impact, then recover
    clips.insert(CLIP_JUMP_END, ClipDef {
        resets: Vec::new(),
        steps: vec![
            body_scale(1.2, 0.5, 1.2, 0.07),
            body_scale(1.0, 1.0, 1.0, 0.15),
        ],
    });

    // lean & hop
    clips.insert(CLIP_MOVE, ClipDef {
        resets: vec![AnimTarget::Mesh],
        steps: vec![
            ClipStep {
                tweens: vec![
                    tween(AnimTarget::Mesh, AnimProperty::Rotation, Axes::z(0.2), 0.2),
                    tween(AnimTarget::Mesh, AnimProperty::Position, Axes::y(0.3), 0.15),
                ]
            },
            ClipStep {
                tweens: vec![
                    tween(AnimTarget::Mesh, AnimProperty::Rotation, Axes::z(0.0), 0.15),
                    tween(AnimTarget::Mesh, AnimProperty::Position, Axes::y(0.0), 0.2),
                ]
            },
        ],
    });

    // idle breathing
    clips.insert(CLIP_STOP, ClipDef {
        resets: vec![AnimTarget::Mesh],
        steps: vec![
            ClipStep {
                tweens: vec![tween(AnimTarget::Mesh, AnimProperty::Scale, Axes::xyz(1.01, 0.9, 1.01), 0.3)]
            },
            ClipStep {
                tweens: vec![tween(AnimTarget::Mesh, AnimProperty::Scale, Axes::xyz(1.0, 1.0, 1.0), 0.3)]
            },
        ],
    });

    clips
}

lazy_static! {
    static ref CLIP_LIBRARY: HashMap<&'static str, ClipDef> = build_clip_library();
}

/// Looks up a clip definition by name
pub fn find_clip(name: &str) -> Option<&'static ClipDef> {
    CLIP_LIBRARY.get(name)
}

/// Like `find_clip`, but also hands back the library's own copy of the name
pub fn find_clip_entry(name: &str) -> Option<(&'static str, &'static ClipDef)> {
    CLIP_LIBRARY.get_key_value(name).map(|(k, v)| (*k, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_has_every_character_clip() {
        for name in [CLIP_JUMP_START, CLIP_JUMP_PROCESS, CLIP_JUMP_TOP, CLIP_JUMP_END, CLIP_MOVE, CLIP_STOP] {
            assert!(find_clip(name).is_some(), "missing clip {}", name);
        }
        assert!(find_clip("dance").is_none());
    }

    #[test]
    fn step_waits_for_its_longest_tween() {
        let clip = find_clip(CLIP_MOVE).unwrap();
        assert!((clip.steps[0].duration() - 0.2).abs() < 1e-6);
        assert!((clip.duration() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn movement_clips_stay_off_the_body() {
        let body_scale = AnimChannel::new(AnimTarget::Body, AnimProperty::Scale);
        assert!(!find_clip(CLIP_MOVE).unwrap().touches(&body_scale));
        assert!(!find_clip(CLIP_STOP).unwrap().touches(&body_scale));
        assert!(find_clip(CLIP_JUMP_END).unwrap().touches(&body_scale));
    }
}
