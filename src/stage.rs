use dbsdk_rs::math::Vector3;
use hecs::{Entity, World};

use crate::{anim_timeline::AnimationTimeline, collision::ObstacleSet, component::{charactercontroller::KinematicState, mesh::CharacterRig, playerinput::{InputIntent, LogicalKey, PlayerInput}, transform3d::Transform3D}, scene::{SceneDesc, SceneError}, system::{anim_system::anim_system_update, character_system::{character_continuation_update, character_init, character_jump_update, character_update}}, TimeData};

/// A scene with one player-controlled character, ticked once per display refresh by the host
pub struct Stage {
    pub world: World,
    obstacles: ObstacleSet,
    player: Entity,
}

impl Stage {
    pub fn new(scene: &SceneDesc) -> Stage {
        let mut world = World::new();
        let player = scene.spawn(&mut world);
        character_init(&mut world);

        // obstacles are static from here on
        let obstacles = ObstacleSet::gather(&world);

        Stage {
            world,
            obstacles,
            player,
        }
    }

    pub fn from_scene_str(src: &str) -> Result<Stage, SceneError> {
        let scene = SceneDesc::parse(src)?;
        Ok(Stage::new(&scene))
    }

    pub fn default_scene() -> Stage {
        Stage::new(&SceneDesc::default_scene())
    }

    pub fn player(self: &Self) -> Entity {
        self.player
    }

    pub fn obstacles(self: &Self) -> &ObstacleSet {
        &self.obstacles
    }

    /// Runs one frame: animation, clip continuations, jump trigger, then movement
    pub fn tick(self: &mut Self, time: &TimeData) {
        anim_system_update(time, &mut self.world);
        character_continuation_update(time, &mut self.world);
        character_jump_update(time, &mut self.world);
        character_update(&self.obstacles, &mut self.world);
    }

    /// Forwards a key-down edge to every player-controlled character
    pub fn key_down(self: &mut Self, key: LogicalKey) {
        for (_, intent) in self.world.query_mut::<&mut InputIntent>().with::<&PlayerInput>() {
            intent.key_down(key);
        }
    }

    pub fn key_up(self: &mut Self, key: LogicalKey) {
        for (_, intent) in self.world.query_mut::<&mut InputIntent>().with::<&PlayerInput>() {
            intent.key_up(key);
        }
    }

    pub fn player_position(self: &Self) -> Vector3 {
        match self.world.get::<&Transform3D>(self.player) {
            Ok(t) => t.position,
            Err(_) => Vector3::zero()
        }
    }

    pub fn set_player_position(self: &mut Self, position: Vector3) {
        if let Ok(mut t) = self.world.get::<&mut Transform3D>(self.player) {
            t.position = position;
        }
    }

    pub fn player_state(self: &Self) -> KinematicState {
        match self.world.get::<&KinematicState>(self.player) {
            Ok(s) => *s,
            Err(_) => KinematicState::new()
        }
    }

    /// Transforms the renderer should draw the character with
    pub fn player_rig(self: &Self) -> CharacterRig {
        match self.world.get::<&CharacterRig>(self.player) {
            Ok(r) => *r,
            Err(_) => CharacterRig::default()
        }
    }

    /// Names of the clips currently playing on the character
    pub fn player_clips(self: &Self) -> Vec<&'static str> {
        match self.world.get::<&AnimationTimeline>(self.player) {
            Ok(t) => t.active_clips(),
            Err(_) => Vec::new()
        }
    }
}
