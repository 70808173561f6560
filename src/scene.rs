use std::{collections::HashMap, fmt};

use dbsdk_rs::math::Vector3;
use hecs::{Entity, World};
use lazy_static::lazy_static;
use log::info;
use regex::Regex;

use crate::{common::aabb_aabb_intersects, component::{charactercontroller::{CharacterController, Footprint}, collider::{ColliderBounds, ColliderParts, Obstacle}, playerinput::PlayerInput, transform3d::Transform3D}, parse_utils::{parse_box_list, parse_flag, parse_vec3}};

/// Built-in layout: a floor & three platforms
pub const DEFAULT_SCENE: &str = r#"
{
"classname" "player"
"origin" "0 20 0"
"mins" "-0.8 0 -0.6"
"maxs" "0.8 1.8 0.6"
}
{
"classname" "obstacle"
"origin" "0 0 0"
"size" "30 20 5"
}
{
"classname" "obstacle"
"origin" "-12 1.5 0"
"size" "2 2 3"
}
{
"classname" "obstacle"
"origin" "5 5 0"
"size" "5 1 4"
}
{
"classname" "obstacle"
"origin" "-6 10 0"
"size" "5 1 5"
}
"#;

lazy_static! {
    static ref KEY_VALUE: Regex = Regex::new("\"([^\"]*)\"[ \t]+\"([^\"]*)\"").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    Malformed,
    MissingClassname,
    UnknownClass(String),
    MissingKey(String, &'static str),
    BadValue(String, String),
    MissingPlayer,
    MultiplePlayers,
    SpawnInsideObstacle,
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Malformed => write!(f, "unbalanced braces in scene description"),
            SceneError::MissingClassname => write!(f, "entity block without a classname"),
            SceneError::UnknownClass(class) => write!(f, "unknown classname '{}'", class),
            SceneError::MissingKey(class, key) => write!(f, "'{}' is missing required key '{}'", class, key),
            SceneError::BadValue(key, value) => write!(f, "bad value for '{}': '{}'", key, value),
            SceneError::MissingPlayer => write!(f, "scene has no player"),
            SceneError::MultiplePlayers => write!(f, "scene has more than one player"),
            SceneError::SpawnInsideObstacle => write!(f, "player spawns inside an obstacle"),
        }
    }
}

impl std::error::Error for SceneError {}

#[derive(Clone, Copy)]
pub struct PlayerDesc {
    pub origin: Vector3,
    pub mins: Vector3,
    pub maxs: Vector3,
}

#[derive(Clone)]
pub struct BoxDesc {
    /// middle of the box's top face
    pub origin: Vector3,
    pub size: Vector3,
    pub collide: bool,
    /// child boxes as (top-centre offset from origin, size)
    pub parts: Vec<(Vector3, Vector3)>,
}

pub struct SceneDesc {
    pub player: PlayerDesc,
    pub boxes: Vec<BoxDesc>,
}

/// Splits a description into its { } blocks & parses each block's key value pairs
fn parse_blocks(src: &str) -> Result<Vec<HashMap<&str, &str>>, SceneError> {
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;

    for (idx, v) in src.as_bytes().iter().enumerate() {
        if *v == b'{' {
            if start.is_some() {
                return Err(SceneError::Malformed);
            }
            start = Some(idx + 1);
        }
        else if *v == b'}' {
            let block_start = match start.take() {
                Some(v) => v,
                None => return Err(SceneError::Malformed)
            };

            let mut map = HashMap::new();
            for (_, [propname, propval]) in KEY_VALUE.captures_iter(&src[block_start..idx]).map(|c| c.extract()) {
                map.insert(propname, propval);
            }
            blocks.push(map);
        }
    }

    if start.is_some() {
        return Err(SceneError::Malformed);
    }

    Ok(blocks)
}

fn require_vec3(block: &HashMap<&str, &str>, class: &str, key: &'static str) -> Result<Vector3, SceneError> {
    let raw = match block.get(key) {
        Some(v) => *v,
        None => return Err(SceneError::MissingKey(class.to_owned(), key))
    };

    match parse_vec3(raw) {
        Some(v) => Ok(v),
        None => Err(SceneError::BadValue(key.to_owned(), raw.to_owned()))
    }
}

impl SceneDesc {
    pub fn parse(src: &str) -> Result<SceneDesc, SceneError> {
        let mut player: Option<PlayerDesc> = None;
        let mut boxes = Vec::new();

        for block in parse_blocks(src)? {
            let class = match block.get("classname") {
                Some(v) => *v,
                None => return Err(SceneError::MissingClassname)
            };

            match class {
                "player" => {
                    if player.is_some() {
                        return Err(SceneError::MultiplePlayers);
                    }

                    player = Some(PlayerDesc {
                        origin: require_vec3(&block, class, "origin")?,
                        mins: require_vec3(&block, class, "mins")?,
                        maxs: require_vec3(&block, class, "maxs")?,
                    });
                }
                "obstacle" => {
                    let collide = match block.get("collide") {
                        Some(raw) => match parse_flag(raw) {
                            Some(v) => v,
                            None => return Err(SceneError::BadValue("collide".to_owned(), raw.to_string()))
                        },
                        None => true
                    };

                    let parts = match block.get("parts") {
                        Some(raw) => match parse_box_list(raw) {
                            Some(v) => v,
                            None => return Err(SceneError::BadValue("parts".to_owned(), raw.to_string()))
                        },
                        None => Vec::new()
                    };

                    boxes.push(BoxDesc {
                        origin: require_vec3(&block, class, "origin")?,
                        size: require_vec3(&block, class, "size")?,
                        collide,
                        parts,
                    });
                }
                _ => {
                    return Err(SceneError::UnknownClass(class.to_owned()));
                }
            }
        }

        let player = match player {
            Some(v) => v,
            None => return Err(SceneError::MissingPlayer)
        };

        let scene = SceneDesc {
            player,
            boxes,
        };

        if scene.spawn_is_blocked() {
            return Err(SceneError::SpawnInsideObstacle);
        }

        Ok(scene)
    }

    pub fn default_scene() -> SceneDesc {
        match SceneDesc::parse(DEFAULT_SCENE) {
            Ok(v) => v,
            Err(e) => panic!("built-in scene is invalid: {}", e)
        }
    }

    fn spawn_is_blocked(self: &Self) -> bool {
        // shrink slightly so standing exactly on a top face is allowed
        const TOUCH_EPSILON: f32 = 0.001;
        let shrink = Vector3::new(TOUCH_EPSILON, TOUCH_EPSILON, TOUCH_EPSILON);

        let p = &self.player;
        let player_min = p.origin + p.mins + shrink;
        let player_max = p.origin + p.maxs - shrink;

        self.boxes.iter().filter(|b| b.collide).any(|b| {
            let bounds = ColliderBounds::box_hanging_from_top(b.size);
            aabb_aabb_intersects(player_min, player_max, bounds.min(&b.origin), bounds.max(&b.origin))
                || b.parts.iter().any(|(offset, size)| {
                    let part = ColliderBounds::box_hanging_from_top_at(*offset, *size);
                    aabb_aabb_intersects(player_min, player_max, part.min(&b.origin), part.max(&b.origin))
                })
        })
    }

    /// Spawns every obstacle & the player into the world, returning the player entity
    pub fn spawn(self: &Self, world: &mut World) -> Entity {
        let mut order = 0;

        for b in &self.boxes {
            let transform = Transform3D::default().with_position(b.origin);
            let bounds = ColliderBounds::box_hanging_from_top(b.size);

            if b.collide {
                if b.parts.is_empty() {
                    world.spawn((transform, bounds, Obstacle { order }));
                }
                else {
                    let parts = b.parts.iter().map(|(offset, size)| ColliderBounds::box_hanging_from_top_at(*offset, *size)).collect();
                    world.spawn((transform, bounds, Obstacle { order }, ColliderParts { parts }));
                }
                order += 1;
            }
            else {
                world.spawn((transform, bounds));
            }
        }

        let cc = CharacterController::default().with_spawn_point(self.player.origin);

        let player = world.spawn((
            Transform3D::default().with_position(self.player.origin),
            cc,
            Footprint::from_bounds(self.player.mins, self.player.maxs),
            PlayerInput {},
        ));

        info!("Spawned scene: {} boxes ({} collidable)", self.boxes.len(), order);

        player
    }
}
