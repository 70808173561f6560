use dbsdk_rs::math::Vector3;

/// Tuning for a kinematic character. Speeds & accelerations are per tick, delays are in seconds
#[derive(Clone, Copy)]
pub struct CharacterController {
    pub gravity: f32,
    pub jump_speed: f32,
    pub move_speed: f32,
    pub body_height: f32,
    pub probe_inset: f32,
    pub probe_reach: f32,
    pub side_reach: f32,
    pub fall_threshold: f32,
    pub spawn_point: Vector3,
    pub visual_offset: f32,
    pub jump_arm_delay: f32,
    pub jump_resample_interval: f32,
}

/// Where the character is in its jump sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpPhase {
    Grounded,
    /// "jump start" is playing, impulse not applied yet
    Starting,
    /// impulse applied, waiting for landing detection
    Airborne,
    /// "jump end" is playing
    Landing,
}

#[derive(Clone, Copy)]
pub struct KinematicState {
    pub vertical_velocity: f32,
    pub is_grounded: bool,
    pub is_jumping: bool,
    pub is_moving: bool,
    pub is_stopping: bool,
    pub can_jump: bool,
    pub jump_key_released: bool,
    pub jump_phase: JumpPhase,
    /// sign of the last horizontal move, drives facing
    pub heading: f32,
    /// X/Z before this tick's horizontal move
    pub control_position: Vector3,
    pub prev_render_y: Option<f32>,
    pub was_rising: bool,
    /// seconds since the last accepted jump request
    pub since_jump_sample: f32,
}

/// Offset from the footprint center on the XZ plane
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbePoint {
    pub dx: f32,
    pub dz: f32,
}

/// The four corners underneath the character used for ground & head probes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    pub points: [ProbePoint;4],
}

impl CharacterController {
    pub fn default() -> CharacterController {
        CharacterController {
            gravity: 0.02,
            jump_speed: 0.6,
            move_speed: 0.1,
            body_height: 2.0,
            probe_inset: 0.2,
            probe_reach: 1.0,
            side_reach: 1.0,
            fall_threshold: -50.0,
            spawn_point: Vector3::new(0.0, 20.0, 0.0),
            visual_offset: 0.0,
            jump_arm_delay: 0.1,
            jump_resample_interval: 0.5,
        }
    }

    pub fn with_spawn_point(self: &Self, spawn_point: Vector3) -> CharacterController {
        let mut result = *self;
        result.spawn_point = spawn_point;
        result
    }

    /// Height above the footprint base that downward probes start from
    pub fn ground_probe_height(self: &Self) -> f32 {
        self.body_height * 0.5 - self.probe_inset
    }

    /// Height above the footprint base that upward probes start from
    pub fn head_probe_height(self: &Self) -> f32 {
        self.body_height * 0.5 + self.probe_inset
    }
}

impl KinematicState {
    pub fn new() -> KinematicState {
        KinematicState {
            vertical_velocity: 0.0,
            is_grounded: false,
            is_jumping: false,
            is_moving: false,
            is_stopping: false,
            can_jump: false,
            jump_key_released: true,
            jump_phase: JumpPhase::Grounded,
            heading: 0.0,
            control_position: Vector3::zero(),
            prev_render_y: None,
            was_rising: false,
            since_jump_sample: f32::INFINITY,
        }
    }
}

impl Footprint {
    /// Derives the probe corners from a mesh bounding box (only X & Z are used)
    pub fn from_bounds(min: Vector3, max: Vector3) -> Footprint {
        Footprint {
            points: [
                ProbePoint { dx: max.x, dz: max.z },
                ProbePoint { dx: max.x, dz: min.z },
                ProbePoint { dx: min.x, dz: max.z },
                ProbePoint { dx: min.x, dz: min.z },
            ]
        }
    }

    /// World space position of a probe point at the given base position & height
    pub fn world_point(self: &Self, index: usize, base: &Vector3, height: f32) -> Vector3 {
        let p = self.points[index];
        Vector3::new(base.x + p.dx, base.y + height, base.z + p.dz)
    }
}
