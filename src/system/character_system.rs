use std::f32::consts::PI;

use dbsdk_rs::math::Vector3;
use hecs::{CommandBuffer, World};
use log::{debug, info};

use crate::{anim_clip::{CLIP_JUMP_END, CLIP_JUMP_PROCESS, CLIP_JUMP_START, CLIP_JUMP_TOP, CLIP_MOVE, CLIP_STOP}, anim_timeline::AnimationTimeline, collision::{cast, highest_top, ObstacleSet}, component::{charactercontroller::{CharacterController, Footprint, JumpPhase, KinematicState}, mesh::CharacterRig, playerinput::{InputIntent, PlayerInput}, sequencer::{CharacterSequencer, Continuation, DelayedAction}, transform3d::Transform3D}, system::anim_system::FinishedClips, TimeData};

fn down() -> Vector3 {
    Vector3::new(0.0, -1.0, 0.0)
}

fn up() -> Vector3 {
    Vector3::new(0.0, 1.0, 0.0)
}

/// System which initializes characters
pub fn character_init(world: &mut World) {
    let mut cmd_buffer = CommandBuffer::new();
    for (eid, (cc, transform)) in world.query_mut::<(&CharacterController, &Transform3D)>().without::<&KinematicState>() {
        let mut rig = CharacterRig::default();
        rig.body.position = transform.position + Vector3::new(0.0, cc.visual_offset, 0.0);

        cmd_buffer.insert(eid, (
            KinematicState::new(),
            InputIntent::default(),
            rig,
            AnimationTimeline::new(),
            CharacterSequencer::new(),
            FinishedClips { tickets: Vec::new() },
        ));
    }
    cmd_buffer.run_on(world);
}

fn run_continuation(then: Continuation, cc: &CharacterController, state: &mut KinematicState, timeline: &mut AnimationTimeline, rig: &mut CharacterRig, seq: &mut CharacterSequencer) {
    match then {
        Continuation::JumpStarted => {
            state.vertical_velocity += cc.jump_speed;
            state.is_moving = false;
            state.is_stopping = false;
            state.jump_phase = JumpPhase::Airborne;

            // landing detection arms after a short delay
            seq.after(cc.jump_arm_delay, DelayedAction::ArmJump);

            let ticket = timeline.play(CLIP_JUMP_PROCESS, true, rig);
            seq.wait_for(ticket, Continuation::JumpRising);
        }
        Continuation::JumpRising => {
            timeline.play(CLIP_JUMP_TOP, true, rig);
        }
        Continuation::Landed => {
            state.can_jump = true;
            state.is_moving = false;
            state.is_stopping = false;
            state.jump_phase = JumpPhase::Grounded;
        }
        Continuation::MoveFinished => {
            state.is_moving = false;
        }
        Continuation::StopFinished => {
            state.is_stopping = false;
        }
    }
}

/// System which resumes character logic waiting on finished clips & expired timers
pub fn character_continuation_update(time: &TimeData, world: &mut World) {
    for (_, (cc, state, timeline, rig, seq, finished)) in world.query_mut::<(&CharacterController, &mut KinematicState, &mut AnimationTimeline, &mut CharacterRig, &mut CharacterSequencer, &mut FinishedClips)>() {
        for action in seq.tick_timers(time.delta_time) {
            match action {
                DelayedAction::ArmJump => {
                    state.is_jumping = true;
                }
            }
        }

        let ready = seq.take_finished(&finished.tickets);
        finished.tickets.clear();

        for then in ready {
            run_continuation(then, cc, state, timeline, rig, seq);
        }

        // clips superseded by another play() will never finish
        seq.pending.retain(|(ticket, then)| {
            if timeline.is_live(*ticket) {
                return true;
            }

            match (then, state.jump_phase) {
                (Continuation::JumpStarted, JumpPhase::Starting) | (Continuation::Landed, JumpPhase::Landing) => {
                    debug!("Jump sequence interrupted, back to grounded");
                    state.jump_phase = JumpPhase::Grounded;
                }
                _ => {
                }
            }

            false
        });
    }
}

/// System which starts a jump when the player asks for one & the character is able to
pub fn character_jump_update(time: &TimeData, world: &mut World) {
    for (_, (cc, state, intent, timeline, rig, seq)) in world.query_mut::<(&CharacterController, &mut KinematicState, &mut InputIntent, &mut AnimationTimeline, &mut CharacterRig, &mut CharacterSequencer)>().with::<&PlayerInput>() {
        state.since_jump_sample += time.delta_time;

        // fresh presses are always evaluated, auto-repeat only once per resample interval
        let pressed = intent.take_jump_request();
        let repeated = intent.take_jump_repeat() && state.since_jump_sample >= cc.jump_resample_interval;

        if (pressed || repeated) && state.can_jump && state.jump_key_released && !state.is_jumping {
            debug!("Jump triggered at {:.3}s", time.total_time);
            state.since_jump_sample = 0.0;
            state.jump_phase = JumpPhase::Starting;
            state.can_jump = false;
            state.jump_key_released = false;

            let ticket = timeline.play(CLIP_JUMP_START, true, rig);
            seq.wait_for(ticket, Continuation::JumpStarted);
        }

        if !intent.jump_held {
            state.jump_key_released = true;
        }
    }
}

fn resolve_vertical(cc: &CharacterController, footprint: &Footprint, obstacles: &ObstacleSet, state: &mut KinematicState, transform: &mut Transform3D, timeline: &mut AnimationTimeline, rig: &mut CharacterRig, seq: &mut CharacterSequencer) {
    state.vertical_velocity -= cc.gravity;

    let base = transform.position;
    let mut ground_hits = Vec::new();
    let mut overhead = false;

    for i in 0..footprint.points.len() {
        let origin = footprint.world_point(i, &base, cc.ground_probe_height());
        ground_hits.extend(cast(&origin, &down(), obstacles, cc.probe_reach, true));

        let origin = footprint.world_point(i, &base, cc.head_probe_height());
        overhead = overhead || !cast(&origin, &up(), obstacles, cc.probe_reach, true).is_empty();
    }

    // can't move up through a ceiling
    if overhead {
        state.vertical_velocity = f32::min(state.vertical_velocity, 0.0);
    }

    state.is_grounded = !ground_hits.is_empty();

    if state.is_grounded {
        state.vertical_velocity = f32::max(0.0, state.vertical_velocity);

        // settle onto the highest surface underneath, never lifting the character
        if state.vertical_velocity <= 0.0 {
            if let Some(top) = highest_top(&ground_hits) {
                transform.position.y = f32::min(top, transform.position.y);
            }
        }

        if state.is_jumping {
            debug!("Landed at {}", transform.position.y);
            state.is_jumping = false;
            state.jump_phase = JumpPhase::Landing;

            let ticket = timeline.play(CLIP_JUMP_END, true, rig);
            seq.wait_for(ticket, Continuation::Landed);
        }
        else if state.jump_phase == JumpPhase::Grounded {
            state.can_jump = true;
        }
    }

    transform.position.y += state.vertical_velocity;

    // fell off the world
    if transform.position.y < cc.fall_threshold {
        info!("Character fell below {}, respawning", cc.fall_threshold);
        transform.position = cc.spawn_point;
        state.vertical_velocity = -cc.gravity;
        state.prev_render_y = None;
        state.was_rising = false;
    }
}

fn resolve_horizontal(cc: &CharacterController, obstacles: &ObstacleSet, intent: &InputIntent, state: &mut KinematicState, transform: &mut Transform3D, timeline: &mut AnimationTimeline, rig: &mut CharacterRig, seq: &mut CharacterSequencer) {
    state.control_position = transform.position;

    if intent.move_left {
        transform.position.x -= cc.move_speed;
        state.heading = -1.0;
    }
    if intent.move_right {
        transform.position.x += cc.move_speed;
        state.heading = 1.0;
    }

    if !state.is_jumping {
        if intent.wants_move() {
            if !state.is_moving {
                state.is_moving = true;
                state.is_stopping = false;

                let ticket = timeline.play(CLIP_MOVE, false, rig);
                seq.wait_for(ticket, Continuation::MoveFinished);
            }
        }
        else if !state.is_stopping {
            state.is_stopping = true;
            state.is_moving = false;

            let ticket = timeline.play(CLIP_STOP, false, rig);
            seq.wait_for(ticket, Continuation::StopFinished);
        }
    }

    // blocked movement is undone entirely
    if intent.wants_move() && state.heading != 0.0 {
        let origin = transform.position + Vector3::new(0.0, cc.body_height * 0.5, 0.0);
        let hits = cast(&origin, &Vector3::new(state.heading, 0.0, 0.0), obstacles, cc.side_reach, true);

        if !hits.is_empty() {
            transform.position.x = state.control_position.x;
            transform.position.z = state.control_position.z;
        }
    }

    rig.body.position = transform.position + Vector3::new(0.0, cc.visual_offset, 0.0);
    rig.body.rotation.y = if state.heading > 0.0 { 0.0 } else { PI };

    // descending right after ascending means the apex has passed
    let render_y = rig.body.position.y;
    if let Some(prev) = state.prev_render_y {
        if render_y < prev {
            if state.was_rising && !state.is_jumping {
                debug!("Passed apex at {}", prev);
                state.is_jumping = true;
            }
            state.was_rising = false;
        }
        else if render_y > prev {
            state.was_rising = true;
        }
    }
    state.prev_render_y = Some(render_y);
}

/// System which moves characters: gravity, ground & ceiling probes, then sideways movement & collision
pub fn character_update(obstacles: &ObstacleSet, world: &mut World) {
    for (_, (cc, footprint, intent, state, transform, timeline, rig, seq)) in world.query_mut::<(&CharacterController, &Footprint, &InputIntent, &mut KinematicState, &mut Transform3D, &mut AnimationTimeline, &mut CharacterRig, &mut CharacterSequencer)>() {
        resolve_vertical(cc, footprint, obstacles, state, transform, timeline, rig, seq);
        resolve_horizontal(cc, obstacles, intent, state, transform, timeline, rig, seq);
    }
}
