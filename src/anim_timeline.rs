use dbsdk_rs::math::Vector3;
use log::{debug, warn};

use crate::{anim_clip::{find_clip_entry, AnimChannel, AnimProperty, AnimTarget, Axes, ClipDef}, component::mesh::CharacterRig};

/// Handle for one `play` call, reported back by `update` once its chain completes.
/// Chains which get cancelled never report their ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipTicket {
    id: u64,
    generation: u64,
}

struct ActiveTween {
    channel: AnimChannel,
    start: Vector3,
    to: Axes,
    duration: f32,
}

struct Chain {
    ticket: ClipTicket,
    name: &'static str,
    clip: &'static ClipDef,
    step: usize,
    step_elapsed: f32,
    tweens: Vec<ActiveTween>,
}

/// Plays named clips against a character rig, one step at a time
pub struct AnimationTimeline {
    generation: u64,
    next_id: u64,
    chains: Vec<Chain>,
    touched: Vec<AnimChannel>,
    resolved: Vec<ClipTicket>,
}

fn rest_value(property: AnimProperty) -> Vector3 {
    match property {
        AnimProperty::Position => Vector3::zero(),
        AnimProperty::Rotation => Vector3::zero(),
        AnimProperty::Scale => Vector3::new(1.0, 1.0, 1.0),
    }
}

fn channel_value(rig: &CharacterRig, channel: &AnimChannel) -> Vector3 {
    let transform = match channel.target {
        AnimTarget::Body => &rig.body,
        AnimTarget::Mesh => &rig.mesh,
    };

    match channel.property {
        AnimProperty::Position => transform.position,
        AnimProperty::Rotation => transform.rotation,
        AnimProperty::Scale => transform.scale,
    }
}

fn set_channel_value(rig: &mut CharacterRig, channel: &AnimChannel, value: Vector3) {
    let transform = match channel.target {
        AnimTarget::Body => &mut rig.body,
        AnimTarget::Mesh => &mut rig.mesh,
    };

    match channel.property {
        AnimProperty::Position => transform.position = value,
        AnimProperty::Rotation => transform.rotation = value,
        AnimProperty::Scale => transform.scale = value,
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl ActiveTween {
    fn apply(self: &Self, elapsed: f32, rig: &mut CharacterRig) {
        let t = if self.duration <= 0.0 { 1.0 } else { (elapsed / self.duration).min(1.0) };

        // only the axes named by the tween are written
        let mut value = channel_value(rig, &self.channel);
        if let Some(x) = self.to.x { value.x = lerp(self.start.x, x, t); }
        if let Some(y) = self.to.y { value.y = lerp(self.start.y, y, t); }
        if let Some(z) = self.to.z { value.z = lerp(self.start.z, z, t); }

        set_channel_value(rig, &self.channel, value);
    }
}

impl Chain {
    fn begin_step(self: &mut Self, rig: &CharacterRig) {
        self.tweens = self.clip.steps[self.step].tweens.iter().map(|t| ActiveTween {
            channel: t.channel,
            start: channel_value(rig, &t.channel),
            to: t.to,
            duration: t.duration,
        }).collect();
    }

    /// Advances the chain, returns true once its last step has finished
    fn advance(self: &mut Self, delta_time: f32, rig: &mut CharacterRig) -> bool {
        self.step_elapsed += delta_time;

        loop {
            for tween in &self.tweens {
                tween.apply(self.step_elapsed, rig);
            }

            let step_len = self.clip.steps[self.step].duration();
            if self.step_elapsed < step_len {
                return false;
            }

            // carry leftover time into the next step
            self.step_elapsed -= step_len;
            self.step += 1;

            if self.step >= self.clip.steps.len() {
                return true;
            }

            self.begin_step(rig);
        }
    }
}

impl AnimationTimeline {
    pub fn new() -> AnimationTimeline {
        AnimationTimeline {
            generation: 0,
            next_id: 0,
            chains: Vec::new(),
            touched: Vec::new(),
            resolved: Vec::new(),
        }
    }

    fn issue_ticket(self: &mut Self) -> ClipTicket {
        let ticket = ClipTicket {
            id: self.next_id,
            generation: self.generation,
        };
        self.next_id += 1;
        ticket
    }

    /// Cancels every chain & snaps all channels this timeline has ever driven back to rest.
    /// Tickets issued before this call become stale
    pub fn stop_all(self: &mut Self, rig: &mut CharacterRig) {
        self.chains.clear();
        self.resolved.clear();

        for channel in &self.touched {
            set_channel_value(rig, channel, rest_value(channel.property));
        }
        self.touched.clear();

        self.generation += 1;
    }

    fn reset_target(self: &mut Self, target: AnimTarget, rig: &mut CharacterRig) {
        for channel in AnimChannel::all_of(target) {
            set_channel_value(rig, &channel, rest_value(channel.property));
            self.chains.retain(|c| !c.clip.touches(&channel));
        }
    }

    /// Starts a named clip & returns the ticket which `update` reports once it finishes
    ///
    /// # Arguments
    ///
    /// * 'name' - Clip to play. Unknown names resolve on the next update without doing anything
    /// * 'cancel_others' - Stop every running chain (and reset the rig) first
    /// * 'rig' - The rig the clip animates
    pub fn play(self: &mut Self, name: &str, cancel_others: bool, rig: &mut CharacterRig) -> ClipTicket {
        let (name, clip) = match find_clip_entry(name) {
            Some(v) => v,
            None => {
                warn!("Unknown animation clip requested: {}", name);
                let ticket = self.issue_ticket();
                self.resolved.push(ticket);
                return ticket;
            }
        };

        if cancel_others {
            self.stop_all(rig);
        }

        for target in &clip.resets {
            self.reset_target(*target, rig);
        }

        // a channel is only ever driven by one chain
        self.chains.retain(|c| {
            let overlaps = c.clip.steps.iter().any(|s| s.tweens.iter().any(|t| clip.touches(&t.channel)));
            if overlaps {
                debug!("Clip {} superseded by {}", c.name, name);
            }
            !overlaps
        });

        for step in &clip.steps {
            for tween in &step.tweens {
                if !self.touched.contains(&tween.channel) {
                    self.touched.push(tween.channel);
                }
            }
        }

        let ticket = self.issue_ticket();

        if clip.steps.is_empty() {
            self.resolved.push(ticket);
            return ticket;
        }

        let mut chain = Chain {
            ticket,
            name,
            clip,
            step: 0,
            step_elapsed: 0.0,
            tweens: Vec::new(),
        };
        chain.begin_step(rig);
        self.chains.push(chain);

        ticket
    }

    /// Advances all running chains, returning the tickets of every chain which finished
    pub fn update(self: &mut Self, delta_time: f32, rig: &mut CharacterRig) -> Vec<ClipTicket> {
        let mut finished: Vec<ClipTicket> = self.resolved.drain(..).collect();

        self.chains.retain_mut(|chain| {
            if chain.advance(delta_time, rig) {
                finished.push(chain.ticket);
                false
            }
            else {
                true
            }
        });

        finished
    }

    /// Whether the ticket may still be reported by `update`
    pub fn is_live(self: &Self, ticket: ClipTicket) -> bool {
        ticket.generation == self.generation
            && (self.resolved.contains(&ticket) || self.chains.iter().any(|c| c.ticket == ticket))
    }

    /// Names of the clips currently running, oldest first
    pub fn active_clips(self: &Self) -> Vec<&'static str> {
        self.chains.iter().map(|c| c.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim_clip::{CLIP_JUMP_END, CLIP_JUMP_PROCESS, CLIP_JUMP_START, CLIP_MOVE, CLIP_STOP};

    const DT: f32 = 1.0 / 60.0;

    fn run_until_done(timeline: &mut AnimationTimeline, rig: &mut CharacterRig, ticket: ClipTicket) -> usize {
        for frame in 0..1000 {
            if timeline.update(DT, rig).contains(&ticket) {
                return frame;
            }
        }
        panic!("clip never finished");
    }

    #[test]
    fn clip_reaches_its_end_values() {
        let mut rig = CharacterRig::default();
        let mut timeline = AnimationTimeline::new();

        let ticket = timeline.play(CLIP_JUMP_START, true, &mut rig);
        run_until_done(&mut timeline, &mut rig, ticket);

        assert!((rig.body.scale.x - 1.2).abs() < 1e-5);
        assert!((rig.body.scale.y - 0.5).abs() < 1e-5);
        assert!(!timeline.is_live(ticket));
    }

    #[test]
    fn interpolation_is_linear_from_the_start_value() {
        let mut rig = CharacterRig::default();
        let mut timeline = AnimationTimeline::new();

        timeline.play(CLIP_JUMP_PROCESS, true, &mut rig);
        timeline.update(0.1, &mut rig);

        // halfway from 1.0 to 1.5
        assert!((rig.body.scale.y - 1.25).abs() < 1e-5);
    }

    #[test]
    fn multi_step_clip_runs_steps_in_order() {
        let mut rig = CharacterRig::default();
        let mut timeline = AnimationTimeline::new();

        let ticket = timeline.play(CLIP_JUMP_END, true, &mut rig);
        timeline.update(0.07, &mut rig);
        assert!((rig.body.scale.y - 0.5).abs() < 1e-5);

        let done = timeline.update(0.15, &mut rig);
        assert_eq!(done, vec![ticket]);
        assert!((rig.body.scale.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn cancel_others_makes_running_tickets_stale() {
        let mut rig = CharacterRig::default();
        let mut timeline = AnimationTimeline::new();

        let first = timeline.play(CLIP_JUMP_PROCESS, true, &mut rig);
        timeline.update(0.1, &mut rig);
        let second = timeline.play(CLIP_JUMP_END, true, &mut rig);

        assert!(!timeline.is_live(first));
        assert!(timeline.is_live(second));

        let mut reported = Vec::new();
        for _ in 0..60 {
            reported.extend(timeline.update(DT, &mut rig));
        }
        assert_eq!(reported, vec![second]);
    }

    #[test]
    fn cancel_resets_touched_channels_before_new_clip_starts() {
        let mut rig = CharacterRig::default();
        let mut timeline = AnimationTimeline::new();

        timeline.play(CLIP_JUMP_PROCESS, true, &mut rig);
        timeline.update(0.1, &mut rig);
        assert!(rig.body.scale.y > 1.0);

        timeline.play(CLIP_JUMP_END, true, &mut rig);
        assert_eq!(rig.body.scale.y, 1.0);
    }

    #[test]
    fn non_exclusive_play_leaves_other_targets_running() {
        let mut rig = CharacterRig::default();
        let mut timeline = AnimationTimeline::new();

        let jump = timeline.play(CLIP_JUMP_PROCESS, true, &mut rig);
        let walk = timeline.play(CLIP_MOVE, false, &mut rig);

        assert!(timeline.is_live(jump));
        assert!(timeline.is_live(walk));
        assert_eq!(timeline.active_clips(), vec![CLIP_JUMP_PROCESS, CLIP_MOVE]);
    }

    #[test]
    fn clips_on_the_same_target_supersede_each_other() {
        let mut rig = CharacterRig::default();
        let mut timeline = AnimationTimeline::new();

        let stop = timeline.play(CLIP_STOP, false, &mut rig);
        timeline.update(0.1, &mut rig);
        let walk = timeline.play(CLIP_MOVE, false, &mut rig);

        assert!(!timeline.is_live(stop));
        assert!(timeline.is_live(walk));
        // mesh was snapped back to rest before the move clip began
        assert_eq!(rig.mesh.scale.y, 1.0);
        assert_eq!(timeline.active_clips(), vec![CLIP_MOVE]);
    }

    #[test]
    fn unknown_clip_resolves_on_next_update() {
        let mut rig = CharacterRig::default();
        let mut timeline = AnimationTimeline::new();

        let running = timeline.play(CLIP_JUMP_START, true, &mut rig);
        let ticket = timeline.play("moonwalk", true, &mut rig);

        assert!(timeline.is_live(ticket));
        // unknown names never cancel anything
        assert!(timeline.is_live(running));
        assert_eq!(timeline.update(0.0, &mut rig), vec![ticket]);
    }

    #[test]
    fn large_frame_finishes_whole_chain() {
        let mut rig = CharacterRig::default();
        let mut timeline = AnimationTimeline::new();

        let ticket = timeline.play(CLIP_STOP, false, &mut rig);
        assert_eq!(timeline.update(1.0, &mut rig), vec![ticket]);
        assert!((rig.mesh.scale.y - 1.0).abs() < 1e-5);
    }
}
