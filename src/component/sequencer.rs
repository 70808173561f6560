use crate::anim_timeline::ClipTicket;

/// What the character does once a clip it started has finished
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Continuation {
    /// apply the jump impulse, then chain "jump process"
    JumpStarted,
    /// chain "jump top"
    JumpRising,
    /// re-enable jumping
    Landed,
    MoveFinished,
    StopFinished,
}

/// Deferred flag changes, fired after a fixed delay
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelayedAction {
    ArmJump,
}

/// Joins the physics state machine & the animation timeline:
/// clip tickets waiting on completion & timers waiting to fire
pub struct CharacterSequencer {
    pub pending: Vec<(ClipTicket, Continuation)>,
    pub timers: Vec<(f32, DelayedAction)>,
}

impl CharacterSequencer {
    pub fn new() -> CharacterSequencer {
        CharacterSequencer {
            pending: Vec::new(),
            timers: Vec::new(),
        }
    }

    pub fn wait_for(self: &mut Self, ticket: ClipTicket, then: Continuation) {
        self.pending.push((ticket, then));
    }

    pub fn after(self: &mut Self, delay: f32, action: DelayedAction) {
        self.timers.push((delay, action));
    }

    /// Removes & returns the continuations of every finished ticket, in completion order
    pub fn take_finished(self: &mut Self, finished: &[ClipTicket]) -> Vec<Continuation> {
        let mut ready = Vec::new();

        for ticket in finished {
            if let Some(idx) = self.pending.iter().position(|(t, _)| t == ticket) {
                ready.push(self.pending.remove(idx).1);
            }
        }

        ready
    }

    /// Counts down timers, returning the actions which are due
    pub fn tick_timers(self: &mut Self, delta_time: f32) -> Vec<DelayedAction> {
        let mut due = Vec::new();

        self.timers.retain_mut(|(remaining, action)| {
            *remaining -= delta_time;
            if *remaining <= 0.0 {
                due.push(*action);
                false
            }
            else {
                true
            }
        });

        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{anim_clip::{CLIP_MOVE, CLIP_STOP}, anim_timeline::AnimationTimeline, component::mesh::CharacterRig};

    #[test]
    fn finished_tickets_release_their_continuations_in_order() {
        let mut rig = CharacterRig::default();
        let mut timeline = AnimationTimeline::new();
        let mut seq = CharacterSequencer::new();

        let a = timeline.play(CLIP_MOVE, false, &mut rig);
        let b = timeline.play(CLIP_STOP, false, &mut rig);
        seq.wait_for(a, Continuation::MoveFinished);
        seq.wait_for(b, Continuation::StopFinished);

        assert_eq!(seq.take_finished(&[b, a]), vec![Continuation::StopFinished, Continuation::MoveFinished]);
        assert!(seq.pending.is_empty());
        assert!(seq.take_finished(&[a]).is_empty());
    }

    #[test]
    fn timers_fire_once_when_due() {
        let mut seq = CharacterSequencer::new();
        seq.after(0.1, DelayedAction::ArmJump);

        assert!(seq.tick_timers(0.05).is_empty());
        assert_eq!(seq.tick_timers(0.06), vec![DelayedAction::ArmJump]);
        assert!(seq.tick_timers(1.0).is_empty());
    }
}
