use hecs::World;

use crate::{anim_timeline::{AnimationTimeline, ClipTicket}, component::mesh::CharacterRig, TimeData};

/// Tickets reported finished by the last timeline update, consumed by the character system
pub struct FinishedClips {
    pub tickets: Vec<ClipTicket>,
}

/// System which advances every animation timeline & records which clips finished
pub fn anim_system_update(time: &TimeData, world: &mut World) {
    for (_, (timeline, rig, finished)) in world.query_mut::<(&mut AnimationTimeline, &mut CharacterRig, &mut FinishedClips)>() {
        let done = timeline.update(time.delta_time, rig);
        finished.tickets.extend(done);
    }
}
