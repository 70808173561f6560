use dbsdk_rs::math::Vector3;
use hecs::{Entity, World};

use crate::{common::ray_aabb, component::{collider::{ColliderBounds, ColliderParts, Obstacle}, transform3d::Transform3D}};

/// World space bounds of one static obstacle
#[derive(Clone)]
pub struct ObstacleEntry {
    pub entity: Entity,
    pub min: Vector3,
    pub max: Vector3,
    pub parts: Vec<(Vector3, Vector3)>,
}

/// Ordered snapshot of the static obstacles in a scene.
/// Filled while the scene is built, read-only while simulating
pub struct ObstacleSet {
    entries: Vec<ObstacleEntry>,
}

/// A single ray query result
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// index into the ObstacleSet
    pub obstacle: usize,
    pub entity: Entity,
    pub distance: f32,
    /// top face of the box that was hit (a child part for compound obstacles)
    pub top: f32,
}

impl ObstacleSet {
    pub fn new() -> ObstacleSet {
        ObstacleSet {
            entries: Vec::new()
        }
    }

    pub fn push_compound(self: &mut Self, entity: Entity, min: Vector3, max: Vector3, parts: Vec<(Vector3, Vector3)>) -> usize {
        self.entries.push(ObstacleEntry {
            entity,
            min,
            max,
            parts,
        });
        self.entries.len() - 1
    }

    /// Snapshots every Obstacle entity in the world, in insertion order
    pub fn gather(world: &World) -> ObstacleSet {
        let mut found = Vec::new();

        for (eid, (obstacle, transform, bounds, parts)) in world.query::<(&Obstacle, &Transform3D, &ColliderBounds, Option<&ColliderParts>)>().iter() {
            let parts = match parts {
                Some(v) => v.parts.iter().map(|p| (p.min(&transform.position), p.max(&transform.position))).collect(),
                None => Vec::new()
            };

            found.push((obstacle.order, eid, bounds.min(&transform.position), bounds.max(&transform.position), parts));
        }

        found.sort_by_key(|(order, ..)| *order);

        let mut set = ObstacleSet::new();
        for (_, eid, min, max, parts) in found {
            set.push_compound(eid, min, max, parts);
        }
        set
    }

    pub fn len(self: &Self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(self: &Self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(self: &Self, index: usize) -> Option<&ObstacleEntry> {
        self.entries.get(index)
    }

    pub fn iter(self: &Self) -> std::slice::Iter<'_, ObstacleEntry> {
        self.entries.iter()
    }

}

/// Highest top face among the boxes that were hit, if any
pub fn highest_top(hits: &[RayHit]) -> Option<f32> {
    hits.iter()
        .map(|h| h.top)
        .fold(None, |acc: Option<f32>, y| Some(acc.map_or(y, |a| a.max(y))))
}

/// Casts a ray against the obstacle set, returning every obstacle hit within [near, far], nearest first
///
/// # Arguments
///
/// * 'origin' - Start of the ray
/// * 'direction' - Direction of the ray, need not be normalized. A zero direction hits nothing
/// * 'targets' - Obstacles to test against
/// * 'near' - Hits closer than this are ignored
/// * 'far' - Hits further than this are ignored
/// * 'recursive' - Also test the child parts of compound obstacles
pub fn cast_window(origin: &Vector3, direction: &Vector3, targets: &ObstacleSet, near: f32, far: f32, recursive: bool) -> Vec<RayHit> {
    let mut hits = Vec::new();

    if direction.length_sq() <= f32::EPSILON {
        return hits;
    }

    let dir = direction.normalized();

    for (idx, obstacle) in targets.iter().enumerate() {
        // (distance, top of the box hit)
        let mut nearest = ray_aabb(origin, &dir, &obstacle.min, &obstacle.max).map(|t| (t, obstacle.max.y));

        if recursive {
            for (min, max) in &obstacle.parts {
                if let Some(t) = ray_aabb(origin, &dir, min, max) {
                    match nearest {
                        Some((n, _)) if n <= t => {}
                        _ => nearest = Some((t, max.y)),
                    }
                }
            }
        }

        match nearest {
            Some((t, top)) if t >= near && t <= far => {
                hits.push(RayHit {
                    obstacle: idx,
                    entity: obstacle.entity,
                    distance: t,
                    top,
                });
            }
            _ => {
            }
        }
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Casts a ray against the obstacle set out to `max_distance`
pub fn cast(origin: &Vector3, direction: &Vector3, targets: &ObstacleSet, max_distance: f32, recursive: bool) -> Vec<RayHit> {
    cast_window(origin, direction, targets, 0.0, max_distance, recursive)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down() -> Vector3 {
        Vector3::new(0.0, -1.0, 0.0)
    }

    fn two_floors(world: &mut World) -> ObstacleSet {
        let mut set = ObstacleSet::new();
        let a = world.spawn(());
        let b = world.spawn(());
        set.push_compound(a, Vector3::new(-5.0, -1.0, -5.0), Vector3::new(5.0, 0.0, 5.0), Vec::new());
        set.push_compound(b, Vector3::new(-5.0, -11.0, -5.0), Vector3::new(5.0, -10.0, 5.0), Vec::new());
        set
    }

    #[test]
    fn empty_result_when_nothing_in_range() {
        let mut world = World::new();
        let set = two_floors(&mut world);
        let hits = cast(&Vector3::new(0.0, 3.0, 0.0), &down(), &set, 1.0, true);
        assert!(hits.is_empty());
    }

    #[test]
    fn only_hits_inside_the_window_are_reported() {
        let mut world = World::new();
        let set = two_floors(&mut world);

        let hits = cast(&Vector3::new(0.0, 0.5, 0.0), &down(), &set, 1.0, true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].obstacle, 0);
        assert!((hits[0].distance - 0.5).abs() < 1e-5);

        let hits = cast_window(&Vector3::new(0.0, 0.5, 0.0), &down(), &set, 0.6, 20.0, true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].obstacle, 1);
    }

    #[test]
    fn hits_are_sorted_nearest_first() {
        let mut world = World::new();
        let set = two_floors(&mut world);
        let hits = cast(&Vector3::new(0.0, 0.5, 0.0), &down(), &set, 100.0, false);
        assert_eq!(hits.iter().map(|h| h.obstacle).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn zero_direction_hits_nothing() {
        let mut world = World::new();
        let set = two_floors(&mut world);
        assert!(cast(&Vector3::new(0.0, 0.5, 0.0), &Vector3::zero(), &set, 100.0, true).is_empty());
    }

    #[test]
    fn parts_only_count_when_recursive() {
        let mut world = World::new();
        let mut set = ObstacleSet::new();
        let e = world.spawn(());
        // tiny root box far away, child part right under the ray
        set.push_compound(e, Vector3::new(50.0, 0.0, 50.0), Vector3::new(51.0, 1.0, 51.0),
            vec![(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 0.0, 1.0))]);

        let origin = Vector3::new(0.0, 0.5, 0.0);
        assert!(cast(&origin, &down(), &set, 1.0, false).is_empty());
        assert_eq!(cast(&origin, &down(), &set, 1.0, true).len(), 1);
    }

    #[test]
    fn highest_top_picks_max_y() {
        let mut world = World::new();
        let set = two_floors(&mut world);
        let hits = cast(&Vector3::new(0.0, 0.5, 0.0), &down(), &set, 100.0, false);
        assert_eq!(highest_top(&hits), Some(0.0));
        assert_eq!(highest_top(&[]), None);
    }

    #[test]
    fn gather_keeps_insertion_order() {
        let mut world = World::new();
        let size = Vector3::new(2.0, 2.0, 2.0);
        world.spawn((Obstacle { order: 1 }, Transform3D::default().with_position(Vector3::new(0.0, 10.0, 0.0)), ColliderBounds::box_hanging_from_top(size)));
        world.spawn((Obstacle { order: 0 }, Transform3D::default(), ColliderBounds::box_hanging_from_top(size)));
        // not an obstacle
        world.spawn((Transform3D::default(), ColliderBounds::box_hanging_from_top(size)));

        let set = ObstacleSet::gather(&world);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().max.y, 0.0);
        assert_eq!(set.get(1).unwrap().max.y, 10.0);
        assert_eq!(set.get(1).unwrap().min.y, 8.0);
    }

    #[test]
    fn compound_hit_reports_the_part_it_landed_on() {
        let mut world = World::new();
        let mut set = ObstacleSet::new();
        let e = world.spawn(());
        // root box is taller but off to the side
        set.push_compound(e, Vector3::new(50.0, 0.0, 50.0), Vector3::new(51.0, 1.0, 51.0),
            vec![(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 0.0, 1.0))]);

        let hits = cast(&Vector3::new(0.0, 0.5, 0.0), &down(), &set, 1.0, true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].top, 0.0);
        assert_eq!(highest_top(&hits), Some(0.0));
    }
}
