use dbsdk_rs::math::Vector3;

pub fn aabb_aabb_intersects(min_a: Vector3, max_a: Vector3, min_b: Vector3, max_b: Vector3) -> bool {
    return min_a.x <= max_b.x && max_a.x >= min_b.x &&
            min_a.y <= max_b.y && max_a.y >= min_b.y &&
            min_a.z <= max_b.z && max_a.z >= min_b.z;
}

/// Intersects a ray with an axis aligned box using the slab method
///
/// Returns the distance along the ray at which it enters the box, or None if it misses.
/// A ray starting inside the box does not count as entering it (only outward faces are hit).
///
/// # Arguments
///
/// * 'origin' - Start point of the ray
/// * 'dir' - Direction of the ray (expected to be unit length, so distances are in world units)
/// * 'min' - Minimum corner of the box
/// * 'max' - Maximum corner of the box
pub fn ray_aabb(origin: &Vector3, dir: &Vector3, min: &Vector3, max: &Vector3) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    let axes = [
        (origin.x, dir.x, min.x, max.x),
        (origin.y, dir.y, min.y, max.y),
        (origin.z, dir.z, min.z, max.z),
    ];

    for (o, d, lo, hi) in axes {
        if d.abs() <= f32::EPSILON {
            // parallel to this slab: must already be between the planes
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let t1 = (lo - o) * inv;
        let t2 = (hi - o) * inv;
        let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };

        t_enter = t_enter.max(near);
        t_exit = t_exit.min(far);

        if t_enter > t_exit {
            return None;
        }
    }

    if t_enter < 0.0 {
        // either the box is behind us or we started inside it
        return None;
    }

    Some(t_enter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> (Vector3, Vector3) {
        (Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn ray_hits_box_in_front() {
        let (min, max) = unit_box();
        let t = ray_aabb(&Vector3::new(-5.0, 0.0, 0.0), &Vector3::new(1.0, 0.0, 0.0), &min, &max);
        assert_eq!(t, Some(4.0));
    }

    #[test]
    fn ray_misses_box_behind_or_beside() {
        let (min, max) = unit_box();
        assert_eq!(ray_aabb(&Vector3::new(5.0, 0.0, 0.0), &Vector3::new(1.0, 0.0, 0.0), &min, &max), None);
        assert_eq!(ray_aabb(&Vector3::new(-5.0, 3.0, 0.0), &Vector3::new(1.0, 0.0, 0.0), &min, &max), None);
    }

    #[test]
    fn ray_from_inside_is_not_a_hit() {
        let (min, max) = unit_box();
        assert_eq!(ray_aabb(&Vector3::zero(), &Vector3::new(0.0, -1.0, 0.0), &min, &max), None);
    }

    #[test]
    fn ray_touching_top_face_hits_at_distance() {
        let (min, max) = unit_box();
        let t = ray_aabb(&Vector3::new(0.5, 1.8, -0.5), &Vector3::new(0.0, -1.0, 0.0), &min, &max);
        assert!((t.unwrap() - 0.8).abs() < 1e-5);
    }

    #[test]
    fn boxes_overlap() {
        let (min, max) = unit_box();
        assert!(aabb_aabb_intersects(min, max, Vector3::new(0.5, 0.5, 0.5), Vector3::new(2.0, 2.0, 2.0)));
        assert!(!aabb_aabb_intersects(min, max, Vector3::new(1.5, 0.0, 0.0), Vector3::new(2.0, 2.0, 2.0)));
    }
}
