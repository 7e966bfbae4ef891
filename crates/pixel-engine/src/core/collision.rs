//! Actor-vs-actor overlap detection and the swept circle test.
//!
//! Detection is brute force: every unordered pair is checked once per tick.
//! Scenes hold tens of actors, so no broad phase is used. Past a few hundred
//! actors a uniform grid in `detect_pairs` would be the place to add one.

use glam::Vec2;

use crate::api::types::EntityId;
use crate::components::actor::Collider;
use crate::core::geometry::Rect;

/// Snapshot of one actor taken at the start of the collision pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionProxy {
    /// Caller-defined index (the scene uses its slot index).
    pub index: usize,
    pub hit_box: Rect,
    pub collider: Collider,
}

/// A collision delivered during the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
}

impl CollisionPair {
    pub fn involves(&self, id: EntityId) -> bool {
        self.entity_a == id || self.entity_b == id
    }

    /// The other member of the pair, if `id` is one of them.
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.entity_a == id {
            Some(self.entity_b)
        } else if self.entity_b == id {
            Some(self.entity_a)
        } else {
            None
        }
    }
}

/// Whether two proxies should be reported: mask-compatible and overlapping.
pub fn proxies_collide(a: &CollisionProxy, b: &CollisionProxy) -> bool {
    a.collider.is_compatible(&b.collider) && a.hit_box.intersects(&b.hit_box)
}

/// Write every colliding unordered pair into `pairs` as `(a.index, b.index)`,
/// with `a` before `b` in `proxies` order. `pairs` is cleared first and its
/// allocation reused.
pub fn detect_pairs(proxies: &[CollisionProxy], pairs: &mut Vec<(usize, usize)>) {
    pairs.clear();
    for (i, a) in proxies.iter().enumerate() {
        for b in &proxies[i + 1..] {
            if proxies_collide(a, b) {
                pairs.push((a.index, b.index));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Swept test
// ---------------------------------------------------------------------------

const PARALLEL_EPSILON: f32 = 1e-8;

/// Earliest time of impact in [0, 1] of a circle of `radius` moving in a
/// straight line from `start` to `end` (centers) against `rect`.
///
/// The circle is exact: the target is grown into a rounded rectangle (two
/// face-extended boxes plus four corner circles) and the center's path is
/// tested against each piece. Returns `Some(0.0)` if the circle already
/// touches the rectangle at `start`.
pub fn swept_circle_rect(start: Vec2, end: Vec2, radius: f32, rect: &Rect) -> Option<f32> {
    if !start.is_finite() || !end.is_finite() || !radius.is_finite() {
        return None;
    }
    let r = radius.max(0.0);
    let delta = end - start;
    let (min, max) = (
        Vec2::new(rect.left(), rect.top()),
        Vec2::new(rect.right(), rect.bottom()),
    );

    let mut best: Option<f32> = None;
    let mut keep = |t: Option<f32>| {
        if let Some(t) = t {
            best = Some(best.map_or(t, |b: f32| b.min(t)));
        }
    };

    // Faces grown along X and along Y.
    keep(segment_aabb(start, delta, min - Vec2::new(r, 0.0), max + Vec2::new(r, 0.0)));
    keep(segment_aabb(start, delta, min - Vec2::new(0.0, r), max + Vec2::new(0.0, r)));

    if r > 0.0 {
        for corner in [
            min,
            Vec2::new(max.x, min.y),
            Vec2::new(min.x, max.y),
            max,
        ] {
            keep(segment_circle(start, delta, corner, r));
        }
    }

    best
}

/// Entry time in [0, 1] of the segment `start + t * delta` into the closed box.
fn segment_aabb(start: Vec2, delta: Vec2, min: Vec2, max: Vec2) -> Option<f32> {
    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;

    for axis in 0..2 {
        let (s, d, lo, hi) = (start[axis], delta[axis], min[axis], max[axis]);
        if d.abs() < PARALLEL_EPSILON {
            if s < lo || s > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (lo - s) * inv;
        let mut t1 = (hi - s) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }
    Some(t_enter)
}

/// Entry time in [0, 1] of the segment `start + t * delta` into a disc.
fn segment_circle(start: Vec2, delta: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let m = start - center;
    let c = m.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let b = m.dot(delta);
    if b >= 0.0 {
        // Outside and not moving toward the center.
        return None;
    }
    let a = delta.length_squared();
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / a;
    (t <= 1.0).then(|| t.max(0.0))
}
