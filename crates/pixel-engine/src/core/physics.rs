use glam::Vec2;

use crate::components::actor::Actor;
use crate::components::entity::EntityBase;
use crate::core::collision::swept_circle_rect;
use crate::core::geometry::{LimitRect, Rect};

/// Convert an engine tick (milliseconds) into the seconds physics integrates in.
pub fn ms_to_secs(dt_ms: u32) -> f32 {
    dt_ms as f32 * 0.001
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Which world edges a body touched during its most recent bounds resolve.
/// Recomputed from scratch every time; never cumulative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorldCollisionInfo {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl WorldCollisionInfo {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }

    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    pub fn vertical(&self) -> bool {
        self.top || self.bottom
    }
}

/// Velocity, bounds and contact response for a physics actor.
///
/// The body does not own the actor's position; every method that moves
/// things takes the actor's [`EntityBase`] explicitly so an actor can hold
/// both as sibling fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    /// Pixels per second.
    pub velocity: Vec2,
    restitution: f32,
    friction: f32,
    world_size: Vec2,
    limits: Option<LimitRect>,
    previous_position: Vec2,
    world_collision: WorldCollisionInfo,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            restitution: 0.0,
            friction: 0.0,
            world_size: Vec2::ZERO,
            limits: None,
            previous_position: Vec2::ZERO,
            world_collision: WorldCollisionInfo::default(),
        }
    }
}

impl PhysicsBody {
    /// A body at rest with no bounds, no bounce and no friction.
    pub fn new() -> Self {
        Self::default()
    }

    // -- Builder pattern --

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_world_size(mut self, width: f32, height: f32) -> Self {
        self.set_world_size(width, height);
        self
    }

    pub fn with_limits(mut self, limits: LimitRect) -> Self {
        self.set_limits(limits);
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.set_restitution(restitution);
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.set_friction(friction);
        self
    }

    // -- Setters --

    pub fn set_velocity(&mut self, vx: f32, vy: f32) {
        self.velocity = Vec2::new(vx, vy);
    }

    /// World dimensions used when no limits are set. A dimension of zero (or
    /// anything not strictly positive) leaves that axis unbounded.
    pub fn set_world_size(&mut self, width: f32, height: f32) {
        self.world_size = Vec2::new(positive_or_zero(width), positive_or_zero(height));
    }

    /// Tighten the world box with explicit per-edge limits. A disabled edge
    /// falls back to the world edge on that side, or stays unclamped when
    /// the axis has no world size.
    pub fn set_limits(&mut self, limits: LimitRect) {
        self.limits = Some(limits);
    }

    /// Go back to clamping against the world size.
    pub fn clear_limits(&mut self) {
        self.limits = None;
    }

    /// Fraction of speed kept (and reversed) on a boundary contact, in [0, 1].
    pub fn set_restitution(&mut self, restitution: f32) {
        self.restitution = unit_interval(restitution);
    }

    /// Fraction of the tangential speed removed on each tick spent in
    /// contact with a boundary, in [0, 1].
    pub fn set_friction(&mut self, friction: f32) {
        self.friction = unit_interval(friction);
    }

    // -- Accessors --

    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    pub fn world_size(&self) -> Vec2 {
        self.world_size
    }

    pub fn limits(&self) -> Option<LimitRect> {
        self.limits
    }

    /// Position captured right before the last integration step.
    pub fn previous_position(&self) -> Vec2 {
        self.previous_position
    }

    pub fn world_collision_info(&self) -> WorldCollisionInfo {
        self.world_collision
    }

    /// The edges actually clamped against. Each edge comes from the limits
    /// when enabled there, otherwise from the world box for that axis, if
    /// the axis has a size.
    pub fn bounds(&self) -> LimitRect {
        let w = (self.world_size.x > 0.0).then_some(self.world_size.x);
        let h = (self.world_size.y > 0.0).then_some(self.world_size.y);
        let limits = self.limits.unwrap_or(LimitRect::NONE);
        LimitRect {
            left: limits.left.or(w.map(|_| 0.0)),
            top: limits.top.or(h.map(|_| 0.0)),
            right: limits.right.or(w),
            bottom: limits.bottom.or(h),
        }
    }

    // -- Simulation --

    /// Move `base` along the velocity for `dt` seconds, remembering where it
    /// started. Returns false (and leaves the position alone, flags cleared)
    /// for a negative or non-finite `dt`.
    pub fn integrate(&mut self, base: &mut EntityBase, dt: f32) -> bool {
        if !dt.is_finite() || dt < 0.0 {
            self.previous_position = base.pos;
            self.world_collision = WorldCollisionInfo::default();
            return false;
        }
        self.previous_position = base.pos;
        let next = base.pos + self.velocity * dt;
        if next.is_finite() {
            base.pos = next;
        }
        true
    }

    /// Clamp `base` into [`bounds`](Self::bounds), edge by edge, and apply
    /// the contact response.
    ///
    /// Velocity along an axis is only reflected when it points into the edge
    /// that was hit, so a body already leaving a wall is never pushed back in.
    /// If the bounds are narrower than the body, the left/top edge wins.
    pub fn resolve_world_bounds(&mut self, base: &mut EntityBase) -> WorldCollisionInfo {
        let mut info = WorldCollisionInfo::default();
        if !base.pos.is_finite() {
            self.world_collision = info;
            return info;
        }

        let bounds = self.bounds();
        let size = base.size();
        let mut pos = base.pos;

        if let Some(right) = bounds.right {
            if pos.x + size.x > right {
                pos.x = right - size.x;
                info.right = true;
            }
        }
        if let Some(left) = bounds.left {
            if pos.x < left {
                pos.x = left;
                info.left = true;
            }
        }
        if let Some(bottom) = bounds.bottom {
            if pos.y + size.y > bottom {
                pos.y = bottom - size.y;
                info.bottom = true;
            }
        }
        if let Some(top) = bounds.top {
            if pos.y < top {
                pos.y = top;
                info.top = true;
            }
        }
        base.pos = pos;

        let v = &mut self.velocity;
        if (info.left && v.x < 0.0) || (info.right && v.x > 0.0) {
            v.x *= -self.restitution;
        }
        if (info.top && v.y < 0.0) || (info.bottom && v.y > 0.0) {
            v.y *= -self.restitution;
        }
        if self.friction > 0.0 {
            let keep = 1.0 - self.friction;
            if info.horizontal() {
                v.y *= keep;
            }
            if info.vertical() {
                v.x *= keep;
            }
        }

        self.world_collision = info;
        info
    }

    /// Integrate for one engine tick and resolve bounds.
    pub fn step(&mut self, base: &mut EntityBase, dt_ms: u32) -> WorldCollisionInfo {
        if self.integrate(base, ms_to_secs(dt_ms)) {
            self.resolve_world_bounds(base)
        } else {
            WorldCollisionInfo::default()
        }
    }

    /// Earliest time of impact in [0, 1] of this tick's movement against
    /// `target`, treating the body as a circle of `radius` whose center sits
    /// at `anchor` relative to the entity position.
    ///
    /// Complements the end-of-step box test for bodies that can move further
    /// than a target is thick in one tick.
    pub fn swept_hit(&self, base: &EntityBase, anchor: Vec2, radius: f32, target: &Rect) -> Option<f32> {
        swept_circle_rect(self.previous_position + anchor, base.pos + anchor, radius, target)
    }

    /// Position along this tick's path at time `t` (0 = previous, 1 = current).
    pub fn position_at(&self, base: &EntityBase, t: f32) -> Vec2 {
        self.previous_position.lerp(base.pos, t.clamp(0.0, 1.0))
    }
}

fn positive_or_zero(v: f32) -> f32 {
    if v > 0.0 && v.is_finite() {
        v
    } else {
        0.0
    }
}

fn unit_interval(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// PhysicsActor
// ---------------------------------------------------------------------------

/// An actor moved by velocity and kept inside world bounds.
///
/// The usual `Entity::update` for a physics actor adjusts `velocity`
/// (gravity, input, AI) and then calls [`physics_update`](Self::physics_update).
/// Actors with custom movement call [`integrate`](Self::integrate) and
/// [`resolve_world_bounds`](Self::resolve_world_bounds) themselves.
pub trait PhysicsActor: Actor {
    fn physics(&self) -> &PhysicsBody;

    /// Both halves at once so the body can move the entity.
    fn parts_mut(&mut self) -> (&mut EntityBase, &mut PhysicsBody);

    fn physics_mut(&mut self) -> &mut PhysicsBody {
        self.parts_mut().1
    }

    /// Called after every bounds resolve, including ones that touched no
    /// edge, so state derived from the flags (e.g. `grounded`) can clear.
    fn on_world_collision(&mut self, _info: WorldCollisionInfo) {}

    /// Straight-line integration over `dt` seconds.
    fn integrate(&mut self, dt: f32) -> bool {
        let (base, body) = self.parts_mut();
        body.integrate(base, dt)
    }

    fn resolve_world_bounds(&mut self) -> WorldCollisionInfo {
        let (base, body) = self.parts_mut();
        let info = body.resolve_world_bounds(base);
        self.on_world_collision(info);
        info
    }

    /// Default per-tick behaviour: integrate, then resolve bounds.
    fn physics_update(&mut self, dt_ms: u32) -> WorldCollisionInfo {
        if self.integrate(ms_to_secs(dt_ms)) {
            self.resolve_world_bounds()
        } else {
            WorldCollisionInfo::default()
        }
    }

    fn world_collision_info(&self) -> WorldCollisionInfo {
        self.physics().world_collision_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::actor::Collider;
    use crate::components::entity::Entity;

    const EPS: f32 = 1e-4;

    fn body_at(x: f32, y: f32, w: f32, h: f32) -> EntityBase {
        EntityBase::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn integrate_moves_by_velocity() {
        let mut base = body_at(5.0, 7.0, 2.0, 2.0);
        let mut body = PhysicsBody::new().with_velocity(Vec2::new(100.0, -20.0));
        assert!(body.integrate(&mut base, 0.1));
        assert!((base.pos.x - 15.0).abs() < EPS);
        assert!((base.pos.y - 5.0).abs() < EPS);
        assert_eq!(body.previous_position(), Vec2::new(5.0, 7.0));
    }

    #[test]
    fn negative_dt_is_a_no_op() {
        let mut base = body_at(5.0, 5.0, 2.0, 2.0);
        let mut body = PhysicsBody::new()
            .with_velocity(Vec2::new(100.0, 0.0))
            .with_world_size(10.0, 10.0);
        body.step(&mut base, 1000);
        assert!(body.world_collision_info().right);

        assert!(!body.integrate(&mut base, -0.5));
        assert!(!body.integrate(&mut base, f32::NAN));
        assert_eq!(base.pos, Vec2::new(8.0, 5.0));
        assert_eq!(body.world_collision_info(), WorldCollisionInfo::default());
    }

    #[test]
    fn clamps_to_right_edge_and_stops() {
        let mut base = body_at(0.0, 0.0, 10.0, 10.0);
        let mut body = PhysicsBody::new()
            .with_velocity(Vec2::new(1000.0, 0.0))
            .with_world_size(100.0, 100.0);
        let info = body.step(&mut base, 1000);
        assert_eq!(base.pos.x, 90.0);
        assert!(info.right);
        assert!(!info.left && !info.top && !info.bottom);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn full_restitution_bounces() {
        let mut base = body_at(0.0, 0.0, 10.0, 10.0);
        let mut body = PhysicsBody::new()
            .with_velocity(Vec2::new(1000.0, 0.0))
            .with_world_size(100.0, 100.0)
            .with_restitution(1.0);
        body.step(&mut base, 1000);
        assert_eq!(base.pos.x, 90.0);
        assert_eq!(body.velocity.x, -1000.0);
    }

    #[test]
    fn partial_restitution_scales_bounce() {
        let mut base = body_at(50.0, 80.0, 4.0, 4.0);
        let mut body = PhysicsBody::new()
            .with_velocity(Vec2::new(0.0, 200.0))
            .with_world_size(100.0, 100.0)
            .with_restitution(0.5);
        let info = body.step(&mut base, 100);
        assert!(info.bottom);
        assert_eq!(base.pos.y, 96.0);
        assert!((body.velocity.y + 100.0).abs() < EPS);
    }

    #[test]
    fn flags_are_not_cumulative() {
        let mut base = body_at(95.0, 50.0, 10.0, 10.0);
        let mut body = PhysicsBody::new()
            .with_velocity(Vec2::new(10.0, 0.0))
            .with_world_size(100.0, 100.0);
        assert!(body.step(&mut base, 16).right);
        body.set_velocity(-10.0, 0.0);
        let info = body.step(&mut base, 16);
        assert!(!info.any());
        assert!(!body.world_collision_info().right);
    }

    #[test]
    fn zero_world_size_leaves_axis_free() {
        let mut base = body_at(0.0, 0.0, 4.0, 4.0);
        let mut body = PhysicsBody::new()
            .with_velocity(Vec2::new(500.0, 500.0))
            .with_world_size(0.0, 100.0);
        let info = body.step(&mut base, 1000);
        assert_eq!(base.pos.x, 500.0);
        assert_eq!(base.pos.y, 96.0);
        assert!(!info.right);
        assert!(info.bottom);
    }

    #[test]
    fn disabled_limit_edge_falls_back_to_world() {
        let mut base = body_at(50.0, 50.0, 4.0, 4.0);
        let mut body = PhysicsBody::new()
            .with_velocity(Vec2::new(0.0, -1000.0))
            .with_world_size(100.0, 100.0)
            .with_limits(LimitRect::from_sentinel(0.0, -1.0, 100.0, 100.0));
        let info = body.step(&mut base, 100);
        assert_eq!(base.pos.y, 0.0);
        assert!(info.top);
    }

    #[test]
    fn disabled_limit_edge_without_world_is_free() {
        let mut base = body_at(50.0, 50.0, 4.0, 4.0);
        let mut body = PhysicsBody::new()
            .with_velocity(Vec2::new(0.0, -1000.0))
            .with_limits(LimitRect::from_sentinel(0.0, -1.0, 100.0, 100.0));
        let info = body.step(&mut base, 100);
        assert_eq!(base.pos.y, -50.0);
        assert!(!info.top);
    }

    #[test]
    fn pong_ball_scores_on_world_side_edges() {
        // Top/bottom kept inside the play strip, sides left to the world box.
        let mut base = body_at(5.0, 100.0, 4.0, 4.0);
        let mut body = PhysicsBody::new()
            .with_velocity(Vec2::new(-100.0, 0.0))
            .with_world_size(240.0, 240.0)
            .with_limits(LimitRect::from_sentinel(-1.0, 20.0, -1.0, 220.0));
        let info = body.step(&mut base, 100);
        assert_eq!(base.pos.x, 0.0);
        assert!(info.left);
        assert!(!info.top && !info.bottom);
        assert_eq!(body.bounds(), LimitRect::new(0.0, 20.0, 240.0, 220.0));
    }

    #[test]
    fn limits_override_world_box() {
        let mut base = body_at(50.0, 30.0, 4.0, 4.0);
        let mut body = PhysicsBody::new()
            .with_velocity(Vec2::new(0.0, -100.0))
            .with_world_size(100.0, 100.0)
            .with_limits(LimitRect::new(0.0, 20.0, 100.0, 100.0))
            .with_restitution(1.0);
        let info = body.step(&mut base, 200);
        assert!(info.top);
        assert_eq!(base.pos.y, 20.0);
        assert_eq!(body.velocity.y, 100.0);
    }

    #[test]
    fn narrow_bounds_pin_to_left() {
        let mut base = body_at(3.0, 0.0, 10.0, 1.0);
        let mut body = PhysicsBody::new().with_limits(LimitRect::NONE.with_left(Some(0.0)).with_right(Some(5.0)));
        let info = body.resolve_world_bounds(&mut base);
        assert_eq!(base.pos.x, 0.0);
        assert!(info.left && info.right);
    }

    #[test]
    fn friction_damps_tangential_velocity() {
        let mut base = body_at(10.0, 95.0, 4.0, 4.0);
        let mut body = PhysicsBody::new()
            .with_velocity(Vec2::new(100.0, 50.0))
            .with_world_size(200.0, 100.0)
            .with_friction(0.25);
        let info = body.step(&mut base, 100);
        assert!(info.bottom);
        assert!((body.velocity.x - 75.0).abs() < EPS);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn coefficients_are_clamped() {
        let body = PhysicsBody::new().with_restitution(3.0).with_friction(-1.0);
        assert_eq!(body.restitution(), 1.0);
        assert_eq!(body.friction(), 0.0);
    }

    #[test]
    fn swept_hit_catches_thin_wall() {
        // Bullet moves 40px up in one tick through a 1px wall.
        let mut base = body_at(50.0, 100.0, 2.0, 4.0);
        let mut body = PhysicsBody::new().with_velocity(Vec2::new(0.0, -2000.0));
        body.step(&mut base, 20);
        let wall = Rect::new(40.0, 80.0, 20.0, 1.0);
        assert!(!base.rect().intersects(&wall));

        let anchor = base.size() * 0.5;
        let t = body.swept_hit(&base, anchor, 1.0, &wall).unwrap();
        assert!(t > 0.0 && t < 1.0);
        let at = body.position_at(&base, t) + anchor;
        assert!((at.y - 82.0).abs() < 1e-3, "impact at {:?}", at);
    }

    // -- Trait plumbing --

    struct Faller {
        base: EntityBase,
        body: PhysicsBody,
        grounded: bool,
        hits: u32,
    }

    impl Entity for Faller {
        fn base(&self) -> &EntityBase {
            &self.base
        }
        fn base_mut(&mut self) -> &mut EntityBase {
            &mut self.base
        }
        fn as_actor(&self) -> Option<&dyn Actor> {
            Some(self)
        }
        fn as_actor_mut(&mut self) -> Option<&mut dyn Actor> {
            Some(self)
        }
    }

    impl Actor for Faller {
        fn collider(&self) -> Collider {
            Collider::NONE
        }
    }

    impl PhysicsActor for Faller {
        fn physics(&self) -> &PhysicsBody {
            &self.body
        }
        fn parts_mut(&mut self) -> (&mut EntityBase, &mut PhysicsBody) {
            (&mut self.base, &mut self.body)
        }
        fn on_world_collision(&mut self, info: WorldCollisionInfo) {
            self.grounded = info.bottom;
            self.hits += 1;
        }
    }

    #[test]
    fn world_collision_hook_sees_flags() {
        let mut faller = Faller {
            base: body_at(10.0, 0.0, 8.0, 8.0),
            body: PhysicsBody::new()
                .with_velocity(Vec2::new(0.0, 300.0))
                .with_world_size(64.0, 64.0),
            grounded: false,
            hits: 0,
        };
        faller.physics_update(100);
        assert!(!faller.grounded);
        assert_eq!(faller.hits, 1);

        faller.physics_update(1000);
        assert!(faller.grounded);
        assert_eq!(faller.hits, 2);
        assert_eq!(faller.base.pos.y, 56.0);
        assert!(faller.world_collision_info().bottom);
    }

    #[test]
    fn grounded_clears_after_leaving_floor() {
        let mut faller = Faller {
            base: body_at(10.0, 56.0, 8.0, 8.0),
            body: PhysicsBody::new()
                .with_velocity(Vec2::new(0.0, 300.0))
                .with_world_size(64.0, 64.0),
            grounded: false,
            hits: 0,
        };
        faller.physics_update(16);
        assert!(faller.grounded);

        // Jump.
        faller.physics_mut().set_velocity(0.0, -300.0);
        faller.physics_update(100);
        assert!((faller.base.pos.y - 26.0).abs() < EPS);
        assert!(!faller.world_collision_info().bottom);
        assert!(!faller.grounded);
    }
}
