use crate::components::entity::Entity;
use crate::core::geometry::Rect;
use crate::core::scene::TickContext;

/// Collision bitmask. Games define single-bit layers and OR them together
/// for masks, e.g. `const BALL: CollisionLayer = 1 << 0;`.
pub type CollisionLayer = u32;

/// Collides with nothing / cannot be collided into.
pub const LAYER_NONE: CollisionLayer = 0;
/// Every layer.
pub const LAYER_ALL: CollisionLayer = u32::MAX;

/// Collision identity of an actor: what it is (`layer`) and what it reacts
/// to (`mask`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Collider {
    pub layer: CollisionLayer,
    pub mask: CollisionLayer,
}

impl Collider {
    pub const NONE: Collider = Collider {
        layer: LAYER_NONE,
        mask: LAYER_NONE,
    };

    pub const fn new(layer: CollisionLayer, mask: CollisionLayer) -> Self {
        Self { layer, mask }
    }

    /// Whether a pair should be tested at all. Either side declaring
    /// interest in the other's layer is enough.
    pub fn is_compatible(&self, other: &Collider) -> bool {
        (self.mask & other.layer) != 0 || (other.mask & self.layer) != 0
    }

    pub fn is_in_layer(&self, bits: CollisionLayer) -> bool {
        (self.layer & bits) != 0
    }
}

/// An entity that takes part in the collision pass.
///
/// Implementors must also override [`Entity::as_actor`] and
/// [`Entity::as_actor_mut`] to return `Some(self)`.
pub trait Actor: Entity {
    fn collider(&self) -> Collider;

    /// Box used for overlap tests. Defaults to the raw position/size box.
    fn hit_box(&self) -> Rect {
        self.base().rect()
    }

    /// Called once for each overlapping, mask-compatible pair this actor is
    /// part of. `other` is only valid for the duration of the call; keep its
    /// id if a later lookup is needed.
    fn on_collision(&mut self, _other: &dyn Actor, _ctx: &mut TickContext<'_>) {}

    fn is_in_layer(&self, bits: CollisionLayer) -> bool {
        self.collider().is_in_layer(bits)
    }
}

impl dyn Actor {
    pub fn downcast_ref<T: Actor>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BALL: CollisionLayer = 1 << 0;
    const BRICK: CollisionLayer = 1 << 1;
    const PADDLE: CollisionLayer = 1 << 2;

    #[test]
    fn complementary_masks_are_compatible() {
        let ball = Collider::new(BALL, PADDLE | BRICK);
        let paddle = Collider::new(PADDLE, BALL);
        assert!(ball.is_compatible(&paddle));
        assert!(paddle.is_compatible(&ball));
    }

    #[test]
    fn one_sided_interest_is_enough() {
        let bullet = Collider::new(BALL, BRICK);
        let wall = Collider::new(BRICK, LAYER_NONE);
        assert!(bullet.is_compatible(&wall));
        assert!(wall.is_compatible(&bullet));
    }

    #[test]
    fn disjoint_layers_are_not_compatible() {
        let brick = Collider::new(BRICK, BALL);
        let paddle = Collider::new(PADDLE, BALL);
        assert!(!brick.is_compatible(&paddle));
    }

    #[test]
    fn zero_bits_never_collide() {
        let everything = Collider::new(LAYER_ALL, LAYER_ALL);
        assert!(!Collider::NONE.is_compatible(&Collider::new(LAYER_NONE, LAYER_NONE)));
        // A zero layer can still react to others through its own mask.
        assert!(Collider::new(LAYER_NONE, BALL).is_compatible(&everything));
        assert!(!Collider::NONE.is_compatible(&Collider::new(BALL, BRICK)));
    }

    #[test]
    fn layer_membership() {
        let c = Collider::new(BALL | BRICK, LAYER_NONE);
        assert!(c.is_in_layer(BRICK));
        assert!(!c.is_in_layer(PADDLE));
    }
}
