use std::any::Any;

use glam::Vec2;

use crate::api::types::{EntityId, EntityKind};
use crate::components::actor::Actor;
use crate::components::layer::RenderLayer;
use crate::core::geometry::Rect;
use crate::core::scene::TickContext;
use crate::renderer::traits::Renderer;

/// Upcast helper so scene code can hand out concrete entity types.
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// State every entity carries: where it is, how big, whether it is drawn and
/// whether it is simulated.
#[derive(Debug, Clone)]
pub struct EntityBase {
    /// Assigned by the scene on insertion; `EntityId(0)` until then.
    pub id: EntityId,
    /// Free-form name for finding entities from scene logic.
    pub tag: &'static str,
    pub kind: EntityKind,
    /// Top-left corner in scene pixels, unless the entity documents otherwise.
    pub pos: Vec2,
    size: Vec2,
    pub render_layer: RenderLayer,
    /// Invisible entities are skipped by the draw pass.
    pub visible: bool,
    /// Disabled entities are skipped by update and by the collision pass.
    pub enabled: bool,
}

impl EntityBase {
    /// Create an enabled, visible entity. Negative sizes are clamped to zero.
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            id: EntityId(0),
            tag: "",
            kind: EntityKind::Generic,
            pos,
            size: size.max(Vec2::ZERO),
            render_layer: RenderLayer::default(),
            visible: true,
            enabled: true,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_layer(mut self, layer: RenderLayer) -> Self {
        self.render_layer = layer;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    // -- Accessors --

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Set the size, clamping negative or NaN components to zero.
    pub fn set_size(&mut self, size: Vec2) {
        self.size = Vec2::new(non_negative(size.x), non_negative(size.y));
    }

    /// The raw position/size box.
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

fn non_negative(v: f32) -> f32 {
    if v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Anything a scene can own.
///
/// `update` runs only while `base().enabled` is true and `draw` only while
/// `base().visible` is true. Both default to no-ops so a purely visual entity
/// skips `update` and a purely logical one skips `draw`.
///
/// Entities that take part in collisions implement [`Actor`] as well and
/// override `as_actor`/`as_actor_mut` to return `Some(self)`; the scene uses
/// those to pick out the collision set.
pub trait Entity: AsAny {
    fn base(&self) -> &EntityBase;

    fn base_mut(&mut self) -> &mut EntityBase;

    /// Advance by one tick. `dt_ms` is the tick length in milliseconds.
    fn update(&mut self, _dt_ms: u32, _ctx: &mut TickContext<'_>) {}

    fn draw(&self, _renderer: &mut dyn Renderer) {}

    fn as_actor(&self) -> Option<&dyn Actor> {
        None
    }

    fn as_actor_mut(&mut self) -> Option<&mut dyn Actor> {
        None
    }
}

impl dyn Entity {
    pub fn downcast_ref<T: Entity>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Entity>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn id(&self) -> EntityId {
        self.base().id
    }
}
