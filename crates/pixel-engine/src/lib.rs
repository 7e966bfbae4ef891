pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use api::game::{GameScene, SceneConfig};
pub use api::runner::SceneRunner;
pub use api::types::{EntityId, EntityKind};
pub use components::entity::{Entity, EntityBase};
pub use components::actor::{Actor, Collider, CollisionLayer, LAYER_ALL, LAYER_NONE};
pub use components::layer::RenderLayer;
pub use core::geometry::{LimitRect, Rect};
pub use core::physics::{PhysicsActor, PhysicsBody, WorldCollisionInfo};
pub use core::collision::{swept_circle_rect, CollisionPair};
pub use core::scene::{Scene, TickContext};
pub use core::time::FixedTimestep;
pub use renderer::command::{CommandBuffer, DrawCommand};
pub use renderer::traits::{Color, Renderer, SpriteId, TileMapId};
pub use systems::debug::{debug_draw_hit_boxes, debug_draw_limits};
