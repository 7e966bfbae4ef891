pub mod traits;
pub mod command;

// Re-export key types for convenient access
pub use traits::{Color, Renderer, SpriteId, TileMapId};
pub use command::{CommandBuffer, DrawCommand, DrawOp};
