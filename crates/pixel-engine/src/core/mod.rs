pub mod geometry;
pub mod physics;
pub mod collision;
pub mod scene;
pub mod time;
