pub mod entity;
pub mod actor;
pub mod layer;
