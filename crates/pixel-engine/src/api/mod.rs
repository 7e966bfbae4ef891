pub mod types;
pub mod game;
pub mod runner;
