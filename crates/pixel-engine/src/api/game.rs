use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::scene::Scene;
use crate::renderer::traits::Renderer;

/// Configuration for one scene, provided by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Fixed tick length in milliseconds (default: 16).
    pub fixed_dt_ms: u32,
    /// Most ticks run for a single frame (default: 10).
    pub max_steps_per_frame: u32,
    /// World width in pixels (default: 240).
    pub world_width: f32,
    /// World height in pixels (default: 240).
    pub world_height: f32,
    /// Scene capacity (default: 64).
    pub max_entities: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fixed_dt_ms: 16,
            max_steps_per_frame: 10,
            world_width: 240.0,
            world_height: 240.0,
            max_entities: 64,
        }
    }
}

impl SceneConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replace unusable values with defaults, warning about each one.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if self.fixed_dt_ms == 0 {
            warn!("SceneConfig: fixed_dt_ms of 0, using {}", defaults.fixed_dt_ms);
            self.fixed_dt_ms = defaults.fixed_dt_ms;
        }
        if self.max_steps_per_frame == 0 {
            warn!(
                "SceneConfig: max_steps_per_frame of 0, using {}",
                defaults.max_steps_per_frame
            );
            self.max_steps_per_frame = defaults.max_steps_per_frame;
        }
        if self.max_entities == 0 {
            warn!("SceneConfig: max_entities of 0, using {}", defaults.max_entities);
            self.max_entities = defaults.max_entities;
        }
        if !(self.world_width.is_finite() && self.world_width >= 0.0) {
            warn!("SceneConfig: world_width {} invalid, using {}", self.world_width, defaults.world_width);
            self.world_width = defaults.world_width;
        }
        if !(self.world_height.is_finite() && self.world_height >= 0.0) {
            warn!("SceneConfig: world_height {} invalid, using {}", self.world_height, defaults.world_height);
            self.world_height = defaults.world_height;
        }
        self
    }
}

/// Per-game logic for one screen: a title screen, a level, a game-over card.
///
/// The runner owns the [`Scene`] and hands it to every call. Entities do most
/// of the work in their own `update`; the scene logic checks win/lose
/// conditions, spawns waves and decides when to move on.
pub trait GameScene {
    /// Return scene configuration. Called once before init.
    fn config(&self) -> SceneConfig {
        SceneConfig::default()
    }

    /// Spawn the initial entities.
    fn init(&mut self, scene: &mut Scene);

    /// One fixed tick. The default just runs the scene pipeline.
    fn update(&mut self, scene: &mut Scene, dt_ms: u32) {
        scene.update(dt_ms);
    }

    fn draw(&self, scene: &mut Scene, renderer: &mut dyn Renderer) {
        scene.draw(renderer);
    }

    /// Polled by the runner after each tick. Returning a scene switches to
    /// it before the next tick starts.
    fn next_scene(&mut self) -> Option<Box<dyn GameScene>> {
        None
    }
}
