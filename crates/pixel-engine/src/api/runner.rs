use log::info;

use crate::api::game::{GameScene, SceneConfig};
use crate::core::scene::Scene;
use crate::core::time::FixedTimestep;
use crate::renderer::traits::Renderer;

/// Drives one active [`GameScene`] and the [`Scene`] it plays in.
///
/// The host calls [`tick`](Self::tick) with wall-clock frame time and
/// [`draw`](Self::draw) once per frame. Scene switches, whether requested by
/// the host or by the active scene, are applied between ticks and start the
/// incoming scene on empty storage.
pub struct SceneRunner {
    active: Box<dyn GameScene>,
    scene: Scene,
    timestep: FixedTimestep,
    config: SceneConfig,
    pending: Option<Box<dyn GameScene>>,
    initialized: bool,
}

impl SceneRunner {
    pub fn new(game: Box<dyn GameScene>) -> Self {
        let config = game.config().validated();
        Self {
            active: game,
            scene: Scene::with_capacity(config.max_entities),
            timestep: FixedTimestep::with_max_steps(config.fixed_dt_ms, config.max_steps_per_frame),
            config,
            pending: None,
            initialized: false,
        }
    }

    /// Initialize the active scene. Call once after construction; later
    /// calls do nothing.
    pub fn init(&mut self) {
        if self.initialized {
            return;
        }
        self.active.init(&mut self.scene);
        self.initialized = true;
        info!(
            "Scene initialized: {} entities, {}ms tick",
            self.scene.len(),
            self.config.fixed_dt_ms
        );
    }

    /// Queue a switch to `next`. Takes effect at the start of the next tick.
    pub fn switch_to(&mut self, next: Box<dyn GameScene>) {
        self.pending = Some(next);
    }

    /// Run as many fixed ticks as `frame_ms` covers. Returns the number run.
    pub fn tick(&mut self, frame_ms: u32) -> u32 {
        if !self.initialized {
            return 0;
        }
        if let Some(next) = self.pending.take() {
            self.apply_switch(next);
        }

        let steps = self.timestep.accumulate(frame_ms);
        let dt_ms = self.timestep.dt_ms();
        for step in 0..steps {
            self.active.update(&mut self.scene, dt_ms);
            if let Some(next) = self.active.next_scene() {
                self.apply_switch(next);
                return step + 1;
            }
        }
        steps
    }

    pub fn draw(&mut self, renderer: &mut dyn Renderer) {
        if !self.initialized {
            return;
        }
        self.active.draw(&mut self.scene, renderer);
    }

    fn apply_switch(&mut self, next: Box<dyn GameScene>) {
        let outgoing = self.scene.len();
        self.scene.reset();
        self.config = next.config().validated();
        self.scene.set_capacity(self.config.max_entities);
        self.timestep =
            FixedTimestep::with_max_steps(self.config.fixed_dt_ms, self.config.max_steps_per_frame);
        self.active = next;
        self.active.init(&mut self.scene);
        info!(
            "Scene switched: dropped {} entities, started with {}",
            outgoing,
            self.scene.len()
        );
    }

    // -- Accessors --

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Interpolation alpha between the last tick and the next.
    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
