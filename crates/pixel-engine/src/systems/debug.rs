//! Debug rendering: opt-in hit-box and bounds overlays.
//!
//! Call these from `GameScene::draw` after the scene has drawn, so the
//! outlines sit on top of the sprites they describe.

use crate::core::geometry::Rect;
use crate::core::physics::PhysicsBody;
use crate::core::scene::Scene;
use crate::renderer::traits::{Color, Renderer};

/// Outline the hit box of every enabled actor in the scene.
///
/// Disabled actors are skipped because the collision pass ignores them too.
pub fn debug_draw_hit_boxes(scene: &Scene, renderer: &mut dyn Renderer, color: Color) {
    for actor in scene.actors() {
        if !actor.base().enabled {
            continue;
        }
        stroke(renderer, &actor.hit_box(), color);
    }
}

/// Draw a full-surface line along each enabled edge of a body's effective
/// bounds (its limits, or the world box when no limits are set).
pub fn debug_draw_limits(body: &PhysicsBody, renderer: &mut dyn Renderer, color: Color) {
    let bounds = body.bounds();
    let w = renderer.width() as i32;
    let h = renderer.height() as i32;

    for x in [bounds.left, bounds.right].into_iter().flatten() {
        let x = x as i32;
        renderer.line(x, 0, x, h - 1, color);
    }
    for y in [bounds.top, bounds.bottom].into_iter().flatten() {
        let y = y as i32;
        renderer.line(0, y, w - 1, y, color);
    }
}

fn stroke(renderer: &mut dyn Renderer, rect: &Rect, color: Color) {
    renderer.stroke_rect(
        rect.x.floor() as i32,
        rect.y.floor() as i32,
        rect.width.round() as i32,
        rect.height.round() as i32,
        color,
    );
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::components::actor::{Actor, Collider};
    use crate::components::entity::{Entity, EntityBase};
    use crate::core::geometry::LimitRect;
    use crate::renderer::command::{CommandBuffer, DrawOp};

    struct Block {
        base: EntityBase,
    }

    impl Entity for Block {
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

    impl Actor for Block {
        fn collider(&self) -> Collider {
            Collider::new(1, 1)
        }
    }

    struct Scenery {
        base: EntityBase,
    }

    impl Entity for Scenery {
        fn base(&self) -> &EntityBase {
            &self.base
        }
        fn base_mut(&mut self) -> &mut EntityBase {
            &mut self.base
        }
    }

    #[test]
    fn outlines_enabled_actors_only() {
        let mut scene = Scene::new();
        scene.add_entity(Block {
            base: EntityBase::new(Vec2::new(10.5, 20.0), Vec2::new(8.0, 4.0)),
        });
        let hidden = scene
            .add_entity(Block {
                base: EntityBase::new(Vec2::ZERO, Vec2::ONE),
            })
            .unwrap();
        scene.get_mut(hidden).unwrap().base_mut().enabled = false;
        scene.add_entity(Scenery {
            base: EntityBase::new(Vec2::ZERO, Vec2::splat(240.0)),
        });

        let mut buf = CommandBuffer::new(240, 240);
        debug_draw_hit_boxes(&scene, &mut buf, Color::Green);

        assert_eq!(buf.command_count(), 1);
        let cmd = buf.commands()[0];
        assert_eq!(cmd.draw_op(), Some(DrawOp::StrokeRect));
        assert_eq!((cmd.a, cmd.b, cmd.c, cmd.d), (10, 20, 8, 4));
        assert_eq!(cmd.color(), Some(Color::Green));
    }

    #[test]
    fn limits_draw_one_line_per_enabled_edge() {
        let body = PhysicsBody::new().with_limits(LimitRect::from_sentinel(-1.0, 16.0, 200.0, -1.0));
        let mut buf = CommandBuffer::new(240, 160);
        debug_draw_limits(&body, &mut buf, Color::Red);

        let lines: Vec<_> = buf.commands().iter().map(|c| (c.a, c.b, c.c, c.d)).collect();
        assert_eq!(lines, vec![(200, 0, 200, 159), (0, 16, 239, 16)]);
    }

    #[test]
    fn unbounded_body_draws_nothing() {
        let mut buf = CommandBuffer::new(240, 240);
        debug_draw_limits(&PhysicsBody::new(), &mut buf, Color::Red);
        assert_eq!(buf.command_count(), 0);
    }
}
