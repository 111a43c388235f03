//! Sprite-animation stage.
//!
//! Peripheral to the simulation: advances animation frames and keeps the
//! player's animation in sync with its motion. The renderer reads the
//! resulting atlas rectangles; nothing here draws.

use crate::game::components::{
    AnimationKind, Drawable, Physics, Sprite, SpriteAnimation, SpriteFlip,
};
use crate::game::entity::Entity;
use crate::game::registry::{GroupId, Registry};

/// Advance animations (group: SpriteAnimation + Sprite + Drawable).
pub fn advance_animations(registry: &mut Registry, animation_group: GroupId, dt: f32) {
    for entity in registry.entities_in(animation_group) {
        if !registry.is_alive(entity) {
            continue;
        }

        let finished = {
            let animation = registry.component::<SpriteAnimation>(entity);
            animation.current_frame >= animation.end_frame
                && animation.time_left <= 0.0
                && !animation.looped
        };
        if finished {
            continue;
        }

        let new_frame = {
            let animation = registry.component_mut::<SpriteAnimation>(entity);
            animation.time_left -= dt;
            if animation.time_left > 0.0 {
                None
            } else if animation.current_frame >= animation.end_frame {
                if animation.looped {
                    animation.current_frame = animation.start_frame;
                    animation.time_left = animation.frame_time;
                    Some(animation.current_frame)
                } else {
                    None
                }
            } else {
                animation.current_frame += 1;
                animation.time_left = animation.frame_time;
                Some(animation.current_frame)
            }
        };

        if let Some(frame) = new_frame {
            set_sprite_frame(registry, entity, frame);
        }
    }
}

/// Keep the player's animation and facing in step with its velocity
/// (group: Physics + Sprite + Drawable).
pub fn select_actor_animations(registry: &mut Registry, actor_group: GroupId) {
    for entity in registry.entities_in(actor_group) {
        if !registry.is_alive(entity) {
            continue;
        }

        let (horizontal, falling) = {
            let physics = registry.component::<Physics>(entity);
            (physics.velocity.x, physics.falling)
        };

        {
            let drawable = registry.component_mut::<Drawable>(entity);
            if horizontal < 0.0 {
                drawable.flip = SpriteFlip::Horizontal;
            } else if horizontal > 0.0 {
                drawable.flip = SpriteFlip::None;
            }
        }

        let wanted = if falling {
            AnimationKind::Jumping
        } else if horizontal == 0.0 {
            AnimationKind::Idle
        } else {
            AnimationKind::Running
        };

        let current = registry
            .get::<SpriteAnimation>(entity)
            .map(|animation| animation.kind);
        if current != Some(wanted) {
            play_animation(registry, entity, wanted);
        }
    }
}

/// Restart `entity`'s animation at the first frame of `kind`.
pub fn play_animation(registry: &mut Registry, entity: Entity, kind: AnimationKind) {
    let animation = SpriteAnimation::of(kind);
    let first_frame = animation.start_frame;
    registry.add_component(entity, animation);
    set_sprite_frame(registry, entity, first_frame);
}

/// Point the drawable's atlas rect at a 1-based frame of the sprite sheet.
fn set_sprite_frame(registry: &mut Registry, entity: Entity, frame: u32) {
    let (frame_size, columns) = {
        let sprite = registry.component::<Sprite>(entity);
        (sprite.frame_size, (sprite.sheet_size.0 / sprite.frame_size.0).max(1))
    };

    let index = frame.saturating_sub(1);
    let drawable = registry.component_mut::<Drawable>(entity);
    drawable.atlas_rect.x = ((index % columns) * frame_size.0) as f32;
    drawable.atlas_rect.y = ((index / columns) * frame_size.1) as f32;
    drawable.atlas_rect.w = frame_size.0 as f32;
    drawable.atlas_rect.h = frame_size.1 as f32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::component::Component;
    use crate::game::components::Transform;
    use crate::game::rect::Rect;
    use glam::Vec2;

    struct World {
        registry: Registry,
        animation_group: GroupId,
        actor_group: GroupId,
        actor: Entity,
    }

    impl World {
        fn new() -> Self {
            let mut registry = Registry::new();
            let animation_group =
                registry.register_group(SpriteAnimation::MASK | Sprite::MASK | Drawable::MASK);
            let actor_group =
                registry.register_group(Physics::MASK | Sprite::MASK | Drawable::MASK);

            let actor = registry.create_entity();
            registry.add_component(actor, Transform::default());
            registry.add_component(actor, Physics::new(400.0, 550.0, Vec2::new(400.0, 400.0)));
            registry.add_component(
                actor,
                Drawable::new(
                    "adventurer",
                    Rect::new(0.0, 0.0, 50.0, 37.0),
                    Vec2::ONE,
                    2,
                ),
            );
            registry.add_component(
                actor,
                Sprite {
                    frame_size: (50, 37),
                    sheet_size: (350, 444),
                },
            );

            Self {
                registry,
                animation_group,
                actor_group,
                actor,
            }
        }
    }

    #[test]
    fn frames_advance_and_loop() {
        let mut world = World::new();
        play_animation(&mut world.registry, world.actor, AnimationKind::Idle);

        // Idle runs frames 1..=4 at 0.2 s per frame.
        advance_animations(&mut world.registry, world.animation_group, 0.25);
        assert_eq!(
            world
                .registry
                .component::<SpriteAnimation>(world.actor)
                .current_frame,
            2
        );

        for _ in 0..3 {
            advance_animations(&mut world.registry, world.animation_group, 0.25);
        }
        // Wrapped back to the first frame.
        assert_eq!(
            world
                .registry
                .component::<SpriteAnimation>(world.actor)
                .current_frame,
            1
        );
    }

    #[test]
    fn frame_change_updates_atlas_rect() {
        let mut world = World::new();
        play_animation(&mut world.registry, world.actor, AnimationKind::Running);

        // Running starts on frame 10: second row, third column of a
        // 7-column sheet.
        let drawable = world.registry.component::<Drawable>(world.actor);
        assert_eq!(drawable.atlas_rect.x, 100.0);
        assert_eq!(drawable.atlas_rect.y, 37.0);
        assert_eq!(drawable.atlas_rect.w, 50.0);
    }

    #[test]
    fn grounded_actor_switches_between_idle_and_running() {
        let mut world = World::new();
        world.registry.component_mut::<Physics>(world.actor).falling = false;

        select_actor_animations(&mut world.registry, world.actor_group);
        assert_eq!(
            world
                .registry
                .component::<SpriteAnimation>(world.actor)
                .kind,
            AnimationKind::Idle
        );

        world
            .registry
            .component_mut::<Physics>(world.actor)
            .velocity
            .x = -200.0;
        select_actor_animations(&mut world.registry, world.actor_group);

        let animation = world.registry.component::<SpriteAnimation>(world.actor);
        assert_eq!(animation.kind, AnimationKind::Running);
        assert_eq!(
            world.registry.component::<Drawable>(world.actor).flip,
            SpriteFlip::Horizontal
        );

        // Same state next tick: the running animation is not restarted.
        world
            .registry
            .component_mut::<SpriteAnimation>(world.actor)
            .current_frame = 12;
        select_actor_animations(&mut world.registry, world.actor_group);
        assert_eq!(
            world
                .registry
                .component::<SpriteAnimation>(world.actor)
                .current_frame,
            12
        );
    }

    #[test]
    fn airborne_actor_plays_jump() {
        let mut world = World::new();
        world.registry.component_mut::<Physics>(world.actor).falling = true;

        select_actor_animations(&mut world.registry, world.actor_group);
        assert_eq!(
            world
                .registry
                .component::<SpriteAnimation>(world.actor)
                .kind,
            AnimationKind::Jumping
        );
    }
}
