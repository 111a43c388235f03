//! Movement-impulse stage.
//!
//! Start/stop markers are discrete control edges. Direction keys
//! contribute ±move_speed to horizontal acceleration while held: a start
//! edge adds the contribution, the matching stop edge subtracts it back
//! out, so acceleration always reflects the sum of currently-held
//! directions. Horizontal velocity is zeroed on every edge to keep a
//! re-pressed key from compounding. Jump is an instantaneous velocity
//! impulse, not acceleration.

use crate::game::components::{
    Drawable, MovementKind, Physics, SpriteFlip, StartMovement, StopMovement,
};
use crate::game::registry::{GroupId, Registry};

/// Consume start markers (group: StartMovement + Physics).
pub fn apply_start_markers(registry: &mut Registry, start_group: GroupId) {
    for entity in registry.entities_in(start_group) {
        if !registry.is_alive(entity) {
            continue;
        }

        let kind = registry.component::<StartMovement>(entity).kind;
        {
            let physics = registry.component_mut::<Physics>(entity);
            match kind {
                MovementKind::Left => {
                    physics.acceleration.x -= physics.move_speed;
                    physics.velocity.x = 0.0;
                }
                MovementKind::Right => {
                    physics.acceleration.x += physics.move_speed;
                    physics.velocity.x = 0.0;
                }
                MovementKind::Jump => {
                    physics.velocity.y = -physics.jump_speed;
                }
            }
        }

        // Face the direction just pressed.
        if let Some(drawable) = registry.get_mut::<Drawable>(entity) {
            match kind {
                MovementKind::Left => drawable.flip = SpriteFlip::Horizontal,
                MovementKind::Right => drawable.flip = SpriteFlip::None,
                MovementKind::Jump => {}
            }
        }

        registry.remove_component::<StartMovement>(entity);
    }
}

/// Consume stop markers (group: StopMovement + Physics).
pub fn apply_stop_markers(registry: &mut Registry, stop_group: GroupId) {
    for entity in registry.entities_in(stop_group) {
        if !registry.is_alive(entity) {
            continue;
        }

        let kind = registry.component::<StopMovement>(entity).kind;
        let physics = registry.component_mut::<Physics>(entity);
        match kind {
            MovementKind::Left => {
                physics.acceleration.x += physics.move_speed;
                physics.velocity.x = 0.0;
            }
            MovementKind::Right => {
                physics.acceleration.x -= physics.move_speed;
                physics.velocity.x = 0.0;
            }
            // Jump has no held state to release.
            MovementKind::Jump => {}
        }

        registry.remove_component::<StopMovement>(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::component::Component;
    use crate::game::components::Transform;
    use crate::game::entity::Entity;
    use glam::Vec2;

    struct World {
        registry: Registry,
        start_group: GroupId,
        stop_group: GroupId,
        player: Entity,
    }

    impl World {
        fn new() -> Self {
            let mut registry = Registry::new();
            let start_group = registry.register_group(StartMovement::MASK | Physics::MASK);
            let stop_group = registry.register_group(StopMovement::MASK | Physics::MASK);

            let player = registry.create_entity();
            registry.add_component(player, Transform::default());
            registry.add_component(player, Physics::new(400.0, 550.0, Vec2::new(400.0, 400.0)));

            Self {
                registry,
                start_group,
                stop_group,
                player,
            }
        }

        /// One movement stage plus the end-of-tick flush.
        fn run_stage(&mut self) {
            apply_start_markers(&mut self.registry, self.start_group);
            apply_stop_markers(&mut self.registry, self.stop_group);
            self.registry.flush();
        }

        fn press(&mut self, kind: MovementKind) {
            self.registry
                .try_add_component(self.player, StartMovement { kind });
        }

        fn release(&mut self, kind: MovementKind) {
            self.registry
                .try_add_component(self.player, StopMovement { kind });
        }

        fn physics(&self) -> &Physics {
            self.registry.component::<Physics>(self.player)
        }
    }

    #[test]
    fn held_directions_accumulate_and_release_subtracts() {
        let mut world = World::new();

        world.press(MovementKind::Left);
        world.run_stage();
        assert_eq!(world.physics().acceleration.x, -400.0);

        world.press(MovementKind::Right);
        world.run_stage();
        // Both held: contributions cancel.
        assert_eq!(world.physics().acceleration.x, 0.0);

        world.release(MovementKind::Left);
        world.run_stage();
        // Only the right contribution remains.
        assert_eq!(world.physics().acceleration.x, 400.0);
        assert_eq!(world.physics().velocity.x, 0.0);
    }

    #[test]
    fn markers_are_consumed_after_processing() {
        let mut world = World::new();
        world.press(MovementKind::Left);
        world.run_stage();

        assert!(!world
            .registry
            .has_component::<StartMovement>(world.player));

        // A second stage with no marker changes nothing.
        world.run_stage();
        assert_eq!(world.physics().acceleration.x, -400.0);
    }

    #[test]
    fn jump_is_a_velocity_impulse() {
        let mut world = World::new();
        world.registry.component_mut::<Physics>(world.player).velocity.y = 123.0;

        world.press(MovementKind::Jump);
        world.run_stage();

        let physics = world.physics();
        assert_eq!(physics.velocity.y, -550.0);
        assert_eq!(physics.acceleration.y, 0.0);

        // Releasing jump changes nothing.
        world.release(MovementKind::Jump);
        world.run_stage();
        assert_eq!(world.physics().velocity.y, -550.0);
    }

    #[test]
    fn start_edge_updates_facing() {
        let mut world = World::new();
        world.registry.add_component(
            world.player,
            Drawable::new(
                "adventurer",
                crate::game::rect::Rect::new(0.0, 0.0, 50.0, 37.0),
                Vec2::ONE,
                2,
            ),
        );

        world.press(MovementKind::Left);
        world.run_stage();
        assert_eq!(
            world.registry.component::<Drawable>(world.player).flip,
            SpriteFlip::Horizontal
        );

        world.press(MovementKind::Right);
        world.run_stage();
        assert_eq!(
            world.registry.component::<Drawable>(world.player).flip,
            SpriteFlip::None
        );
    }
}
