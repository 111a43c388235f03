//! Moving-platform stage.
//!
//! Each platform is a two-state machine: paused at an endpoint, or moving
//! toward its current destination at constant speed. The rider, when one is
//! attached, receives the platform's exact displacement in the same tick as
//! positional carry, never velocity integration, so the rider can neither
//! lag nor lead.

use glam::Vec2;

use crate::game::components::{MovingPlatform, Transform};
use crate::game::registry::{GroupId, Registry};

/// Distance at which a platform counts as arrived at its destination.
const ARRIVAL_EPSILON: f32 = 0.5;

/// Advance every platform in the group (Transform + MovingPlatform).
pub fn advance_platforms(registry: &mut Registry, platform_group: GroupId, dt: f32) {
    for entity in registry.entities_in(platform_group) {
        if !registry.is_alive(entity) {
            continue;
        }

        let moving = *registry.component::<MovingPlatform>(entity);

        if moving.cooldown_remaining > 0.0 {
            registry.component_mut::<MovingPlatform>(entity).cooldown_remaining -= dt;
            continue;
        }

        let position = registry.component::<Transform>(entity).position;
        let to_destination = moving.destination - position;

        if to_destination.length() < ARRIVAL_EPSILON {
            let state = registry.component_mut::<MovingPlatform>(entity);
            state.destination = if state.destination == state.end {
                state.start
            } else {
                state.end
            };
            state.cooldown_remaining = state.cooldown;
            continue;
        }

        // Constant speed per axis, clamped so arrival is exact.
        let travel = moving.speed * dt;
        let step = Vec2::new(
            axis_step(to_destination.x, travel),
            axis_step(to_destination.y, travel),
        );

        registry.component_mut::<Transform>(entity).position += step;

        let rider = moving.rider;
        if registry.is_alive(rider) {
            if let Some(transform) = registry.get_mut::<Transform>(rider) {
                transform.position += step;
            }
        }
    }
}

fn axis_step(distance: f32, travel: f32) -> f32 {
    if distance == 0.0 {
        0.0
    } else {
        distance.signum() * travel.min(distance.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::component::Component;
    use crate::game::entity::Entity;

    const DT: f32 = 0.016;

    struct World {
        registry: Registry,
        group: GroupId,
        platform: Entity,
    }

    impl World {
        fn new(speed: f32, cooldown: f32) -> Self {
            let mut registry = Registry::new();
            let group = registry.register_group(Transform::MASK | MovingPlatform::MASK);

            let platform = registry.create_entity();
            let start = Vec2::new(100.0, 500.0);
            registry.add_component(platform, Transform::from_position(start));
            registry.add_component(
                platform,
                MovingPlatform::between(start, start + Vec2::new(300.0, 0.0), speed, cooldown),
            );

            Self {
                registry,
                group,
                platform,
            }
        }

        fn position(&self) -> Vec2 {
            self.registry.component::<Transform>(self.platform).position
        }
    }

    #[test]
    fn platform_moves_toward_destination_at_constant_speed() {
        let mut world = World::new(125.0, 0.0);

        advance_platforms(&mut world.registry, world.group, DT);
        assert_eq!(world.position(), Vec2::new(102.0, 500.0));

        advance_platforms(&mut world.registry, world.group, DT);
        assert_eq!(world.position(), Vec2::new(104.0, 500.0));
    }

    #[test]
    fn rider_receives_exact_platform_displacement() {
        let mut world = World::new(125.0, 0.0);

        let rider = world.registry.create_entity();
        world
            .registry
            .add_component(rider, Transform::from_position(Vec2::new(150.0, 400.0)));
        world
            .registry
            .component_mut::<MovingPlatform>(world.platform)
            .rider = rider;

        let platform_before = world.position();
        let rider_before = world.registry.component::<Transform>(rider).position;

        advance_platforms(&mut world.registry, world.group, DT);

        let platform_delta = world.position() - platform_before;
        let rider_delta = world.registry.component::<Transform>(rider).position - rider_before;
        assert_eq!(platform_delta, rider_delta);
        assert!(platform_delta.x > 0.0);
    }

    #[test]
    fn dead_rider_reference_is_ignored() {
        let mut world = World::new(125.0, 0.0);

        let rider = world.registry.create_entity();
        world
            .registry
            .add_component(rider, Transform::default());
        world
            .registry
            .component_mut::<MovingPlatform>(world.platform)
            .rider = rider;
        world.registry.destroy_entity(rider);
        world.registry.flush();

        // Advancing must not panic or touch the stale handle.
        advance_platforms(&mut world.registry, world.group, DT);
        assert!(world.position().x > 100.0);
    }

    #[test]
    fn arrival_flips_destination_and_starts_cooldown() {
        let mut world = World::new(10_000.0, 1.0);

        // Big speed: reaches the far endpoint in a few ticks, clamped so it
        // never overshoots.
        for _ in 0..3 {
            advance_platforms(&mut world.registry, world.group, DT);
        }
        assert_eq!(world.position(), Vec2::new(400.0, 500.0));

        // Arrival tick: destination flips, cooldown arms, no movement.
        advance_platforms(&mut world.registry, world.group, DT);
        let state = world.registry.component::<MovingPlatform>(world.platform);
        assert_eq!(state.destination, state.start);
        assert!(state.cooldown_remaining > 0.0);

        // While cooling down the platform only counts time.
        let before = world.position();
        advance_platforms(&mut world.registry, world.group, DT);
        assert_eq!(world.position(), before);
    }

    #[test]
    fn cooldown_expires_and_platform_returns() {
        let mut world = World::new(10_000.0, 0.02);

        for _ in 0..4 {
            advance_platforms(&mut world.registry, world.group, DT);
        }
        // Arrived and armed; two short ticks drain the 0.02 s cooldown.
        advance_platforms(&mut world.registry, world.group, DT);
        advance_platforms(&mut world.registry, world.group, DT);

        // Now heading back toward start.
        let before = world.position();
        advance_platforms(&mut world.registry, world.group, DT);
        assert!(world.position().x < before.x);
    }
}
