//! Collider-event dispatch and the death/respawn stage.

use glam::Vec2;
use log::debug;

use crate::game::components::{
    ColliderEvent, ColliderEventKind, DeathTag, MovingPlatform, Physics, Player, Transform,
};
use crate::game::entity::Entity;
use crate::game::event::{DeathEvent, Events, RespawnEvent};
use crate::game::registry::{GroupId, Registry};

/// Turn the tick's transient collision events into death markers. Every
/// event is consumed exactly once, recognized or not.
pub fn dispatch_collider_events(registry: &mut Registry, event_group: GroupId) {
    for entity in registry.entities_in(event_group) {
        if !registry.is_alive(entity) {
            continue;
        }

        let event = *registry.component::<ColliderEvent>(entity);
        if event.kind == ColliderEventKind::Lethal {
            registry.try_add_component(entity, DeathTag);
        }

        registry.remove_component::<ColliderEvent>(entity);
    }
}

/// Resolve death markers: the player teleports back to the respawn point
/// with its motion wiped; anything else is destroyed outright. Hazards are
/// one-shot for the world, the player is a singleton that must persist.
pub fn resolve_deaths(
    registry: &mut Registry,
    death_group: GroupId,
    respawn_point: Vec2,
    events: &mut Events,
) {
    for entity in registry.entities_in(death_group) {
        if !registry.is_alive(entity) {
            continue;
        }

        if registry.has_component::<Player>(entity) {
            registry.remove_component::<DeathTag>(entity);

            registry.component_mut::<Transform>(entity).position = respawn_point;
            let physics = registry.component_mut::<Physics>(entity);
            // No momentum carries across a respawn.
            physics.velocity = Vec2::ZERO;
            physics.acceleration = Vec2::ZERO;
            physics.move_remainder = Vec2::ZERO;
            physics.falling = true;
            let platform = physics.on_platform;
            physics.on_platform = Entity::NULL;
            if registry.is_alive(platform) {
                if let Some(moving) = registry.get_mut::<MovingPlatform>(platform) {
                    if moving.rider == entity {
                        moving.rider = Entity::NULL;
                    }
                }
            }

            debug!("player respawned at {respawn_point}");
            events.respawn.send(RespawnEvent {
                player: entity,
                position: respawn_point,
            });
        } else {
            events.death.send(DeathEvent { entity });
            registry.destroy_entity(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::component::Component;

    fn setup() -> (Registry, GroupId, GroupId) {
        let mut registry = Registry::new();
        let event_group = registry.register_group(ColliderEvent::MASK);
        let death_group = registry.register_group(DeathTag::MASK);
        (registry, event_group, death_group)
    }

    #[test]
    fn lethal_event_becomes_death_marker_and_is_consumed() {
        let (mut registry, event_group, _) = setup();
        let entity = registry.create_entity();
        registry.add_component(
            entity,
            ColliderEvent {
                kind: ColliderEventKind::Lethal,
                other: Entity::NULL,
            },
        );

        dispatch_collider_events(&mut registry, event_group);
        registry.flush();

        assert!(registry.has_component::<DeathTag>(entity));
        assert!(!registry.has_component::<ColliderEvent>(entity));
    }

    #[test]
    fn non_lethal_event_is_consumed_without_marker() {
        let (mut registry, event_group, _) = setup();
        let entity = registry.create_entity();
        registry.add_component(
            entity,
            ColliderEvent {
                kind: ColliderEventKind::None,
                other: Entity::NULL,
            },
        );

        dispatch_collider_events(&mut registry, event_group);
        registry.flush();

        assert!(!registry.has_component::<DeathTag>(entity));
        assert!(!registry.has_component::<ColliderEvent>(entity));
    }

    #[test]
    fn death_stage_is_a_no_op_on_empty_group() {
        let (mut registry, _, death_group) = setup();
        let bystander = registry.create_entity();
        registry.add_component(bystander, Transform::default());
        let mut events = Events::new();

        let live_before = registry.live_count();
        resolve_deaths(&mut registry, death_group, Vec2::ZERO, &mut events);
        registry.flush();

        assert_eq!(registry.live_count(), live_before);
        assert!(events.respawn.is_empty());
        assert!(events.death.is_empty());
    }

    #[test]
    fn dead_player_respawns_at_checkpoint_with_motion_wiped() {
        let (mut registry, _, death_group) = setup();
        let player = registry.create_entity();
        registry.add_component(player, Transform::from_position(Vec2::new(900.0, 900.0)));
        let mut physics = Physics::new(400.0, 550.0, Vec2::new(400.0, 400.0));
        physics.velocity = Vec2::new(120.0, 340.0);
        physics.acceleration = Vec2::new(-400.0, 0.0);
        registry.add_component(player, physics);
        registry.add_component(player, Player);
        registry.add_component(player, DeathTag);

        let checkpoint = Vec2::new(40.0, 60.0);
        let mut events = Events::new();
        resolve_deaths(&mut registry, death_group, checkpoint, &mut events);
        registry.flush();

        assert!(registry.is_alive(player));
        assert!(!registry.has_component::<DeathTag>(player));
        assert_eq!(registry.component::<Transform>(player).position, checkpoint);
        let physics = registry.component::<Physics>(player);
        assert_eq!(physics.velocity, Vec2::ZERO);
        assert_eq!(physics.acceleration, Vec2::ZERO);
        assert_eq!(events.respawn.len(), 1);
    }

    #[test]
    fn dead_non_player_is_destroyed() {
        let (mut registry, _, death_group) = setup();
        let hazard = registry.create_entity();
        registry.add_component(hazard, Transform::default());
        registry.add_component(hazard, DeathTag);

        let mut events = Events::new();
        resolve_deaths(&mut registry, death_group, Vec2::ZERO, &mut events);

        // Destruction is deferred to the flush.
        assert!(registry.is_alive(hazard));
        registry.flush();
        assert!(!registry.is_alive(hazard));
        assert_eq!(events.death.len(), 1);
    }
}
